//! Mock implementations for testing
//!
//! Every mock handed out by a [`MockBoard`] appends to one shared
//! [`Journal`], so tests can assert on the interleaving of bus traffic,
//! GPIO levels, regulator state and elapsed delay. Failures are injected
//! through the board's [`Faults`] at any point, including after the mocks
//! have been moved into a driver.

#![cfg(any(test, feature = "std"))]

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin, PinState};

use crate::backlight::{Backlight, BacklightError};
use crate::dsc::PpsPayload;
use crate::dsi::{DsiDevice, DsiDeviceInfo, DsiError, DsiHost, DsiModeFlags, LinkConfig, PixelFormat};
use crate::gpio::Polarity;
use crate::of::{DeviceNode, RemoteHost, ResourceError};
use crate::panel::{Orientation, PanelEntry, PanelRegistry};
use crate::regulator::{Regulator, RegulatorError};

/// Which physical link a DSI event happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// DSI0, the link the panel probed on.
    Primary,
    /// DSI1, registered by the driver on the sibling host.
    Secondary,
}

/// One recorded hardware interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// DCS write.
    Dcs {
        /// Link.
        link: Link,
        /// Command byte.
        cmd: u8,
        /// Parameter bytes.
        params: Vec<u8>,
    },
    /// Picture parameter set transfer.
    Pps {
        /// Link.
        link: Link,
        /// Payload.
        payload: PpsPayload,
    },
    /// Compression mode switch.
    Compression {
        /// Link.
        link: Link,
        /// Requested state.
        enable: bool,
    },
    /// Link attached.
    Attach {
        /// Link.
        link: Link,
        /// Lanes requested.
        lanes: u8,
        /// Pixel format requested.
        format: PixelFormat,
        /// Mode flags requested.
        mode_flags: DsiModeFlags,
        /// Whether a DSC config was supplied.
        dsc: bool,
        /// DSC slices per packet.
        dsc_slice_per_pkt: u8,
    },
    /// Link detached.
    Detach {
        /// Link.
        link: Link,
    },
    /// Device registered on a host.
    Registered {
        /// Link.
        link: Link,
        /// Identity used.
        info: DsiDeviceInfo,
    },
    /// Device unregistered from its host.
    Unregistered {
        /// Link.
        link: Link,
    },
    /// Regulator switched.
    Regulator {
        /// New state.
        enabled: bool,
    },
    /// GPIO driven (physical level).
    Pin {
        /// Level.
        level: PinState,
    },
    /// Delay elapsed.
    Delay {
        /// Nanoseconds.
        ns: u64,
    },
    /// Backlight switched.
    Backlight {
        /// New state.
        on: bool,
    },
}

/// Shared, append-only event log.
#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Event>>>);

impl Journal {
    fn record(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    /// Snapshot of all events so far.
    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    /// Number of events recorded.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Count events matching `pred`.
    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.0.borrow().iter().filter(|e| pred(e)).count()
    }

    /// Index of the first event matching `pred`.
    pub fn position(&self, pred: impl Fn(&Event) -> bool) -> Option<usize> {
        self.0.borrow().iter().position(pred)
    }

    /// `(cmd, params)` of every DCS write on `link`, in order.
    pub fn dcs_writes(&self, link: Link) -> Vec<(u8, Vec<u8>)> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Dcs { link: l, cmd, params } if *l == link => Some((*cmd, params.clone())),
                _ => None,
            })
            .collect()
    }

    /// Every DSI event (DCS, PPS, compression) on `link`.
    pub fn traffic_on(&self, link: Link) -> usize {
        self.count(|e| match e {
            Event::Dcs { link: l, .. }
            | Event::Pps { link: l, .. }
            | Event::Compression { link: l, .. } => *l == link,
            _ => false,
        })
    }

    /// Total delay recorded strictly between event indices `from` and `to`.
    pub fn delay_between(&self, from: usize, to: usize) -> u64 {
        self.0
            .borrow()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i > from && *i < to)
            .map(|(_, e)| match e {
                Event::Delay { ns } => *ns,
                _ => 0,
            })
            .sum()
    }

    /// Physical levels driven on the GPIO, with their event index.
    pub fn pin_levels(&self) -> Vec<(usize, PinState)> {
        self.0
            .borrow()
            .iter()
            .enumerate()
            .filter_map(|(i, e)| match e {
                Event::Pin { level } => Some((i, *level)),
                _ => None,
            })
            .collect()
    }

    /// Last physical level driven on the GPIO.
    pub fn last_pin_level(&self) -> Option<PinState> {
        self.pin_levels().last().map(|(_, level)| *level)
    }
}

struct DcsFault {
    link: Link,
    cmd: u8,
    bare_only: bool,
    code: i32,
}

#[derive(Default)]
struct FaultState {
    dcs: Vec<DcsFault>,
    pps: Option<(Link, i32)>,
    compression: Option<(Link, i32)>,
    attach: Vec<(Link, DsiError)>,
    detach: Vec<(Link, DsiError)>,
    register: Option<DsiError>,
    regulator_enable: Option<i32>,
    regulator_disable: Option<i32>,
    backlight: Option<i32>,
    pin: bool,
}

/// Injected failures, shared by every mock of a board.
///
/// A fault stays armed until [`Faults::clear`].
#[derive(Clone, Default)]
pub struct Faults(Rc<RefCell<FaultState>>);

impl Faults {
    /// Fail every DCS write with opcode `cmd` on `link`, with or without
    /// parameters.
    pub fn fail_dcs(&self, link: Link, cmd: u8, code: i32) {
        self.0.borrow_mut().dcs.push(DcsFault {
            link,
            cmd,
            bare_only: false,
            code,
        });
    }

    /// Fail only the parameterless DCS command `cmd` on `link`. Vendor
    /// register writes sharing the opcode still go through.
    pub fn fail_dcs_command(&self, link: Link, cmd: u8, code: i32) {
        self.0.borrow_mut().dcs.push(DcsFault {
            link,
            cmd,
            bare_only: true,
            code,
        });
    }

    /// Fail PPS transfers on `link`.
    pub fn fail_pps(&self, link: Link, code: i32) {
        self.0.borrow_mut().pps = Some((link, code));
    }

    /// Fail compression-mode switches on `link`.
    pub fn fail_compression(&self, link: Link, code: i32) {
        self.0.borrow_mut().compression = Some((link, code));
    }

    /// Fail attaching `link`.
    pub fn fail_attach(&self, link: Link, err: DsiError) {
        self.0.borrow_mut().attach.push((link, err));
    }

    /// Fail detaching `link`.
    pub fn fail_detach(&self, link: Link, err: DsiError) {
        self.0.borrow_mut().detach.push((link, err));
    }

    /// Fail device registration on any host.
    pub fn fail_register(&self, err: DsiError) {
        self.0.borrow_mut().register = Some(err);
    }

    /// Fail regulator enable.
    pub fn fail_regulator_enable(&self, code: i32) {
        self.0.borrow_mut().regulator_enable = Some(code);
    }

    /// Fail regulator disable.
    pub fn fail_regulator_disable(&self, code: i32) {
        self.0.borrow_mut().regulator_disable = Some(code);
    }

    /// Fail every backlight update.
    pub fn fail_backlight(&self, code: i32) {
        self.0.borrow_mut().backlight = Some(code);
    }

    /// Fail every GPIO write.
    pub fn fail_pin(&self) {
        self.0.borrow_mut().pin = true;
    }

    /// Disarm every fault.
    pub fn clear(&self) {
        *self.0.borrow_mut() = FaultState::default();
    }

    fn dcs(&self, link: Link, cmd: u8, params: &[u8]) -> Option<i32> {
        self.0
            .borrow()
            .dcs
            .iter()
            .find(|f| f.link == link && f.cmd == cmd && (!f.bare_only || params.is_empty()))
            .map(|f| f.code)
    }

    fn attach(&self, link: Link) -> Option<DsiError> {
        self.0.borrow().attach.iter().find(|(l, _)| *l == link).map(|(_, e)| *e)
    }

    fn detach(&self, link: Link) -> Option<DsiError> {
        self.0.borrow().detach.iter().find(|(l, _)| *l == link).map(|(_, e)| *e)
    }
}

/// Factory for mocks sharing one journal and one fault plan.
#[derive(Clone, Default)]
pub struct MockBoard {
    journal: Journal,
    faults: Faults,
}

impl MockBoard {
    /// Fresh board with an empty journal and no faults.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared journal.
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// The shared fault plan.
    pub fn faults(&self) -> &Faults {
        &self.faults
    }

    /// A DSI device on `link`.
    pub fn dsi(&self, link: Link) -> MockDsiDevice {
        MockDsiDevice {
            link,
            journal: self.journal.clone(),
            faults: self.faults.clone(),
            attached: false,
        }
    }

    /// A DSI host whose devices land on `link`.
    pub fn host(&self, link: Link) -> MockDsiHost {
        MockDsiHost {
            link,
            journal: self.journal.clone(),
            faults: self.faults.clone(),
        }
    }

    /// A regulator, initially off.
    pub fn regulator(&self) -> MockRegulator {
        MockRegulator {
            journal: self.journal.clone(),
            faults: self.faults.clone(),
            enabled: false,
        }
    }

    /// An output pin.
    pub fn pin(&self) -> MockPin {
        MockPin {
            journal: self.journal.clone(),
            faults: self.faults.clone(),
        }
    }

    /// A delay provider that records instead of sleeping.
    pub fn delay(&self) -> MockDelay {
        MockDelay {
            journal: self.journal.clone(),
        }
    }

    /// A backlight that journals on/off switches.
    pub fn backlight(&self) -> MockBacklight {
        MockBacklight {
            journal: self.journal.clone(),
            faults: self.faults.clone(),
        }
    }
}

/// Mock DSI link.
pub struct MockDsiDevice {
    link: Link,
    journal: Journal,
    faults: Faults,
    attached: bool,
}

impl MockDsiDevice {
    /// Which link this device is.
    pub fn link(&self) -> Link {
        self.link
    }

    /// Whether the device is currently attached.
    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

impl DsiDevice for MockDsiDevice {
    async fn attach(&mut self, config: &LinkConfig<'_>) -> Result<(), DsiError> {
        if let Some(err) = self.faults.attach(self.link) {
            return Err(err);
        }
        self.attached = true;
        self.journal.record(Event::Attach {
            link: self.link,
            lanes: config.lanes,
            format: config.format,
            mode_flags: config.mode_flags,
            dsc: config.dsc.is_some(),
            dsc_slice_per_pkt: config.dsc_slice_per_pkt,
        });
        Ok(())
    }

    async fn detach(&mut self) -> Result<(), DsiError> {
        if let Some(err) = self.faults.detach(self.link) {
            return Err(err);
        }
        self.attached = false;
        self.journal.record(Event::Detach { link: self.link });
        Ok(())
    }

    async fn dcs_write(&mut self, cmd: u8, params: &[u8]) -> Result<(), DsiError> {
        if let Some(code) = self.faults.dcs(self.link, cmd, params) {
            return Err(DsiError::Transfer(code));
        }
        self.journal.record(Event::Dcs {
            link: self.link,
            cmd,
            params: params.to_vec(),
        });
        Ok(())
    }

    async fn picture_parameter_set(&mut self, pps: &PpsPayload) -> Result<(), DsiError> {
        let fault = self.faults.0.borrow().pps;
        if let Some((link, code)) = fault {
            if link == self.link {
                return Err(DsiError::Transfer(code));
            }
        }
        self.journal.record(Event::Pps {
            link: self.link,
            payload: *pps,
        });
        Ok(())
    }

    async fn compression_mode(&mut self, enable: bool) -> Result<(), DsiError> {
        let fault = self.faults.0.borrow().compression;
        if let Some((link, code)) = fault {
            if link == self.link {
                return Err(DsiError::Transfer(code));
            }
        }
        self.journal.record(Event::Compression {
            link: self.link,
            enable,
        });
        Ok(())
    }
}

/// Mock DSI host.
pub struct MockDsiHost {
    link: Link,
    journal: Journal,
    faults: Faults,
}

impl DsiHost for MockDsiHost {
    type Device = MockDsiDevice;

    fn register_device(&mut self, info: &DsiDeviceInfo) -> Result<MockDsiDevice, DsiError> {
        let fault = self.faults.0.borrow().register;
        if let Some(err) = fault {
            return Err(err);
        }
        self.journal.record(Event::Registered {
            link: self.link,
            info: *info,
        });
        Ok(MockDsiDevice {
            link: self.link,
            journal: self.journal.clone(),
            faults: self.faults.clone(),
            attached: false,
        })
    }

    fn unregister_device(&mut self, device: MockDsiDevice) {
        self.journal.record(Event::Unregistered { link: device.link });
    }
}

/// Mock supply rail.
pub struct MockRegulator {
    journal: Journal,
    faults: Faults,
    enabled: bool,
}

impl Regulator for MockRegulator {
    fn enable(&mut self) -> Result<(), RegulatorError> {
        let fault = self.faults.0.borrow().regulator_enable;
        if let Some(code) = fault {
            return Err(RegulatorError::Failed(code));
        }
        self.enabled = true;
        self.journal.record(Event::Regulator { enabled: true });
        Ok(())
    }

    fn disable(&mut self) -> Result<(), RegulatorError> {
        let fault = self.faults.0.borrow().regulator_disable;
        if let Some(code) = fault {
            return Err(RegulatorError::Failed(code));
        }
        if !self.enabled {
            return Err(RegulatorError::Unbalanced);
        }
        self.enabled = false;
        self.journal.record(Event::Regulator { enabled: false });
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Mock GPIO output.
pub struct MockPin {
    journal: Journal,
    faults: Faults,
}

impl ErrorType for MockPin {
    type Error = ErrorKind;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_state(PinState::Low)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_state(PinState::High)
    }

    fn set_state(&mut self, level: PinState) -> Result<(), Self::Error> {
        if self.faults.0.borrow().pin {
            return Err(ErrorKind::Other);
        }
        self.journal.record(Event::Pin { level });
        Ok(())
    }
}

/// Delay provider that journals the requested duration and returns at once.
pub struct MockDelay {
    journal: Journal,
}

impl embedded_hal_async::delay::DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.journal.record(Event::Delay { ns: u64::from(ns) });
    }

    async fn delay_us(&mut self, us: u32) {
        self.journal.record(Event::Delay {
            ns: u64::from(us).saturating_mul(1_000),
        });
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.journal.record(Event::Delay {
            ns: u64::from(ms).saturating_mul(1_000_000),
        });
    }
}

/// Mock backlight.
pub struct MockBacklight {
    journal: Journal,
    faults: Faults,
}

impl MockBacklight {
    fn check(&self) -> Result<(), BacklightError> {
        match self.faults.0.borrow().backlight {
            Some(code) => Err(BacklightError::Update(code)),
            None => Ok(()),
        }
    }
}

impl Backlight for MockBacklight {
    fn enable(&mut self) -> Result<(), BacklightError> {
        self.check()?;
        self.journal.record(Event::Backlight { on: true });
        Ok(())
    }

    fn disable(&mut self) -> Result<(), BacklightError> {
        self.check()?;
        self.journal.record(Event::Backlight { on: false });
        Ok(())
    }
}

/// How the mock node answers the graph lookup for the sibling host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteState {
    /// No graph endpoint.
    NoNode,
    /// Endpoint exists, host not registered yet.
    NotRegistered,
    /// Host available.
    Ready,
}

/// Mock device-tree node for a DSI panel.
pub struct MockDeviceNode {
    board: MockBoard,
    compatible: &'static str,
    regulator: Result<(), ResourceError>,
    gpio: Result<Polarity, ResourceError>,
    orientation: Result<Orientation, ResourceError>,
    backlight: Result<bool, ResourceError>,
    remote: RemoteState,
}

impl MockDeviceNode {
    /// Node matching `compatible`, with every resource present, an
    /// active-low reset line, normal orientation, no backlight and a
    /// registered sibling host.
    pub fn new(board: &MockBoard, compatible: &'static str) -> Self {
        Self {
            board: board.clone(),
            compatible,
            regulator: Ok(()),
            gpio: Ok(Polarity::ActiveLow),
            orientation: Ok(Orientation::Normal),
            backlight: Ok(false),
            remote: RemoteState::Ready,
        }
    }

    /// Make the `vddio` lookup fail.
    #[must_use]
    pub fn with_regulator_error(mut self, err: ResourceError) -> Self {
        self.regulator = Err(err);
        self
    }

    /// Make the `reset` lookup fail.
    #[must_use]
    pub fn with_gpio_error(mut self, err: ResourceError) -> Self {
        self.gpio = Err(err);
        self
    }

    /// Reset line polarity.
    #[must_use]
    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.gpio = Ok(polarity);
        self
    }

    /// Orientation lookup result.
    #[must_use]
    pub fn with_orientation(mut self, orientation: Result<Orientation, ResourceError>) -> Self {
        self.orientation = orientation;
        self
    }

    /// Backlight lookup result (`Ok(true)` = present).
    #[must_use]
    pub fn with_backlight(mut self, backlight: Result<bool, ResourceError>) -> Self {
        self.backlight = backlight;
        self
    }

    /// Sibling host lookup result.
    #[must_use]
    pub fn with_remote(mut self, remote: RemoteState) -> Self {
        self.remote = remote;
        self
    }
}

impl DeviceNode for MockDeviceNode {
    type Regulator = MockRegulator;
    type Pin = MockPin;
    type Backlight = MockBacklight;
    type Host = MockDsiHost;

    fn compatible(&self) -> &str {
        self.compatible
    }

    fn regulator(&mut self, _supply: &str) -> Result<MockRegulator, ResourceError> {
        self.regulator.map(|()| self.board.regulator())
    }

    fn gpio(&mut self, _con_id: &str) -> Result<(MockPin, Polarity), ResourceError> {
        self.gpio.map(|polarity| (self.board.pin(), polarity))
    }

    fn orientation(&self) -> Result<Orientation, ResourceError> {
        self.orientation
    }

    fn backlight(&mut self) -> Result<Option<MockBacklight>, ResourceError> {
        self.backlight
            .map(|present| present.then(|| self.board.backlight()))
    }

    fn remote_dsi_host(&mut self, _port: u32) -> RemoteHost<MockDsiHost> {
        match self.remote {
            RemoteState::NoNode => RemoteHost::NoNode,
            RemoteState::NotRegistered => RemoteHost::NotRegistered,
            RemoteState::Ready => RemoteHost::Ready(self.board.host(Link::Secondary)),
        }
    }
}

/// Mock panel registry.
#[derive(Default)]
pub struct MockRegistry {
    entries: Vec<PanelEntry>,
}

impl MockRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently published panels.
    pub fn entries(&self) -> &[PanelEntry] {
        &self.entries
    }
}

impl PanelRegistry for MockRegistry {
    fn add(&mut self, entry: PanelEntry) {
        self.entries.push(entry);
    }

    fn remove(&mut self, name: &'static str) {
        self.entries.retain(|e| e.name != name);
    }
}
