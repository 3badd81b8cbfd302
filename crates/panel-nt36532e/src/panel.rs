//! NT36532E panel lifecycle
//!
//! [`Nt36532e`] is created by [`Nt36532e::probe`], driven by the display
//! pipeline through [`platform::Panel`], and torn down by
//! [`Nt36532e::remove`].
//!
//! ```text
//!             prepare              enable
//! Unprepared ─────────▶ Prepared ─────────▶ Enabled
//!     ▲                    │                   │
//!     │ unprepare          │ disable           │ disable
//!     └──────────────── Disabled ◀─────────────┘
//! ```
//!
//! Vendor commands, PPS and compression mode go over the primary link only.
//! The secondary link is attached with the same parameters and carries
//! pixels only.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use platform::{
    Backlight, Connector, ConnectorDisplayInfo, ConnectorType, DeviceNode, DscConfig, DsiDevice,
    DsiHost, GpioLine, LinkConfig, ModeType, Orientation, Panel, PanelEntry, PanelRegistry,
    Regulator, RemoteHost,
};

use crate::config::{DRIVER_NAME, DSC_SLICE_PER_PKT, RESET_GPIO, SECONDARY_PORT, VDDIO_SUPPLY};
use crate::config::{DISPLAY_OFF_DELAY_MS, SLEEP_IN_DELAY_MS};
use crate::descriptor::{self, PanelDescriptor};
use crate::error::PanelError;
use crate::power::PowerSequencer;
use crate::sequencer;

/// Lifecycle state as seen by the display pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelState {
    /// Rail off, reset asserted.
    Unprepared,
    /// Powered and initialised, picture not yet shown.
    Prepared,
    /// Picture visible.
    Enabled,
    /// Controller asleep, rail still up.
    Disabled,
}

/// The sibling DSI host and the device registered on it.
struct SecondaryLink<HOST: DsiHost> {
    host: HOST,
    device: HOST::Device,
}

impl<HOST: DsiHost> SecondaryLink<HOST> {
    fn unregister(self) {
        let Self { mut host, device } = self;
        host.unregister_device(device);
    }
}

/// NT36532E panel instance.
///
/// Generic over:
/// - `DSI`: the primary [`DsiDevice`] the panel probed on.
/// - `HOST`: the sibling [`DsiHost`] reached through the graph; its devices
///   are the same type as the primary.
/// - `VDD`: the `vddio` [`Regulator`].
/// - `RST`: the reset [`OutputPin`].
/// - `BL`: the [`Backlight`] provider.
/// - `DELAY`: [`DelayNs`] for settle times.
pub struct Nt36532e<DSI, HOST, VDD, RST, BL, DELAY>
where
    HOST: DsiHost<Device = DSI>,
{
    desc: &'static PanelDescriptor,
    primary: DSI,
    secondary: Option<SecondaryLink<HOST>>,
    power: PowerSequencer<VDD, RST>,
    backlight: Option<BL>,
    orientation: Orientation,
    dsc: Option<DscConfig>,
    delay: DELAY,
    state: PanelState,
}

impl<DSI, HOST, VDD, RST, BL, DELAY> Nt36532e<DSI, HOST, VDD, RST, BL, DELAY>
where
    DSI: DsiDevice,
    HOST: DsiHost<Device = DSI>,
    VDD: Regulator,
    RST: OutputPin,
    BL: Backlight,
    DELAY: DelayNs,
{
    /// Bind to `node`, publish the panel in `registry` and attach every link.
    ///
    /// `primary` is the DSI device the node was matched on. On failure
    /// everything acquired so far is released again; a
    /// [`PanelError::is_deferred`] error means the sibling host has not
    /// registered yet and probe should be retried.
    pub async fn probe<N, R>(
        node: &mut N,
        primary: DSI,
        delay: DELAY,
        registry: &mut R,
    ) -> Result<Self, PanelError>
    where
        N: DeviceNode<Regulator = VDD, Pin = RST, Backlight = BL, Host = HOST>,
        R: PanelRegistry,
    {
        let vddio = node.regulator(VDDIO_SUPPLY).map_err(|e| {
            error!("failed to get vddio regulator: {}", e);
            PanelError::from(e)
        })?;

        let (pin, polarity) = node.gpio(RESET_GPIO).map_err(|e| {
            error!("failed to get reset gpio: {}", e);
            PanelError::from(e)
        })?;
        // Held in reset until the first prepare.
        let reset = GpioLine::request(pin, polarity, true)?;

        let desc = descriptor::resolve(node.compatible()).ok_or(PanelError::NoDevice)?;
        let dsc = desc.link_dsc()?;

        let secondary = if desc.is_dual_dsi {
            Some(Self::register_secondary(node, desc)?)
        } else {
            None
        };

        let orientation = match node.orientation() {
            Ok(o) => o,
            Err(e) => {
                error!("failed to get orientation: {}", e);
                if let Some(link) = secondary {
                    link.unregister();
                }
                return Err(e.into());
            }
        };

        let backlight = match node.backlight() {
            Ok(bl) => bl,
            Err(e) => {
                error!("failed to get backlight: {}", e);
                if let Some(link) = secondary {
                    link.unregister();
                }
                return Err(e.into());
            }
        };

        registry.add(PanelEntry {
            name: DRIVER_NAME,
            connector_type: ConnectorType::Dsi,
            prepare_prev_first: true,
        });

        let mut panel = Self {
            desc,
            primary,
            secondary,
            power: PowerSequencer::new(vddio, reset),
            backlight,
            orientation,
            dsc,
            delay,
            state: PanelState::Unprepared,
        };

        if let Err(e) = panel.attach_links().await {
            registry.remove(DRIVER_NAME);
            if let Some(link) = panel.secondary.take() {
                link.unregister();
            }
            return Err(e);
        }

        info!(
            "{} bound, {} link(s), dsc {}",
            DRIVER_NAME,
            desc.link_count(),
            panel.dsc.is_some()
        );
        Ok(panel)
    }

    fn register_secondary<N>(
        node: &mut N,
        desc: &'static PanelDescriptor,
    ) -> Result<SecondaryLink<HOST>, PanelError>
    where
        N: DeviceNode<Host = HOST>,
    {
        match node.remote_dsi_host(SECONDARY_PORT) {
            RemoteHost::NoNode => {
                error!("cannot get secondary DSI node");
                Err(PanelError::NoDevice)
            }
            RemoteHost::NotRegistered => {
                debug!("secondary DSI host not registered yet, deferring");
                Err(PanelError::Deferred)
            }
            RemoteHost::Ready(mut host) => match host.register_device(&desc.dsi_info) {
                Ok(device) => Ok(SecondaryLink { host, device }),
                Err(e) => {
                    error!("cannot get secondary DSI device: {}", e);
                    Err(e.into())
                }
            },
        }
    }

    /// Attach DSI0 then DSI1 with identical parameters. If DSI1 fails, DSI0
    /// is detached again.
    async fn attach_links(&mut self) -> Result<(), PanelError> {
        let config = LinkConfig {
            lanes: self.desc.lanes,
            format: self.desc.format,
            mode_flags: self.desc.mode_flags,
            dsc: self.dsc.as_ref(),
            dsc_slice_per_pkt: if self.dsc.is_some() {
                DSC_SLICE_PER_PKT
            } else {
                0
            },
        };

        if let Err(e) = self.primary.attach(&config).await {
            error!("cannot attach to DSI0 host: {}", e);
            return Err(e.into());
        }

        if let Some(link) = self.secondary.as_mut() {
            if let Err(e) = link.device.attach(&config).await {
                error!("cannot attach to DSI1 host: {}", e);
                if let Err(detach_err) = self.primary.detach().await {
                    error!("failed to detach from DSI0 host: {}", detach_err);
                }
                return Err(e.into());
            }
        }

        Ok(())
    }

    /// Detach both links, release the secondary device and withdraw the
    /// panel from `registry`. Failures are logged.
    pub async fn remove<R: PanelRegistry>(mut self, registry: &mut R) {
        if let Err(e) = self.primary.detach().await {
            error!("failed to detach from DSI0 host: {}", e);
        }

        if let Some(mut link) = self.secondary.take() {
            if let Err(e) = link.device.detach().await {
                error!("failed to detach from DSI1 host: {}", e);
            }
            link.unregister();
        }

        registry.remove(DRIVER_NAME);
        debug!("{} removed", DRIVER_NAME);
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Descriptor this instance was bound with.
    pub fn descriptor(&self) -> &'static PanelDescriptor {
        self.desc
    }

    /// Per-link DSC configuration, rate control included.
    pub fn dsc_config(&self) -> Option<&DscConfig> {
        self.dsc.as_ref()
    }

    /// Whether a secondary link is held.
    pub fn is_dual_link(&self) -> bool {
        self.secondary.is_some()
    }

    /// Power on, reset and initialise. Rolls the rail back on failure.
    async fn power_up_and_init(&mut self) -> Result<(), PanelError> {
        if !self.power.is_powered() {
            self.power.power_on()?;
        }

        if let Err(e) = self.power.reset_pulse(&mut self.delay).await {
            error!("failed to reset panel: {}", e);
            self.power.power_off();
            return Err(e.into());
        }

        let table = self.desc.init_sequence;
        if let Err(e) = sequencer::init(&mut self.primary, &mut self.delay, table).await {
            error!("failed to initialize panel: {}", e);
            self.power.power_off();
            return Err(e.into());
        }

        Ok(())
    }

    /// Send the PPS and switch the primary link to compressed signalling.
    ///
    /// No rollback here: the controller is initialised and powered when
    /// this fails, and stays that way until the next unprepare.
    async fn start_compression(&mut self) -> Result<(), PanelError> {
        let Some(dsc) = self.dsc.as_ref() else {
            return Ok(());
        };
        let pps = dsc.pps_payload();

        if let Err(e) = self.primary.picture_parameter_set(&pps).await {
            error!("failed to transmit PPS: {}", e);
            return Err(e.into());
        }

        if let Err(e) = self.primary.compression_mode(true).await {
            error!("failed to enable compression mode: {}", e);
            return Err(e.into());
        }

        Ok(())
    }
}

impl<DSI, HOST, VDD, RST, BL, DELAY> Panel for Nt36532e<DSI, HOST, VDD, RST, BL, DELAY>
where
    DSI: DsiDevice,
    HOST: DsiHost<Device = DSI>,
    VDD: Regulator,
    RST: OutputPin,
    BL: Backlight,
    DELAY: DelayNs,
{
    type Error = PanelError;

    async fn prepare(&mut self) -> Result<(), PanelError> {
        if self.state != PanelState::Unprepared {
            warn!("prepare called while already prepared");
            return Ok(());
        }

        self.power_up_and_init().await?;
        self.start_compression().await?;

        self.state = PanelState::Prepared;
        debug!("panel prepared");
        Ok(())
    }

    async fn enable(&mut self) -> Result<(), PanelError> {
        match self.state {
            PanelState::Enabled => {
                warn!("enable called while already enabled");
                return Ok(());
            }
            PanelState::Unprepared => {
                warn!("enable called before prepare");
                return Ok(());
            }
            PanelState::Prepared | PanelState::Disabled => {}
        }

        if let Some(bl) = self.backlight.as_mut() {
            if let Err(e) = bl.enable() {
                error!("failed to enable backlight: {}", e);
            }
        }

        self.state = PanelState::Enabled;
        debug!("panel enabled");
        Ok(())
    }

    async fn disable(&mut self) {
        if matches!(self.state, PanelState::Unprepared | PanelState::Disabled) {
            warn!("disable called while not active");
            return;
        }

        if let Some(bl) = self.backlight.as_mut() {
            if let Err(e) = bl.disable() {
                error!("failed to disable backlight: {}", e);
            }
        }

        if let Err(e) = self.primary.set_display_off().await {
            error!("failed to set display off: {}", e);
        }

        self.delay.delay_ms(DISPLAY_OFF_DELAY_MS).await;

        if let Err(e) = self.primary.enter_sleep_mode().await {
            error!("failed to enter sleep mode: {}", e);
        }

        self.delay.delay_ms(SLEEP_IN_DELAY_MS).await;

        self.state = PanelState::Disabled;
        debug!("panel disabled");
    }

    async fn unprepare(&mut self) {
        if self.state == PanelState::Unprepared && !self.power.is_powered() {
            warn!("unprepare called while not prepared");
            return;
        }

        self.power.power_off();
        self.state = PanelState::Unprepared;
        debug!("panel unprepared");
    }

    fn get_modes(&self, connector: &mut Connector) -> Result<usize, PanelError> {
        for (i, m) in self.desc.modes.iter().enumerate() {
            let mut mode = m.clone();
            mode.mode_type = ModeType::DRIVER;
            if i == 0 {
                mode.mode_type |= ModeType::PREFERRED;
            }
            mode.set_name();

            if connector.add_probed_mode(mode).is_err() {
                error!(
                    "failed to add mode {}x{}@{}",
                    m.hdisplay,
                    m.vdisplay,
                    m.vrefresh()
                );
                return Err(PanelError::OutOfMemory);
            }
        }

        connector.display_info = ConnectorDisplayInfo {
            width_mm: self.desc.width_mm,
            height_mm: self.desc.height_mm,
            bpc: self.desc.bpc,
        };

        Ok(self.desc.modes.len())
    }

    fn orientation(&self) -> Orientation {
        self.orientation
    }
}
