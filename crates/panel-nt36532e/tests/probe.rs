//! Probe and remove tests: descriptor matching, secondary link registration,
//! link attach parameters and unwinding on failure.
//!
//! Run with: cargo test -p panel-nt36532e --test probe

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use embedded_hal::digital::PinState;
use panel_nt36532e::config::DRIVER_NAME;
use panel_nt36532e::{Nt36532e, PanelError, PanelState};
use platform::mocks::{
    Event, Link, MockBacklight, MockBoard, MockDelay, MockDeviceNode, MockDsiDevice, MockDsiHost,
    MockPin, MockRegistry, MockRegulator, RemoteState,
};
use platform::{
    ConnectorType, DsiDeviceInfo, DsiError, DsiModeFlags, Orientation, PixelFormat, ResourceError,
};

type Sheng =
    Nt36532e<MockDsiDevice, MockDsiHost, MockRegulator, MockPin, MockBacklight, MockDelay>;

const DSC: &str = "xiaomi,sheng-nt36532e";
const VIDEO: &str = "xiaomi,sheng-nt36532e-video";

async fn probe(
    board: &MockBoard,
    mut node: MockDeviceNode,
    registry: &mut MockRegistry,
) -> Result<Sheng, PanelError> {
    Sheng::probe(&mut node, board.dsi(Link::Primary), board.delay(), registry).await
}

fn sheng_flags() -> DsiModeFlags {
    DsiModeFlags::VIDEO
        | DsiModeFlags::VIDEO_BURST
        | DsiModeFlags::CLOCK_NON_CONTINUOUS
        | DsiModeFlags::LPM
}

fn attach_event(link: Link, dsc: bool) -> Event {
    Event::Attach {
        link,
        lanes: 4,
        format: PixelFormat::Rgb888,
        mode_flags: sheng_flags(),
        dsc,
        dsc_slice_per_pkt: if dsc { 2 } else { 0 },
    }
}

fn unregistered(board: &MockBoard) -> bool {
    board
        .journal()
        .events()
        .contains(&Event::Unregistered { link: Link::Secondary })
}

// ---------------------------------------------------------------------------
// Successful probe
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_dsc_probe_registers_and_attaches_both_links() {
    let board = MockBoard::new();
    let mut registry = MockRegistry::new();
    let panel = probe(&board, MockDeviceNode::new(&board, DSC), &mut registry)
        .await
        .unwrap();

    assert!(panel.is_dual_link());
    assert_eq!(panel.state(), PanelState::Unprepared);
    assert!(panel.dsc_config().is_some());

    let events = board.journal().events();
    let registered = Event::Registered {
        link: Link::Secondary,
        info: DsiDeviceInfo {
            type_name: "TIANMA-sheng",
            channel: 0,
        },
    };
    let reg_at = events.iter().position(|e| *e == registered).unwrap();
    let dsi0_at = events
        .iter()
        .position(|e| *e == attach_event(Link::Primary, true))
        .unwrap();
    let dsi1_at = events
        .iter()
        .position(|e| *e == attach_event(Link::Secondary, true))
        .unwrap();
    assert!(reg_at < dsi0_at && dsi0_at < dsi1_at);

    let entries = registry.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, DRIVER_NAME);
    assert_eq!(entries[0].connector_type, ConnectorType::Dsi);
    assert!(entries[0].prepare_prev_first);

    // No control traffic during probe.
    assert_eq!(board.journal().traffic_on(Link::Primary), 0);
    assert_eq!(board.journal().traffic_on(Link::Secondary), 0);
}

#[tokio::test]
async fn test_video_probe_attaches_uncompressed() {
    let board = MockBoard::new();
    let mut registry = MockRegistry::new();
    let panel = probe(&board, MockDeviceNode::new(&board, VIDEO), &mut registry)
        .await
        .unwrap();

    assert!(panel.dsc_config().is_none());
    let events = board.journal().events();
    assert!(events.contains(&attach_event(Link::Primary, false)));
    assert!(events.contains(&attach_event(Link::Secondary, false)));
}

#[tokio::test]
async fn test_probe_holds_panel_in_reset() {
    let board = MockBoard::new();
    let mut registry = MockRegistry::new();
    let _panel = probe(&board, MockDeviceNode::new(&board, DSC), &mut registry)
        .await
        .unwrap();

    // Active-low reset requested asserted; rail untouched.
    assert_eq!(board.journal().pin_levels().len(), 1);
    assert_eq!(board.journal().last_pin_level(), Some(PinState::Low));
    assert_eq!(
        board
            .journal()
            .count(|e| matches!(e, Event::Regulator { .. })),
        0
    );
}

#[tokio::test]
async fn test_probe_records_orientation() {
    let board = MockBoard::new();
    let mut registry = MockRegistry::new();
    let node = MockDeviceNode::new(&board, DSC).with_orientation(Ok(Orientation::RightUp));
    let panel = probe(&board, node, &mut registry).await.unwrap();
    assert_eq!(platform::Panel::orientation(&panel), Orientation::RightUp);
}

// ---------------------------------------------------------------------------
// Probe failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_unknown_compatible_is_no_device() {
    let board = MockBoard::new();
    let mut registry = MockRegistry::new();
    let err = probe(&board, MockDeviceNode::new(&board, "novatek,nt36672e"), &mut registry)
        .await
        .err()
        .unwrap();

    assert_eq!(err, PanelError::NoDevice);
    assert_eq!(err.code(), -19);
    assert!(registry.entries().is_empty());
    assert_eq!(
        board
            .journal()
            .count(|e| matches!(e, Event::Registered { .. } | Event::Attach { .. })),
        0
    );
}

#[tokio::test]
async fn test_missing_secondary_node_is_no_device() {
    let board = MockBoard::new();
    let mut registry = MockRegistry::new();
    let node = MockDeviceNode::new(&board, DSC).with_remote(RemoteState::NoNode);
    let err = probe(&board, node, &mut registry).await.err().unwrap();

    assert_eq!(err, PanelError::NoDevice);
    assert!(!err.is_deferred());
}

#[tokio::test]
async fn test_unregistered_secondary_host_defers() {
    let board = MockBoard::new();
    let mut registry = MockRegistry::new();
    let node = MockDeviceNode::new(&board, DSC).with_remote(RemoteState::NotRegistered);
    let err = probe(&board, node, &mut registry).await.err().unwrap();

    assert!(err.is_deferred());
    assert_eq!(err.code(), -517);
    assert!(registry.entries().is_empty());
    assert_eq!(
        board
            .journal()
            .count(|e| matches!(e, Event::Attach { .. })),
        0
    );
}

#[tokio::test]
async fn test_resource_lookup_failures() {
    let board = MockBoard::new();
    let mut registry = MockRegistry::new();

    let node = MockDeviceNode::new(&board, DSC).with_regulator_error(ResourceError::Deferred);
    let err = probe(&board, node, &mut registry).await.err().unwrap();
    assert_eq!(err, PanelError::Resource(ResourceError::Deferred));
    assert!(err.is_deferred());

    let node = MockDeviceNode::new(&board, DSC).with_gpio_error(ResourceError::Missing);
    let err = probe(&board, node, &mut registry).await.err().unwrap();
    assert_eq!(err.code(), -19);

    assert!(registry.entries().is_empty());
}

#[tokio::test]
async fn test_secondary_register_failure() {
    let board = MockBoard::new();
    let mut registry = MockRegistry::new();
    board.faults().fail_register(DsiError::NoMemory);
    let err = probe(&board, MockDeviceNode::new(&board, DSC), &mut registry)
        .await
        .err()
        .unwrap();
    assert_eq!(err.code(), -12);
    assert!(registry.entries().is_empty());
}

#[tokio::test]
async fn test_orientation_failure_releases_secondary() {
    let board = MockBoard::new();
    let mut registry = MockRegistry::new();
    let node = MockDeviceNode::new(&board, DSC).with_orientation(Err(ResourceError::Invalid));
    let err = probe(&board, node, &mut registry).await.err().unwrap();

    assert_eq!(err.code(), -22);
    assert!(unregistered(&board));
    assert!(registry.entries().is_empty());
}

#[tokio::test]
async fn test_backlight_failure_releases_secondary() {
    let board = MockBoard::new();
    let mut registry = MockRegistry::new();
    let node = MockDeviceNode::new(&board, DSC).with_backlight(Err(ResourceError::Deferred));
    let err = probe(&board, node, &mut registry).await.err().unwrap();

    assert!(err.is_deferred());
    assert!(unregistered(&board));
}

#[tokio::test]
async fn test_secondary_attach_failure_unwinds() {
    let board = MockBoard::new();
    let mut registry = MockRegistry::new();
    board
        .faults()
        .fail_attach(Link::Secondary, DsiError::InvalidConfig);
    let err = probe(&board, MockDeviceNode::new(&board, DSC), &mut registry)
        .await
        .err()
        .unwrap();

    assert_eq!(err, PanelError::Dsi(DsiError::InvalidConfig));
    let events = board.journal().events();
    assert!(events.contains(&Event::Detach { link: Link::Primary }));
    assert!(unregistered(&board));
    assert!(registry.entries().is_empty());
}

#[tokio::test]
async fn test_primary_attach_failure() {
    let board = MockBoard::new();
    let mut registry = MockRegistry::new();
    board.faults().fail_attach(Link::Primary, DsiError::Transfer(-5));
    let err = probe(&board, MockDeviceNode::new(&board, DSC), &mut registry)
        .await
        .err()
        .unwrap();

    assert_eq!(err.code(), -5);
    assert_eq!(
        board
            .journal()
            .count(|e| matches!(e, Event::Attach { .. })),
        0
    );
    assert!(unregistered(&board));
}

// ---------------------------------------------------------------------------
// Remove
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_remove_detaches_and_unregisters() {
    let board = MockBoard::new();
    let mut registry = MockRegistry::new();
    let panel = probe(&board, MockDeviceNode::new(&board, DSC), &mut registry)
        .await
        .unwrap();
    board.journal().clear();

    panel.remove(&mut registry).await;

    assert_eq!(
        board.journal().events(),
        vec![
            Event::Detach { link: Link::Primary },
            Event::Detach { link: Link::Secondary },
            Event::Unregistered { link: Link::Secondary },
        ]
    );
    assert!(registry.entries().is_empty());
}

#[tokio::test]
async fn test_remove_continues_past_detach_failure() {
    let board = MockBoard::new();
    let mut registry = MockRegistry::new();
    let panel = probe(&board, MockDeviceNode::new(&board, DSC), &mut registry)
        .await
        .unwrap();
    board.journal().clear();
    board.faults().fail_detach(Link::Primary, DsiError::Timeout);

    panel.remove(&mut registry).await;

    assert_eq!(
        board.journal().events(),
        vec![
            Event::Detach { link: Link::Secondary },
            Event::Unregistered { link: Link::Secondary },
        ]
    );
    assert!(registry.entries().is_empty());
}
