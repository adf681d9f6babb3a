//! End-to-end routing through `SkyNode`: host port writes and SPI bytes in,
//! peripheral signals and node events out.

use crate::mock_hw::{FLASH_CHIP_SELECT, MockHost, RadioCall, make_node, make_node_with};
use embedded_hal::digital::PinState;
use skynode::app::ports::{PortId, RadioStatusPins, UsartId};
use skynode::config::NodeConfig;
use skynode::led::{LedState, Mode};
use skynode::pins::{BLUE_LED, CC2420_CHIP_SELECT, CC2420_VREG, GREEN_LED, RED_LED};
use skynode::router::Routed;

const P1: PortId = PortId(1);
const P2: PortId = PortId(2);
const P4: PortId = PortId(4);
const P5: PortId = PortId(5);
const SPI: UsartId = UsartId(0);

// ── LED group ─────────────────────────────────────────────────

#[test]
fn all_leds_off_keeps_mode_zero_without_event() {
    let (mut node, _clock, mut sink) = make_node();
    node.on_port_write(P5, 0xFF, &mut sink);
    assert_eq!(node.mode(), Mode::LEDS_OFF);
    assert_eq!(node.leds(), LedState::ALL_OFF);
    assert!(sink.mode_changes().is_empty());
}

#[test]
fn all_leds_on_fires_one_change_zero_to_three() {
    let (mut node, _clock, mut sink) = make_node();
    node.on_port_write(P5, 0x00, &mut sink);
    assert_eq!(node.mode(), Mode::LEDS_3);
    assert_eq!(sink.mode_changes(), vec![(0, 3)]);
    let leds = node.leds();
    assert!(leds.red && leds.green && leds.blue);
}

#[test]
fn lamp_swap_with_same_count_is_silent() {
    let (mut node, _clock, mut sink) = make_node();
    node.on_port_write(P5, 0xFF & !RED_LED, &mut sink);
    node.on_port_write(P5, 0xFF & !GREEN_LED, &mut sink);
    node.on_port_write(P5, 0xFF & !BLUE_LED, &mut sink);
    assert_eq!(sink.mode_changes(), vec![(0, 1)]);
    assert_eq!(
        node.leds(),
        LedState {
            red: false,
            green: false,
            blue: true
        }
    );
}

#[test]
fn led_walk_reports_each_count_change() {
    let (mut node, _clock, mut sink) = make_node();
    for v in [0xFF, 0xFF & !RED_LED, 0xFF & !(RED_LED | GREEN_LED), 0x00, 0x00, 0xFF] {
        node.on_port_write(P5, v, &mut sink);
    }
    assert_eq!(sink.mode_changes(), vec![(0, 1), (1, 2), (2, 3), (3, 0)]);
    assert_eq!(node.port_group(P5).and_then(|g| g.value()), Some(0xFF));
}

#[test]
fn led_writes_never_touch_peripherals() {
    let (mut node, _clock, mut sink) = make_node();
    let baseline = node.radio().calls.len();
    node.on_port_write(P5, 0x00, &mut sink);
    assert_eq!(node.radio().calls.len(), baseline);
    assert!(node.flash().port_writes.is_empty());
}

// ── Radio control group ──────────────────────────────────────

#[test]
fn radio_sees_deselect_then_select() {
    let (mut node, _clock, mut sink) = make_node();
    node.on_port_write(P4, CC2420_CHIP_SELECT, &mut sink);
    node.on_port_write(P4, 0x00, &mut sink);
    assert_eq!(node.radio().chip_select_history(), vec![false, true]);
}

#[test]
fn radio_control_drives_vreg_and_forwards_raw_to_flash() {
    let (mut node, _clock, mut sink) = make_node();
    let routed = node.on_port_write(P4, CC2420_VREG | CC2420_CHIP_SELECT | 0x81, &mut sink);
    match routed {
        Routed::RadioControl(s) => {
            assert!(!s.chip_select);
            assert!(s.vreg_on);
        }
        other => panic!("expected radio control, got {other:?}"),
    }
    let tail: Vec<_> = node.radio().calls.iter().rev().take(2).cloned().collect();
    assert_eq!(tail, vec![RadioCall::VregOn(true), RadioCall::ChipSelect(false)]);
    assert_eq!(
        node.flash().port_writes,
        vec![(P4, CC2420_VREG | CC2420_CHIP_SELECT | 0x81)]
    );
    assert!(sink.events.is_empty());
}

#[test]
fn unmonitored_port_is_ignored() {
    let (mut node, _clock, mut sink) = make_node();
    let baseline = node.radio().calls.len();
    assert_eq!(node.on_port_write(PortId(3), 0x00, &mut sink), Routed::Ignored);
    assert_eq!(node.radio().calls.len(), baseline);
    assert!(node.flash().port_writes.is_empty());
    assert!(sink.events.is_empty());
    assert_eq!(node.mode(), Mode::LEDS_OFF);
}

// ── SPI bus ──────────────────────────────────────────────────

#[test]
fn every_spi_byte_reaches_both_chips_in_order() {
    let (mut node, _clock, _sink) = make_node();
    for b in [0x01, 0x02, 0x03] {
        node.on_byte_received(SPI, b);
    }
    assert_eq!(node.radio().bus_log, vec![0x01, 0x02, 0x03]);
    assert_eq!(node.flash().bus_log, vec![0x01, 0x02, 0x03]);
}

#[test]
fn chips_filter_by_their_own_select() {
    let (mut node, _clock, mut sink) = make_node();

    // Radio selected, flash deselected.
    node.on_port_write(P4, FLASH_CHIP_SELECT, &mut sink);
    node.on_byte_received(SPI, 0xA1);
    // Flash selected, radio deselected.
    node.on_port_write(P4, CC2420_CHIP_SELECT, &mut sink);
    node.on_byte_received(SPI, 0xB2);

    assert_eq!(node.radio().bus_log, vec![0xA1, 0xB2]);
    assert_eq!(node.radio().accepted, vec![0xA1]);
    assert_eq!(node.flash().bus_log, vec![0xA1, 0xB2]);
    assert_eq!(node.flash().accepted, vec![0xB2]);
}

#[test]
fn bytes_on_other_usart_are_dropped() {
    let (mut node, _clock, _sink) = make_node();
    node.on_byte_received(UsartId(1), 0x55);
    assert!(node.radio().bus_log.is_empty());
    assert!(node.flash().bus_log.is_empty());
}

// ── Wiring and controls ──────────────────────────────────────

#[test]
fn radio_gets_status_pins_and_listener_at_construction() {
    let (node, _clock, _sink) = make_node();
    assert_eq!(
        node.radio().calls.first(),
        Some(&RadioCall::StatusPins(RadioStatusPins {
            port: P1,
            fifop: 0,
            fifo: 3,
            cca: 4,
        }))
    );
    assert!(node.radio().has_listener());
}

#[test]
fn button_drives_port2_pin7() {
    let (mut node, _clock, _sink) = make_node();
    let mut host = MockHost::sky();
    node.set_button(&mut host, false);
    node.set_button(&mut host, true);
    assert_eq!(
        host.pin_writes,
        vec![(P2, 7, PinState::Low), (P2, 7, PinState::High)]
    );
}

#[test]
fn incoming_packet_forwarded_to_radio() {
    let (mut node, _clock, _sink) = make_node();
    node.radio_incoming_packet(&[0x41, 0x88, 0x00]);
    assert_eq!(
        node.radio().calls.last(),
        Some(&RadioCall::Packet(vec![0x41, 0x88, 0x00]))
    );
}

#[test]
fn identity_and_debug_flag() {
    let (mut node, _clock, mut sink) = make_node_with(NodeConfig {
        debug: true,
        ..NodeConfig::default()
    });
    assert_eq!(node.name(), "Tmote Sky");
    assert_eq!(node.mode_max(), Mode::MAX);
    assert!(node.debug());
    // Debug logging must not change routing.
    node.on_port_write(P5, 0x00, &mut sink);
    node.on_byte_received(SPI, 0x10);
    assert_eq!(sink.mode_changes(), vec![(0, 3)]);
    node.set_debug(false);
    assert!(!node.config().debug);
}
