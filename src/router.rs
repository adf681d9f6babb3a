//! Port signal router.
//!
//! Turns raw writes to the node's monitored port groups into meaning:
//!
//! | Group        | Bits                      | Effect                                   |
//! |--------------|---------------------------|------------------------------------------|
//! | LED (P5)     | 4 red, 5 green, 6 blue    | lamps on when clear, mode = lamps lit    |
//! | Radio (P4)   | 2 CS_N, 5 VREG_EN         | radio chip-select / VREG, raw to flash   |
//!
//! Writes to any other port, and bits with no meaning, are ignored.

use log::info;

use crate::app::events::NodeEvent;
use crate::app::ports::{EventSink, Peripheral, PortId, Radio};
use crate::led::{LedState, LedTracker, Mode, ModeChange};
use crate::pins::{CC2420_CHIP_SELECT, CC2420_VREG, LED_MASK, RADIO_CONTROL_MASK};

/// What a monitored group drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortRole {
    Leds,
    RadioControl,
}

/// One monitored port group and its most recent write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortGroup {
    pub id: PortId,
    pub role: PortRole,
    /// Bits with defined meaning for this role.
    pub mask: u8,
    last: Option<u8>,
}

impl PortGroup {
    fn new(id: PortId, role: PortRole) -> Self {
        let mask = match role {
            PortRole::Leds => LED_MASK,
            PortRole::RadioControl => RADIO_CONTROL_MASK,
        };
        Self {
            id,
            role,
            mask,
            last: None,
        }
    }

    /// Last value written, `None` before the first write.
    pub fn value(&self) -> Option<u8> {
        self.last
    }
}

/// Radio control lines decoded from the Port 4 value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlSignals {
    /// CS_N is active low: selected when the bit is clear.
    pub chip_select: bool,
    /// VREG_EN is active high.
    pub vreg_on: bool,
}

impl ControlSignals {
    pub const fn decode(raw: u8) -> Self {
        Self {
            chip_select: (raw & CC2420_CHIP_SELECT) == 0,
            vreg_on: (raw & CC2420_VREG) != 0,
        }
    }
}

/// Outcome of routing one write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    Leds {
        state: LedState,
        change: Option<ModeChange>,
    },
    RadioControl(ControlSignals),
    Ignored,
}

pub struct PortSignalRouter {
    leds: PortGroup,
    radio_control: PortGroup,
    tracker: LedTracker,
    signals: ControlSignals,
}

impl PortSignalRouter {
    pub fn new(led_port: PortId, radio_control_port: PortId) -> Self {
        Self {
            leds: PortGroup::new(led_port, PortRole::Leds),
            radio_control: PortGroup::new(radio_control_port, PortRole::RadioControl),
            tracker: LedTracker::new(),
            signals: ControlSignals::default(),
        }
    }

    /// Route one write to a host port.
    ///
    /// The LED group updates the lamps, emits [`NodeEvent::LedsChanged`] and,
    /// when the lamp count changed, [`NodeEvent::ModeChanged`]. The radio
    /// control group drives the radio's chip-select and VREG lines and then
    /// passes the raw value to the flash, which shares the wiring.
    pub fn route<R, F>(
        &mut self,
        port: PortId,
        value: u8,
        radio: &mut R,
        flash: &mut F,
        sink: &mut impl EventSink,
    ) -> Routed
    where
        R: Radio + ?Sized,
        F: Peripheral + ?Sized,
    {
        if port == self.leds.id {
            self.leds.last = Some(value);
            let change = self.tracker.update(value);
            let state = self.tracker.state();
            if let Some(ModeChange { from, to }) = change {
                info!("LED mode {} -> {}", from, to);
                sink.emit(&NodeEvent::ModeChanged { from, to });
            }
            sink.emit(&NodeEvent::LedsChanged(state));
            Routed::Leds { state, change }
        } else if port == self.radio_control.id {
            self.radio_control.last = Some(value);
            let signals = ControlSignals::decode(value);
            self.signals = signals;
            radio.set_chip_select(signals.chip_select);
            radio.set_vreg_on(signals.vreg_on);
            flash.port_write(port, value);
            Routed::RadioControl(signals)
        } else {
            Routed::Ignored
        }
    }

    pub fn leds(&self) -> LedState {
        self.tracker.state()
    }

    pub fn mode(&self) -> Mode {
        self.tracker.mode()
    }

    /// Control lines as of the last radio control write.
    pub fn control_signals(&self) -> ControlSignals {
        self.signals
    }

    /// The monitored group for `port`, if any.
    pub fn group(&self, port: PortId) -> Option<&PortGroup> {
        [&self.leds, &self.radio_control]
            .into_iter()
            .find(|g| g.id == port)
    }
}
