//! The Tmote Sky node, the hub between host CPU and peripherals.
//!
//! [`SkyNode`] owns the router, the SPI bus, the radio and flash, and the
//! heartbeat. The host calls into it synchronously for every port write,
//! every serial byte and every clock firing; each call runs to completion.
//!
//! ```text
//!   host port write ──▶ ┌──────────────────────┐ ──▶ Radio (CS, VREG)
//!                       │       SkyNode         │ ──▶ Flash (raw P4)
//!   host SPI byte ────▶ │ router · bus · leds   │ ──▶ Radio, Flash (bytes)
//!                       │ heartbeat             │
//!   clock firing ─────▶ └──────────────────────┘ ──▶ EventSink
//! ```
//!
//! Every host unit the node needs is resolved once, in [`SkyNode::new`].
//! A missing unit is a construction error naming the unit; the node never
//! runs half-wired.

use std::time::Instant;

use embedded_hal::digital::PinState;
use log::{debug, info, warn};

use crate::adapters::packet_log::LogPacketListener;
use crate::app::events::NodeEvent;
use crate::app::ports::{
    EmulatedClock, EventSink, IoUnit, IoUnits, Peripheral, PinDriver, PortId, Radio,
    RadioStatusPins, SchedulerDelegate, TaskKind, UsartId,
};
use crate::bus::{BusDevices, BusSlot, SerialBus};
use crate::config::NodeConfig;
use crate::error::{Binding, Error, Result};
use crate::led::{LedState, Mode};
use crate::pins::{BUTTON_PIN, CC2420_CCA, CC2420_FIFO, CC2420_FIFOP};
use crate::router::{ControlSignals, PortGroup, PortSignalRouter, Routed};
use crate::scheduler::{RecurringTask, Scheduler, TaskId};

/// Platform name reported to observers.
pub const NODE_NAME: &str = "Tmote Sky";

// ───────────────────────────────────────────────────────────────
// Binding table
// ───────────────────────────────────────────────────────────────

/// Host units the node is wired to, resolved at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingTable {
    pub leds: PortId,
    pub radio_control: PortId,
    pub radio_status: PortId,
    pub button: PortId,
    pub spi: UsartId,
}

impl BindingTable {
    /// Resolve every binding against the host, failing on the first one
    /// that is absent or of the wrong kind.
    pub fn resolve(units: &impl IoUnits) -> Result<Self> {
        Ok(Self {
            leds: port(units, Binding::LedPort)?,
            radio_control: port(units, Binding::RadioControlPort)?,
            radio_status: port(units, Binding::RadioStatusPort)?,
            button: port(units, Binding::ButtonPort)?,
            spi: usart(units, Binding::SpiUsart)?,
        })
    }
}

fn lookup(units: &impl IoUnits, binding: Binding) -> Result<IoUnit> {
    units.io_unit(binding.unit_name()).ok_or_else(|| {
        warn!("SkyNode: host has no {}", binding);
        Error::MissingBinding(binding)
    })
}

fn port(units: &impl IoUnits, binding: Binding) -> Result<PortId> {
    lookup(units, binding)?.as_port().ok_or_else(|| {
        warn!("SkyNode: {} is not a port", binding);
        Error::WrongUnitKind(binding)
    })
}

fn usart(units: &impl IoUnits, binding: Binding) -> Result<UsartId> {
    lookup(units, binding)?.as_usart().ok_or_else(|| {
        warn!("SkyNode: {} is not a USART", binding);
        Error::WrongUnitKind(binding)
    })
}

// ───────────────────────────────────────────────────────────────
// Peripherals
// ───────────────────────────────────────────────────────────────

struct Devices<R, F> {
    radio: R,
    flash: F,
}

impl<R: Radio, F: Peripheral> BusDevices for Devices<R, F> {
    fn device(&mut self, slot: BusSlot) -> &mut dyn Peripheral {
        match slot {
            BusSlot::Radio => &mut self.radio,
            BusSlot::Flash => &mut self.flash,
        }
    }
}

/// Reports heartbeat firings to the node's observers, with the wall time
/// elapsed since the heartbeat was armed alongside the emulated time.
struct HeartbeatReporter<'a, S> {
    sink: &'a mut S,
    wall_origin: Instant,
}

impl<S: EventSink> SchedulerDelegate for HeartbeatReporter<'_, S> {
    fn on_task_fired(&mut self, label: &str, kind: TaskKind, fired_at: u64, firings: u64) {
        match kind {
            TaskKind::Heartbeat => {
                let wall_ms =
                    u64::try_from(self.wall_origin.elapsed().as_millis()).unwrap_or(u64::MAX);
                info!(
                    "{}: {} #{} wall {} ms, emulated {} ms",
                    NODE_NAME,
                    label,
                    firings,
                    wall_ms,
                    fired_at
                );
                self.sink.emit(&NodeEvent::Heartbeat {
                    emulated_ms: fired_at,
                    wall_ms,
                    firings,
                });
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// SkyNode
// ───────────────────────────────────────────────────────────────

pub struct SkyNode<R, F> {
    config: NodeConfig,
    bindings: BindingTable,
    router: PortSignalRouter,
    bus: SerialBus,
    devices: Devices<R, F>,
    scheduler: Scheduler,
    heartbeat: TaskId,
    /// Wall-clock reference taken when the heartbeat was armed.
    wall_origin: Instant,
}

impl<R, F> SkyNode<R, F> {
    pub const NAME: &'static str = NODE_NAME;
}

impl<R: Radio, F: Peripheral> SkyNode<R, F> {
    /// Build the node and arm the heartbeat on `clock`.
    ///
    /// Resolves every host unit the node is wired to, hands the radio its
    /// status pins and packet listener, and attaches radio then flash to the
    /// SPI bus.
    pub fn new(
        config: NodeConfig,
        units: &impl IoUnits,
        mut radio: R,
        flash: F,
        clock: &mut impl EmulatedClock,
    ) -> Result<Self> {
        config.validate()?;
        let bindings = BindingTable::resolve(units)?;

        radio.attach_status_pins(RadioStatusPins {
            port: bindings.radio_status,
            fifop: CC2420_FIFOP,
            fifo: CC2420_FIFO,
            cca: CC2420_CCA,
        });
        radio.set_packet_listener(Box::new(LogPacketListener::new(Self::NAME)));

        let mut bus = SerialBus::new(bindings.spi);
        bus.attach(BusSlot::Radio)?;
        bus.attach(BusSlot::Flash)?;

        let mut scheduler = Scheduler::new();
        let heartbeat = scheduler
            .add(RecurringTask {
                label: "heartbeat",
                kind: TaskKind::Heartbeat,
                period_ms: u64::from(config.heartbeat_period_ms),
            })
            .ok_or(Error::Config("recurring task table full"))?;
        scheduler.arm_all(clock);
        let wall_origin = Instant::now();

        info!(
            "{}: radio '{}' and flash '{}' on USART {}, LEDs on port {}, radio control on port {}",
            Self::NAME,
            radio.name(),
            flash.name(),
            bindings.spi.0,
            bindings.leds.0,
            bindings.radio_control.0,
        );

        Ok(Self {
            router: PortSignalRouter::new(bindings.leds, bindings.radio_control),
            config,
            bindings,
            bus,
            devices: Devices { radio, flash },
            scheduler,
            heartbeat,
            wall_origin,
        })
    }

    // ── Host callbacks ────────────────────────────────────────

    /// A write to a host port. Unmonitored ports are ignored.
    pub fn on_port_write(&mut self, port: PortId, value: u8, sink: &mut impl EventSink) -> Routed {
        let routed = self.router.route(
            port,
            value,
            &mut self.devices.radio,
            &mut self.devices.flash,
            sink,
        );
        if self.config.debug {
            debug!("P{} <- 0x{:02x}: {:?}", port.0, value, routed);
        }
        routed
    }

    /// A byte shifted on a host serial unit. Bytes on units other than the
    /// bound SPI unit are ignored.
    pub fn on_byte_received(&mut self, usart: UsartId, byte: u8) {
        if usart != self.bus.usart() {
            return;
        }
        if self.config.debug {
            debug!("SPI 0x{:02x} -> {:?}", byte, self.bus.slots());
        }
        self.bus.fan_out(byte, &mut self.devices);
    }

    /// A clock firing. Late firings are honoured; returns `false` if the
    /// firing was not for this node or came early.
    pub fn on_timer(
        &mut self,
        task: TaskId,
        clock: &mut impl EmulatedClock,
        sink: &mut impl EventSink,
    ) -> bool {
        let mut reporter = HeartbeatReporter {
            sink,
            wall_origin: self.wall_origin,
        };
        self.scheduler.fire(task, clock, &mut reporter)
    }

    // ── Node controls ─────────────────────────────────────────

    /// Press (`hi == false`, active low) or release the user button.
    pub fn set_button(&mut self, pins: &mut impl PinDriver, hi: bool) {
        let state = if hi { PinState::High } else { PinState::Low };
        pins.set_pin_state(self.bindings.button, BUTTON_PIN, state);
    }

    /// Deliver a packet arriving over the air to the radio.
    pub fn radio_incoming_packet(&mut self, packet: &[u8]) {
        self.devices.radio.incoming_packet(packet);
    }

    pub fn debug(&self) -> bool {
        self.config.debug
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.config.debug = debug;
    }

    // ── Observability ─────────────────────────────────────────

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    pub fn leds(&self) -> LedState {
        self.router.leds()
    }

    pub fn mode(&self) -> Mode {
        self.router.mode()
    }

    pub fn mode_max(&self) -> Mode {
        Mode::MAX
    }

    pub fn control_signals(&self) -> ControlSignals {
        self.router.control_signals()
    }

    /// Monitored group for `port`, with its last written value.
    pub fn port_group(&self, port: PortId) -> Option<&PortGroup> {
        self.router.group(port)
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn heartbeat_task(&self) -> TaskId {
        self.heartbeat
    }

    pub fn heartbeat_firings(&self) -> u64 {
        self.scheduler.firings(self.heartbeat)
    }

    /// Emulated time the heartbeat was armed at.
    pub fn heartbeat_armed_at(&self) -> Option<u64> {
        self.scheduler.armed_at(self.heartbeat)
    }

    pub fn radio(&self) -> &R {
        &self.devices.radio
    }

    pub fn flash(&self) -> &F {
        &self.devices.flash
    }
}
