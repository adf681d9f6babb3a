//! Port traits: the boundary between the node core and its collaborators.
//!
//! ```text
//!   Host (CPU ports, USART) ──▶ SkyNode ──▶ Radio / Flash (Peripheral)
//!                                  │
//!                                  ├──▶ EventSink (observers)
//!                                  └──▶ EmulatedClock (heartbeat)
//! ```
//!
//! The node consumes these traits via generics, so the core never touches a
//! concrete CPU model or peripheral implementation. Peripherals only ever
//! receive signals through [`Peripheral`] / [`Radio`]; the node never reads
//! their internal state.

use embedded_hal::digital::PinState;

use super::events::NodeEvent;
use crate::scheduler::TaskId;

// ───────────────────────────────────────────────────────────────
// Host I/O units
// ───────────────────────────────────────────────────────────────

/// Identifies a discrete I/O port on the host CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortId(pub u8);

/// Identifies a serial unit on the host CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UsartId(pub u8);

/// Capability of a named host I/O unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoUnit {
    Port(PortId),
    Usart(UsartId),
    /// Any other unit (timers, ADC, ...); never bindable by the node.
    Other,
}

impl IoUnit {
    pub fn as_port(self) -> Option<PortId> {
        match self {
            Self::Port(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_usart(self) -> Option<UsartId> {
        match self {
            Self::Usart(id) => Some(id),
            _ => None,
        }
    }
}

/// Read-side host port: named lookup of the CPU's I/O units.
pub trait IoUnits {
    /// Look up a unit by its name (e.g. `"Port 5"`, `"USART 0"`).
    fn io_unit(&self, name: &str) -> Option<IoUnit>;
}

/// Write-side host port: drive an input pin of a host port.
pub trait PinDriver {
    fn set_pin_state(&mut self, port: PortId, pin: u8, state: PinState);
}

// ───────────────────────────────────────────────────────────────
// Peripheral capability interface
// ───────────────────────────────────────────────────────────────

/// Any chip hanging off the node's shared SPI bus.
///
/// Implementations own their selection logic: a byte arriving while the
/// chip is deselected must be discarded by the chip itself.
pub trait Peripheral {
    fn name(&self) -> &str;

    /// Raw write to a control port wired to this chip.
    fn port_write(&mut self, _port: PortId, _value: u8) {}

    /// One byte transferred on the shared serial channel.
    fn data_received(&mut self, byte: u8);
}

/// Pins of the host port the radio drives its status outputs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioStatusPins {
    pub port: PortId,
    pub fifop: u8,
    pub fifo: u8,
    pub cca: u8,
}

/// Radio transceiver: a peripheral with decoded control lines.
pub trait Radio: Peripheral {
    /// Chip-select line, `true` = selected.
    fn set_chip_select(&mut self, selected: bool);

    /// Voltage-regulator enable line, `true` = powered.
    fn set_vreg_on(&mut self, on: bool);

    /// Where the radio reports FIFOP / FIFO / CCA.
    fn attach_status_pins(&mut self, _pins: RadioStatusPins) {}

    /// Inject a packet arriving over the air.
    fn incoming_packet(&mut self, packet: &[u8]);

    /// Install the receiver of transmission notifications.
    fn set_packet_listener(&mut self, _listener: Box<dyn PacketListener>) {}
}

/// Higher-level notifications a radio raises about its own transmissions.
/// `at_ms` is the emulated time of the notification as the radio sees it.
pub trait PacketListener {
    fn transmission_started(&mut self, at_ms: u64);

    fn transmission_ended(&mut self, data: &[u8], at_ms: u64);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (node → observers)
// ───────────────────────────────────────────────────────────────

/// The node emits [`NodeEvent`]s through this port: LED repaint hooks,
/// mode changes and heartbeats. Observers must not feed back into the node.
pub trait EventSink {
    fn emit(&mut self, event: &NodeEvent);
}

// ───────────────────────────────────────────────────────────────
// Emulated clock port
// ───────────────────────────────────────────────────────────────

/// The discrete-event clock that drives the node's timed work.
///
/// Scheduling from inside a fired task's handler must be supported; that is
/// how recurring tasks re-arm.
pub trait EmulatedClock {
    /// Current emulated time in milliseconds.
    fn now_ms(&self) -> u64;

    /// Fire `task` at the absolute emulated time `at_ms`.
    fn schedule_at(&mut self, at_ms: u64, task: TaskId);

    /// Fire `task` `delay_ms` after now.
    fn schedule_after(&mut self, delay_ms: u64, task: TaskId) {
        let at = self.now_ms().saturating_add(delay_ms);
        self.schedule_at(at, task);
    }
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate
// ───────────────────────────────────────────────────────────────

/// Callback the [`Scheduler`](crate::scheduler::Scheduler) invokes when a
/// recurring task fires. The scheduler re-arms the task itself; the delegate
/// only reports.
pub trait SchedulerDelegate {
    /// * `label`     - the task's human-readable label.
    /// * `kind`      - what the task is for.
    /// * `fired_at`  - emulated time of this firing (ms).
    /// * `firings`   - total firings including this one.
    fn on_task_fired(&mut self, label: &str, kind: TaskKind, fired_at: u64, firings: u64);
}

/// Discriminant passed to [`SchedulerDelegate::on_task_fired`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Once-per-period liveness report.
    Heartbeat,
}
