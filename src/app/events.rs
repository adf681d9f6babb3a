//! Outbound node events.
//!
//! The [`SkyNode`](crate::node::SkyNode) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Observers (GUI, logging,
//! duty-cycle statistics) decide what to do with them.

use crate::led::{LedState, Mode};

/// Structured events emitted by the node core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeEvent {
    /// The LED group was written (repaint hook). Fires on every write.
    LedsChanged(LedState),

    /// The LED mode ordinal changed. Fires only when the count differs.
    ModeChanged { from: Mode, to: Mode },

    /// The heartbeat fired. `wall_ms` is host time since the heartbeat was
    /// armed; compare it with `emulated_ms` to see drift.
    Heartbeat {
        emulated_ms: u64,
        wall_ms: u64,
        firings: u64,
    },
}

impl NodeEvent {
    /// Emulated minus wall time for a heartbeat. Positive when emulation
    /// runs ahead of real time.
    pub fn drift_ms(&self) -> Option<i64> {
        match *self {
            Self::Heartbeat {
                emulated_ms,
                wall_ms,
                ..
            } => {
                let emulated = i64::try_from(emulated_ms).unwrap_or(i64::MAX);
                let wall = i64::try_from(wall_ms).unwrap_or(i64::MAX);
                Some(emulated.saturating_sub(wall))
            }
            _ => None,
        }
    }
}
