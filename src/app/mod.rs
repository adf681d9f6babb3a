//! Node boundary: the traits and events through which the core talks to
//! the host CPU, the peripherals, the clock and observers.
//!
//! Everything concrete lives on the other side of [`ports`], keeping the
//! routing logic testable without a CPU model or real chip emulations.

pub mod events;
pub mod ports;
