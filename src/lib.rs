//! Tmote Sky node interconnect core.
//!
//! Routes the emulated MSP430's port writes and SPI bytes to the CC2420
//! radio and M25P80 flash emulations, decodes the LED group into lamp
//! states and a mode ordinal, and runs the node's heartbeat on the emulated
//! clock. The CPU, the chips' internals and any front end live behind the
//! traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod bus;
pub mod clock;
pub mod config;
pub mod error;
pub mod led;
pub mod node;
pub mod pins;
pub mod router;
pub mod scheduler;

pub use error::{Binding, Error, Result};
pub use node::SkyNode;
