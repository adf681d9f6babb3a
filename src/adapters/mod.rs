//! Adapters: concrete implementations of the port traits the node itself
//! ships with.
//!
//! | Adapter       | Implements      | Connects to         |
//! |---------------|-----------------|---------------------|
//! | `log_sink`    | EventSink       | `log` facade        |
//! | `packet_log`  | PacketListener  | `log` facade        |

pub mod log_sink;
pub mod packet_log;
