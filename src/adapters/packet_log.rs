//! Packet listener that reports radio transmissions to the log.

use log::info;

use crate::app::ports::PacketListener;

/// Installed on the radio by the node at construction.
#[derive(Debug)]
pub struct LogPacketListener {
    node: &'static str,
    started: u64,
    ended: u64,
    /// Emulated time of the most recent notification.
    last_ms: Option<u64>,
}

impl LogPacketListener {
    pub fn new(node: &'static str) -> Self {
        Self {
            node,
            started: 0,
            ended: 0,
            last_ms: None,
        }
    }

    pub fn started(&self) -> u64 {
        self.started
    }

    pub fn ended(&self) -> u64 {
        self.ended
    }

    pub fn last_ms(&self) -> Option<u64> {
        self.last_ms
    }
}

impl PacketListener for LogPacketListener {
    fn transmission_started(&mut self, at_ms: u64) {
        self.started += 1;
        self.last_ms = Some(at_ms);
        info!(
            "{} {} ms: radio transmission started (#{})",
            self.node, at_ms, self.started
        );
    }

    fn transmission_ended(&mut self, data: &[u8], at_ms: u64) {
        self.ended += 1;
        self.last_ms = Some(at_ms);
        info!(
            "{} {} ms: got packet from radio, {} bytes (#{})",
            self.node,
            at_ms,
            data.len(),
            self.ended
        );
    }
}
