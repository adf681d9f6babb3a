//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing node events to the `log` facade.
//! A GUI or statistics observer would implement the same trait.

use log::Level;

use crate::app::events::NodeEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`NodeEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &NodeEvent) {
        let (level, line) = render(event);
        log::log!(level, "{}", line);
    }
}

/// Level and text of the log line for `event`.
fn render(event: &NodeEvent) -> (Level, String) {
    match *event {
        NodeEvent::LedsChanged(leds) => (
            Level::Debug,
            format!(
                "LEDS  | red={} green={} blue={}",
                on_off(leds.red),
                on_off(leds.green),
                on_off(leds.blue),
            ),
        ),
        NodeEvent::ModeChanged { from, to } => (Level::Info, format!("MODE  | {} -> {}", from, to)),
        NodeEvent::Heartbeat {
            emulated_ms,
            wall_ms,
            firings,
        } => (
            Level::Info,
            format!(
                "BEAT  | #{} wall {} ms, emulated {} ms",
                firings, wall_ms, emulated_ms
            ),
        ),
    }
}

fn on_off(lit: bool) -> &'static str {
    if lit { "on" } else { "off" }
}
