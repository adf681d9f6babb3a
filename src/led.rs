//! LED decoding for the Port 5 group.
//!
//! The three lamps are wired active-low: a cleared bit lights the lamp.
//! The node's "mode" is the number of lit lamps, 0 through 3; observers
//! use it as a coarse activity level.

use core::fmt;

use crate::pins::{BLUE_LED, GREEN_LED, RED_LED};

/// Number of lit lamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Mode(u8);

impl Mode {
    pub const LEDS_OFF: Mode = Mode(0);
    pub const LEDS_1: Mode = Mode(1);
    pub const LEDS_2: Mode = Mode(2);
    pub const LEDS_3: Mode = Mode(3);
    pub const MAX: Mode = Self::LEDS_3;

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lamp states decoded from the last LED group write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LedState {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
}

impl LedState {
    pub const ALL_OFF: LedState = LedState {
        red: false,
        green: false,
        blue: false,
    };

    /// Decode a raw Port 5 value. Bits outside the three lamp bits are ignored.
    pub const fn decode(raw: u8) -> Self {
        Self {
            red: (raw & RED_LED) == 0,
            green: (raw & GREEN_LED) == 0,
            blue: (raw & BLUE_LED) == 0,
        }
    }

    pub const fn mode(&self) -> Mode {
        Mode(self.red as u8 + self.green as u8 + self.blue as u8)
    }
}

/// A transition of the mode ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChange {
    pub from: Mode,
    pub to: Mode,
}

/// Holds the current lamps and mode; reports mode transitions only.
#[derive(Debug, Clone, Default)]
pub struct LedTracker {
    state: LedState,
    mode: Mode,
}

impl LedTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new LED group value.
    ///
    /// Lamp detail is always stored. Returns `Some` only when the number of
    /// lit lamps differs from the previous write.
    pub fn update(&mut self, raw: u8) -> Option<ModeChange> {
        self.state = LedState::decode(raw);
        let mode = self.state.mode();
        if mode == self.mode {
            return None;
        }
        let change = ModeChange {
            from: self.mode,
            to: mode,
        };
        self.mode = mode;
        Some(change)
    }

    pub fn state(&self) -> LedState {
        self.state
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}
