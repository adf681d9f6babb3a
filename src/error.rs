//! Error types for the node core.
//!
//! Routing itself never fails: unknown ports and unused bits are ignored.
//! What can fail is construction, when the host is missing an I/O unit
//! the node must bind to, or when the configuration is unusable.
//! All variants are `Copy` so they can be logged and returned freely.

use core::fmt;

// ---------------------------------------------------------------------------
// Bindings
// ---------------------------------------------------------------------------

/// A host I/O unit the node binds to at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    /// LED group, Port 5.
    LedPort,
    /// Radio chip-select / VREG group, Port 4.
    RadioControlPort,
    /// Radio status inputs, Port 1.
    RadioStatusPort,
    /// User button, Port 2.
    ButtonPort,
    /// Shared SPI serial unit, USART 0.
    SpiUsart,
}

impl Binding {
    pub const ALL: [Binding; 5] = [
        Self::LedPort,
        Self::RadioControlPort,
        Self::RadioStatusPort,
        Self::ButtonPort,
        Self::SpiUsart,
    ];

    /// Name of the host I/O unit this binding resolves against.
    pub const fn unit_name(self) -> &'static str {
        match self {
            Self::LedPort => crate::pins::LED_PORT,
            Self::RadioControlPort => crate::pins::RADIO_CONTROL_PORT,
            Self::RadioStatusPort => crate::pins::RADIO_STATUS_PORT,
            Self::ButtonPort => crate::pins::BUTTON_PORT,
            Self::SpiUsart => crate::pins::SPI_USART,
        }
    }

    /// What the node uses the unit for.
    pub const fn role(self) -> &'static str {
        match self {
            Self::LedPort => "LED group",
            Self::RadioControlPort => "radio chip-select/VREG group",
            Self::RadioStatusPort => "radio status inputs",
            Self::ButtonPort => "user button",
            Self::SpiUsart => "radio/flash SPI bus",
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.unit_name(), self.role())
    }
}

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The host has no I/O unit under the binding's name.
    MissingBinding(Binding),
    /// The unit exists but is not the kind the binding needs
    /// (e.g. a timer registered under a port's name).
    WrongUnitKind(Binding),
    /// The serial bus already carries its maximum number of devices.
    BusFull,
    /// Configuration is invalid or could not be parsed.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBinding(b) => write!(f, "missing I/O unit: {b}"),
            Self::WrongUnitKind(b) => write!(f, "I/O unit has wrong kind: {b}"),
            Self::BusFull => write!(f, "serial bus full"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
