//! I/O unit names and port bit assignments for the Tmote Sky board.
//!
//! Single source of truth: the router, the binding table and the tests all
//! reference this module rather than hard-coding bit masks.

// ---------------------------------------------------------------------------
// Host I/O units the node binds to
// ---------------------------------------------------------------------------

/// LED / control group.
pub const LED_PORT: &str = "Port 5";
/// Radio chip-select and voltage-regulator group (shared with the flash).
pub const RADIO_CONTROL_PORT: &str = "Port 4";
/// Radio status inputs (FIFOP, FIFO, CCA).
pub const RADIO_STATUS_PORT: &str = "Port 1";
/// User button input.
pub const BUTTON_PORT: &str = "Port 2";
/// Serial unit in SPI mode shared by radio and flash.
pub const SPI_USART: &str = "USART 0";

// ---------------------------------------------------------------------------
// Port 5: LEDs (active-low)
// ---------------------------------------------------------------------------

pub const BLUE_LED: u8 = 0x40;
pub const GREEN_LED: u8 = 0x20;
pub const RED_LED: u8 = 0x10;
pub const LED_MASK: u8 = BLUE_LED | GREEN_LED | RED_LED;

// ---------------------------------------------------------------------------
// Port 4: CC2420 control outputs
// ---------------------------------------------------------------------------

/// P4.5 VREG_EN to CC2420 (active high).
pub const CC2420_VREG: u8 = 1 << 5;
/// P4.2 SPI chip select CS_N (active low).
pub const CC2420_CHIP_SELECT: u8 = 0x04;
pub const RADIO_CONTROL_MASK: u8 = CC2420_VREG | CC2420_CHIP_SELECT;

// ---------------------------------------------------------------------------
// Port 1: CC2420 status inputs (pin numbers)
// ---------------------------------------------------------------------------

/// P1.0 FIFOP from CC2420.
pub const CC2420_FIFOP: u8 = 0;
/// P1.3 FIFO from CC2420.
pub const CC2420_FIFO: u8 = 3;
/// P1.4 CCA from CC2420.
pub const CC2420_CCA: u8 = 4;

// ---------------------------------------------------------------------------
// Port 2: user button (pin number)
// ---------------------------------------------------------------------------

pub const BUTTON_PIN: u8 = 7;
