//! Pin definitions for the button board and the e-paper HAT
//!
//! All numbers are BCM GPIO line offsets on `/dev/gpiochip0`.

/// Pin configuration constants for the buttons and the e-paper panel
pub struct Pins;

#[allow(dead_code)]
impl Pins {
    // Button pins (active low, pulled up)
    /// Up button
    pub const BTN_UP: u32 = 5;
    /// Down button
    pub const BTN_DOWN: u32 = 6;
    /// Left button, reserved
    pub const BTN_LEFT: u32 = 13;
    /// Right button, reserved
    pub const BTN_RIGHT: u32 = 19;
    /// Select button
    pub const BTN_SELECT: u32 = 26;

    // Waveshare e-Paper HAT pins
    /// Reset pin for display
    pub const EPD_RST: u32 = 17;
    /// Data/Command control pin (High for data, Low for command)
    pub const EPD_DC: u32 = 25;
    /// Busy status pin
    pub const EPD_BUSY: u32 = 24;
    /// Chip select, driven by the kernel spidev driver (CE0)
    pub const EPD_CS: u32 = 8;

    /// GPIO character device holding every line above
    pub const GPIO_CHIP: &'static str = "/dev/gpiochip0";
    /// SPI bus the panel sits on
    pub const SPI_DEVICE: &'static str = "/dev/spidev0.0";
}
