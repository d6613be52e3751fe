//! RGB indicator on a PCA9685 PWM controller.
//!
//! Green, red and blue sit on channels 0, 1 and 2.  Each channel turns on
//! at count `0x0F` and off at `0x0F + level * 0x10`, so levels 0-100 span
//! most of the 12-bit period.  Registers are written one at a time
//! because MODE1 is left with auto-increment disabled.

use embedded_hal::i2c::{Error as _, I2c};

use crate::error::{Error, Result};
use crate::fsm::render::Rgb;

/// Default 7-bit bus address.
pub const DEFAULT_ADDRESS: u8 = 0x60;

const REG_MODE1: u8 = 0x00;
/// LED0_ON_L; each channel occupies four registers from here.
const REG_LED0_ON_L: u8 = 0x06;

const CH_GREEN: u8 = 0;
const CH_RED: u8 = 1;
const CH_BLUE: u8 = 2;

const ON_COUNT: u16 = 0x0F;
const COUNTS_PER_LEVEL: u16 = 0x10;
const MAX_LEVEL: u8 = 100;

/// (on, off) counts for one channel at `level`.
pub fn channel_counts(level: u8) -> (u16, u16) {
    let level = u16::from(level.min(MAX_LEVEL));
    (ON_COUNT, ON_COUNT + level * COUNTS_PER_LEVEL)
}

pub struct RgbLed {
    address: u8,
}

impl RgbLed {
    pub const fn new(address: u8) -> Self {
        Self { address }
    }

    /// Wake the oscillator (MODE1 = 0).
    pub fn init<B: I2c>(&self, bus: &mut B) -> Result<()> {
        self.write_reg(bus, REG_MODE1, 0x00)
    }

    pub fn set<B: I2c>(&self, bus: &mut B, colour: Rgb) -> Result<()> {
        self.set_channel(bus, CH_RED, colour.r)?;
        self.set_channel(bus, CH_GREEN, colour.g)?;
        self.set_channel(bus, CH_BLUE, colour.b)
    }

    fn set_channel<B: I2c>(&self, bus: &mut B, channel: u8, level: u8) -> Result<()> {
        let (on, off) = channel_counts(level);
        let base = REG_LED0_ON_L + 4 * channel;
        let [on_l, on_h] = on.to_le_bytes();
        let [off_l, off_h] = off.to_le_bytes();
        self.write_reg(bus, base, on_l)?;
        self.write_reg(bus, base + 1, on_h)?;
        self.write_reg(bus, base + 2, off_l)?;
        self.write_reg(bus, base + 3, off_h)
    }

    fn write_reg<B: I2c>(&self, bus: &mut B, reg: u8, value: u8) -> Result<()> {
        bus.write(self.address, &[reg, value])
            .map_err(|e| Error::Bus(e.kind()))
    }
}

impl Default for RgbLed {
    fn default() -> Self {
        Self::new(DEFAULT_ADDRESS)
    }
}
