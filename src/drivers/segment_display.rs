//! HT16K33 4-digit alphanumeric segment display.
//!
//! Text is right-aligned: characters are consumed from the end of the
//! string, one digit each, until four digits are filled.  A digit
//! followed by `.` lights that digit's decimal point.  Characters with no
//! glyph (space, `.`, punctuation) are skipped without using up a digit;
//! digits left over at the left edge are blanked.
//!
//! The display shares the two-wire bus with other chips, so every call
//! borrows the bus instead of owning it.

use embedded_hal::i2c::{Error as _, I2c};

use crate::error::{Error, Result};

/// Default 7-bit bus address.
pub const DEFAULT_ADDRESS: u8 = 0x70;

const CMD_OSCILLATOR_ON: u8 = 0x21;
const CMD_DISPLAY_ON: u8 = 0x81;
/// Display RAM of digit 1 (leftmost); each digit takes two bytes.
const REG_DIGIT_BASE: u8 = 0x02;

pub const DIGITS: usize = 4;

/// Decimal point bit, OR-ed into a digit's second byte.
const POINT: u8 = 0x04;

/// Segment patterns for `0-9` then `A-Z`.
const GLYPHS: [[u8; 2]; 36] = [
    [0xF8, 0x01], // 0
    [0x30, 0x00], // 1
    [0xD8, 0x02], // 2
    [0x78, 0x02], // 3
    [0x30, 0x03], // 4
    [0x68, 0x03], // 5
    [0xE8, 0x03], // 6
    [0x38, 0x00], // 7
    [0xF8, 0x03], // 8
    [0x78, 0x03], // 9
    [0xB8, 0x03], // A
    [0xE0, 0x03], // B
    [0xC8, 0x01], // C
    [0xF0, 0x02], // D
    [0xC8, 0x03], // E
    [0x88, 0x03], // F
    [0xE8, 0x01], // G
    [0xB0, 0x03], // H
    [0x20, 0x00], // I
    [0x70, 0x00], // J
    [0xD0, 0x03], // K
    [0xC0, 0x01], // L
    [0xA8, 0x02], // M
    [0xA0, 0x02], // N
    [0xE0, 0x02], // O
    [0x98, 0x03], // P
    [0x38, 0x03], // Q
    [0x80, 0x02], // R
    [0x20, 0x03], // S
    [0xC0, 0x03], // T
    [0xF0, 0x01], // U
    [0x10, 0x03], // V
    [0x50, 0x03], // W
    [0xB0, 0x01], // X
    [0x70, 0x03], // Y
    [0x48, 0x02], // Z
];

const BLANK: [u8; 2] = [0x00, 0x00];

fn glyph(c: u8) -> Option<[u8; 2]> {
    match c {
        b'0'..=b'9' => Some(GLYPHS[usize::from(c - b'0')]),
        b'a'..=b'z' => Some(GLYPHS[usize::from(c - b'a') + 10]),
        b'A'..=b'Z' => Some(GLYPHS[usize::from(c - b'A') + 10]),
        b'-' => Some([0x00, 0x02]),
        b'_' => Some([0x40, 0x00]),
        b'\'' | b'`' => Some([0x80, 0x00]),
        _ => None,
    }
}

/// Segment bytes for `text`, leftmost digit first.
pub fn encode(text: &str) -> [[u8; 2]; DIGITS] {
    let bytes = text.as_bytes();
    let mut out = [BLANK; DIGITS];
    let mut slot = DIGITS;
    let mut i = bytes.len();
    while slot > 0 && i > 0 {
        i -= 1;
        let c = bytes[i];
        let Some(mut g) = glyph(c) else {
            continue;
        };
        if c.is_ascii_digit() && bytes.get(i + 1) == Some(&b'.') {
            g[1] |= POINT;
        }
        slot -= 1;
        out[slot] = g;
    }
    out
}

/// HT16K33 driver bound to one bus address.
pub struct SegmentDisplay {
    address: u8,
}

impl SegmentDisplay {
    pub const fn new(address: u8) -> Self {
        Self { address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Start the oscillator, clear every digit, switch the display on.
    pub fn init<B: I2c>(&self, bus: &mut B) -> Result<()> {
        self.command(bus, CMD_OSCILLATOR_ON)?;
        self.write_digits(bus, &[BLANK; DIGITS])?;
        self.command(bus, CMD_DISPLAY_ON)
    }

    pub fn show<B: I2c>(&self, bus: &mut B, text: &str) -> Result<()> {
        self.write_digits(bus, &encode(text))
    }

    fn write_digits<B: I2c>(&self, bus: &mut B, digits: &[[u8; 2]; DIGITS]) -> Result<()> {
        let mut frame = [0u8; 1 + 2 * DIGITS];
        frame[0] = REG_DIGIT_BASE;
        for (i, d) in digits.iter().enumerate() {
            frame[1 + 2 * i] = d[0];
            frame[2 + 2 * i] = d[1];
        }
        bus.write(self.address, &frame)
            .map_err(|e| Error::Bus(e.kind()))
    }

    fn command<B: I2c>(&self, bus: &mut B, cmd: u8) -> Result<()> {
        bus.write(self.address, &[cmd])
            .map_err(|e| Error::Bus(e.kind()))
    }
}

impl Default for SegmentDisplay {
    fn default() -> Self {
        Self::new(DEFAULT_ADDRESS)
    }
}
