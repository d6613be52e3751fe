//! 4x4 matrix keypad.
//!
//! ```text
//!          C0  C1  C2  C3
//!   R0  [  1   2   3   A ]
//!   R1  [  4   5   6   B ]
//!   R2  [  7   8   9   C ]
//!   R3  [  *   0   #   D ]
//! ```
//!
//! Rows are driven low one at a time; columns are pulled up, so a pressed
//! key reads low on its column.  A reading only becomes the reported key
//! after `debounce_scans` identical consecutive scans.  Only the first
//! pressed key found is reported.

use embedded_hal::digital::{InputPin, OutputPin};
use log::warn;

use crate::app::ports::Keypad;
use crate::error::{ActuatorError, Result, SensorError};
use crate::fsm::mode::Key;

pub const LAYOUT: [[char; 4]; 4] = [
    ['1', '2', '3', 'A'],
    ['4', '5', '6', 'B'],
    ['7', '8', '9', 'C'],
    ['*', '0', '#', 'D'],
];

/// Consecutive identical scans needed at the default 100 ms cycle.
pub const DEFAULT_DEBOUNCE_SCANS: u8 = 2;

pub struct MatrixKeypad<R, C> {
    rows: [R; 4],
    cols: [C; 4],
    debounce_scans: u8,
    candidate: Option<Key>,
    seen: u8,
    stable: Option<Key>,
}

impl<R: OutputPin, C: InputPin> MatrixKeypad<R, C> {
    /// Take the pins and release every row, whatever level it powered up at.
    pub fn new(mut rows: [R; 4], cols: [C; 4], debounce_scans: u8) -> Result<Self> {
        for row in &mut rows {
            row.set_high().map_err(|_| ActuatorError::GpioWriteFailed)?;
        }
        Ok(Self {
            rows,
            cols,
            debounce_scans: debounce_scans.max(1),
            candidate: None,
            seen: 0,
            stable: None,
        })
    }

    /// One raw, undebounced scan of the matrix.
    pub fn scan(&mut self) -> Result<Option<Key>> {
        for (r, row) in self.rows.iter_mut().enumerate() {
            row.set_low().map_err(|_| ActuatorError::GpioWriteFailed)?;
            let hit = pressed_column(&mut self.cols);
            // Release the row even if the column read failed.
            row.set_high().map_err(|_| ActuatorError::GpioWriteFailed)?;
            if let Some(c) = hit? {
                return Ok(Key::from_char(LAYOUT[r][c]));
            }
        }
        Ok(None)
    }

    fn debounce(&mut self, raw: Option<Key>) -> Option<Key> {
        if raw == self.candidate {
            self.seen = self.seen.saturating_add(1);
        } else {
            self.candidate = raw;
            self.seen = 1;
        }
        if self.seen >= self.debounce_scans {
            self.stable = raw;
        }
        self.stable
    }
}

fn pressed_column<C: InputPin>(cols: &mut [C; 4]) -> Result<Option<usize>> {
    for (c, col) in cols.iter_mut().enumerate() {
        if col.is_low().map_err(|_| SensorError::ReadFailed)? {
            return Ok(Some(c));
        }
    }
    Ok(None)
}

impl<R: OutputPin, C: InputPin> Keypad for MatrixKeypad<R, C> {
    fn read_key(&mut self) -> Option<Key> {
        match self.scan() {
            Ok(raw) => self.debounce(raw),
            Err(e) => {
                warn!("Keypad scan failed: {}", e);
                self.stable
            }
        }
    }
}
