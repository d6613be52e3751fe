//! Output and keypad drivers over embedded-hal traits.

pub mod fan;
pub mod keypad;
pub mod rgb_led;
pub mod segment_display;
