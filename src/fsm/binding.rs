//! Card identifiers and the profile-binding workflow.
//!
//! The workflow itself has no state beyond the slot carried by
//! [`Mode::BindingTarget`](super::mode::Mode::BindingTarget) and the UI
//! timer used as its deadline.  Each cycle the exits are checked in a fixed
//! priority: card read, then cancel key, then deadline.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Profile;

/// Seconds the bind menu waits for a slot selection.
pub const MENU_TIMEOUT_SECS: u32 = 5;
/// Seconds a binding target waits for a card.
pub const CAPTURE_TIMEOUT_SECS: u32 = 10;
/// Seconds the success / failure result stays on screen.
pub const RESULT_SECS: u32 = 2;

/// 4-byte contactless card identifier.  Compared byte for byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardUid(pub [u8; 4]);

impl CardUid {
    /// Upper-case hex of bytes 0 and 1.
    pub fn first_half(&self) -> heapless::String<8> {
        hex_pair(self.0[0], self.0[1])
    }

    /// Upper-case hex of bytes 2 and 3.
    pub fn second_half(&self) -> heapless::String<8> {
        hex_pair(self.0[2], self.0[3])
    }
}

fn hex_pair(a: u8, b: u8) -> heapless::String<8> {
    use core::fmt::Write;
    let mut s = heapless::String::new();
    // Four characters always fit in eight.
    let _ = write!(s, "{a:02X}{b:02X}");
    s
}

impl fmt::Display for CardUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}")
    }
}

/// The three named triggers a card can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindSlot {
    Study,
    DeepWork,
    /// Shows statistics instead of loading a profile.
    Data,
}

impl BindSlot {
    /// Bind menu selection: `1`, `2`, `3`.
    pub const fn from_digit(d: u8) -> Option<Self> {
        match d {
            1 => Some(Self::Study),
            2 => Some(Self::DeepWork),
            3 => Some(Self::Data),
            _ => None,
        }
    }

    /// Profile loaded by a card in this slot, `None` for [`BindSlot::Data`].
    pub const fn profile(self) -> Option<Profile> {
        match self {
            Self::Study => Some(Profile::Study),
            Self::DeepWork => Some(Profile::DeepWork),
            Self::Data => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Study => "Study",
            Self::DeepWork => "DeepWork",
            Self::Data => "Data",
        }
    }
}

impl fmt::Display for BindSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Card bound to each slot.  Not persisted across power loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileBindings {
    pub study: CardUid,
    pub deep_work: CardUid,
    pub data: CardUid,
}

impl Default for ProfileBindings {
    fn default() -> Self {
        Self {
            study: CardUid([0xFE, 0x1F, 0x7F, 0xC2]),
            deep_work: CardUid([0x5E, 0x6F, 0x7A, 0x8B]),
            data: CardUid([0x9C, 0xAD, 0xBE, 0xCF]),
        }
    }
}

impl ProfileBindings {
    /// First slot holding `uid`, checked Study, DeepWork, Data.
    pub fn lookup(&self, uid: CardUid) -> Option<BindSlot> {
        [
            (BindSlot::Study, self.study),
            (BindSlot::DeepWork, self.deep_work),
            (BindSlot::Data, self.data),
        ]
        .into_iter()
        .find_map(|(slot, bound)| (bound == uid).then_some(slot))
    }

    /// Store `uid` in `slot`.  Other slots are untouched, even if they hold
    /// the same identifier.
    pub fn bind(&mut self, slot: BindSlot, uid: CardUid) {
        match slot {
            BindSlot::Study => self.study = uid,
            BindSlot::DeepWork => self.deep_work = uid,
            BindSlot::Data => self.data = uid,
        }
    }
}
