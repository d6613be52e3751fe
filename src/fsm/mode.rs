//! Operating modes.
//!
//! ```text
//!            ┌──────[#]──────────────────────────────┐
//!            ▼                                        │
//!   IDLE ─[card]─▶ LOADING ─[2s]─▶ FOCUS ─[0s]─▶ REST / LONG REST
//!    │ │ │                           ▲ │            │
//!    │ │ │           LOW LIGHT ──────┘ └[absent/*]▶ PAUSED
//!    │ │ └[5]▶ NFC READ ─[card]▶ UID 1/2 ─▶ UID 2/2 ─▶ IDLE
//!    │ └──[6]▶ SETTINGS MENU ⇄ SETTINGS EDIT ─[*]▶ SAVE OK / SAVE FAILED
//!    └────[0]▶ BIND MENU ─[1-3]▶ BIND TARGET ─[card]▶ BIND OK / ─[10s]▶ BIND FAILED
//! ```
//!
//! Short-lived modes carry their payload in the variant instead of in
//! side flags, so a mode always says exactly what is on the display.

use crate::config::Profile;

use super::binding::BindSlot;
use super::settings::SettingsField;

/// The device's current top-level operating state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Idle,
    /// Profile tag on screen; focus starts when the UI timer expires.
    LoadingProfile { profile: Profile },
    Focus,
    Rest,
    LongRest,
    Paused,
    ShowStats,
    /// A transient message, after which `resume` is restored.
    TemporaryMessage { message: Message, resume: ResumeMode },
    NfcRead,
    NfcDisplayPart1,
    NfcDisplayPart2,
    LowLightWarning,
    BindMenuPrompt,
    BindingTarget { slot: BindSlot },
    BindSuccess,
    BindFailed,
    SettingsMenu,
    SettingsEdit { field: SettingsField },
    SettingsSaveSuccess,
    SettingsSaveFailed,
}

impl Mode {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::LoadingProfile { .. } => "LoadingProfile",
            Self::Focus => "Focus",
            Self::Rest => "Rest",
            Self::LongRest => "LongRest",
            Self::Paused => "Paused",
            Self::ShowStats => "ShowStats",
            Self::TemporaryMessage { .. } => "TemporaryMessage",
            Self::NfcRead => "NfcRead",
            Self::NfcDisplayPart1 => "NfcDisplayPart1",
            Self::NfcDisplayPart2 => "NfcDisplayPart2",
            Self::LowLightWarning => "LowLightWarning",
            Self::BindMenuPrompt => "BindMenuPrompt",
            Self::BindingTarget { .. } => "BindingTarget",
            Self::BindSuccess => "BindSuccess",
            Self::BindFailed => "BindFailed",
            Self::SettingsMenu => "SettingsMenu",
            Self::SettingsEdit { .. } => "SettingsEdit",
            Self::SettingsSaveSuccess => "SettingsSaveSuccess",
            Self::SettingsSaveFailed => "SettingsSaveFailed",
        }
    }

    /// Modes in which the card reader is polled.
    pub const fn accepts_cards(self) -> bool {
        matches!(
            self,
            Self::Idle | Self::ShowStats | Self::NfcRead | Self::BindingTarget { .. }
        )
    }

    /// Modes in which presence and tap checks run.
    pub const fn watches_desk(self) -> bool {
        matches!(self, Self::Focus | Self::Paused)
    }

    /// Modes whose session countdown is decremented each tick.
    pub const fn session_running(self) -> bool {
        match self {
            Self::Focus | Self::Rest | Self::LongRest => true,
            Self::TemporaryMessage { resume, .. } => resume.session_running(),
            _ => false,
        }
    }

    /// Modes that leave when the UI timer reaches zero.
    pub const fn ui_timed(self) -> bool {
        matches!(
            self,
            Self::LoadingProfile { .. }
                | Self::TemporaryMessage { .. }
                | Self::NfcDisplayPart1
                | Self::NfcDisplayPart2
                | Self::LowLightWarning
                | Self::BindMenuPrompt
                | Self::BindingTarget { .. }
                | Self::BindSuccess
                | Self::BindFailed
                | Self::SettingsSaveSuccess
                | Self::SettingsSaveFailed
        )
    }
}

impl core::fmt::Display for Mode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Modes a [`Mode::TemporaryMessage`] can hand control back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResumeMode {
    Idle,
    Focus,
    Rest,
    LongRest,
    SettingsEdit(SettingsField),
}

impl ResumeMode {
    pub const fn session_running(self) -> bool {
        matches!(self, Self::Focus | Self::Rest | Self::LongRest)
    }
}

impl From<ResumeMode> for Mode {
    fn from(resume: ResumeMode) -> Self {
        match resume {
            ResumeMode::Idle => Self::Idle,
            ResumeMode::Focus => Self::Focus,
            ResumeMode::Rest => Self::Rest,
            ResumeMode::LongRest => Self::LongRest,
            ResumeMode::SettingsEdit(field) => Self::SettingsEdit { field },
        }
    }
}

/// Text shown by a [`Mode::TemporaryMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    /// New fan level (1-3).
    FanLevel(u8),
    Skip,
    FastForward,
    UnknownCard,
    MaxExceeded,
}

/// Keys on the 4x4 matrix keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Digit(u8),
    Star,
    Hash,
    /// Column-four letters A-D.  No mode maps them.
    Letter(char),
}

impl Key {
    /// Parse the legend printed on the key cap.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' => Some(Self::Digit(c as u8 - b'0')),
            '*' => Some(Self::Star),
            '#' => Some(Self::Hash),
            'A'..='D' => Some(Self::Letter(c)),
            _ => None,
        }
    }
}
