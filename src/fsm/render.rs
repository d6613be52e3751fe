//! Mode + counters → indicator colour and display text.
//!
//! Pure and idempotent: the same [`Snapshot`] always renders the same
//! [`Frame`].  The service calls it every cycle and only pushes changes
//! to the hardware.

use core::fmt::Write;

use super::binding::{BindSlot, CardUid};
use super::mode::{Message, Mode, ResumeMode};
use super::settings::SettingsField;

/// Indicator intensity per channel (0-100).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const OFF: Self = Self::new(0, 0, 0);
    pub const DIM_WHITE: Self = Self::new(5, 5, 5);
    pub const WHITE: Self = Self::new(100, 100, 100);
    pub const GREEN: Self = Self::new(0, 100, 0);
    pub const RED: Self = Self::new(100, 0, 0);
    pub const BLUE: Self = Self::new(0, 0, 100);
    pub const PURPLE: Self = Self::new(100, 0, 100);
    pub const YELLOW: Self = Self::new(100, 100, 0);
    pub const CYAN: Self = Self::new(0, 100, 100);
    pub const VIOLET: Self = Self::new(50, 0, 100);
    pub const ORANGE: Self = Self::new(100, 50, 0);
}

/// Everything the renderer needs, copied out of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub mode: Mode,
    pub remaining_secs: u32,
    pub ui_secs: u32,
    pub completed_sessions: u32,
    pub flash_count: u8,
    pub highlighted: SettingsField,
    pub draft_value: u16,
    pub card: Option<CardUid>,
}

/// Display text, at most eight characters.
pub type Text = heapless::String<8>;

/// Largest minute count that still fits `mmmmm.ss` in a [`Text`].
const MAX_SHOWN_MINUTES: u32 = 99_999;

/// One rendered output frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub indicator: Rgb,
    pub text: Text,
}

/// Render `snap` into a frame.
pub fn render(snap: &Snapshot) -> Frame {
    let mut text = Text::new();
    // Every format below fits in eight characters.
    let _ = write_text(&mut text, snap);
    Frame {
        indicator: indicator(snap),
        text,
    }
}

fn indicator(snap: &Snapshot) -> Rgb {
    match snap.mode {
        Mode::Idle => Rgb::DIM_WHITE,
        Mode::LoadingProfile { .. } | Mode::Focus => Rgb::GREEN,
        Mode::Rest => Rgb::BLUE,
        Mode::LongRest => Rgb::PURPLE,
        Mode::Paused => Rgb::YELLOW,
        Mode::ShowStats => Rgb::WHITE,
        Mode::TemporaryMessage { message, resume } => match message {
            Message::UnknownCard | Message::MaxExceeded => Rgb::RED,
            _ => resume_colour(resume),
        },
        Mode::NfcRead | Mode::NfcDisplayPart1 | Mode::NfcDisplayPart2 => Rgb::CYAN,
        Mode::LowLightWarning if snap.flash_count % 2 == 0 => Rgb::YELLOW,
        Mode::LowLightWarning => Rgb::OFF,
        Mode::BindMenuPrompt | Mode::BindingTarget { .. } => Rgb::VIOLET,
        Mode::BindSuccess | Mode::SettingsSaveSuccess => Rgb::GREEN,
        Mode::BindFailed | Mode::SettingsSaveFailed => Rgb::RED,
        Mode::SettingsMenu | Mode::SettingsEdit { .. } => Rgb::ORANGE,
    }
}

fn resume_colour(resume: ResumeMode) -> Rgb {
    match resume {
        ResumeMode::Idle => Rgb::DIM_WHITE,
        ResumeMode::Focus => Rgb::GREEN,
        ResumeMode::Rest => Rgb::BLUE,
        ResumeMode::LongRest => Rgb::PURPLE,
        ResumeMode::SettingsEdit(_) => Rgb::ORANGE,
    }
}

fn write_text(out: &mut Text, snap: &Snapshot) -> core::fmt::Result {
    match snap.mode {
        Mode::Idle => out.write_str("----"),
        Mode::LoadingProfile { profile } => out.write_str(profile.tag()),
        Mode::Focus | Mode::Rest | Mode::LongRest => {
            let secs = snap.remaining_secs;
            write!(out, "{:02}.{:02}", (secs / 60).min(MAX_SHOWN_MINUTES), secs % 60)
        }
        Mode::Paused => out.write_str("PAUS"),
        Mode::ShowStats => write!(out, "donE{:02}", snap.completed_sessions.min(99)),
        Mode::TemporaryMessage { message, .. } => match message {
            Message::FanLevel(level) => write!(out, "FAn{level}"),
            Message::Skip => out.write_str("SKIP"),
            Message::FastForward => out.write_str("FF"),
            Message::UnknownCard => out.write_str("Err"),
            Message::MaxExceeded => out.write_str("OvEr"),
        },
        Mode::NfcRead if snap.ui_secs > 0 => out.write_str("rEAd"),
        Mode::NfcRead => out.write_str("CArd"),
        Mode::NfcDisplayPart1 => match snap.card {
            Some(uid) => out.write_str(&uid.first_half()),
            None => out.write_str("----"),
        },
        Mode::NfcDisplayPart2 => match snap.card {
            Some(uid) => out.write_str(&uid.second_half()),
            None => out.write_str("----"),
        },
        Mode::LowLightWarning => out.write_str("LItE Lo"),
        Mode::BindMenuPrompt => out.write_str("bInd"),
        Mode::BindingTarget { slot } => write!(out, "b-{}", slot_digit(slot)),
        Mode::BindSuccess => out.write_str("GOOd"),
        Mode::BindFailed | Mode::SettingsSaveFailed => out.write_str("FAIL"),
        Mode::SettingsMenu => {
            let field = snap.highlighted;
            write!(out, "S{}-{}", field.index() + 1, field.label())
        }
        Mode::SettingsEdit { field } => write!(out, "{}{:02}", field.label(), snap.draft_value),
        Mode::SettingsSaveSuccess => out.write_str("SAvE"),
    }
}

fn slot_digit(slot: BindSlot) -> u8 {
    match slot {
        BindSlot::Study => 1,
        BindSlot::DeepWork => 2,
        BindSlot::Data => 3,
    }
}
