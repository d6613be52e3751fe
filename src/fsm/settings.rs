//! Digit-by-digit numeric settings editor.
//!
//! The editor owns the transient draft: the highlighted menu entry and,
//! while a field is open, the value typed so far.  It never touches
//! [`SessionConfig`] except through [`SettingsEditor::commit`].

use core::fmt;

use crate::config::{SECS_PER_MINUTE, SessionConfig};

/// Seconds the save result stays on screen before returning to the menu.
pub const RESULT_SECS: u32 = 2;
/// Seconds the "max exceeded" message is shown.
pub const REJECT_SECS: u32 = 1;

/// Keystrokes that would reach this value are refused for every field.
const ENTRY_CEILING: u16 = 1000;

/// The four editable settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsField {
    FocusTime,
    RestTime,
    LongRestTime,
    LightThreshold,
}

impl SettingsField {
    pub const ALL: [Self; 4] = [
        Self::FocusTime,
        Self::RestTime,
        Self::LongRestTime,
        Self::LightThreshold,
    ];

    /// Menu digit `1..=4`.
    pub fn from_digit(d: u8) -> Option<Self> {
        Self::ALL.get(usize::from(d).checked_sub(1)?).copied()
    }

    pub fn index(self) -> usize {
        match self {
            Self::FocusTime => 0,
            Self::RestTime => 1,
            Self::LongRestTime => 2,
            Self::LightThreshold => 3,
        }
    }

    /// Two-letter display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::FocusTime => "Fo",
            Self::RestTime => "rE",
            Self::LongRestTime => "Lr",
            Self::LightThreshold => "LI",
        }
    }

    /// Inclusive valid range, in the unit the user types.
    pub const fn range(self) -> (u16, u16) {
        match self {
            Self::FocusTime => (1, 180),
            Self::RestTime => (1, 60),
            Self::LongRestTime => (1, 120),
            Self::LightThreshold => (1, 500),
        }
    }

    /// Current value of this field in the unit the user types.
    pub fn current(self, session: &SessionConfig) -> u32 {
        match self {
            Self::FocusTime => session.focus_secs / SECS_PER_MINUTE,
            Self::RestTime => session.rest_secs / SECS_PER_MINUTE,
            Self::LongRestTime => session.long_rest_secs / SECS_PER_MINUTE,
            Self::LightThreshold => u32::from(session.low_light_threshold),
        }
    }

    fn write(self, session: &mut SessionConfig, value: u16) {
        let minutes = u32::from(value) * SECS_PER_MINUTE;
        match self {
            Self::FocusTime => session.focus_secs = minutes,
            Self::RestTime => session.rest_secs = minutes,
            Self::LongRestTime => session.long_rest_secs = minutes,
            Self::LightThreshold => session.low_light_threshold = value,
        }
    }
}

impl fmt::Display for SettingsField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FocusTime => "focus time",
            Self::RestTime => "rest time",
            Self::LongRestTime => "long rest time",
            Self::LightThreshold => "light threshold",
        };
        f.write_str(name)
    }
}

/// Why a commit was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsError {
    /// No digits were entered (value is zero).
    Empty,
    /// Value lies outside the field's range.
    OutOfRange { value: u16, min: u16, max: u16 },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "no value entered"),
            Self::OutOfRange { value, min, max } => {
                write!(f, "{value} outside {min}-{max}")
            }
        }
    }
}

/// Field currently open for entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Draft {
    pub field: SettingsField,
    pub value: u16,
}

/// Menu cursor plus the open draft, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsEditor {
    menu_index: usize,
    draft: Option<Draft>,
}

impl SettingsEditor {
    /// Enter the menu with the first field highlighted.
    pub fn open_menu(&mut self) {
        self.menu_index = 0;
        self.draft = None;
    }

    /// Move the highlight to the next field, wrapping.
    pub fn advance(&mut self) -> SettingsField {
        self.menu_index = (self.menu_index + 1) % SettingsField::ALL.len();
        self.highlighted()
    }

    pub fn highlighted(&self) -> SettingsField {
        SettingsField::ALL[self.menu_index % SettingsField::ALL.len()]
    }

    pub fn menu_index(&self) -> usize {
        self.menu_index
    }

    pub fn draft(&self) -> Option<Draft> {
        self.draft
    }

    /// Open `field` with an empty value.
    pub fn open(&mut self, field: SettingsField) {
        self.menu_index = field.index();
        self.draft = Some(Draft { field, value: 0 });
    }

    /// Append a digit.  Returns `false` and leaves the value unchanged if
    /// the result would exceed the field maximum or the entry ceiling.
    pub fn push_digit(&mut self, digit: u8) -> bool {
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        let next = u32::from(draft.value) * 10 + u32::from(digit);
        let (_, max) = draft.field.range();
        if next > u32::from(max) || next >= u32::from(ENTRY_CEILING) {
            return false;
        }
        draft.value = next as u16;
        true
    }

    /// Validate the draft and write it into `session`.  The draft is
    /// cleared whatever the outcome; `session` only changes on success.
    pub fn commit(
        &mut self,
        session: &mut SessionConfig,
    ) -> Result<(SettingsField, u16), SettingsError> {
        let Some(Draft { field, value }) = self.draft.take() else {
            return Err(SettingsError::Empty);
        };
        if value == 0 {
            return Err(SettingsError::Empty);
        }
        let (min, max) = field.range();
        if !(min..=max).contains(&value) {
            return Err(SettingsError::OutOfRange { value, min, max });
        }
        field.write(session, value);
        Ok((field, value))
    }

    /// Drop the draft without saving.
    pub fn cancel(&mut self) {
        self.draft = None;
    }

    /// Leave the menu entirely.
    pub fn close(&mut self) {
        *self = Self::default();
    }
}
