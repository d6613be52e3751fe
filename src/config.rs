//! System configuration parameters
//!
//! All tunable parameters for the PomoDesk timer.  Nothing here is
//! persisted: every power-up starts from [`SystemConfig::default()`] and
//! the session durations are only changed at runtime by the settings
//! editor or by loading a card profile.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fsm::binding::ProfileBindings;

/// Seconds in one minute, used by every minutes-based setting.
pub const SECS_PER_MINUTE: u32 = 60;

/// Session durations, light threshold, and fan speeds.
///
/// Exactly one of the three durations is the active countdown target at a
/// time, selected by the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Focus period length (seconds).
    pub focus_secs: u32,
    /// Short rest length (seconds).
    pub rest_secs: u32,
    /// Long rest length after every fourth focus period (seconds).
    pub long_rest_secs: u32,
    /// Ambient illuminance (lux) below which focus starts with a warning.
    pub low_light_threshold: u16,
    /// Fan PWM duty (percent) for levels 1, 2 and 3.
    pub fan_speeds: [u8; 3],
}

impl Default for SessionConfig {
    fn default() -> Self {
        Profile::Study.preset().applied_to(Self {
            focus_secs: 0,
            rest_secs: 0,
            long_rest_secs: 0,
            low_light_threshold: 150,
            fan_speeds: [20, 40, 60],
        })
    }
}

impl SessionConfig {
    /// Fan duty for a level in `1..=3`.  Out-of-range levels map to off.
    pub fn fan_speed_for(&self, level: u8) -> u8 {
        match level {
            1..=3 => self.fan_speeds[level as usize - 1],
            _ => 0,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Session ---
    pub session: SessionConfig,

    // --- Timing ---
    /// Processing cycle period (milliseconds).
    pub cycle_interval_ms: u32,

    // --- Tap detection ---
    /// Acceleration magnitude (g) that counts as a tap.
    pub tap_threshold_g: f32,
    /// Minimum interval between two accepted taps (milliseconds).
    pub tap_cooldown_ms: u32,

    // --- Cards ---
    /// Bindings loaded at power-up.
    pub bindings: ProfileBindings,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            cycle_interval_ms: 100, // 10 Hz
            tap_threshold_g: 1.5,
            tap_cooldown_ms: 1000,
            bindings: ProfileBindings::default(),
        }
    }
}

impl SystemConfig {
    /// Number of processing cycles the tap detector stays disarmed after a tap.
    pub fn tap_cooldown_cycles(&self) -> u16 {
        let interval = self.cycle_interval_ms.max(1);
        self.tap_cooldown_ms.div_ceil(interval).clamp(1, u32::from(u16::MAX)) as u16
    }

    /// Reject values that would make the state machine misbehave.
    pub fn validate(&self) -> Result<()> {
        let s = &self.session;
        if s.focus_secs == 0 {
            return Err(Error::Config("focus duration is zero"));
        }
        if s.rest_secs == 0 || s.long_rest_secs == 0 {
            return Err(Error::Config("rest duration is zero"));
        }
        if s.low_light_threshold == 0 {
            return Err(Error::Config("low-light threshold is zero"));
        }
        if s.fan_speeds.iter().any(|&d| d == 0 || d > 100) {
            return Err(Error::Config("fan speed outside 1-100%"));
        }
        if !s.fan_speeds.windows(2).all(|w| w[0] < w[1]) {
            return Err(Error::Config("fan speeds must be ascending"));
        }
        if self.cycle_interval_ms == 0 {
            return Err(Error::Config("cycle interval is zero"));
        }
        if !(self.tap_threshold_g > 0.0) {
            return Err(Error::Config("tap threshold must be positive"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Card profiles
// ---------------------------------------------------------------------------

/// Timer profiles that a bound card can load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Profile {
    /// Classic 25/5/15 cycle.
    Study,
    /// Long focus blocks with no distinguished long break.
    DeepWork,
}

/// Durations written into [`SessionConfig`] when a profile loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfilePreset {
    pub focus_secs: u32,
    pub rest_secs: u32,
    pub long_rest_secs: u32,
}

impl ProfilePreset {
    /// Copy of `session` with this preset's durations.
    pub fn applied_to(self, mut session: SessionConfig) -> SessionConfig {
        session.focus_secs = self.focus_secs;
        session.rest_secs = self.rest_secs;
        session.long_rest_secs = self.long_rest_secs;
        session
    }
}

impl Profile {
    pub const fn preset(self) -> ProfilePreset {
        match self {
            Self::Study => ProfilePreset {
                focus_secs: 25 * SECS_PER_MINUTE,
                rest_secs: 5 * SECS_PER_MINUTE,
                long_rest_secs: 15 * SECS_PER_MINUTE,
            },
            // Long rest collapses to the short rest.
            Self::DeepWork => ProfilePreset {
                focus_secs: 50 * SECS_PER_MINUTE,
                rest_secs: 10 * SECS_PER_MINUTE,
                long_rest_secs: 10 * SECS_PER_MINUTE,
            },
        }
    }

    /// Short tag shown while the profile loads.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Study => "StdY",
            Self::DeepWork => "dEEP",
        }
    }
}
