//! Event-driven session state machine.
//!
//! One handler per event type, each taking the shared [`FsmContext`] by
//! exclusive reference:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  Machine                                                   │
//! │  ┌──────────────┬──────────────────────────────────────┐   │
//! │  │ handle_key   │ per-mode key map                     │   │
//! │  │ handle_card  │ bind / NFC read / profile load       │   │
//! │  │ check_*      │ presence + tap, every cycle          │   │
//! │  │ handle_tick  │ countdowns, then expiry transitions  │   │
//! │  └──────────────┴──────────────────────────────────────┘   │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unhandled (mode, event) pairs are no-ops.  Every mode change goes
//! through [`Machine::force_transition`], which logs it and records a
//! [`MachineEvent::ModeChanged`].

pub mod binding;
pub mod context;
pub mod mode;
pub mod render;
pub mod settings;

use log::{debug, info, warn};

use crate::sensors::{Acceleration, LightSensor};

use binding::{BindSlot, CardUid};
use context::{FsmContext, MachineEvent};
use mode::{Key, Message, Mode, ResumeMode};
use render::Snapshot;
use settings::SettingsField;

// ---------------------------------------------------------------------------
// Timing (seconds)
// ---------------------------------------------------------------------------

/// Added to the running countdown by key `1`.
pub const EXTEND_SECS: u32 = 5 * 60;
/// Fast-forward (`8`) clamps the countdown to this.
pub const FAST_FORWARD_SECS: u32 = 5;
/// Profile tag shown before focus starts.
pub const PROFILE_TAG_SECS: u32 = 2;
/// Unknown-card error shown before returning to idle.
pub const UNKNOWN_CARD_SECS: u32 = 2;
/// "rEAd" prompt after entering NFC read mode.
pub const NFC_PROMPT_SECS: u32 = 1;
/// Each half of a scanned UID.
pub const NFC_HALF_SECS: u32 = 2;
/// Fan level confirmation.
pub const FAN_MESSAGE_SECS: u32 = 2;
/// Skip / fast-forward confirmation.
pub const DEBUG_MESSAGE_SECS: u32 = 1;
/// Low-light warning: indicator toggles, one per second.
pub const LOW_LIGHT_FLASHES: u8 = 6;
pub const LOW_LIGHT_STEP_SECS: u32 = 1;

/// Focus periods per set; the last one is followed by a long rest.
pub const FOCUS_PERIODS_PER_SET: u8 = 4;

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

/// The top-level state machine.  Owns the current [`Mode`]; everything
/// else lives in the [`FsmContext`] passed to each handler.
pub struct Machine {
    mode: Mode,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    pub const fn new() -> Self {
        Self { mode: Mode::Idle }
    }

    /// Apply the power-up outputs.  Call once before the first event.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in mode: {}", self.mode);
        ctx.commands.fan_speed = 0;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Copy of the state the renderer needs.
    pub fn snapshot(&self, ctx: &FsmContext) -> Snapshot {
        Snapshot {
            mode: self.mode,
            remaining_secs: ctx.counters.countdowns.session,
            ui_secs: ctx.counters.countdowns.ui,
            completed_sessions: ctx.counters.completed_sessions,
            flash_count: ctx.counters.flash_count,
            highlighted: ctx.settings.highlighted(),
            draft_value: ctx.settings.draft().map_or(0, |d| d.value),
            card: ctx.last_card,
        }
    }

    /// Switch to `next` immediately.  A no-op if already there.
    pub fn force_transition(&mut self, next: Mode, ctx: &mut FsmContext) {
        if next == self.mode {
            return;
        }
        let from = self.mode;
        info!("FSM transition: {} -> {}", from, next);
        self.mode = next;
        ctx.record(MachineEvent::ModeChanged { from, to: next });
    }

    // -----------------------------------------------------------------------
    // Keypad
    // -----------------------------------------------------------------------

    /// Dispatch one (edge-detected) keypress.
    pub fn handle_key(&mut self, key: Key, ctx: &mut FsmContext, light: &mut impl LightSensor) {
        match (self.mode, key) {
            (Mode::Focus, Key::Star) => self.pause(ctx),
            (Mode::Focus | Mode::Rest | Mode::LongRest, Key::Hash) => self.go_idle(ctx),
            (Mode::Focus | Mode::Rest | Mode::LongRest, Key::Digit(1)) => {
                let secs = ctx.remaining_secs().saturating_add(EXTEND_SECS);
                ctx.set_remaining(secs);
                info!("Session extended to {}s", secs);
            }
            (Mode::Focus, Key::Digit(2)) => {
                let level = ctx.counters.fan_level % 3 + 1;
                ctx.counters.fan_level = level;
                ctx.commands.fan_speed = ctx.fan_speed_for_level();
                self.show_message(Message::FanLevel(level), ResumeMode::Focus, FAN_MESSAGE_SECS, ctx);
            }
            (Mode::Focus | Mode::Rest | Mode::LongRest, Key::Digit(9)) => {
                ctx.set_remaining(0);
                let resume = self.countdown_resume();
                self.show_message(Message::Skip, resume, DEBUG_MESSAGE_SECS, ctx);
            }
            (Mode::Focus | Mode::Rest | Mode::LongRest, Key::Digit(8)) => {
                ctx.set_remaining(ctx.remaining_secs().min(FAST_FORWARD_SECS));
                let resume = self.countdown_resume();
                self.show_message(Message::FastForward, resume, DEBUG_MESSAGE_SECS, ctx);
            }
            (Mode::Rest | Mode::LongRest, Key::Star | Key::Digit(0)) => {
                info!("Rest skipped");
                self.start_focus(ctx, light);
            }
            (Mode::Paused, Key::Star) => self.resume(ctx),

            (Mode::Idle | Mode::ShowStats, Key::Hash) => {
                ctx.counters.completed_sessions = 0;
                ctx.record(MachineEvent::StatsReset);
                info!("Session statistics reset");
                self.force_transition(Mode::Idle, ctx);
            }
            (Mode::Idle | Mode::ShowStats, Key::Digit(5)) => {
                ctx.last_card = None;
                ctx.arm_ui(NFC_PROMPT_SECS);
                self.force_transition(Mode::NfcRead, ctx);
            }
            (Mode::Idle | Mode::ShowStats, Key::Digit(6)) => {
                ctx.settings.open_menu();
                self.force_transition(Mode::SettingsMenu, ctx);
            }
            (Mode::Idle | Mode::ShowStats, Key::Digit(0)) => self.enter_bind_menu(ctx),

            (Mode::BindMenuPrompt, Key::Digit(d @ 1..=3)) => {
                if let Some(slot) = BindSlot::from_digit(d) {
                    ctx.arm_ui(binding::CAPTURE_TIMEOUT_SECS);
                    info!("Waiting for a card to bind to {}", slot);
                    self.force_transition(Mode::BindingTarget { slot }, ctx);
                }
            }
            (Mode::BindMenuPrompt, Key::Hash) => self.go_idle(ctx),
            (Mode::BindingTarget { slot }, Key::Hash) => {
                info!("Binding {} cancelled", slot);
                self.enter_bind_menu(ctx);
            }

            (Mode::SettingsMenu, Key::Digit(d @ 1..=4)) => {
                if let Some(field) = SettingsField::from_digit(d) {
                    ctx.settings.open(field);
                    self.force_transition(Mode::SettingsEdit { field }, ctx);
                }
            }
            (Mode::SettingsMenu, Key::Star) => {
                let field = ctx.settings.advance();
                debug!("Settings menu highlights {}", field);
            }
            (Mode::SettingsMenu, Key::Hash) => {
                ctx.settings.close();
                self.force_transition(Mode::Idle, ctx);
            }
            (Mode::SettingsEdit { field }, Key::Digit(d)) => {
                if !ctx.settings.push_digit(d) {
                    debug!("Digit {} rejected for {}", d, field);
                    self.show_message(
                        Message::MaxExceeded,
                        ResumeMode::SettingsEdit(field),
                        settings::REJECT_SECS,
                        ctx,
                    );
                }
            }
            (Mode::SettingsEdit { field }, Key::Star) => self.commit_settings(field, ctx),
            (Mode::SettingsEdit { .. }, Key::Hash) => {
                ctx.settings.cancel();
                self.force_transition(Mode::SettingsMenu, ctx);
            }
            (Mode::SettingsSaveSuccess | Mode::SettingsSaveFailed, Key::Hash) => {
                self.force_transition(Mode::SettingsMenu, ctx);
            }

            (mode, key) => debug!("Key {:?} ignored in {}", key, mode),
        }
    }

    // -----------------------------------------------------------------------
    // Card reader
    // -----------------------------------------------------------------------

    /// Dispatch one card identifier read from the reader.
    pub fn handle_card(&mut self, uid: CardUid, ctx: &mut FsmContext) {
        match self.mode {
            Mode::BindingTarget { slot } => {
                ctx.bindings.bind(slot, uid);
                ctx.record(MachineEvent::CardBound { slot, uid });
                info!("Card {} bound to {}", uid, slot);
                ctx.arm_ui(binding::RESULT_SECS);
                self.force_transition(Mode::BindSuccess, ctx);
            }
            Mode::NfcRead => {
                info!("Card {} read", uid);
                ctx.last_card = Some(uid);
                ctx.arm_ui(NFC_HALF_SECS);
                self.force_transition(Mode::NfcDisplayPart1, ctx);
            }
            Mode::Idle | Mode::ShowStats => self.load_profile(uid, ctx),
            mode => debug!("Card {} ignored in {}", uid, mode),
        }
    }

    fn load_profile(&mut self, uid: CardUid, ctx: &mut FsmContext) {
        match ctx.bindings.lookup(uid) {
            Some(slot) => match slot.profile() {
                Some(profile) => {
                    ctx.session = profile.preset().applied_to(ctx.session);
                    ctx.record(MachineEvent::ProfileLoaded(profile));
                    info!("Profile {:?} loaded from card {}", profile, uid);
                    ctx.arm_ui(PROFILE_TAG_SECS);
                    self.force_transition(Mode::LoadingProfile { profile }, ctx);
                }
                None if self.mode == Mode::ShowStats => {}
                None => {
                    let completed = ctx.counters.completed_sessions;
                    ctx.record(MachineEvent::StatsShown { completed });
                    self.force_transition(Mode::ShowStats, ctx);
                }
            },
            None => {
                warn!("Unknown card {}", uid);
                ctx.record(MachineEvent::CardRejected(uid));
                self.show_message(Message::UnknownCard, ResumeMode::Idle, UNKNOWN_CARD_SECS, ctx);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Continuous checks
    // -----------------------------------------------------------------------

    /// Presence-based pause and resume.  Absence pauses on the first
    /// reading; presence resumes any pause.
    pub fn check_presence(&mut self, present: bool, ctx: &mut FsmContext) {
        match self.mode {
            Mode::Focus if !present => {
                info!("User absent, pausing");
                self.pause(ctx);
            }
            Mode::Paused if present => {
                info!("User back, resuming");
                self.resume(ctx);
            }
            _ => {}
        }
    }

    /// Tap-to-toggle between Focus and Paused.  Returns `true` if the
    /// reading counted as a tap.
    pub fn check_tap(&mut self, accel: Acceleration, ctx: &mut FsmContext) -> bool {
        if !self.mode.watches_desk() || ctx.counters.tap_cooldown > 0 {
            return false;
        }
        if accel.magnitude() <= ctx.config.tap_threshold_g {
            return false;
        }
        ctx.counters.tap_cooldown = ctx.config.tap_cooldown_cycles();
        info!("Desk tap ({:.2} g)", accel.magnitude());
        if self.mode == Mode::Focus {
            self.pause(ctx);
        } else {
            self.resume(ctx);
        }
        true
    }

    /// End-of-cycle bookkeeping, run every cycle in every mode.
    pub fn end_cycle(&mut self, ctx: &mut FsmContext) {
        ctx.counters.tap_cooldown = ctx.counters.tap_cooldown.saturating_sub(1);
    }

    // -----------------------------------------------------------------------
    // Time base
    // -----------------------------------------------------------------------

    /// One second elapsed: decrement countdowns, then fire expiries.
    pub fn handle_tick(&mut self, ctx: &mut FsmContext, light: &mut impl LightSensor) {
        ctx.counters.countdowns.elapse(self.mode.session_running());

        match self.mode {
            Mode::Focus if ctx.remaining_secs() == 0 => self.complete_focus(ctx),
            Mode::Rest | Mode::LongRest if ctx.remaining_secs() == 0 => {
                self.start_focus(ctx, light);
            }
            mode if mode.ui_timed() && ctx.ui_expired() => self.on_ui_expired(ctx, light),
            _ => {}
        }
    }

    fn on_ui_expired(&mut self, ctx: &mut FsmContext, light: &mut impl LightSensor) {
        match self.mode {
            Mode::LoadingProfile { .. } => {
                ctx.counters.focus_cycle = 0;
                self.start_focus(ctx, light);
            }
            Mode::TemporaryMessage { resume, .. } => self.force_transition(resume.into(), ctx),
            Mode::NfcDisplayPart1 => {
                ctx.arm_ui(NFC_HALF_SECS);
                self.force_transition(Mode::NfcDisplayPart2, ctx);
            }
            Mode::NfcDisplayPart2 => {
                ctx.last_card = None;
                self.force_transition(Mode::Idle, ctx);
            }
            Mode::LowLightWarning => {
                let flashes = ctx.counters.flash_count.saturating_sub(1);
                ctx.counters.flash_count = flashes;
                if flashes == 0 {
                    // No second light check here: it could loop forever.
                    self.enter_focus(ctx);
                } else {
                    ctx.arm_ui(LOW_LIGHT_STEP_SECS);
                }
            }
            Mode::BindMenuPrompt => {
                debug!("Bind menu timed out");
                self.force_transition(Mode::Idle, ctx);
            }
            Mode::BindingTarget { slot } => {
                warn!("No card presented for {} within {}s", slot, binding::CAPTURE_TIMEOUT_SECS);
                ctx.record(MachineEvent::BindTimedOut(slot));
                ctx.arm_ui(binding::RESULT_SECS);
                self.force_transition(Mode::BindFailed, ctx);
            }
            Mode::BindSuccess | Mode::BindFailed => self.enter_bind_menu(ctx),
            Mode::SettingsSaveSuccess | Mode::SettingsSaveFailed => {
                self.force_transition(Mode::SettingsMenu, ctx);
            }
            _ => {}
        }
    }

    // -----------------------------------------------------------------------
    // Shared transitions
    // -----------------------------------------------------------------------

    /// Begin focus, detouring through the low-light warning when the desk
    /// is too dark.  An unreadable light sensor skips the check.
    fn start_focus(&mut self, ctx: &mut FsmContext, light: &mut impl LightSensor) {
        match light.read_lux() {
            Ok(lux) if lux < ctx.session.low_light_threshold => {
                warn!(
                    "Low light ({} lux < {}), warning before focus",
                    lux, ctx.session.low_light_threshold
                );
                ctx.counters.flash_count = LOW_LIGHT_FLASHES;
                ctx.commands.fan_speed = 0;
                ctx.arm_ui(LOW_LIGHT_STEP_SECS);
                self.force_transition(Mode::LowLightWarning, ctx);
            }
            Ok(_) => self.enter_focus(ctx),
            Err(e) => {
                warn!("Light sensor unavailable ({}), skipping low-light check", e);
                self.enter_focus(ctx);
            }
        }
    }

    fn enter_focus(&mut self, ctx: &mut FsmContext) {
        ctx.set_remaining(ctx.session.focus_secs);
        ctx.counters.fan_level = 1;
        ctx.commands.fan_speed = ctx.fan_speed_for_level();
        self.force_transition(Mode::Focus, ctx);
    }

    fn complete_focus(&mut self, ctx: &mut FsmContext) {
        let c = &mut ctx.counters;
        c.completed_sessions = c.completed_sessions.saturating_add(1);
        c.focus_cycle += 1;
        let long_rest = c.focus_cycle >= FOCUS_PERIODS_PER_SET;
        let total = c.completed_sessions;
        if long_rest {
            c.focus_cycle = 0;
        }
        info!("Focus session {} complete", total);
        ctx.record(MachineEvent::SessionCompleted { total, long_rest });
        ctx.commands.fan_speed = 0;
        if long_rest {
            ctx.set_remaining(ctx.session.long_rest_secs);
            self.force_transition(Mode::LongRest, ctx);
        } else {
            ctx.set_remaining(ctx.session.rest_secs);
            self.force_transition(Mode::Rest, ctx);
        }
    }

    fn pause(&mut self, ctx: &mut FsmContext) {
        ctx.commands.fan_speed = 0;
        self.force_transition(Mode::Paused, ctx);
    }

    fn resume(&mut self, ctx: &mut FsmContext) {
        ctx.commands.fan_speed = ctx.fan_speed_for_level();
        self.force_transition(Mode::Focus, ctx);
    }

    fn go_idle(&mut self, ctx: &mut FsmContext) {
        ctx.commands.fan_speed = 0;
        self.force_transition(Mode::Idle, ctx);
    }

    fn enter_bind_menu(&mut self, ctx: &mut FsmContext) {
        ctx.arm_ui(binding::MENU_TIMEOUT_SECS);
        self.force_transition(Mode::BindMenuPrompt, ctx);
    }

    fn show_message(
        &mut self,
        message: Message,
        resume: ResumeMode,
        secs: u32,
        ctx: &mut FsmContext,
    ) {
        ctx.arm_ui(secs);
        self.force_transition(Mode::TemporaryMessage { message, resume }, ctx);
    }

    /// Mode a debug message returns to from a countdown mode.
    fn countdown_resume(&self) -> ResumeMode {
        match self.mode {
            Mode::Rest => ResumeMode::Rest,
            Mode::LongRest => ResumeMode::LongRest,
            _ => ResumeMode::Focus,
        }
    }

    fn commit_settings(&mut self, field: SettingsField, ctx: &mut FsmContext) {
        ctx.arm_ui(settings::RESULT_SECS);
        match ctx.settings.commit(&mut ctx.session) {
            Ok((field, value)) => {
                info!("Setting {} saved: {}", field, value);
                ctx.record(MachineEvent::SettingsSaved { field, value });
                self.force_transition(Mode::SettingsSaveSuccess, ctx);
            }
            Err(error) => {
                warn!("Setting {} rejected: {}", field, error);
                ctx.record(MachineEvent::SettingsRejected { field, error });
                self.force_transition(Mode::SettingsSaveFailed, ctx);
            }
        }
    }
}
