//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that transition handlers read from
//! and write to: session configuration, runtime counters, card bindings,
//! the settings draft, actuator outputs, and the outbound event log.
//! Only the [`Machine`](super::Machine) mutates it.

use log::warn;

use crate::config::{Profile, SessionConfig, SystemConfig};
use crate::timebase::Countdowns;

use super::binding::{BindSlot, CardUid, ProfileBindings};
use super::mode::Mode;
use super::settings::{SettingsEditor, SettingsError, SettingsField};

/// Events buffered between two drains.
pub const OUTBOX_CAPACITY: usize = 16;

// ---------------------------------------------------------------------------
// Runtime counters
// ---------------------------------------------------------------------------

/// Counters advanced by ticks, taps, and session completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeCounters {
    /// Session and UI countdowns (seconds).
    pub countdowns: Countdowns,
    /// Focus periods completed since the last reset.
    pub completed_sessions: u32,
    /// Position within the current set of four focus periods (0-3).
    pub focus_cycle: u8,
    /// Current fan level (1-3).
    pub fan_level: u8,
    /// Cycles left before another tap is accepted.
    pub tap_cooldown: u16,
    /// Low-light warning steps left.  Even = indicator lit.
    pub flash_count: u8,
}

impl Default for RuntimeCounters {
    fn default() -> Self {
        Self {
            countdowns: Countdowns::default(),
            completed_sessions: 0,
            focus_cycle: 0,
            fan_level: 1,
            tap_cooldown: 0,
            flash_count: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Actuator commands (written by handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Outputs that are not derived from the mode alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActuatorCommands {
    /// Fan duty (percent, 0 = off).
    pub fan_speed: u8,
}

// ---------------------------------------------------------------------------
// Outbound events
// ---------------------------------------------------------------------------

/// Things the machine did that the outside world may care about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MachineEvent {
    ModeChanged { from: Mode, to: Mode },
    SessionCompleted { total: u32, long_rest: bool },
    ProfileLoaded(Profile),
    StatsShown { completed: u32 },
    StatsReset,
    CardRejected(CardUid),
    CardBound { slot: BindSlot, uid: CardUid },
    BindTimedOut(BindSlot),
    SettingsSaved { field: SettingsField, value: u16 },
    SettingsRejected { field: SettingsField, error: SettingsError },
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every transition handler.
pub struct FsmContext {
    // -- Configuration --
    /// Static parameters (cycle period, tap tuning, boot bindings).
    pub config: SystemConfig,
    /// Live session parameters, edited by profiles and the settings menu.
    pub session: SessionConfig,

    // -- Runtime state --
    pub counters: RuntimeCounters,
    pub bindings: ProfileBindings,
    pub settings: SettingsEditor,
    /// Card shown by the NFC read screens.
    pub last_card: Option<CardUid>,

    // -- Outputs --
    pub commands: ActuatorCommands,
    outbox: heapless::Vec<MachineEvent, OUTBOX_CAPACITY>,
}

impl FsmContext {
    /// Create a fresh power-up context.
    pub fn new(config: SystemConfig) -> Self {
        Self {
            session: config.session,
            bindings: config.bindings,
            config,
            counters: RuntimeCounters::default(),
            settings: SettingsEditor::default(),
            last_card: None,
            commands: ActuatorCommands::default(),
            outbox: heapless::Vec::new(),
        }
    }

    /// Queue an event.  When the outbox is full the event is dropped.
    pub fn record(&mut self, event: MachineEvent) {
        if self.outbox.push(event).is_err() {
            warn!("Event outbox full, dropping {:?}", event);
        }
    }

    /// Hand every queued event to `f`, oldest first.
    pub fn drain_events(&mut self, mut f: impl FnMut(MachineEvent)) {
        for event in self.outbox.iter().copied() {
            f(event);
        }
        self.outbox.clear();
    }

    pub fn pending_events(&self) -> &[MachineEvent] {
        &self.outbox
    }

    /// Arm the UI timer.
    pub fn arm_ui(&mut self, secs: u32) {
        self.counters.countdowns.ui = secs;
    }

    pub fn ui_expired(&self) -> bool {
        self.counters.countdowns.ui == 0
    }

    pub fn remaining_secs(&self) -> u32 {
        self.counters.countdowns.session
    }

    pub fn set_remaining(&mut self, secs: u32) {
        self.counters.countdowns.session = secs;
    }

    /// Fan duty for the stored level.
    pub fn fan_speed_for_level(&self) -> u8 {
        self.session.fan_speed_for(self.counters.fan_level)
    }
}
