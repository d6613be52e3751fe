//! Application service, the hexagonal core.
//!
//! [`AppService`] owns the state machine and its shared context.  It
//! exposes a clean, hardware-agnostic API.  All I/O flows through port
//! traits injected at call sites, making the entire service testable with
//! mock adapters.
//!
//! ```text
//!    InputPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                  │       AppService        │
//! ActuatorPort ◀── │  Machine · Renderer     │ ◀── TimeBase
//!                  └────────────────────────┘
//! ```
//!
//! One cycle, in order: keypad, card reader, presence and tap checks,
//! pending tick, outputs, events.  In a binding target the card reader
//! is polled before the keypad so a card beats a cancel key.

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::error::{Error, ReaderError};
use crate::fsm::Machine;
use crate::fsm::context::FsmContext;
use crate::fsm::mode::{Key, Mode};
use crate::fsm::render::{self, Frame, Rgb, Snapshot, Text};
use crate::timebase::TimeBase;

use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, InputPort, RequestMode};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    machine: Machine,
    ctx: FsmContext,
    /// Key seen on the previous cycle, for edge detection.
    last_key: Option<Key>,
    /// Outputs last written, so unchanged values are not rewritten.
    shown_indicator: Option<Rgb>,
    shown_text: Option<Text>,
    shown_fan: Option<u8>,
    /// Time-base period count at the last consumed tick.
    seen_periods: Option<u32>,
    cycle_count: u64,
}

impl AppService {
    /// Construct the service from configuration.  An invalid configuration
    /// is replaced by the defaults.
    ///
    /// Does **not** start the machine; call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!("Rejecting configuration ({}), using defaults", e);
                SystemConfig::default()
            }
        };
        Self {
            machine: Machine::new(),
            ctx: FsmContext::new(config),
            last_key: None,
            shown_indicator: None,
            shown_text: None,
            shown_fan: None,
            seen_periods: None,
            cycle_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start in Idle and write the initial outputs.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        self.machine.start(&mut self.ctx);
        self.apply_outputs(hw);
        sink.emit(&AppEvent::Started(self.machine.mode()));
        info!("AppService started in {}", self.machine.mode());
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one processing cycle.
    ///
    /// The `hw` parameter satisfies **both** [`InputPort`] and
    /// [`ActuatorPort`], which avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn run_cycle(
        &mut self,
        timebase: &TimeBase,
        hw: &mut (impl InputPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) {
        self.cycle_count += 1;

        // 1. Keypad (edge-detected) and 2. card reader
        let pressed = self.sample_key(hw);
        if matches!(self.machine.mode(), Mode::BindingTarget { .. }) {
            self.poll_card(hw);
            self.dispatch_key(pressed, hw);
        } else {
            self.dispatch_key(pressed, hw);
            self.poll_card(hw);
        }

        // 3. Continuous checks
        self.check_desk(hw);
        self.machine.end_cycle(&mut self.ctx);

        // 4. At most one tick per cycle
        if timebase.take_pending() {
            self.note_periods(timebase.produced(), sink);
            self.machine.handle_tick(&mut self.ctx, &mut *hw);
        }

        // 5. Outputs, 6. events
        self.apply_outputs(hw);
        self.ctx
            .drain_events(|event| sink.emit(&AppEvent::Machine(event)));
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.machine.mode()
    }

    /// Read-only view of the machine's context.
    pub fn context(&self) -> &FsmContext {
        &self.ctx
    }

    pub fn snapshot(&self) -> Snapshot {
        self.machine.snapshot(&self.ctx)
    }

    /// Frame the display should currently show.
    pub fn frame(&self) -> Frame {
        render::render(&self.snapshot())
    }

    /// Processing cycles run since construction.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    // ── Internal ──────────────────────────────────────────────

    /// Newly pressed key, if the keypad reading changed to a key.
    fn sample_key(&mut self, hw: &mut impl InputPort) -> Option<Key> {
        let key = hw.read_key();
        let pressed = if key == self.last_key { None } else { key };
        self.last_key = key;
        pressed
    }

    fn dispatch_key(&mut self, pressed: Option<Key>, hw: &mut impl InputPort) {
        if let Some(key) = pressed {
            self.machine.handle_key(key, &mut self.ctx, &mut *hw);
        }
    }

    fn poll_card(&mut self, hw: &mut impl InputPort) {
        if !self.machine.mode().accepts_cards() {
            return;
        }
        let uid = hw
            .request_card(RequestMode::Idle)
            .and_then(|()| hw.read_card_uid());
        match uid {
            Ok(uid) => self.machine.handle_card(uid, &mut self.ctx),
            Err(Error::Reader(ReaderError::NoCard)) => {}
            Err(e) => debug!("Card read failed: {}", e),
        }
    }

    /// Presence and tap checks, only while focused or paused.  A failed
    /// presence read counts as absence; a failed motion read as no tap.
    fn check_desk(&mut self, hw: &mut impl InputPort) {
        if !self.machine.mode().watches_desk() {
            return;
        }
        let present = hw.is_present().unwrap_or_else(|e| {
            warn!("Presence sensor unavailable ({}), treating as absent", e);
            false
        });
        self.machine.check_presence(present, &mut self.ctx);

        if !self.machine.mode().watches_desk() {
            return;
        }
        match hw.read_acceleration() {
            Ok(accel) => {
                self.machine.check_tap(accel, &mut self.ctx);
            }
            Err(e) => warn!("Motion sensor unavailable ({})", e),
        }
    }

    /// Compare produced periods with consumed ticks.
    fn note_periods(&mut self, produced: u32, sink: &mut impl EventSink) {
        if let Some(seen) = self.seen_periods {
            let missed = produced.wrapping_sub(seen).saturating_sub(1);
            if missed > 0 {
                warn!("Tick overrun: {} period(s) coalesced", missed);
                sink.emit(&AppEvent::TickOverrun { missed });
            }
        }
        self.seen_periods = Some(produced);
    }

    /// Render and push whatever changed.
    fn apply_outputs(&mut self, hw: &mut impl ActuatorPort) {
        let Frame { indicator, text } = render::render(&self.snapshot());

        if self.shown_indicator != Some(indicator) {
            hw.set_indicator(indicator);
            self.shown_indicator = Some(indicator);
        }
        if self.shown_text.as_ref() != Some(&text) {
            hw.set_text(&text);
            self.shown_text = Some(text);
        }
        let fan = self.ctx.commands.fan_speed;
        if self.shown_fan != Some(fan) {
            hw.set_fan_speed(fan);
            self.shown_fan = Some(fan);
        }
    }
}
