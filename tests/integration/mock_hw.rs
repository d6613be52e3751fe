//! Mock hardware adapter for integration tests.
//!
//! Scripted inputs (key, card queue, presence, motion, light) and a
//! record of every actuator call, so tests can assert on the full output
//! history without touching real buses or pins.

use std::collections::VecDeque;

use pomodesk::app::events::AppEvent;
use pomodesk::app::ports::{ActuatorPort, EventSink, InputPort, RequestMode};
use pomodesk::app::service::AppService;
use pomodesk::config::SystemConfig;
use pomodesk::error::{ReaderError, Result, SensorError};
use pomodesk::fsm::binding::CardUid;
use pomodesk::fsm::context::MachineEvent;
use pomodesk::fsm::mode::{Key, Mode};
use pomodesk::fsm::render::Rgb;
use pomodesk::sensors::{Acceleration, LightSensor, MotionSensor, PresenceSensor};
use pomodesk::timebase::TimeBase;

pub const STUDY_CARD: CardUid = CardUid([0xFE, 0x1F, 0x7F, 0xC2]);
pub const DEEP_CARD: CardUid = CardUid([0x5E, 0x6F, 0x7A, 0x8B]);
pub const DATA_CARD: CardUid = CardUid([0x9C, 0xAD, 0xBE, 0xCF]);
pub const STRANGER: CardUid = CardUid([0x12, 0x34, 0x56, 0x78]);

/// Resting accelerometer reading (1 g on Z).
pub const AT_REST: Acceleration = Acceleration::new(0.0, 0.0, 1.0);
/// Reading well above the default 1.5 g tap threshold.
pub const KNOCK: Acceleration = Acceleration::new(0.4, 0.3, 2.2);

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    Indicator(Rgb),
    Text(String),
    Fan(u8),
}

// ── MockHw ────────────────────────────────────────────────────

pub struct MockHw {
    /// Key held down; `None` = released.
    pub key: Option<Key>,
    /// Cards presented, one consumed per successful read.
    pub cards: VecDeque<CardUid>,
    /// `None` makes the presence sensor fail.
    pub present: Option<bool>,
    /// `None` makes the accelerometer fail.
    pub accel: Option<Acceleration>,
    /// `None` makes the light sensor fail.
    pub lux: Option<u16>,
    pub calls: Vec<ActuatorCall>,
    pub card_requests: u32,
    pub presence_reads: u32,
}

#[allow(dead_code)]
impl MockHw {
    pub fn new() -> Self {
        Self {
            key: None,
            cards: VecDeque::new(),
            present: Some(true),
            accel: Some(AT_REST),
            lux: Some(400),
            calls: Vec::new(),
            card_requests: 0,
            presence_reads: 0,
        }
    }

    pub fn last_text(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::Text(t) => Some(t.as_str()),
            _ => None,
        })
    }

    pub fn last_indicator(&self) -> Option<Rgb> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::Indicator(rgb) => Some(*rgb),
            _ => None,
        })
    }

    pub fn last_fan(&self) -> Option<u8> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::Fan(duty) => Some(*duty),
            _ => None,
        })
    }

    /// Every text written, oldest first.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ActuatorCall::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Default for MockHw {
    fn default() -> Self {
        Self::new()
    }
}

impl PresenceSensor for MockHw {
    fn is_present(&mut self) -> Result<bool> {
        self.presence_reads += 1;
        self.present.ok_or(SensorError::ReadFailed.into())
    }
}

impl MotionSensor for MockHw {
    fn read_acceleration(&mut self) -> Result<Acceleration> {
        self.accel.ok_or(SensorError::NotResponding.into())
    }
}

impl LightSensor for MockHw {
    fn read_lux(&mut self) -> Result<u16> {
        self.lux.ok_or(SensorError::NotResponding.into())
    }
}

impl InputPort for MockHw {
    fn read_key(&mut self) -> Option<Key> {
        self.key
    }

    fn request_card(&mut self, _mode: RequestMode) -> Result<()> {
        self.card_requests += 1;
        if self.cards.is_empty() {
            Err(ReaderError::NoCard.into())
        } else {
            Ok(())
        }
    }

    fn read_card_uid(&mut self) -> Result<CardUid> {
        self.cards.pop_front().ok_or(ReaderError::NoCard.into())
    }
}

impl ActuatorPort for MockHw {
    fn set_indicator(&mut self, colour: Rgb) {
        self.calls.push(ActuatorCall::Indicator(colour));
    }

    fn set_text(&mut self, text: &str) {
        self.calls.push(ActuatorCall::Text(text.to_owned()));
    }

    fn set_fan_speed(&mut self, percent: u8) {
        self.calls.push(ActuatorCall::Fan(percent));
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn machine_events(&self) -> Vec<MachineEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Machine(m) => Some(*m),
                _ => None,
            })
            .collect()
    }

    pub fn saw(&self, event: MachineEvent) -> bool {
        self.events.contains(&AppEvent::Machine(event))
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

// ── Rig: service + mocks + time base ──────────────────────────

pub struct Rig {
    pub app: AppService,
    pub hw: MockHw,
    pub sink: RecordingSink,
    pub timebase: TimeBase,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self::with_config(SystemConfig::default())
    }

    /// Build and start a service.
    pub fn with_config(config: SystemConfig) -> Self {
        let mut app = AppService::new(config);
        let mut hw = MockHw::new();
        let mut sink = RecordingSink::new();
        app.start(&mut hw, &mut sink);
        Self {
            app,
            hw,
            sink,
            timebase: TimeBase::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.app.mode()
    }

    /// One processing cycle with no tick.
    pub fn cycle(&mut self) {
        self.app
            .run_cycle(&self.timebase, &mut self.hw, &mut self.sink);
    }

    /// One second elapses, then one cycle.
    pub fn tick(&mut self) {
        self.timebase.on_period_elapsed();
        self.cycle();
    }

    pub fn ticks(&mut self, n: u32) {
        for _ in 0..n {
            self.tick();
        }
    }

    /// Press and release `c` over two cycles.
    pub fn press(&mut self, c: char) {
        self.hw.key = Key::from_char(c);
        self.cycle();
        self.hw.key = None;
        self.cycle();
    }

    pub fn type_keys(&mut self, keys: &str) {
        for c in keys.chars() {
            self.press(c);
        }
    }

    /// Put a card on the reader for one cycle.
    pub fn present_card(&mut self, uid: CardUid) {
        self.hw.cards.push_back(uid);
        self.cycle();
        self.hw.cards.clear();
    }

    /// Load the study profile and wait out the tag screen.
    pub fn start_study_focus(&mut self) {
        self.present_card(STUDY_CARD);
        self.ticks(2);
    }
}

impl Default for Rig {
    fn default() -> Self {
        Self::new()
    }
}
