//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (keypad, card reader, sensors, indicator, display, fan,
//! event sinks) implement these traits.  The
//! [`AppService`](super::service::AppService) consumes them via generics,
//! so the domain core never touches hardware directly.

use crate::error::Result;
use crate::fsm::binding::CardUid;
use crate::fsm::mode::Key;
use crate::fsm::render::Rgb;
use crate::sensors::{LightSensor, MotionSensor, PresenceSensor};

// ───────────────────────────────────────────────────────────────
// Driver-facing input contracts
// ───────────────────────────────────────────────────────────────

/// Debounced keypad.  Edge detection is the service's job.
pub trait Keypad {
    /// Key currently held, or `None`.
    fn read_key(&mut self) -> Option<Key>;
}

/// Card activation mode for [`CardReader::request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// Wake only cards that are not halted (REQA).
    Idle,
    /// Wake every card in the field (WUPA).
    All,
}

/// Contactless reader.  Anticollision is the driver's business.
pub trait CardReader {
    /// Ask cards in the field to answer.
    fn request(&mut self, mode: RequestMode) -> Result<()>;
    /// Read the 4-byte identifier of the answering card.
    fn read_uid(&mut self) -> Result<CardUid>;
}

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Every input the control loop polls.
pub trait InputPort: LightSensor + PresenceSensor + MotionSensor {
    fn read_key(&mut self) -> Option<Key>;
    fn request_card(&mut self, mode: RequestMode) -> Result<()>;
    fn read_card_uid(&mut self) -> Result<CardUid>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-only outputs.  Fire-and-forget: implementations log and drop
/// their own bus errors.
pub trait ActuatorPort {
    /// Set the RGB indicator (each channel 0-100).
    fn set_indicator(&mut self, colour: Rgb);

    /// Show `text` on the segment display.
    fn set_text(&mut self, text: &str);

    /// Fan duty in percent, 0 = off.
    fn set_fan_speed(&mut self, percent: u8);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
