//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::fsm::context::MachineEvent;
use crate::fsm::mode::Mode;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// The application service has started (carries initial mode).
    Started(Mode),

    /// Something the state machine did, in order of occurrence.
    Machine(MachineEvent),

    /// Time-base periods were coalesced because cycles ran late.
    TickOverrun { missed: u32 },
}
