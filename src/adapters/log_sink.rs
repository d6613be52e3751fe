//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! whatever `log` backend the board installed (serial console in
//! production).  A telemetry adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::fsm::context::MachineEvent;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(mode) => info!("START | initial_mode={}", mode),
            AppEvent::TickOverrun { missed } => warn!("TICK  | overrun, missed={}", missed),
            AppEvent::Machine(e) => log_machine_event(e),
        }
    }
}

fn log_machine_event(event: &MachineEvent) {
    match event {
        MachineEvent::ModeChanged { from, to } => info!("MODE  | {} -> {}", from, to),
        MachineEvent::SessionCompleted { total, long_rest } => {
            info!("FOCUS | completed total={} long_rest={}", total, long_rest);
        }
        MachineEvent::ProfileLoaded(p) => info!("CARD  | profile={:?} ({})", p, p.tag()),
        MachineEvent::StatsShown { completed } => info!("CARD  | stats completed={}", completed),
        MachineEvent::StatsReset => info!("STATS | reset"),
        MachineEvent::CardRejected(uid) => warn!("CARD  | unknown uid={}", uid),
        MachineEvent::CardBound { slot, uid } => info!("BIND  | slot={} uid={}", slot, uid),
        MachineEvent::BindTimedOut(slot) => warn!("BIND  | timeout slot={}", slot),
        MachineEvent::SettingsSaved { field, value } => {
            info!("SET   | {}={}", field, value);
        }
        MachineEvent::SettingsRejected { field, error } => {
            warn!("SET   | {} rejected: {}", field, error);
        }
    }
}
