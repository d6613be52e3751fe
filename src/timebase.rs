//! One-second time base.
//!
//! The hardware timer callback calls [`TimeBase::on_period_elapsed`] once
//! per second; the control loop calls [`TimeBase::take_pending`] once per
//! cycle.  Pending periods coalesce: a loop slower than 1 Hz sees "at
//! least one second passed", never a backlog.  Lost seconds show up as
//! drift through [`TimeBase::produced`].
//!
//! ```text
//! ┌─────────────┐  signal()   ┌────────────┐  try_take()  ┌──────────────┐
//! │ 1 Hz timer  │────────────▶│   Signal   │─────────────▶│  Main loop   │
//! │ (producer)  │             │ (1 slot)   │              │  (consumer)  │
//! └─────────────┘             └────────────┘              └──────────────┘
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Single-producer / single-consumer "a second elapsed" flag.
pub struct TimeBase {
    pending: Signal<CriticalSectionRawMutex, ()>,
    produced: AtomicU32,
}

impl Default for TimeBase {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeBase {
    pub const fn new() -> Self {
        Self {
            pending: Signal::new(),
            produced: AtomicU32::new(0),
        }
    }

    /// Timer callback side.  Safe to call from the timer task.
    pub fn on_period_elapsed(&self) {
        self.produced.fetch_add(1, Ordering::Relaxed);
        self.pending.signal(());
    }

    /// Consume the pending tick, if any.  At most one per call.
    pub fn take_pending(&self) -> bool {
        self.pending.try_take().is_some()
    }

    /// Whether a tick is waiting, without consuming it.
    pub fn is_pending(&self) -> bool {
        self.pending.signaled()
    }

    /// Total periods signalled since boot (wraps at `u32::MAX`).
    pub fn produced(&self) -> u32 {
        self.produced.load(Ordering::Relaxed)
    }
}

/// The two independent countdowns driven by the time base.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdowns {
    /// Seconds left in the running focus or rest period.
    pub session: u32,
    /// Seconds left on the short-lived UI timer.
    pub ui: u32,
}

impl Countdowns {
    /// Apply one elapsed second.  Both counters saturate at zero.
    pub fn elapse(&mut self, session_running: bool) {
        if session_running {
            self.session = self.session.saturating_sub(1);
        }
        self.ui = self.ui.saturating_sub(1);
    }
}
