use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerMode;

/// Every timer state change produces an Event.
/// The presentation layer may render these; the service logs them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// An interval ran down to zero and the engine advanced to the next
    /// mode in the same transition (no intermediate stop).
    IntervalCompleted {
        ended: TimerMode,
        next: TimerMode,
        cycles_completed: u32,
        at: DateTime<Utc>,
    },
}
