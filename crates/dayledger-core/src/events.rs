use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::StudySession;
use crate::timer::{TimerMode, TimerState};

/// Every timer state change produces an Event; the CLI renders them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        target_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    /// Single completion event for both the user-confirmed stop and the
    /// autonomous countdown-reached-zero transition.
    TimerCompleted {
        session: StudySession,
        natural: bool,
        at: DateTime<Utc>,
    },
    TimerSnapshot {
        state: TimerState,
        mode: TimerMode,
        elapsed_secs: u64,
        target_secs: u64,
        remaining_secs: Option<u64>,
        at: DateTime<Utc>,
    },
}
