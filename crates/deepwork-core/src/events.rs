use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{ModeId, TimerPhase};

/// Every state change in the engine produces an Event.
/// The GUI polls or subscribes; audio policy stays with the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: ModeId,
        time_left_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        time_left_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: ModeId,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        from: ModeId,
        to: ModeId,
        at: DateTime<Utc>,
    },
    /// The countdown ran out on its own. The only variant that chimes.
    NaturalCompletion {
        mode: ModeId,
        at: DateTime<Utc>,
    },
    /// The user cut the session short; remaining time is discarded and no
    /// chime is played.
    ForcedCompletion {
        mode: ModeId,
        discarded_secs: u64,
        at: DateTime<Utc>,
    },
    /// A settings save touched at least one configured duration.
    DurationsUpdated {
        mode: ModeId,
        time_left_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: TimerPhase,
        mode: ModeId,
        label: String,
        time_left_secs: u64,
        duration_secs: u64,
        progress: f64,
        at: DateTime<Utc>,
    },
}
