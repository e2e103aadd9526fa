//! Timer engine implementation.
//!
//! The engine is a pure state machine over whole seconds. It does not own
//! a clock - the caller (normally [`super::TimerController`]) invokes
//! `tick()` once per countdown second.
//!
//! ## State Transitions
//!
//! ```text
//! Idle/Paused --start--> Running
//! Running --pause--> Paused
//! Running --tick to 0--> Completed (natural)
//! Running/Paused --finish_session--> Completed (forced)
//! any --reset/switch_mode--> Idle
//! ```
//!
//! All transitions are plain state rewrites; none is retried or fatal.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::mode::{DurationUpdate, Mode, ModeId, ModeSet};
use crate::events::Event;

/// Derived view of the running/completed flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Core countdown engine.
///
/// Invariants: `time_left_secs` never exceeds the active mode's duration,
/// and `completed` implies not running with `time_left_secs == 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    modes: ModeSet,
    active: ModeId,
    time_left_secs: u64,
    running: bool,
    completed: bool,
}

impl TimerEngine {
    /// Create a new engine in the `Idle` state with Focus selected.
    pub fn new(modes: ModeSet) -> Self {
        let time_left_secs = modes.duration_secs(ModeId::Focus);
        Self {
            modes,
            active: ModeId::Focus,
            time_left_secs,
            running: false,
            completed: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn active(&self) -> ModeId {
        self.active
    }

    pub fn mode(&self) -> &Mode {
        self.modes.get(self.active)
    }

    pub fn time_left_secs(&self) -> u64 {
        self.time_left_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn duration_secs(&self) -> u64 {
        self.modes.duration_secs(self.active)
    }

    pub fn phase(&self) -> TimerPhase {
        if self.completed {
            TimerPhase::Completed
        } else if self.running {
            TimerPhase::Running
        } else if self.time_left_secs == self.duration_secs() {
            TimerPhase::Idle
        } else {
            TimerPhase::Paused
        }
    }

    /// 0.0 .. 1.0 progress within the current countdown.
    ///
    /// Recomputed on every call, never cached.
    pub fn progress(&self) -> f64 {
        let total = self.duration_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.time_left_secs as f64 / total as f64)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let mode = self.mode();
        Event::StateSnapshot {
            phase: self.phase(),
            mode: mode.id,
            label: mode.label.clone(),
            time_left_secs: self.time_left_secs,
            duration_secs: mode.duration_secs,
            progress: self.progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the countdown. Guarded no-op while already running or when
    /// nothing is left to count down.
    pub fn start(&mut self) -> Option<Event> {
        if self.running || self.time_left_secs == 0 {
            return None;
        }
        self.running = true;
        self.completed = false;
        Some(Event::TimerStarted {
            mode: self.active,
            time_left_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Stop counting down. Idempotent; the event only fires on an actual
    /// Running -> Paused edge.
    pub fn pause(&mut self) -> Option<Event> {
        let was_running = self.running;
        self.running = false;
        if !was_running {
            return None;
        }
        Some(Event::TimerPaused {
            time_left_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Back to Idle with a full countdown for the active mode.
    pub fn reset(&mut self) -> Option<Event> {
        self.running = false;
        self.completed = false;
        self.time_left_secs = self.duration_secs();
        Some(Event::TimerReset {
            mode: self.active,
            at: Utc::now(),
        })
    }

    /// Select a mode by wire id and reset to it. Unknown ids are ignored
    /// so stale UI references never fail.
    pub fn switch_mode(&mut self, mode_id: &str) -> Option<Event> {
        let to = ModeId::parse(mode_id)?;
        let from = self.active;
        self.active = to;
        self.running = false;
        self.completed = false;
        self.time_left_secs = self.modes.duration_secs(to);
        Some(Event::ModeSwitched {
            from,
            to,
            at: Utc::now(),
        })
    }

    /// Force-complete immediately, discarding any remaining time. Used for
    /// manual early termination; never produces the chime event.
    pub fn finish_session(&mut self) -> Option<Event> {
        let discarded_secs = self.time_left_secs;
        self.running = false;
        self.completed = true;
        self.time_left_secs = 0;
        Some(Event::ForcedCompletion {
            mode: self.active,
            discarded_secs,
            at: Utc::now(),
        })
    }

    /// Apply new durations in minutes for every mode present in the update.
    ///
    /// Settings win over progress: when the active mode's duration actually
    /// changes, `time_left_secs` is rewritten to the new full duration even
    /// mid-countdown. A completed timer keeps its zero until the next reset.
    pub fn update_durations(&mut self, update: DurationUpdate) -> Option<Event> {
        let entries = [
            (ModeId::Focus, update.focus),
            (ModeId::ShortBreak, update.short_break),
            (ModeId::LongBreak, update.long_break),
        ];
        let mut touched = false;
        let mut active_changed = false;
        for (id, minutes) in entries {
            if let Some(minutes) = minutes {
                touched = true;
                if self.modes.set_duration_min(id, minutes) && id == self.active {
                    active_changed = true;
                }
            }
        }
        if !touched {
            return None;
        }
        if active_changed && !self.completed {
            self.time_left_secs = self.duration_secs();
        }
        Some(Event::DurationsUpdated {
            mode: self.active,
            time_left_secs: self.time_left_secs,
            at: Utc::now(),
        })
    }

    /// Advance the countdown by one second. Returns the natural-completion
    /// event exactly once, in the same step that stops the timer; ticks in
    /// any other state are no-ops.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running || self.time_left_secs == 0 {
            return None;
        }
        self.time_left_secs -= 1;
        if self.time_left_secs == 0 {
            self.running = false;
            self.completed = true;
            return Some(Event::NaturalCompletion {
                mode: self.active,
                at: Utc::now(),
            });
        }
        None
    }

    /// Debug helper: jump to the last five seconds of the countdown.
    pub fn fast_forward(&mut self) {
        self.time_left_secs = self.duration_secs().min(5);
        self.running = self.time_left_secs > 0;
        self.completed = false;
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(ModeSet::default())
    }
}

/// Render seconds as `M:SS` for display.
pub fn format_time(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_pause_reset_flags() {
        let mut engine = TimerEngine::default();
        assert_eq!(engine.phase(), TimerPhase::Idle);

        assert!(engine.start().is_some());
        assert_eq!(engine.phase(), TimerPhase::Running);

        engine.tick();
        assert!(engine.pause().is_some());
        assert_eq!(engine.phase(), TimerPhase::Paused);

        assert!(engine.reset().is_some());
        assert_eq!(engine.phase(), TimerPhase::Idle);
        assert_eq!(engine.time_left_secs(), 1500);
    }

    #[test]
    fn start_is_guarded() {
        let mut engine = TimerEngine::default();
        assert!(engine.start().is_some());
        assert!(engine.start().is_none());

        engine.finish_session();
        // Nothing left to count down.
        assert!(engine.start().is_none());
    }

    #[test]
    fn pause_is_idempotent() {
        let mut engine = TimerEngine::default();
        assert!(engine.pause().is_none());
        engine.start();
        assert!(engine.pause().is_some());
        assert!(engine.pause().is_none());
    }

    #[test]
    fn switch_mode_resets_state() {
        let mut engine = TimerEngine::default();
        engine.start();
        engine.tick();
        let event = engine.switch_mode("short_break");
        assert!(matches!(
            event,
            Some(Event::ModeSwitched {
                from: ModeId::Focus,
                to: ModeId::ShortBreak,
                ..
            })
        ));
        assert_eq!(engine.active(), ModeId::ShortBreak);
        assert_eq!(engine.time_left_secs(), 300);
        assert!(!engine.is_running());
        assert!(!engine.is_completed());
    }

    #[test]
    fn switch_mode_unknown_id_is_ignored() {
        let mut engine = TimerEngine::default();
        engine.start();
        engine.tick();
        let before = engine.time_left_secs();
        assert!(engine.switch_mode("siesta").is_none());
        assert_eq!(engine.active(), ModeId::Focus);
        assert_eq!(engine.time_left_secs(), before);
        assert!(engine.is_running());
    }

    #[test]
    fn finish_session_forces_completion() {
        let mut engine = TimerEngine::default();
        engine.start();
        engine.tick();
        let event = engine.finish_session();
        assert!(matches!(
            event,
            Some(Event::ForcedCompletion {
                discarded_secs: 1499,
                ..
            })
        ));
        assert_eq!(engine.time_left_secs(), 0);
        assert!(!engine.is_running());
        assert!(engine.is_completed());
        assert_eq!(engine.phase(), TimerPhase::Completed);
    }

    #[test]
    fn tick_counts_down_and_completes_once() {
        let mut engine = TimerEngine::default();
        engine.start();
        for expected in (1..1500).rev() {
            assert!(engine.tick().is_none());
            assert_eq!(engine.time_left_secs(), expected);
        }
        let last = engine.tick();
        assert!(matches!(last, Some(Event::NaturalCompletion { .. })));
        assert_eq!(engine.time_left_secs(), 0);
        assert!(!engine.is_running());
        assert!(engine.is_completed());

        // Idempotent thereafter.
        assert!(engine.tick().is_none());
        assert_eq!(engine.time_left_secs(), 0);
    }

    #[test]
    fn tick_is_noop_unless_running() {
        let mut engine = TimerEngine::default();
        assert!(engine.tick().is_none());
        assert_eq!(engine.time_left_secs(), 1500);
    }

    #[test]
    fn update_durations_rewrites_active_time_left() {
        let mut engine = TimerEngine::default();
        engine.start();
        engine.tick();
        let event = engine.update_durations(DurationUpdate {
            focus: Some(30),
            ..Default::default()
        });
        assert!(event.is_some());
        assert_eq!(engine.time_left_secs(), 1800);
        // Only time_left is rewritten; the countdown keeps going.
        assert!(engine.is_running());
    }

    #[test]
    fn update_durations_leaves_inactive_modes_alone() {
        let mut engine = TimerEngine::default();
        engine.start();
        engine.tick();
        engine.update_durations(DurationUpdate {
            short_break: Some(10),
            ..Default::default()
        });
        assert_eq!(engine.time_left_secs(), 1499);
        engine.switch_mode("short_break");
        assert_eq!(engine.time_left_secs(), 600);
    }

    #[test]
    fn update_durations_same_value_keeps_progress() {
        let mut engine = TimerEngine::default();
        engine.start();
        engine.tick();
        engine.update_durations(DurationUpdate {
            focus: Some(25),
            ..Default::default()
        });
        assert_eq!(engine.time_left_secs(), 1499);
    }

    #[test]
    fn update_durations_on_completed_keeps_zero() {
        let mut engine = TimerEngine::default();
        engine.finish_session();
        engine.update_durations(DurationUpdate {
            focus: Some(30),
            ..Default::default()
        });
        assert_eq!(engine.time_left_secs(), 0);
        assert!(engine.is_completed());
        engine.reset();
        assert_eq!(engine.time_left_secs(), 1800);
    }

    #[test]
    fn empty_update_is_noop() {
        let mut engine = TimerEngine::default();
        assert!(engine.update_durations(DurationUpdate::default()).is_none());
    }

    #[test]
    fn progress_spans_zero_to_one() {
        let mut engine = TimerEngine::default();
        assert_eq!(engine.progress(), 0.0);
        engine.start();
        engine.tick();
        let p = engine.progress();
        assert!(p > 0.0 && p < 1.0);
        engine.finish_session();
        assert_eq!(engine.progress(), 1.0);
    }

    #[test]
    fn fast_forward_jumps_near_the_end() {
        let mut engine = TimerEngine::default();
        engine.fast_forward();
        assert_eq!(engine.time_left_secs(), 5);
        assert!(engine.is_running());
        for _ in 0..4 {
            assert!(engine.tick().is_none());
        }
        assert!(matches!(
            engine.tick(),
            Some(Event::NaturalCompletion { .. })
        ));
    }

    #[test]
    fn snapshot_reflects_state() {
        let engine = TimerEngine::default();
        match engine.snapshot() {
            Event::StateSnapshot {
                phase,
                mode,
                time_left_secs,
                duration_secs,
                ..
            } => {
                assert_eq!(phase, TimerPhase::Idle);
                assert_eq!(mode, ModeId::Focus);
                assert_eq!(time_left_secs, 1500);
                assert_eq!(duration_secs, 1500);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }

    #[test]
    fn format_time_pads_seconds() {
        assert_eq!(format_time(1500), "25:00");
        assert_eq!(format_time(65), "1:05");
        assert_eq!(format_time(9), "0:09");
        assert_eq!(format_time(0), "0:00");
    }
}
