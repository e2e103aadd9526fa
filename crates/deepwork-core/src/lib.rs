//! # Deepwork Core Library
//!
//! This library provides the core business logic for the Deepwork focus
//! timer: a tick-driven countdown state machine, an append-only work log,
//! user settings, a task board, and a key-value persistence port.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a state machine that requires the caller to invoke
//!   `tick()` once per countdown second; the async [`TimerController`]
//!   wraps it with the actual 1-second clock
//! - **Work Log**: newest-first collection of completed sessions with
//!   per-day aggregation for the activity heatmap
//! - **Storage**: a [`Store`] port with SQLite and in-memory backends;
//!   every persisted document is a JSON blob under a single key
//!
//! Completion is signalled as two distinct events --
//! [`Event::NaturalCompletion`] when the countdown runs out and
//! [`Event::ForcedCompletion`] when a session is cut short -- so the
//! embedding UI decides which one gets the chime.

pub mod error;
pub mod events;
pub mod settings;
pub mod storage;
pub mod tasks;
pub mod timer;
pub mod worklog;

pub use error::{CoreError, Result, StorageError};
pub use events::Event;
pub use settings::{Durations, Settings};
pub use storage::{KvStore, MemoryStore, Store};
pub use tasks::{Task, TaskBoard};
pub use timer::{
    format_time, DurationUpdate, Mode, ModeId, ModeSet, TimerController, TimerEngine, TimerPhase,
};
pub use worklog::{LogEntry, WorkLog};
