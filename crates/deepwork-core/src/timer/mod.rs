mod controller;
mod engine;
mod mode;

pub use controller::TimerController;
pub use engine::{format_time, TimerEngine, TimerPhase};
pub use mode::{DurationUpdate, Mode, ModeId, ModeSet};
