use serde::{Deserialize, Serialize};

/// Identifier for one of the three fixed interval modes.
///
/// The set of modes is fixed; only their durations are configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeId {
    Focus,
    ShortBreak,
    LongBreak,
}

impl ModeId {
    /// Parse a wire identifier as it appears in persisted data and UI
    /// callbacks. Unknown identifiers yield `None` so stale references
    /// stay harmless.
    pub fn parse(id: &str) -> Option<Self> {
        match id {
            "focus" => Some(ModeId::Focus),
            "short_break" => Some(ModeId::ShortBreak),
            "long_break" => Some(ModeId::LongBreak),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModeId::Focus => "focus",
            ModeId::ShortBreak => "short_break",
            ModeId::LongBreak => "long_break",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mode {
    pub id: ModeId,
    /// Configured duration in seconds.
    pub duration_secs: u64,
    pub label: String,
}

/// The three modes with their current durations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeSet {
    focus: Mode,
    short_break: Mode,
    long_break: Mode,
}

impl ModeSet {
    pub fn get(&self, id: ModeId) -> &Mode {
        match id {
            ModeId::Focus => &self.focus,
            ModeId::ShortBreak => &self.short_break,
            ModeId::LongBreak => &self.long_break,
        }
    }

    pub fn duration_secs(&self, id: ModeId) -> u64 {
        self.get(id).duration_secs
    }

    /// Set a mode's duration in minutes. Returns whether the stored value
    /// actually changed.
    ///
    /// Uses saturating arithmetic to prevent overflow with large values.
    pub fn set_duration_min(&mut self, id: ModeId, minutes: u64) -> bool {
        let secs = minutes.saturating_mul(60);
        let mode = match id {
            ModeId::Focus => &mut self.focus,
            ModeId::ShortBreak => &mut self.short_break,
            ModeId::LongBreak => &mut self.long_break,
        };
        if mode.duration_secs == secs {
            return false;
        }
        mode.duration_secs = secs;
        true
    }
}

impl Default for ModeSet {
    fn default() -> Self {
        Self {
            focus: Mode {
                id: ModeId::Focus,
                duration_secs: 25 * 60,
                label: "Deep Work".into(),
            },
            short_break: Mode {
                id: ModeId::ShortBreak,
                duration_secs: 5 * 60,
                label: "Short Break".into(),
            },
            long_break: Mode {
                id: ModeId::LongBreak,
                duration_secs: 15 * 60,
                label: "Long Break".into(),
            },
        }
    }
}

/// Per-mode duration update in minutes. Absent modes are left untouched.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DurationUpdate {
    pub focus: Option<u64>,
    pub short_break: Option<u64>,
    pub long_break: Option<u64>,
}
