//! Persisted user preferences: per-mode durations and the completion
//! chime flag.
//!
//! Loaded once at startup and rewritten wholesale on every save, as a
//! single JSON document under [`SETTINGS_KEY`]. Malformed data falls back
//! to defaults; user-entered duration values are coerced rather than
//! rejected.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::storage::Store;
use crate::timer::DurationUpdate;

/// Storage key for the persisted settings document.
pub const SETTINGS_KEY: &str = "deepwork_settings";

/// Per-mode durations in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durations {
    #[serde(default = "default_focus", deserialize_with = "coerce_minutes")]
    pub focus: u64,
    #[serde(default = "default_short_break", deserialize_with = "coerce_minutes")]
    pub short_break: u64,
    #[serde(default = "default_long_break", deserialize_with = "coerce_minutes")]
    pub long_break: u64,
}

/// Application settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub durations: Durations,
    #[serde(rename = "soundEnabled", default = "default_true")]
    pub sound_enabled: bool,
}

// Default functions
fn default_focus() -> u64 {
    25
}
fn default_short_break() -> u64 {
    5
}
fn default_long_break() -> u64 {
    15
}
fn default_true() -> bool {
    true
}

/// User-entered durations arrive as whatever the input field held.
/// Negative, fractional and non-numeric values all degrade to a
/// non-negative integer, with 0 for anything unparseable.
fn coerce_minutes<'de, D>(de: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(de)?;
    let minutes = match value {
        serde_json::Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u
            } else {
                match n.as_f64() {
                    Some(f) if f >= 0.0 => f as u64,
                    _ => 0,
                }
            }
        }
        serde_json::Value::String(s) => match s.trim().parse::<f64>() {
            Ok(f) if f >= 0.0 => f as u64,
            _ => 0,
        },
        _ => 0,
    };
    Ok(minutes)
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            focus: default_focus(),
            short_break: default_short_break(),
            long_break: default_long_break(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            durations: Durations::default(),
            sound_enabled: true,
        }
    }
}

impl Settings {
    /// Load from the store, returning defaults on missing or malformed
    /// data. This never fails.
    pub fn load_or_default(store: &dyn Store) -> Self {
        match store.load(SETTINGS_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("discarding malformed settings: {e}");
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("settings unavailable, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Persist the whole document.
    ///
    /// # Errors
    /// Returns an error if serialization or the store write fails.
    pub fn save(&self, store: &dyn Store) -> Result<(), CoreError> {
        let raw = serde_json::to_string(self)?;
        store.save(SETTINGS_KEY, &raw)?;
        Ok(())
    }

    /// Full-map update for [`crate::TimerEngine::update_durations`].
    pub fn duration_update(&self) -> DurationUpdate {
        DurationUpdate {
            focus: Some(self.durations.focus),
            short_break: Some(self.durations.short_break),
            long_break: Some(self.durations.long_break),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn default_values() {
        let settings = Settings::default();
        assert_eq!(settings.durations.focus, 25);
        assert_eq!(settings.durations.short_break, 5);
        assert_eq!(settings.durations.long_break, 15);
        assert!(settings.sound_enabled);
    }

    #[test]
    fn roundtrip_preserves_fields() {
        let store = MemoryStore::new();
        let settings = Settings {
            durations: Durations {
                focus: 50,
                short_break: 10,
                long_break: 20,
            },
            sound_enabled: false,
        };
        settings.save(&store).unwrap();
        let reloaded = Settings::load_or_default(&store);
        assert_eq!(reloaded, settings);
    }

    #[test]
    fn wire_format_uses_camel_case_flag() {
        let raw = serde_json::to_string(&Settings::default()).unwrap();
        assert!(raw.contains("\"soundEnabled\":true"));
        assert!(raw.contains("\"short_break\":5"));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());

        let partial: Settings =
            serde_json::from_str(r#"{"durations":{"focus":45}}"#).unwrap();
        assert_eq!(partial.durations.focus, 45);
        assert_eq!(partial.durations.short_break, 5);
        assert!(partial.sound_enabled);
    }

    #[test]
    fn coerces_hostile_duration_values() {
        let raw = r#"{"durations":{"focus":-5,"short_break":"7","long_break":12.9},"soundEnabled":false}"#;
        let settings: Settings = serde_json::from_str(raw).unwrap();
        assert_eq!(settings.durations.focus, 0);
        assert_eq!(settings.durations.short_break, 7);
        assert_eq!(settings.durations.long_break, 12);
        assert!(!settings.sound_enabled);

        let garbage = r#"{"durations":{"focus":"soon","short_break":null,"long_break":[1]}}"#;
        let settings: Settings = serde_json::from_str(garbage).unwrap();
        assert_eq!(settings.durations.focus, 0);
        assert_eq!(settings.durations.short_break, 0);
        assert_eq!(settings.durations.long_break, 0);
    }

    #[test]
    fn malformed_document_falls_back_to_defaults() {
        let store = MemoryStore::new();
        store.save(SETTINGS_KEY, "][ nonsense").unwrap();
        assert_eq!(Settings::load_or_default(&store), Settings::default());
    }

    #[test]
    fn duration_update_covers_all_modes() {
        let update = Settings::default().duration_update();
        assert_eq!(update.focus, Some(25));
        assert_eq!(update.short_break, Some(5));
        assert_eq!(update.long_break, Some(15));
    }
}
