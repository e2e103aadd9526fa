mod kv;
mod memory;

pub use kv::KvStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::StorageError;

/// Key-value persistence port.
///
/// The domain types treat this as best-effort: a failed `load` is the same
/// as absent data and a failed `save` leaves the in-memory state as the
/// source of truth for the session.
pub trait Store: Send {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Returns `~/.config/deepwork[-dev]/` based on DEEPWORK_ENV.
///
/// Set DEEPWORK_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("DEEPWORK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("deepwork-dev")
    } else {
        base_dir.join("deepwork")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
