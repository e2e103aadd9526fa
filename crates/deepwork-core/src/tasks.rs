//! Task board, persisted under [`TASKS_KEY`].
//!
//! Completing a task is the only edge with a side effect: `toggle`
//! reports the task text so the caller can append a zero-duration
//! work-log entry for it. Everything else is plain CRUD with wholesale
//! best-effort persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::Store;

/// Storage key for the persisted task collection.
pub const TASKS_KEY: &str = "deepwork_tasks";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Newest-first task collection over an injected store.
pub struct TaskBoard {
    tasks: Vec<Task>,
    store: Box<dyn Store>,
}

impl TaskBoard {
    /// Load the persisted collection, falling back to empty on missing or
    /// malformed data.
    pub fn load(store: Box<dyn Store>) -> Self {
        let tasks = match store.load(TASKS_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("discarding malformed task list: {e}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("task list unavailable, starting empty: {e}");
                Vec::new()
            }
        };
        Self { tasks, store }
    }

    /// Add a task at the top of the list. Blank input is rejected.
    pub fn add(&mut self, text: &str) -> Option<&Task> {
        if text.trim().is_empty() {
            return None;
        }
        let task = Task {
            id: Uuid::new_v4(),
            text: text.to_string(),
            completed: false,
            created_at: Utc::now(),
        };
        self.tasks.insert(0, task);
        self.persist();
        Some(&self.tasks[0])
    }

    /// Flip a task's completion flag. Returns the task text only on the
    /// open -> completed edge, for the caller's auto-log; un-completing
    /// returns `None`. Unknown ids are ignored.
    pub fn toggle(&mut self, id: Uuid) -> Option<String> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        let just_completed = task.completed.then(|| task.text.clone());
        self.persist();
        just_completed
    }

    /// Remove a task. Unknown ids are ignored.
    pub fn delete(&mut self, id: Uuid) {
        self.tasks.retain(|t| t.id != id);
        self.persist();
    }

    /// Drop every completed task.
    pub fn clear_completed(&mut self) {
        self.tasks.retain(|t| !t.completed);
        self.persist();
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn persist(&self) {
        let raw = match serde_json::to_string(&self.tasks) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("failed to serialize task list: {e}");
                return;
            }
        };
        if let Err(e) = self.store.save(TASKS_KEY, &raw) {
            log::warn!("failed to persist task list: {e}");
        }
    }
}
