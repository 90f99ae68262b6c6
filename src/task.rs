//! Task model and the write-through task store.
//!
//! The whole list lives in one storage slot as a JSON array. Every mutation
//! re-reads the slot inside [`KeyValueStore::update`], applies the change to
//! what is stored now, writes it, and only then replaces the in-memory copy.
//! Memory and storage therefore agree whenever a call returns, and tasks
//! written by another process in the meantime are kept.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::storage::{validate_slot, KeyValueStore};

/// A single to-do entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub text: String,
    pub completed: bool,
    pub date: DateTime<Utc>,
}

/// What to do when the stored slot is not a valid task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptPolicy {
    /// Refuse to start
    #[default]
    Fail,
    /// Start from an empty list; the slot is overwritten on the next mutation
    Reset,
}

impl std::str::FromStr for CorruptPolicy {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(CorruptPolicy::Fail),
            "reset" => Ok(CorruptPolicy::Reset),
            other => Err(Error::InvalidArgument(format!(
                "unknown corrupt policy '{other}' (expected fail|reset)"
            ))),
        }
    }
}

#[derive(Debug)]
pub struct TaskStore<S> {
    storage: S,
    slot: String,
    policy: CorruptPolicy,
    tasks: Vec<Task>,
    last_id: u64,
}

/// Parse a slot's raw contents under `policy`
fn parse_slot(slot: &str, raw: Option<&str>, policy: CorruptPolicy) -> Result<Vec<Task>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    match serde_json::from_str::<Vec<Task>>(raw) {
        Ok(tasks) => Ok(tasks),
        Err(source) => match policy {
            CorruptPolicy::Fail => Err(Error::CorruptStore {
                slot: slot.to_string(),
                source,
            }),
            CorruptPolicy::Reset => {
                warn!(slot = %slot, error = %source, "discarding unreadable task list");
                Ok(Vec::new())
            }
        },
    }
}

fn max_id(tasks: &[Task]) -> u64 {
    tasks.iter().map(|task| task.id).max().unwrap_or(0)
}

/// Millisecond timestamp, bumped past `floor`
fn next_id(now: DateTime<Utc>, floor: u64) -> Result<u64> {
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
    let bumped = floor
        .checked_add(1)
        .ok_or_else(|| Error::OperationFailed("task ids exhausted".to_string()))?;
    Ok(millis.max(bumped))
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Load the list from `slot`, or start empty if it was never written
    pub fn open(storage: S, slot: impl Into<String>, policy: CorruptPolicy) -> Result<Self> {
        let slot = slot.into();
        validate_slot(&slot)?;

        let raw = storage.get(&slot)?;
        let tasks = parse_slot(&slot, raw.as_deref(), policy)?;
        let last_id = max_id(&tasks);
        debug!(slot = %slot, count = tasks.len(), "task list loaded");

        Ok(Self {
            storage,
            slot,
            policy,
            tasks,
            last_id,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Append a task created now. Blank text is ignored (`Ok(None)`).
    pub fn add(&mut self, text: &str) -> Result<Option<Task>> {
        self.add_at(text, Utc::now())
    }

    /// Append a task with an explicit creation time
    pub fn add_at(&mut self, text: &str, now: DateTime<Utc>) -> Result<Option<Task>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let created = self.mutate(|tasks, floor| {
            let task = Task {
                id: next_id(now, floor)?,
                text: text.to_string(),
                completed: false,
                date: now,
            };
            tasks.push(task.clone());
            Ok(Some(task))
        })?;

        if let Some(task) = created.as_ref() {
            debug!(id = task.id, "task added");
        }
        Ok(created)
    }

    /// Remove the task with `id`; returns it, or `None` if absent
    pub fn remove(&mut self, id: u64) -> Result<Option<Task>> {
        let removed = self.mutate(|tasks, _| {
            Ok(tasks
                .iter()
                .position(|task| task.id == id)
                .map(|pos| tasks.remove(pos)))
        })?;

        if removed.is_some() {
            debug!(id, "task removed");
        }
        Ok(removed)
    }

    /// Flip `completed` on the task with `id`; returns the updated task
    pub fn toggle_completion(&mut self, id: u64) -> Result<Option<Task>> {
        let updated = self.mutate(|tasks, _| {
            Ok(tasks.iter_mut().find(|task| task.id == id).map(|task| {
                task.completed = !task.completed;
                task.clone()
            }))
        })?;

        if let Some(task) = updated.as_ref() {
            debug!(id, completed = task.completed, "task toggled");
        }
        Ok(updated)
    }

    /// Apply `op` to the list as stored now and write the result back.
    ///
    /// `op` gets the fresh list and the highest id issued so far; returning
    /// `Ok(None)` skips the write. Memory is replaced only after the write
    /// succeeds.
    fn mutate<T, F>(&mut self, op: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut Vec<Task>, u64) -> Result<Option<T>>,
    {
        let policy = self.policy;
        let last_id = self.last_id;
        let mut fresh = None;

        self.storage.update(&self.slot, |raw| {
            let mut tasks = parse_slot(&self.slot, raw.as_deref(), policy)?;
            let floor = max_id(&tasks).max(last_id);
            let outcome = op(&mut tasks, floor)?;
            let next = match outcome {
                Some(_) => Some(serde_json::to_string_pretty(&tasks)?),
                None => None,
            };
            fresh = Some((tasks, outcome));
            Ok(next)
        })?;

        let Some((tasks, outcome)) = fresh else {
            return Ok(None);
        };
        self.last_id = max_id(&tasks).max(last_id);
        self.tasks = tasks;
        Ok(outcome)
    }
}
