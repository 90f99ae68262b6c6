//! Pending-task input buffer.

use crate::error::Result;
use crate::storage::KeyValueStore;
use crate::task::{Task, TaskStore};

/// Mirrors the text field's current value until it is submitted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    value: String,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Replace the buffer with the field's full content
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn push(&mut self, ch: char) {
        self.value.push(ch);
    }

    pub fn pop(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Hand the buffer to `store.add` and clear it, created or not.
    ///
    /// If the write fails the buffer is kept so the text is not lost.
    pub fn submit<S: KeyValueStore>(&mut self, store: &mut TaskStore<S>) -> Result<Option<Task>> {
        let created = store.add(&self.value)?;
        self.value.clear();
        Ok(created)
    }
}
