//! Persistence port for todo
//!
//! The task store never touches the filesystem directly; it reads one named
//! slot at startup and rewrites that slot after every mutation through a
//! [`KeyValueStore`]. Mutations go through [`KeyValueStore::update`] so a
//! writer always starts from what is stored now, not what it loaded earlier.
//!
//! # Directory Structure (file-backed store)
//!
//! ```text
//! <data-dir>/
//!   config.toml          # Optional configuration
//!   tasks.json           # Slot "tasks": JSON array of tasks
//!   tasks.json.lock      # Advisory lock held across each read-modify-write
//! ```

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};

/// Default slot holding the task list
pub const DEFAULT_SLOT: &str = "tasks";

/// Extension appended to slot names on disk
const SLOT_EXTENSION: &str = "json";

/// Named string slots, read whole and written whole
pub trait KeyValueStore {
    /// Read a slot; `Ok(None)` when it has never been written
    fn get(&self, slot: &str) -> Result<Option<String>>;

    /// Replace a slot's contents
    fn set(&mut self, slot: &str, value: &str) -> Result<()>;

    /// Read-modify-write of one slot. `apply` receives the current contents
    /// and returns the replacement, or `None` to leave the slot as it is.
    ///
    /// Stores shared between processes override this so no other writer can
    /// run between the read and the write.
    fn update<F>(&mut self, slot: &str, apply: F) -> Result<()>
    where
        F: FnOnce(Option<String>) -> Result<Option<String>>,
    {
        let current = self.get(slot)?;
        if let Some(next) = apply(current)? {
            self.set(slot, &next)?;
        }
        Ok(())
    }
}

/// Reject slot names that could escape the data directory
pub fn validate_slot(slot: &str) -> Result<()> {
    let valid = !slot.is_empty()
        && slot
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidSlot(slot.to_string()))
    }
}

/// Platform data directory for todo (e.g. `~/.local/share/todo`)
pub fn default_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", "todo")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            Error::OperationFailed(
                "could not determine a data directory; pass --data-dir".to_string(),
            )
        })
}

/// Slots stored as `<dir>/<slot>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    lock_timeout_ms: u64,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    /// Path of the file backing `slot`
    pub fn slot_path(&self, slot: &str) -> Result<PathBuf> {
        validate_slot(slot)?;
        Ok(self.dir.join(format!("{slot}.{SLOT_EXTENSION}")))
    }
}

fn read_slot_file(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(Error::Io(err)),
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, slot: &str) -> Result<Option<String>> {
        read_slot_file(&self.slot_path(slot)?)
    }

    fn set(&mut self, slot: &str, value: &str) -> Result<()> {
        self.update(slot, |_| Ok(Some(value.to_string())))
    }

    fn update<F>(&mut self, slot: &str, apply: F) -> Result<()>
    where
        F: FnOnce(Option<String>) -> Result<Option<String>>,
    {
        let path = self.slot_path(slot)?;
        let _lock = FileLock::acquire(lock::lock_path_for(&path), self.lock_timeout_ms)?;

        let current = read_slot_file(&path)?;
        if let Some(next) = apply(current)? {
            lock::write_atomic(&path, next.as_bytes())?;
        }
        Ok(())
    }
}

/// In-memory slots for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot without counting it as a write
    pub fn with_slot(mut self, slot: &str, value: impl Into<String>) -> Self {
        self.slots.insert(slot.to_string(), value.into());
        self
    }

    /// Number of `set` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn raw(&self, slot: &str) -> Option<&str> {
        self.slots.get(slot).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, slot: &str) -> Result<Option<String>> {
        validate_slot(slot)?;
        Ok(self.slots.get(slot).cloned())
    }

    fn set(&mut self, slot: &str, value: &str) -> Result<()> {
        validate_slot(slot)?;
        self.slots.insert(slot.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn slot_names_are_restricted() {
        assert!(validate_slot("tasks").is_ok());
        assert!(validate_slot("work_list-2").is_ok());
        assert!(matches!(validate_slot(""), Err(Error::InvalidSlot(_))));
        assert!(matches!(
            validate_slot("../tasks"),
            Err(Error::InvalidSlot(_))
        ));
        assert!(matches!(validate_slot("a b"), Err(Error::InvalidSlot(_))));
    }

    #[test]
    fn file_store_missing_slot_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());
        assert_eq!(store.get("tasks").expect("get"), None);
    }

    #[test]
    fn file_store_set_then_get() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FileStore::new(dir.path().join("nested"));
        store.set("tasks", "[]").expect("set");

        assert_eq!(store.get("tasks").expect("get").as_deref(), Some("[]"));
        assert!(dir.path().join("nested").join("tasks.json").exists());
    }

    #[test]
    fn file_store_rejects_bad_slot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FileStore::new(dir.path());
        assert!(matches!(
            store.set("../escape", "[]"),
            Err(Error::InvalidSlot(_))
        ));
    }

    fn bump(raw: Option<String>) -> Result<Option<String>> {
        let count = match raw {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|err| Error::OperationFailed(err.to_string()))?,
            None => 0,
        };
        Ok(Some((count + 1).to_string()))
    }

    #[test]
    fn file_store_update_sees_other_writers() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut first = FileStore::new(dir.path());
        let mut second = FileStore::new(dir.path());

        first.update("counter", bump).expect("update");
        second.update("counter", bump).expect("update");
        first.update("counter", bump).expect("update");

        assert_eq!(first.get("counter").expect("get").as_deref(), Some("3"));
    }

    #[test]
    fn file_store_update_can_skip_the_write() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FileStore::new(dir.path());
        store.update("tasks", |_| Ok(None)).expect("update");
        assert!(!dir.path().join("tasks.json").exists());
    }

    #[test]
    fn concurrent_updates_never_lose_a_write() {
        let dir = tempfile::tempdir().expect("tempdir");
        let threads = 6;
        let rounds = 10;
        let barrier = Arc::new(Barrier::new(threads));

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                let mut store = FileStore::new(dir.path()).with_lock_timeout(10_000);
                thread::spawn(move || {
                    barrier.wait();
                    for _ in 0..rounds {
                        store.update("counter", bump).expect("update");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("join");
        }

        let store = FileStore::new(dir.path());
        let expected = (threads * rounds).to_string();
        assert_eq!(store.get("counter").expect("get"), Some(expected));
    }

    #[test]
    fn memory_store_counts_writes() {
        let mut store = MemoryStore::new().with_slot("tasks", "[]");
        assert_eq!(store.writes(), 0);
        store.set("tasks", "[1]").expect("set");
        assert_eq!(store.writes(), 1);
        assert_eq!(store.raw("tasks"), Some("[1]"));
    }
}
