#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;
use todo::task::Task;

/// Scratch data directory for one test
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn slot_file(&self, slot: &str) -> PathBuf {
        self.dir.path().join(format!("{slot}.json"))
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        self.write_file("config.toml", contents)
    }

    pub fn read_tasks(&self, slot: &str) -> Result<Vec<Task>, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(self.slot_file(slot))?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// `todo` binary pointed at `dir`, isolated from the caller's environment
pub fn todo_cmd(dir: &TestDir) -> Command {
    let mut cmd = Command::cargo_bin("todo").expect("binary");
    cmd.env_remove("TODO_CONFIG")
        .env_remove("RUST_LOG")
        .env("TODO_DATA_DIR", dir.path());
    cmd
}
