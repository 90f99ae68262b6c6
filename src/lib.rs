//! todo - a to-do list with write-through local persistence
//!
//! # Core Concepts
//!
//! - **Task Store**: ordered task list mirrored to one storage slot after
//!   every mutation
//! - **Persistence port**: `KeyValueStore`, backed by files or memory
//! - **View projection**: filter then sort, never touching the store
//! - **Input buffer**: pending task text, cleared on submit
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `config.toml`
//! - `error`: Error types and result aliases
//! - `input`: Pending-task input buffer
//! - `lock`: File locking and atomic writes for slot files
//! - `output`: Human and JSON output for CLI commands
//! - `storage`: Key-value persistence port and its implementations
//! - `task`: Task model and the write-through store
//! - `ui`: Interactive terminal viewer
//! - `view`: Filter and sort selectors

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod lock;
pub mod output;
pub mod storage;
pub mod task;
pub mod ui;
pub mod view;

pub use error::{Error, Result};
