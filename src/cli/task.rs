//! todo command implementations.

use std::path::PathBuf;

use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::output::{emit, OutputOptions, Report};
use crate::storage::{self, FileStore};
use crate::task::TaskStore;
use crate::view;

/// Global options shared by every command
pub struct ContextOptions {
    pub data_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

impl ContextOptions {
    fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }
}

pub struct ListOptions {
    pub filter: Option<String>,
    pub sort: Option<String>,
}

struct Context {
    config: Config,
    store: TaskStore<FileStore>,
}

fn load_context(options: &ContextOptions) -> Result<Context> {
    let data_dir = match options.data_dir.clone() {
        Some(dir) => dir,
        None => storage::default_data_dir()?,
    };
    let config = match options.config.as_deref() {
        Some(path) => Config::load(path)?,
        None => Config::load_from_dir(&data_dir),
    };
    debug!(data_dir = %data_dir.display(), slot = %config.storage.slot, "opening task store");

    let file_store = FileStore::new(data_dir).with_lock_timeout(config.storage.lock_timeout_ms);
    let store = TaskStore::open(
        file_store,
        config.storage.slot.clone(),
        config.storage.on_corrupt,
    )?;
    Ok(Context { config, store })
}

pub fn run_add(options: ContextOptions, text: String) -> Result<()> {
    let mut ctx = load_context(&options)?;
    let task = ctx.store.add(&text)?;
    let report = Report::Added {
        task,
        stored: ctx.store.len(),
    };
    emit(options.output(), &report)
}

pub fn run_list(options: ContextOptions, list: ListOptions) -> Result<()> {
    let ctx = load_context(&options)?;
    let filter = match list.filter.as_deref() {
        Some(value) => value.parse()?,
        None => ctx.config.view.filter,
    };
    let sort = match list.sort.as_deref() {
        Some(value) => value.parse()?,
        None => ctx.config.view.sort,
    };

    let tasks = view::project(ctx.store.tasks(), filter, sort);
    let report = Report::listed(filter, sort, tasks, ctx.store.len());
    emit(options.output(), &report)
}

pub fn run_toggle(options: ContextOptions, id: u64) -> Result<()> {
    let mut ctx = load_context(&options)?;
    let task = ctx.store.toggle_completion(id)?;
    emit(options.output(), &Report::Toggled { task, id })
}

pub fn run_remove(options: ContextOptions, id: u64) -> Result<()> {
    let mut ctx = load_context(&options)?;
    let task = ctx.store.remove(id)?;
    let report = Report::Removed {
        task,
        id,
        stored: ctx.store.len(),
    };
    emit(options.output(), &report)
}

pub fn run_ui(options: ContextOptions) -> Result<()> {
    let ctx = load_context(&options)?;
    crate::ui::task_viewer::run(ctx.store, ctx.config.view.filter, ctx.config.view.sort)
}
