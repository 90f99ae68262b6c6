//! Rendering of command results.
//!
//! Every command ends in one [`Report`]. Plain output is a headline, the
//! affected task rows and any warning or hint; `--json` wraps the report in
//! a versioned envelope instead.

use serde::Serialize;

use crate::error::{Error, JsonError, Result};
use crate::task::Task;
use crate::view::{Filter, Sort};

pub const SCHEMA_VERSION: &str = "todo.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

/// Outcome of one command. Serializes as the envelope's `data`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Report<'a> {
    Added {
        task: Option<Task>,
        #[serde(skip)]
        stored: usize,
    },
    Listed {
        filter: Filter,
        sort: Sort,
        total: usize,
        tasks: Vec<&'a Task>,
        #[serde(skip)]
        stored: usize,
    },
    Toggled {
        task: Option<Task>,
        #[serde(skip)]
        id: u64,
    },
    Removed {
        task: Option<Task>,
        #[serde(skip)]
        id: u64,
        #[serde(skip)]
        stored: usize,
    },
}

impl<'a> Report<'a> {
    /// A projection of a store holding `stored` tasks
    pub fn listed(filter: Filter, sort: Sort, tasks: Vec<&'a Task>, stored: usize) -> Self {
        Report::Listed {
            filter,
            sort,
            total: tasks.len(),
            tasks,
            stored,
        }
    }

    pub fn command(&self) -> &'static str {
        match self {
            Report::Added { .. } => "add",
            Report::Listed { .. } => "list",
            Report::Toggled { .. } => "toggle",
            Report::Removed { .. } => "rm",
        }
    }

    fn headline(&self) -> String {
        match self {
            Report::Added { task: Some(task), .. } => format!("Added {}", task.id),
            Report::Added { task: None, .. } => "Nothing added".to_string(),
            Report::Listed { stored: 0, .. } => "No tasks yet".to_string(),
            Report::Listed {
                filter,
                sort,
                total,
                stored,
                ..
            } => format!("{total} of {stored} tasks (filter: {filter}, sort: {sort})"),
            Report::Toggled { task: Some(task), .. } if task.completed => {
                format!("Completed {}", task.id)
            }
            Report::Toggled { task: Some(task), .. } => format!("Reopened {}", task.id),
            Report::Removed { task: Some(task), .. } => format!("Removed {}", task.id),
            Report::Toggled { task: None, .. } | Report::Removed { task: None, .. } => {
                "Nothing changed".to_string()
            }
        }
    }

    fn rows(&self) -> Vec<&Task> {
        match self {
            Report::Listed { tasks, .. } => tasks.clone(),
            Report::Added { task, .. }
            | Report::Toggled { task, .. }
            | Report::Removed { task, .. } => task.iter().collect(),
        }
    }

    fn remaining(&self) -> Option<String> {
        match self {
            Report::Added {
                task: Some(_),
                stored,
            } => Some(count_tasks(*stored, "stored")),
            Report::Removed {
                task: Some(_),
                stored,
                ..
            } => Some(count_tasks(*stored, "left")),
            _ => None,
        }
    }

    pub fn warning(&self) -> Option<String> {
        match self {
            Report::Added { task: None, .. } => Some("task text is empty".to_string()),
            Report::Toggled { task: None, id } | Report::Removed { task: None, id, .. } => {
                Some(format!("no task with id {id}"))
            }
            _ => None,
        }
    }

    pub fn next_step(&self) -> Option<&'static str> {
        match self {
            Report::Listed { stored: 0, .. } => Some("todo add <text>"),
            Report::Toggled { task: None, .. } | Report::Removed { task: None, .. } => {
                Some("todo list")
            }
            _ => None,
        }
    }

    pub fn render_human(&self) -> String {
        let mut lines = vec![self.headline()];
        lines.extend(self.rows().into_iter().map(|task| format!("  {}", task_row(task))));
        lines.extend(self.remaining());
        if let Some(warning) = self.warning() {
            lines.push(format!("warning: {warning}"));
        }
        if let Some(step) = self.next_step() {
            lines.push(format!("hint: {step}"));
        }
        lines.join("\n")
    }
}

/// `[x] <id> <text>`
pub fn task_row(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    format!("[{mark}] {} {}", task.id, task.text)
}

fn count_tasks(count: usize, suffix: &str) -> String {
    let noun = if count == 1 { "task" } else { "tasks" };
    format!("{count} {noun} {suffix}")
}

pub fn emit(options: OutputOptions, report: &Report<'_>) -> Result<()> {
    if options.json {
        #[derive(Serialize)]
        struct Envelope<'r, 'a> {
            schema_version: &'static str,
            command: &'static str,
            status: &'static str,
            data: &'r Report<'a>,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            warnings: Vec<String>,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<&'static str>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command: report.command(),
            status: "success",
            data: report,
            warnings: report.warning().into_iter().collect(),
            next_steps: report.next_step().into_iter().collect(),
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if !options.quiet {
        println!("{}", report.render_human());
    }
    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let hint = error_hint(err);
    if json {
        #[derive(Serialize)]
        struct Envelope<'a> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            error: JsonError,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<&'static str>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            error: JsonError::from(err),
            next_steps: hint.into_iter().collect(),
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = hint {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

fn error_hint(err: &Error) -> Option<&'static str> {
    match err {
        Error::CorruptStore { .. } => {
            Some("set `on_corrupt = \"reset\"` under [storage] in config.toml to start empty")
        }
        Error::InvalidConfig(_) => Some("fix config.toml then retry"),
        Error::LockFailed(_) => Some("retry once the other todo process finishes"),
        _ => None,
    }
}

/// Subcommand named on the command line, for labelling error envelopes
pub fn infer_command_name_from_args() -> String {
    infer_command_name(std::env::args().skip(1))
}

fn infer_command_name(args: impl IntoIterator<Item = String>) -> String {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if matches!(arg.as_str(), "--data-dir" | "--config") {
            args.next();
            continue;
        }
        if arg.starts_with('-') {
            continue;
        }
        return arg;
    }
    "ui".to_string()
}
