//! Command-line interface for todo
//!
//! This module defines the CLI structure using clap derive macros.
//! Command bodies live in `task`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;

mod task;

/// todo - a to-do list for the terminal
///
/// Run without a subcommand to open the interactive list.
#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the task slot and config.toml
    #[arg(long, global = true, env = "TODO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Config file (defaults to <data-dir>/config.toml)
    #[arg(long, global = true, env = "TODO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task (blank text is ignored)
    Add {
        /// Task text; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// List tasks
    #[command(visible_alias = "ls")]
    List {
        /// Filter: all, completed, incomplete
        #[arg(short, long)]
        filter: Option<String>,

        /// Sort: date, alphabetical
        #[arg(short, long)]
        sort: Option<String>,
    },

    /// Flip a task between completed and incomplete
    Toggle {
        /// Task id
        id: u64,
    },

    /// Delete a task
    #[command(visible_alias = "remove")]
    Rm {
        /// Task id
        id: u64,
    },

    /// Open the interactive list (default)
    Ui,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let ctx = task::ContextOptions {
            data_dir: self.data_dir,
            config: self.config,
            json: self.json,
            quiet: self.quiet,
        };
        match self.command.unwrap_or(Commands::Ui) {
            Commands::Add { text } => task::run_add(ctx, text.join(" ")),
            Commands::List { filter, sort } => {
                task::run_list(ctx, task::ListOptions { filter, sort })
            }
            Commands::Toggle { id } => task::run_toggle(ctx, id),
            Commands::Rm { id } => task::run_remove(ctx, id),
            Commands::Ui => task::run_ui(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_ui() {
        let cli = Cli::try_parse_from(["todo", "--data-dir", "/tmp/todo"]).expect("parse");
        assert!(cli.command.is_none());
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/todo")));
    }

    #[test]
    fn add_joins_words() {
        let cli = Cli::try_parse_from(["todo", "add", "buy", "milk"]).expect("parse");
        match cli.command {
            Some(Commands::Add { text }) => assert_eq!(text.join(" "), "buy milk"),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
