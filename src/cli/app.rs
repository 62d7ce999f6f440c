//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{commands, tui};
use crate::storage::{Config, ListFile};

#[derive(Parser)]
#[command(name = "twig")]
#[command(author, version, about = "A terminal task list with nested dependencies")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Task file to use instead of the default location
    #[arg(long, global = true, env = "TWIG_FILE", value_name = "PATH")]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the task outline
    List,

    /// Add a task
    Add {
        /// Task content (markdown)
        content: String,

        /// Nest the new task under an existing one
        #[arg(long, value_name = "ID")]
        under: Option<String>,
    },

    /// Toggle a task's completion
    Done {
        /// Task id
        id: String,
    },

    /// Delete a task and its direct dependents
    Rm {
        /// Task id
        id: String,
    },

    /// Make one task depend on another
    Link {
        /// Child task id
        child: String,

        /// Parent task id
        parent: String,
    },

    /// Clear a task's dependency
    Unlink {
        /// Task id
        id: String,
    },

    /// Move a task within the manual order
    #[command(name = "move")]
    Move {
        /// Task id to move
        id: String,

        /// Reinsert immediately before this task (defaults to the end)
        #[arg(long, value_name = "ID")]
        before: Option<String>,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    let config = Config::load()?;
    let data_file = config.resolve_data_file(cli.file)?;
    output.verbose_ctx("storage", &format!("Task file: {}", data_file.display()));
    let store = ListFile::new(data_file);

    match cli.command {
        None => tui::run(&output, store),
        Some(Commands::List) => commands::list(&output, &store),
        Some(Commands::Add { content, under }) => {
            commands::add(&output, &store, &content, under.as_deref())
        }
        Some(Commands::Done { id }) => commands::done(&output, &store, &id),
        Some(Commands::Rm { id }) => commands::rm(&output, &store, &id),
        Some(Commands::Link { child, parent }) => commands::link(&output, &store, &child, &parent),
        Some(Commands::Unlink { id }) => commands::unlink(&output, &store, &id),
        Some(Commands::Move { id, before }) => {
            commands::move_task(&output, &store, &id, before.as_deref())
        }
    }
}
