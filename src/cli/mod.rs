//! # Command-Line Interface
//!
//! `twig` with no subcommand opens the interactive outline. Subcommands
//! cover the same mutations for scripting:
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `list` | Render the outline |
//! | `add` | Add a task |
//! | `done` | Toggle completion |
//! | `rm` | Delete (cascades to direct dependents) |
//! | `link` / `unlink` | Set or clear a dependency |
//! | `move` | Reorder within the manual order |
//!
//! All commands support `--format text|json`, `--verbose`, and `--file`
//! (also `TWIG_FILE`) to point at a different task file.
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod commands;
mod output;
mod tui;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
