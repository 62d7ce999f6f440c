//! Interactive outline viewer
//!
//! Renders the task list as an indented outline and translates key
//! gestures into engine mutations, using ratatui.

mod app;
mod event;
mod ui;
mod view;

use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, Result};

use super::Output;
use crate::storage::ListFile;
use app::App;
use event::EventHandler;

/// Launch the TUI
pub fn run(output: &Output, store: ListFile) -> Result<()> {
    output.verbose_ctx("tui", "Initializing interactive outline");

    // Load before touching the terminal: a read warning should reach a
    // usable stderr, and the autosaver must only exist once the load is
    // complete so an empty pre-load state can never overwrite the file.
    let mut app = App::new(store);

    let mut terminal = ui::init_terminal()?;
    let event_handler = EventHandler::new(250);

    // Run the main loop with panic safety so the terminal is restored even
    // if the app panics.
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        app.run(&mut terminal, event_handler)
    }));

    let restore_result = ui::restore_terminal();

    match result {
        Ok(inner_result) => {
            restore_result?;
            inner_result
        }
        Err(panic_payload) => {
            let _ = restore_result;
            if let Some(s) = panic_payload.downcast_ref::<&str>() {
                Err(anyhow!("TUI panicked: {}", s))
            } else if let Some(s) = panic_payload.downcast_ref::<String>() {
                Err(anyhow!("TUI panicked: {}", s))
            } else {
                Err(anyhow!("TUI panicked with unknown error"))
            }
        }
    }
}
