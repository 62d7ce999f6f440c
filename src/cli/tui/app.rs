//! TUI application state and logic
//!
//! The app owns the task list engine and an autosaver; every mutation is
//! applied synchronously to the in-memory list and the full list is then
//! handed to the autosaver, which writes in the background. Autosave
//! failures surface in the status line on the next tick.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;

use super::event::{Event, EventHandler};
use super::ui::Terminal;
use super::view;
use crate::domain::{Row, TaskId, TaskList};
use crate::storage::{Autosaver, ListFile};

/// Input mode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Inline edit of a task's content
    Edit(TaskId),
    /// Pending delete confirmation
    ConfirmDelete(TaskId),
}

/// Application state
pub struct App {
    /// The hierarchy/ordering engine
    list: TaskList,

    /// Store used for explicit reloads
    store: ListFile,

    /// Background writer
    saver: Autosaver,

    /// Current outline (recomputed after every mutation)
    rows: Vec<Row>,

    /// Selected row index into `rows`
    selected: usize,

    /// Input mode
    input_mode: InputMode,

    /// Status message to display
    status_message: Option<String>,

    /// Whether to quit
    should_quit: bool,
}

impl App {
    /// Create the application, loading the persisted list first
    ///
    /// A read failure degrades to an empty list (logged by the store); the
    /// autosaver is only constructed after the load so the file cannot be
    /// clobbered by a pre-load empty state.
    pub fn new(store: ListFile) -> Self {
        let tasks = store.load_or_empty();
        let list = TaskList::from_tasks(tasks);
        let saver = Autosaver::new(ListFile::new(store.path().to_path_buf()));
        let rows = list.outline();

        Self {
            list,
            store,
            saver,
            rows,
            selected: 0,
            input_mode: InputMode::Normal,
            status_message: None,
            should_quit: false,
        }
    }

    /// Run the main application loop
    pub fn run(&mut self, terminal: &mut Terminal, events: EventHandler) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;

            match events.next()? {
                Event::Key(key) => self.handle_key(key),
                Event::Resize(_, _) => {}
                Event::Tick => {
                    if let Some(err) = self.saver.take_error() {
                        self.status_message = Some(err);
                    }
                }
            }
        }

        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        view::draw(frame, self);
    }

    /// Recompute the outline and queue a background save
    ///
    /// Called after every mutation; the in-memory list stays the source of
    /// truth whether or not the write succeeds.
    fn after_mutation(&mut self) {
        self.rows = self.list.outline();
        self.clamp_selection();
        self.saver.save(self.list.tasks());
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
    }

    fn selected_id(&self) -> Option<TaskId> {
        self.rows.get(self.selected).map(|r| r.id)
    }

    /// Move selection to the row showing the given task
    fn select_task(&mut self, id: TaskId) {
        if let Some(idx) = self.rows.iter().position(|r| r.id == id) {
            self.selected = idx;
        }
    }

    // ------------------------------------------------------------------
    // Key handling
    // ------------------------------------------------------------------

    fn handle_key(&mut self, key: crossterm::event::KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.input_mode.clone() {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Edit(id) => self.handle_edit_key(key, id),
            InputMode::ConfirmDelete(id) => self.handle_confirm_key(key, id),
        }
    }

    fn handle_normal_key(&mut self, key: crossterm::event::KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }

            KeyCode::Char('j') | KeyCode::Down => {
                if !self.rows.is_empty() {
                    self.selected = (self.selected + 1) % self.rows.len();
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if !self.rows.is_empty() {
                    self.selected = if self.selected == 0 {
                        self.rows.len() - 1
                    } else {
                        self.selected - 1
                    };
                }
            }

            KeyCode::Char('a') => self.add_task(),

            KeyCode::Char('e') => {
                if self.list.linking().is_none() {
                    self.start_edit();
                }
            }

            KeyCode::Enter => {
                if self.list.linking().is_some() {
                    self.pick_parent();
                } else {
                    self.start_edit();
                }
            }

            KeyCode::Char(' ') => {
                if let Some(id) = self.selected_id() {
                    self.list.toggle_complete(id);
                    self.after_mutation();
                }
            }

            KeyCode::Char('d') => {
                if let Some(id) = self.selected_id() {
                    self.input_mode = InputMode::ConfirmDelete(id);
                }
            }

            KeyCode::Char('l') => {
                if let Some(id) = self.selected_id() {
                    self.list.start_linking(id);
                    self.status_message =
                        Some("Pick a parent: j/k to move, Enter to link, Esc to cancel".to_string());
                }
            }

            KeyCode::Esc => {
                if self.list.linking().is_some() {
                    self.list.cancel_linking();
                    self.status_message = Some("Linking cancelled".to_string());
                }
            }

            KeyCode::Char('u') => {
                if let Some(id) = self.selected_id() {
                    self.list.remove_dependency(id);
                    self.after_mutation();
                }
            }

            KeyCode::Char('J') => self.move_selected(MoveDir::Down),
            KeyCode::Char('K') => self.move_selected(MoveDir::Up),

            KeyCode::Char('r') => self.reload(),

            KeyCode::Char('?') => {
                self.status_message = Some(
                    "a:add e:edit Space:done d:delete l:link u:unlink J/K:move r:reload q:quit"
                        .to_string(),
                );
            }

            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: crossterm::event::KeyEvent, id: TaskId) {
        match key.code {
            // Both Enter and Esc end the edit (blur semantics); an empty
            // draft is discarded by the engine.
            KeyCode::Enter | KeyCode::Esc => {
                self.list.commit_edit(id);
                self.input_mode = InputMode::Normal;
                self.after_mutation();
                if self.list.contains(id) {
                    self.select_task(id);
                }
            }
            // Every keystroke is a mutation like any other: it goes to the
            // autosaver immediately, so a crash mid-edit loses nothing.
            // Coalescing in the saver keeps the write volume down.
            KeyCode::Backspace => {
                if let Some(task) = self.list.get(id) {
                    let mut content = task.content.clone();
                    content.pop();
                    self.list.set_content(id, &content);
                    self.saver.save(self.list.tasks());
                }
            }
            KeyCode::Char(c) => {
                if let Some(task) = self.list.get(id) {
                    let mut content = task.content.clone();
                    content.push(c);
                    self.list.set_content(id, &content);
                    self.saver.save(self.list.tasks());
                }
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: crossterm::event::KeyEvent, id: TaskId) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                let before = self.list.len();
                self.list.delete(id);
                let removed = before - self.list.len();
                self.input_mode = InputMode::Normal;
                self.after_mutation();
                self.status_message = if removed > 1 {
                    Some(format!("Deleted task and {} dependent(s)", removed - 1))
                } else {
                    Some("Deleted task".to_string())
                };
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Gestures
    // ------------------------------------------------------------------

    /// Add an empty task at the front and start editing it
    ///
    /// The draft is persisted right away like any other mutation; if it is
    /// abandoned, the commit removes it and saves again.
    fn add_task(&mut self) {
        let id = self.list.add();
        self.after_mutation();
        self.select_task(id);
        self.input_mode = InputMode::Edit(id);
    }

    fn start_edit(&mut self) {
        if let Some(id) = self.selected_id() {
            self.list.start_edit(id);
            if self.list.editing() == Some(id) {
                self.input_mode = InputMode::Edit(id);
            }
        }
    }

    /// In linking mode, pick the selected row as parent
    ///
    /// An ineligible choice is silently ignored by the engine and linking
    /// stays active, matching the soft-fail contract.
    fn pick_parent(&mut self) {
        let Some(parent) = self.selected_id() else { return };
        let child = self.list.linking();

        self.list.set_dependency(parent);

        if self.list.linking().is_none() {
            self.after_mutation();
            if let Some(child) = child {
                self.select_task(child);
            }
            self.status_message = Some("Dependency set".to_string());
        } else {
            self.status_message = Some("Not a valid parent (would create a cycle)".to_string());
        }
    }

    /// Move the selected task up or down in the manual order
    ///
    /// Translated into the engine's reorder contract the way a drag would
    /// be: the moved task is reinserted before the row that follows its
    /// target slot, or at the end.
    fn move_selected(&mut self, dir: MoveDir) {
        let Some(id) = self.selected_id() else { return };

        let before = match dir {
            MoveDir::Up => {
                if self.selected == 0 {
                    return;
                }
                Some(self.rows[self.selected - 1].id)
            }
            MoveDir::Down => self.rows.get(self.selected + 2).map(|r| r.id),
        };

        if dir == MoveDir::Down && self.selected + 1 >= self.rows.len() {
            return;
        }

        self.list.reorder(id, before);
        self.after_mutation();
        self.select_task(id);
    }

    /// Reload the list from disk, discarding nothing in-flight (the saver
    /// has already been handed every prior mutation)
    fn reload(&mut self) {
        let tasks = self.store.load_or_empty();
        self.list = TaskList::from_tasks(tasks);
        self.rows = self.list.outline();
        self.clamp_selection();
        self.input_mode = InputMode::Normal;
        self.status_message = Some("Reloaded".to_string());
    }

    // ------------------------------------------------------------------
    // Accessors for the view
    // ------------------------------------------------------------------

    pub fn list(&self) -> &TaskList {
        &self.list
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn input_mode(&self) -> &InputMode {
        &self.input_mode
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveDir {
    Up,
    Down,
}
