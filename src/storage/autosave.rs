//! Fire-and-forget persistence for the interactive session
//!
//! Every mutation hands the full task list to a background writer thread
//! over a channel; no operation blocks on disk. When the UI outruns the
//! disk, queued snapshots are coalesced and only the latest is written. A
//! failed write is reported back over an error channel for the status line
//! and never rolls back the in-memory state; the running session is the
//! source of truth.
//!
//! Dropping the autosaver flushes the final pending snapshot before the
//! thread joins, so quitting never loses the last mutation.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::domain::Task;

use super::json::ListFile;

enum Msg {
    Save(Vec<Task>),
    Shutdown,
}

/// Background writer for the task file
pub struct Autosaver {
    tx: Sender<Msg>,
    errors: Receiver<String>,
    handle: Option<JoinHandle<()>>,
}

impl Autosaver {
    /// Spawns the writer thread for the given store
    pub fn new(store: ListFile) -> Self {
        let (tx, rx) = mpsc::channel::<Msg>();
        let (err_tx, errors) = mpsc::channel::<String>();

        let handle = thread::spawn(move || {
            while let Ok(msg) = rx.recv() {
                let mut latest = match msg {
                    Msg::Save(tasks) => Some(tasks),
                    Msg::Shutdown => None,
                };
                let mut shutdown = latest.is_none();

                // Drain queued snapshots; only the newest one matters.
                loop {
                    match rx.try_recv() {
                        Ok(Msg::Save(tasks)) => latest = Some(tasks),
                        Ok(Msg::Shutdown) => shutdown = true,
                        Err(TryRecvError::Empty) => break,
                        Err(TryRecvError::Disconnected) => {
                            shutdown = true;
                            break;
                        }
                    }
                }

                if let Some(tasks) = latest {
                    if let Err(e) = store.save(&tasks) {
                        let _ = err_tx.send(format!("autosave failed: {:#}", e));
                    }
                }
                if shutdown {
                    break;
                }
            }
        });

        Self {
            tx,
            errors,
            handle: Some(handle),
        }
    }

    /// Queues a snapshot of the task list for writing; returns immediately
    pub fn save(&self, tasks: &[Task]) {
        let _ = self.tx.send(Msg::Save(tasks.to_vec()));
    }

    /// Takes the next pending write failure, if one was reported
    pub fn take_error(&self) -> Option<String> {
        self.errors.try_recv().ok()
    }
}

impl Drop for Autosaver {
    fn drop(&mut self) {
        let _ = self.tx.send(Msg::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
