//! JSON storage for the task list
//!
//! The whole list is stored as a single JSON array; the order of tasks in
//! the file is the manual display order. Writes go to a temp file under an
//! exclusive lock and land with an atomic rename, so a crash mid-write
//! never corrupts the previous state.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use crate::domain::Task;

/// Store for the task list at a single path
pub struct ListFile {
    path: PathBuf,
}

impl ListFile {
    /// Creates a store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the full task list; a missing file is an empty list
    pub fn load(&self) -> Result<Vec<Task>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open task file: {}", self.path.display()))?;

        file.lock_shared()
            .context("Failed to acquire read lock on task file")?;

        let reader = BufReader::new(&file);
        let tasks: Vec<Task> = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse task file: {}", self.path.display()))?;

        // Lock is released when file is dropped
        Ok(tasks)
    }

    /// Reads the task list, degrading a read failure to an empty list
    ///
    /// The failure is logged to stderr, not surfaced; the session starts
    /// fresh rather than refusing to run.
    pub fn load_or_empty(&self) -> Vec<Task> {
        match self.load() {
            Ok(tasks) => tasks,
            Err(e) => {
                eprintln!("warning: could not load task list: {:#}", e);
                Vec::new()
            }
        }
    }

    /// Writes the full task list (not a diff), preserving sequence order
    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let temp_path = self.path.with_extension("json.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .context("Failed to acquire write lock on task file")?;

            let mut writer = BufWriter::new(&file);
            serde_json::to_writer_pretty(&mut writer, tasks)
                .context("Failed to serialize task list")?;
            writer.flush().context("Failed to flush task file")?;
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}
