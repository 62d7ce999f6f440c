//! Persistence: the task file, the background autosaver, and configuration.

mod autosave;
mod config;
mod json;

pub use autosave::Autosaver;
pub use config::Config;
pub use json::ListFile;
