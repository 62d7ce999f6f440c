//! Twig - a terminal task list with nested dependencies
//!
//! Twig keeps a flat, manually ordered list of tasks in which each task may
//! depend on at most one other task. The dependency relation forms a forest
//! that is rendered as an indented outline, with cycle prevention enforced
//! before every structural change.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{Task, TaskId, TaskList};
