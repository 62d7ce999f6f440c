//! Domain model: tasks, the ordered task list, and the derived outline.

mod id;
mod list;
mod outline;
mod task;

pub use id::{IdGenerator, TaskId};
pub use list::TaskList;
pub use outline::{flatten, Row};
pub use task::Task;
