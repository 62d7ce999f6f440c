//! Derived outline view
//!
//! Flattens the parent-pointer forest into the depth-annotated, pre-order
//! sequence the presentation layer renders. This is a pure function of the
//! task sequence and is recomputed on every state change; at personal-list
//! scale the O(N) cost is not worth caching.

use std::collections::{HashMap, HashSet};

use super::id::TaskId;
use super::task::Task;

/// One visible row of the outline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    /// The task shown on this row
    pub id: TaskId,
    /// Depth in the forest; top-level roots are 0
    pub level: usize,
}

/// Flattens the task sequence into display order
///
/// Tasks are grouped under their `depends_on` parent; a task with no parent,
/// or whose parent is not present in the collection, is a top-level root.
/// Roots are emitted in sequence order, each immediately followed by its
/// subtree, children again in sequence order. Produces exactly one row per
/// task.
pub fn flatten(tasks: &[Task]) -> Vec<Row> {
    let known: HashSet<TaskId> = tasks.iter().map(|t| t.id).collect();

    let mut roots: Vec<TaskId> = Vec::new();
    let mut children: HashMap<TaskId, Vec<TaskId>> = HashMap::new();

    for task in tasks {
        match task.depends_on {
            Some(parent) if known.contains(&parent) => {
                children.entry(parent).or_default().push(task.id);
            }
            _ => roots.push(task.id),
        }
    }

    let mut rows = Vec::with_capacity(tasks.len());
    for root in roots {
        emit(root, 0, &children, &mut rows);
    }
    rows
}

fn emit(id: TaskId, level: usize, children: &HashMap<TaskId, Vec<TaskId>>, rows: &mut Vec<Row>) {
    rows.push(Row { id, level });
    if let Some(kids) = children.get(&id) {
        for &kid in kids {
            emit(kid, level + 1, children, rows);
        }
    }
}
