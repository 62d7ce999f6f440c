//! Non-interactive commands
//!
//! Each command loads the list, applies one mutation through the engine,
//! and saves the full list back. Unknown ids follow the engine's silent
//! no-op rule but still get a message so scripts are not left guessing;
//! a rejected cycle is a hard error here because there is no linking mode
//! to stay in.

use anyhow::{bail, Result};

use crate::domain::{TaskId, TaskList};
use crate::storage::ListFile;

use super::output::Output;

fn parse_id(raw: &str) -> Result<TaskId> {
    raw.parse()
        .map_err(|_| anyhow::anyhow!("Invalid task id: '{}'", raw))
}

fn load(store: &ListFile) -> TaskList {
    TaskList::from_tasks(store.load_or_empty())
}

/// `twig list` - render the outline
pub fn list(output: &Output, store: &ListFile) -> Result<()> {
    let list = load(store);
    let rows = list.outline();
    output.verbose_ctx("list", &format!("{} tasks", rows.len()));

    if output.is_json() {
        let items: Vec<_> = rows
            .iter()
            .filter_map(|row| {
                let task = list.get(row.id)?;
                Some(serde_json::json!({
                    "id": task.id,
                    "level": row.level,
                    "content": task.content,
                    "isCompleted": task.is_completed,
                    "dependsOn": task.depends_on,
                }))
            })
            .collect();
        output.data(&items);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No tasks. Add one with 'twig add <content>'.");
        return Ok(());
    }

    for row in rows {
        if let Some(task) = list.get(row.id) {
            let marker = if task.is_completed { "[x]" } else { "[ ]" };
            let first_line = task.content.lines().next().unwrap_or("");
            println!(
                "{}{} {}  {}",
                "    ".repeat(row.level),
                marker,
                task.id,
                first_line
            );
        }
    }
    Ok(())
}

/// `twig add` - add a committed task, optionally nested under a parent
pub fn add(output: &Output, store: &ListFile, content: &str, under: Option<&str>) -> Result<()> {
    let mut list = load(store);

    let Some(id) = list.add_with_content(content) else {
        bail!("Task content cannot be empty");
    };

    if let Some(raw) = under {
        let parent = parse_id(raw)?;
        if !list.link(id, parent) {
            bail!("No task with id {}", parent);
        }
    }

    store.save(list.tasks())?;

    if output.is_json() {
        output.data(&serde_json::json!({ "id": id, "content": content }));
    } else {
        output.success(&format!("Added {}", id));
    }
    Ok(())
}

/// `twig done` - toggle completion
pub fn done(output: &Output, store: &ListFile, raw_id: &str) -> Result<()> {
    let id = parse_id(raw_id)?;
    let mut list = load(store);

    if !list.contains(id) {
        output.error(&format!("No task with id {}", id));
        return Ok(());
    }

    list.toggle_complete(id);
    store.save(list.tasks())?;

    let state = if list.get(id).is_some_and(|t| t.is_completed) {
        "done"
    } else {
        "not done"
    };
    output.success(&format!("Marked {} {}", id, state));
    Ok(())
}

/// `twig rm` - delete with one-level cascade
pub fn rm(output: &Output, store: &ListFile, raw_id: &str) -> Result<()> {
    let id = parse_id(raw_id)?;
    let mut list = load(store);

    if !list.contains(id) {
        output.error(&format!("No task with id {}", id));
        return Ok(());
    }

    let before = list.len();
    list.delete(id);
    let removed = before - list.len();
    store.save(list.tasks())?;

    output.verbose_ctx("rm", &format!("removed {} task(s)", removed));
    if removed > 1 {
        output.success(&format!("Deleted {} and {} dependent(s)", id, removed - 1));
    } else {
        output.success(&format!("Deleted {}", id));
    }
    Ok(())
}

/// `twig link` - set a dependency, refusing cycles
pub fn link(output: &Output, store: &ListFile, raw_child: &str, raw_parent: &str) -> Result<()> {
    let child = parse_id(raw_child)?;
    let parent = parse_id(raw_parent)?;
    let mut list = load(store);

    if !list.contains(child) {
        bail!("No task with id {}", child);
    }
    if !list.contains(parent) {
        bail!("No task with id {}", parent);
    }
    if !list.link(child, parent) {
        bail!("{} -> {} would create a circular dependency", child, parent);
    }

    store.save(list.tasks())?;
    output.success(&format!("{} now depends on {}", child, parent));
    Ok(())
}

/// `twig unlink` - clear a dependency
pub fn unlink(output: &Output, store: &ListFile, raw_id: &str) -> Result<()> {
    let id = parse_id(raw_id)?;
    let mut list = load(store);

    if !list.contains(id) {
        output.error(&format!("No task with id {}", id));
        return Ok(());
    }

    list.remove_dependency(id);
    store.save(list.tasks())?;
    output.success(&format!("{} is now top-level", id));
    Ok(())
}

/// `twig move` - reorder within the manual order
pub fn move_task(
    output: &Output,
    store: &ListFile,
    raw_id: &str,
    raw_before: Option<&str>,
) -> Result<()> {
    let id = parse_id(raw_id)?;
    let before = raw_before.map(parse_id).transpose()?;
    let mut list = load(store);

    if !list.contains(id) {
        output.error(&format!("No task with id {}", id));
        return Ok(());
    }

    list.reorder(id, before);
    store.save(list.tasks())?;

    match before {
        Some(b) => output.success(&format!("Moved {} before {}", id, b)),
        None => output.success(&format!("Moved {} to the end", id)),
    }
    Ok(())
}
