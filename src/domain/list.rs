//! The task list engine
//!
//! Owns the ordered task sequence and the dependency relation, and applies
//! every mutation while preserving two invariants: `depends_on` always
//! references a task that exists, and the relation never contains a cycle.
//! Cycle prevention happens before a dependency is set, never as a repair
//! afterwards.
//!
//! Alongside the persisted sequence the list tracks transient interaction
//! state (which task is being edited, which task is picking a parent). That
//! state is never serialized.
//!
//! Error philosophy: operations on unknown ids are silent no-ops, because
//! ids can go stale between render and gesture. Structurally invalid
//! mutations (self/cyclic dependencies) are silently rejected with prior
//! state unchanged.

use std::collections::HashMap;

use super::id::{IdGenerator, TaskId};
use super::outline::{self, Row};
use super::task::Task;

/// Ordered task collection with single-parent dependencies
#[derive(Debug, Default)]
pub struct TaskList {
    /// Manual/display order; the tie-break for siblings in the outline
    tasks: Vec<Task>,

    ids: IdGenerator,

    /// Task currently in edit mode, if any (transient, not persisted)
    editing: Option<TaskId>,

    /// Child task currently picking a parent, if any (transient)
    linking: Option<TaskId>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from previously persisted tasks
    ///
    /// The id generator is seeded past every loaded id, so ids are never
    /// reused within a session. Dependency cycles in the loaded data are
    /// broken here; the engine never creates one, but a hand-edited file
    /// can contain one.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let ids = IdGenerator::seeded(tasks.iter().map(|t| t.id));
        let mut list = Self {
            tasks,
            ids,
            editing: None,
            linking: None,
        };
        list.break_dependency_cycles();
        list
    }

    /// Clears `depends_on` on every task that sits inside a dependency
    /// cycle
    ///
    /// Cycle members are never roots, so they would vanish from the outline
    /// while still being persisted on every save. Tasks that merely point
    /// into a cycle keep their parent; breaking the cycle is enough to make
    /// their chains terminate.
    fn break_dependency_cycles(&mut self) {
        let parents: HashMap<TaskId, Option<TaskId>> =
            self.tasks.iter().map(|t| (t.id, t.depends_on)).collect();

        let mut members: Vec<TaskId> = Vec::new();
        for task in &self.tasks {
            let mut current = task.depends_on;
            let mut steps = 0;
            while let Some(id) = current {
                if id == task.id {
                    members.push(task.id);
                    break;
                }
                steps += 1;
                if steps > self.tasks.len() {
                    break;
                }
                current = parents.get(&id).copied().flatten();
            }
        }

        for task in &mut self.tasks {
            if members.contains(&task.id) {
                task.depends_on = None;
            }
        }
    }

    /// The full sequence in manual order (what gets persisted)
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    /// The depth-annotated display order
    pub fn outline(&self) -> Vec<Row> {
        outline::flatten(&self.tasks)
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Adds an empty task at the front of the sequence and enters edit mode
    /// for it
    pub fn add(&mut self) -> TaskId {
        let id = self.ids.next_id();
        self.tasks.insert(0, Task::new(id));
        self.editing = Some(id);
        self.linking = None;
        id
    }

    /// Adds a task with content, committed immediately (no edit mode)
    ///
    /// Used by the non-interactive CLI surface; a whitespace-only content is
    /// still a draft and is discarded, returning `None`.
    pub fn add_with_content(&mut self, content: &str) -> Option<TaskId> {
        if content.trim().is_empty() {
            return None;
        }
        let id = self.ids.next_id();
        self.tasks.insert(0, Task::with_content(id, content));
        Some(id)
    }

    /// Deletes a task along with its direct dependents
    ///
    /// The cascade is one level deep: tasks depending on the removed
    /// dependents survive, and their `depends_on` is cleared so that no
    /// dangling reference remains. No-op if the id is unknown.
    pub fn delete(&mut self, id: TaskId) {
        if !self.contains(id) {
            return;
        }

        self.tasks.retain(|t| t.id != id && t.depends_on != Some(id));

        // Re-root survivors whose parent went away with the cascade.
        let survivors: Vec<TaskId> = self.tasks.iter().map(|t| t.id).collect();
        for task in &mut self.tasks {
            if let Some(parent) = task.depends_on {
                if !survivors.contains(&parent) {
                    task.depends_on = None;
                }
            }
        }

        if self.editing.is_some_and(|e| !self.contains(e)) {
            self.editing = None;
        }
        if self.linking.is_some_and(|l| !self.contains(l)) {
            self.linking = None;
        }
    }

    /// Flips the completion flag
    ///
    /// Ignored while the task is being edited; a mid-edit row only accepts
    /// content changes.
    pub fn toggle_complete(&mut self, id: TaskId) {
        if self.editing == Some(id) {
            return;
        }
        if let Some(task) = self.get_mut(id) {
            task.is_completed = !task.is_completed;
        }
    }

    /// Replaces a task's content (called on every keystroke while editing)
    pub fn set_content(&mut self, id: TaskId, content: &str) {
        if let Some(task) = self.get_mut(id) {
            task.content = content.to_string();
        }
    }

    // ------------------------------------------------------------------
    // Edit mode
    // ------------------------------------------------------------------

    /// The task currently in edit mode, if any
    pub fn editing(&self) -> Option<TaskId> {
        self.editing
    }

    /// Enters edit mode for an existing task
    pub fn start_edit(&mut self, id: TaskId) {
        if self.contains(id) && self.linking.is_none() {
            self.editing = Some(id);
        }
    }

    /// Ends edit mode
    ///
    /// A task whose content is still empty or whitespace-only is an
    /// abandoned draft and is removed entirely. Edit state is cleared
    /// regardless.
    pub fn commit_edit(&mut self, id: TaskId) {
        if let Some(task) = self.get(id) {
            if task.is_draft() {
                self.tasks.retain(|t| t.id != id);
            }
        }
        if self.editing == Some(id) {
            self.editing = None;
        }
    }

    // ------------------------------------------------------------------
    // Dependencies
    // ------------------------------------------------------------------

    /// The child task currently picking a parent, if any
    pub fn linking(&self) -> Option<TaskId> {
        self.linking
    }

    /// Enters linking mode scoped to a child task; no structural change yet
    pub fn start_linking(&mut self, child: TaskId) {
        if self.contains(child) && self.editing.is_none() {
            self.linking = Some(child);
        }
    }

    pub fn cancel_linking(&mut self) {
        self.linking = None;
    }

    /// Returns true if a row may be picked as parent for the linking child
    ///
    /// Drives the candidate-parent highlight while linking is active.
    pub fn link_eligible(&self, id: TaskId) -> bool {
        match self.linking {
            Some(child) => !self.is_circular_dependency(child, id),
            None => false,
        }
    }

    /// Sets the linking child's dependency to the chosen parent
    ///
    /// On success linking mode ends. An invalid choice (unknown id, self,
    /// or a cycle) is silently ignored and linking mode stays active so a
    /// different parent can be picked. The view pre-filters candidates via
    /// [`Self::link_eligible`], but the check is re-applied here.
    pub fn set_dependency(&mut self, parent: TaskId) {
        let Some(child) = self.linking else { return };
        if self.link(child, parent) {
            self.linking = None;
        }
    }

    /// Makes `child` depend on `parent`, if that keeps the relation acyclic
    ///
    /// Returns false (leaving state unchanged) for unknown ids, self-links
    /// and cycles. This is the validated mutation behind both the linking
    /// gesture and the `twig link` command.
    pub fn link(&mut self, child: TaskId, parent: TaskId) -> bool {
        if !self.contains(child) || !self.contains(parent) {
            return false;
        }
        if self.is_circular_dependency(child, parent) {
            return false;
        }
        if let Some(task) = self.get_mut(child) {
            task.depends_on = Some(parent);
        }
        true
    }

    /// Clears a task's dependency, making it top-level
    pub fn remove_dependency(&mut self, id: TaskId) {
        if let Some(task) = self.get_mut(id) {
            task.depends_on = None;
        }
    }

    /// Returns true if making `child` depend on `candidate_parent` would
    /// close a cycle
    ///
    /// Walks the single-parent chain upward from the candidate; out-degree
    /// is at most one, so no general graph search is needed. The walk is
    /// capped at the collection size as a defense, though a maintained-
    /// acyclic list can never hit the cap.
    pub fn is_circular_dependency(&self, child: TaskId, candidate_parent: TaskId) -> bool {
        if child == candidate_parent {
            return true;
        }

        let mut current = Some(candidate_parent);
        let mut steps = 0;
        while let Some(id) = current {
            let Some(task) = self.get(id) else { break };
            if task.depends_on == Some(child) {
                return true;
            }
            current = task.depends_on;

            steps += 1;
            if steps > self.tasks.len() {
                break;
            }
        }
        false
    }

    // ------------------------------------------------------------------
    // Manual order
    // ------------------------------------------------------------------

    /// Moves a task to a new position in the manual order
    ///
    /// The task is removed from the sequence and reinserted immediately
    /// before `before`, or at the end when `before` is `None`. The
    /// dependency relation is untouched: a moved task keeps its parent and
    /// only changes its tie-break rank among siblings.
    pub fn reorder(&mut self, moved: TaskId, before: Option<TaskId>) {
        let Some(from) = self.tasks.iter().position(|t| t.id == moved) else {
            return;
        };
        let task = self.tasks.remove(from);

        let to = before
            .and_then(|b| self.tasks.iter().position(|t| t.id == b))
            .unwrap_or(self.tasks.len());
        self.tasks.insert(to, task);
    }
}
