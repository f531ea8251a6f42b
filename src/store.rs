// Task store: the in-memory collection, its filtered view, and the edit session

use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{Counts, Task, TaskFilter};
use crate::storage::Storage;

/// Owns the ordered task collection (newest first), the active view filter,
/// and the editing target. Constructed once and handed by reference to
/// whatever event layer drives it; every mutating operation writes the full
/// collection back to the slot before returning.
pub struct TaskStore {
    storage: Storage,
    tasks: Vec<Task>,
    current_filter: TaskFilter,
    editing_task_id: Option<u64>,
    next_id: u64,
}

impl TaskStore {
    /// Open a store at the given directory, restoring the persisted
    /// collection if present. The id counter resumes above the highest
    /// restored id so old and new ids never collide.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let storage = Storage::open(path)?;
        let tasks = storage.load()?;
        let next_id = tasks.iter().map(|t| t.id).max().map_or(1, |id| id + 1);

        Ok(Self {
            storage,
            tasks,
            current_filter: TaskFilter::default(),
            editing_task_id: None,
            next_id,
        })
    }

    // ========================================================================
    // Mutating operations
    // ========================================================================

    /// Add a task from raw input.
    ///
    /// The text is trimmed; input that trims to empty is rejected without
    /// mutation. The new task is inserted at the front of the collection.
    pub fn add(&mut self, raw_text: &str) -> Result<Task> {
        let text = raw_text.trim();
        if text.is_empty() {
            return Err(Error::EmptyText);
        }

        let task = Task::new(self.fresh_id(), text.to_string());
        self.tasks.insert(0, task.clone());
        self.persist()?;

        debug!(id = task.id, "Task added");
        Ok(task)
    }

    /// Flip a task between active and completed, returning the new state.
    ///
    /// An unknown id is a silent no-op (`Ok(None)`): the reference may be
    /// stale, e.g. the task was removed through another view.
    pub fn toggle(&mut self, id: u64) -> Result<Option<bool>> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            debug!(id, "Toggle on unknown id ignored");
            return Ok(None);
        };

        task.completed = !task.completed;
        let completed = task.completed;
        self.persist()?;

        debug!(id, completed, "Task toggled");
        Ok(Some(completed))
    }

    /// Remove a task, returning whether anything was removed.
    ///
    /// An unknown id is a no-op (`Ok(false)`). Callers that want user
    /// confirmation ask before calling; the store never prompts.
    pub fn remove(&mut self, id: u64) -> Result<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            debug!(id, "Remove on unknown id ignored");
            return Ok(false);
        }

        if self.editing_task_id == Some(id) {
            warn!(id, "Removed the task under edit, discarding the edit session");
            self.editing_task_id = None;
        }

        self.persist()?;
        debug!(id, "Task removed");
        Ok(true)
    }

    /// Remove every completed task, returning how many were removed.
    ///
    /// With nothing completed this is a valid call that touches neither the
    /// collection nor the slot.
    pub fn clear_completed(&mut self) -> Result<usize> {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();
        if removed == 0 {
            return Ok(0);
        }

        if let Some(id) = self.editing_task_id {
            if !self.tasks.iter().any(|t| t.id == id) {
                warn!(id, "Cleared the task under edit, discarding the edit session");
                self.editing_task_id = None;
            }
        }

        self.persist()?;
        debug!(removed, "Completed tasks cleared");
        Ok(removed)
    }

    // ========================================================================
    // Edit session
    // ========================================================================

    /// Open an edit session for a task, returning it so callers can prefill
    /// their input. At most one session exists; opening another replaces it.
    pub fn begin_edit(&mut self, id: u64) -> Result<&Task> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))?;

        self.editing_task_id = Some(id);
        Ok(&self.tasks[idx])
    }

    /// The task currently open for editing, if any
    pub fn editing_task(&self) -> Option<&Task> {
        self.editing_task_id
            .and_then(|id| self.tasks.iter().find(|t| t.id == id))
    }

    /// Write new text onto the task under edit and close the session.
    ///
    /// With no active session this is a no-op (`Ok(None)`). Input that trims
    /// to empty is rejected and the session stays open, so the caller's
    /// editor can stay up. A session whose task has since been removed is
    /// discarded without writing anywhere.
    pub fn commit_edit(&mut self, raw_text: &str) -> Result<Option<Task>> {
        let Some(id) = self.editing_task_id else {
            return Ok(None);
        };

        let text = raw_text.trim();
        if text.is_empty() {
            return Err(Error::EmptyText);
        }

        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            warn!(id, "Edit session referenced a removed task, discarding");
            self.editing_task_id = None;
            return Ok(None);
        };

        task.text = text.to_string();
        let updated = task.clone();
        self.editing_task_id = None;
        self.persist()?;

        debug!(id, "Task text updated");
        Ok(Some(updated))
    }

    /// Close the edit session without writing
    pub fn cancel_edit(&mut self) {
        self.editing_task_id = None;
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Set the active view filter. The closed set is the enum itself;
    /// textual input goes through `TaskFilter::from_str` at the boundary,
    /// which leaves the current filter untouched on rejection.
    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.current_filter = filter;
    }

    /// The active view filter
    pub fn current_filter(&self) -> TaskFilter {
        self.current_filter
    }

    /// The collection as seen through the active filter. Lazy and
    /// read-only; the underlying order is untouched.
    pub fn filtered(&self) -> impl Iterator<Item = &Task> {
        self.tasks
            .iter()
            .filter(|t| self.current_filter.matches(t))
    }

    /// The full collection, newest first
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Per-filter totals, independent of the active filter
    pub fn counts(&self) -> Counts {
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        Counts {
            all: self.tasks.len(),
            active: self.tasks.len() - completed,
            completed,
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn persist(&self) -> Result<()> {
        self.storage.save(&self.tasks)
    }
}
