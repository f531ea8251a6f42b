// Durable key-value slot for the task collection
//
// One JSON file holding the full serialized task array. Every save overwrites
// the whole slot; there is no partial write a reader can observe, because the
// content lands in a sibling temp file first and is renamed into place.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::Task;

/// Slot file name. Kept as the storage key used by earlier versions of this
/// application, so an existing slot restores unchanged.
const SLOT_FILE: &str = "todoTasks.json";

const LOCK_FILE: &str = ".lock";

/// The persisted storage slot, addressed by directory
pub struct Storage {
    base_path: PathBuf,
}

impl Storage {
    /// Open a slot in the given directory, creating the directory if needed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    /// Get the base path of this slot
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn slot_path(&self) -> PathBuf {
        self.base_path.join(SLOT_FILE)
    }

    /// Restore the task collection from the slot.
    ///
    /// An absent slot, or one whose content fails to parse as a task array,
    /// is treated as "no tasks" rather than a fatal error. Records that
    /// violate the store invariants are dropped with a warning.
    pub fn load(&self) -> Result<Vec<Task>> {
        let path = self.slot_path();

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(slot = ?path, "No slot file, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let tasks: Vec<Task> = match serde_json::from_str(&raw) {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(slot = ?path, error = ?e, "Slot content is not a task array, starting empty");
                return Ok(Vec::new());
            }
        };

        let tasks = scrub(tasks);
        info!(slot = ?path, count = tasks.len(), "Restored tasks from slot");
        Ok(tasks)
    }

    /// Overwrite the slot with the full collection.
    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        // One writer at a time; concurrent processes racing on the same slot
        // remain out of scope
        let _lock = self.acquire_lock()?;

        let json = serde_json::to_string(tasks)?;

        let tmp_path = self.base_path.join(format!("{SLOT_FILE}.tmp"));
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, self.slot_path())?;
        debug!(count = tasks.len(), "Slot written");
        Ok(())
    }

    fn acquire_lock(&self) -> Result<File> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(self.base_path.join(LOCK_FILE))?;
        file.lock_exclusive()?;
        // Lock is released when the file is dropped
        Ok(file)
    }
}

/// Drop records that violate the store invariants: text that trims to empty,
/// or a duplicate id (possible in slots written by the legacy timestamp-id
/// scheme). First occurrence wins, preserving newest-first order. Surviving
/// text is normalized to its trimmed form.
fn scrub(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(tasks.len());

    for mut task in tasks {
        let text = task.text.trim();
        if text.is_empty() {
            warn!(id = task.id, "Dropping task with empty text");
            continue;
        }
        if !seen.insert(task.id) {
            warn!(id = task.id, "Dropping task with duplicate id");
            continue;
        }
        if text.len() != task.text.len() {
            task.text = text.to_string();
        }
        kept.push(task);
    }

    kept
}
