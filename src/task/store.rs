//! Task store - JSON file persistence
//!
//! The store keeps the whole collection in memory and rewrites the backing
//! file after every mutation. There is no locking: two processes writing the
//! same file will clobber each other on their next save.

use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::error::{Result, TaskError};
use super::model::{validate_title, Priority, Task, TaskId, TaskStatus};

/// File name used when no path is configured
pub const DEFAULT_TASKS_FILE: &str = "tasks.json";

/// Fields to change in [`TaskStore::update`]. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<u8>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.priority.is_none()
    }
}

#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
    backup_on_save: bool,
}

impl TaskStore {
    /// Bind a store to `path` and load whatever it currently holds.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let tasks = read_tasks(&path)?;
        debug!("Loaded {} task(s) from {}", tasks.len(), path.display());

        Ok(Self {
            path,
            tasks,
            backup_on_save: false,
        })
    }

    /// Copy the previous file to `<file>.bak` before each save.
    pub fn with_backup(mut self, enabled: bool) -> Self {
        self.backup_on_save = enabled;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Re-read the backing file, discarding in-memory state.
    pub fn load(&mut self) -> Result<()> {
        self.tasks = read_tasks(&self.path)?;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if self.backup_on_save && self.path.exists() {
            let backup_path = backup_path(&self.path);
            if let Err(e) = fs::copy(&self.path, &backup_path) {
                warn!("Failed to create backup: {}", e);
            }
        }

        let content = serde_json::to_string_pretty(&self.tasks)?;
        fs::write(&self.path, content).map_err(|source| TaskError::Storage {
            path: self.path.clone(),
            source,
        })?;
        debug!("Saved {} task(s) to {}", self.tasks.len(), self.path.display());
        Ok(())
    }

    /// Get the next available task ID
    pub fn next_id(&self) -> Result<TaskId> {
        match self.tasks.iter().map(|t| t.id).max() {
            None => Ok(TaskId::first()),
            Some(max) => max.next().ok_or(TaskError::IdsExhausted(max)),
        }
    }

    pub fn add(
        &mut self,
        title: &str,
        description: Option<&str>,
        priority: Option<u8>,
    ) -> Result<Task> {
        let task = Task::create(self.next_id()?, title, description, priority)?;
        let previous = self.tasks.clone();
        self.tasks.push(task.clone());
        self.save_or_restore(previous)?;
        Ok(task)
    }

    /// Delete a task. Missing IDs are not an error; the file is rewritten either way.
    pub fn remove(&mut self, id: TaskId) -> Result<Option<Task>> {
        let previous = self.tasks.clone();
        let removed = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .map(|index| self.tasks.remove(index));
        self.save_or_restore(previous)?;
        Ok(removed)
    }

    pub fn mark_done(&mut self, id: TaskId) -> Result<bool> {
        self.modify(id, Task::complete)
    }

    pub fn mark_pending(&mut self, id: TaskId) -> Result<bool> {
        self.modify(id, Task::reopen)
    }

    /// Apply the supplied fields. Returns false when no task has this ID.
    pub fn update(&mut self, id: TaskId, changes: TaskUpdate) -> Result<bool> {
        if let Some(title) = &changes.title {
            validate_title(title)?;
        }
        let priority = changes.priority.map(Priority::new).transpose()?;

        self.modify(id, |task| {
            if let Some(title) = changes.title {
                task.title = title;
            }
            if let Some(description) = changes.description {
                task.description = description;
            }
            if let Some(priority) = priority {
                task.priority = priority;
            }
        })
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Like [`TaskStore::get`], but a missing task is an error.
    pub fn require(&self, id: TaskId) -> Result<&Task> {
        self.get(id).ok_or(TaskError::NotFound(id))
    }

    pub fn list(&self, status: Option<TaskStatus>) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| status.is_none_or(|s| t.status == s))
            .collect()
    }

    pub fn list_by_priority(&self, priority: u8) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.priority.value() == priority)
            .collect()
    }

    /// Remove every task. The next added task gets ID 1 again.
    pub fn clear(&mut self) -> Result<usize> {
        let previous = std::mem::take(&mut self.tasks);
        self.save_or_restore(previous.clone())?;
        Ok(previous.len())
    }

    fn modify(&mut self, id: TaskId, apply: impl FnOnce(&mut Task)) -> Result<bool> {
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            return Ok(false);
        };
        let previous = self.tasks.clone();
        apply(&mut self.tasks[index]);
        self.save_or_restore(previous)?;
        Ok(true)
    }

    /// Save, or put `previous` back if the write fails so memory keeps
    /// matching the file.
    fn save_or_restore(&mut self, previous: Vec<Task>) -> Result<()> {
        if let Err(e) = self.save() {
            self.tasks = previous;
            return Err(e);
        }
        Ok(())
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Missing, blank, or unparsable files load as an empty collection. Records
/// that fail validation are skipped so the rest of the file stays usable.
fn read_tasks(path: &Path) -> Result<Vec<Task>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(TaskError::Storage {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let records: Vec<Value> = match serde_json::from_str(&content) {
        Ok(records) => records,
        Err(e) => {
            warn!(
                "Task file {} is not a valid task list, starting empty: {}",
                path.display(),
                e
            );
            return Ok(Vec::new());
        }
    };

    let mut tasks: Vec<Task> = Vec::with_capacity(records.len());
    for record in records {
        match Task::from_record(record) {
            Ok(task) if tasks.iter().any(|t| t.id == task.id) => {
                warn!("Skipping duplicate task id {} in {}", task.id, path.display());
            }
            Ok(task) => tasks.push(task),
            Err(e) => warn!("Skipping record in {}: {}", path.display(), e),
        }
    }
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> Result<TaskStore> {
        TaskStore::open(dir.path().join(DEFAULT_TASKS_FILE))
    }

    #[test]
    fn test_add_to_empty_store() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let mut store = store_in(&temp)?;

        let task = store.add("Buy milk", None, None)?;
        assert_eq!(task.id, TaskId(1));
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "Task to be done");
        assert_eq!(task.priority.value(), 5);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(store.get(TaskId(1)), Some(&task));
        Ok(())
    }

    #[test]
    fn test_ids_are_not_reused_after_remove() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let mut store = store_in(&temp)?;

        for title in ["one", "two", "three"] {
            store.add(title, None, None)?;
        }
        let removed = store.remove(TaskId(2))?;
        assert_eq!(removed.map(|t| t.title), Some("two".to_string()));

        let task = store.add("New", None, None)?;
        assert_eq!(task.id, TaskId(4));
        Ok(())
    }

    #[test]
    fn test_next_id_tracks_max() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let mut store = store_in(&temp)?;
        assert_eq!(store.next_id()?, TaskId(1));

        store.add("a", None, None)?;
        store.add("b", None, None)?;
        store.add("c", None, None)?;
        store.remove(TaskId(3))?;
        assert_eq!(store.next_id()?, TaskId(3));

        store.remove(TaskId(1))?;
        assert_eq!(store.next_id()?, TaskId(3));
        Ok(())
    }

    #[test]
    fn test_add_rejects_invalid_priority() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let mut store = store_in(&temp)?;

        let err = store.add("A", None, Some(11)).unwrap_err();
        assert!(matches!(err, TaskError::InvalidPriority(11)));
        assert!(store.is_empty());
        assert!(!store.path().exists());
        Ok(())
    }

    #[test]
    fn test_remove_missing_is_noop() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let mut store = store_in(&temp)?;
        store.add("keep", None, None)?;

        assert!(store.remove(TaskId(42))?.is_none());
        assert_eq!(store.len(), 1);
        Ok(())
    }

    #[test]
    fn test_done_then_pending_roundtrip() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let mut store = store_in(&temp)?;
        let original = store.add("Write tests", Some("all of them"), Some(7))?;

        assert!(store.mark_done(original.id)?);
        let done = store.require(original.id)?;
        assert_eq!(done.status, TaskStatus::Done);
        assert!(done.completed_at.is_some());

        assert!(store.mark_pending(original.id)?);
        assert_eq!(store.get(original.id), Some(&original));
        Ok(())
    }

    #[test]
    fn test_mark_missing_task() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let mut store = store_in(&temp)?;

        assert!(!store.mark_done(TaskId(1))?);
        assert!(!store.mark_pending(TaskId(1))?);
        assert!(!store.path().exists());
        Ok(())
    }

    #[test]
    fn test_update_applies_only_supplied_fields() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let mut store = store_in(&temp)?;
        store.add("Draft", Some("first pass"), Some(3))?;

        let changes = TaskUpdate {
            title: Some("Final".to_string()),
            priority: Some(9),
            ..Default::default()
        };
        assert!(store.update(TaskId(1), changes)?);

        let task = store.require(TaskId(1))?;
        assert_eq!(task.title, "Final");
        assert_eq!(task.description, "first pass");
        assert_eq!(task.priority.value(), 9);
        Ok(())
    }

    #[test]
    fn test_update_without_fields_keeps_task() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let mut store = store_in(&temp)?;
        let original = store.add("Same", None, None)?;
        let before = fs::read_to_string(store.path())?;

        assert!(TaskUpdate::default().is_empty());
        assert!(store.update(original.id, TaskUpdate::default())?);
        assert_eq!(store.get(original.id), Some(&original));
        assert_eq!(fs::read_to_string(store.path())?, before);
        Ok(())
    }

    #[test]
    fn test_update_allows_empty_description() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let mut store = store_in(&temp)?;
        store.add("Task", None, None)?;

        let changes = TaskUpdate {
            description: Some(String::new()),
            ..Default::default()
        };
        assert!(store.update(TaskId(1), changes)?);
        assert_eq!(store.require(TaskId(1))?.description, "");
        Ok(())
    }

    #[test]
    fn test_update_validates_fields() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let mut store = store_in(&temp)?;
        store.add("Task", None, None)?;

        let bad_title = TaskUpdate {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(
            store.update(TaskId(1), bad_title),
            Err(TaskError::InvalidTitle)
        ));

        let bad_priority = TaskUpdate {
            priority: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            store.update(TaskId(1), bad_priority),
            Err(TaskError::InvalidPriority(0))
        ));
        assert_eq!(store.require(TaskId(1))?.title, "Task");
        Ok(())
    }

    #[test]
    fn test_update_missing_task() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let mut store = store_in(&temp)?;
        assert!(!store.update(TaskId(5), TaskUpdate::default())?);
        Ok(())
    }

    #[test]
    fn test_require_missing_task() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let store = store_in(&temp)?;
        let err = store.require(TaskId(3)).unwrap_err();
        assert!(matches!(err, TaskError::NotFound(TaskId(3))));
        assert_eq!(err.to_string(), "Task 3 not found");
        Ok(())
    }

    #[test]
    fn test_list_filters() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let mut store = store_in(&temp)?;
        store.add("a", None, Some(8))?;
        store.add("b", None, Some(5))?;
        store.add("c", None, Some(8))?;
        store.mark_done(TaskId(2))?;

        let all: Vec<u64> = store.list(None).iter().map(|t| t.id.value()).collect();
        assert_eq!(all, vec![1, 2, 3]);

        let pending: Vec<u64> = store
            .list(Some(TaskStatus::Pending))
            .iter()
            .map(|t| t.id.value())
            .collect();
        assert_eq!(pending, vec![1, 3]);
        assert_eq!(store.list(Some(TaskStatus::Done)).len(), 1);

        assert_eq!(store.list_by_priority(8).len(), 2);
        assert!(store.list_by_priority(1).is_empty());
        Ok(())
    }

    #[test]
    fn test_clear_resets_ids() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let mut store = store_in(&temp)?;
        store.add("a", None, None)?;
        store.add("b", None, None)?;

        assert_eq!(store.clear()?, 2);
        assert!(store.is_empty());
        assert_eq!(fs::read_to_string(store.path())?.trim(), "[]");
        assert_eq!(store.add("fresh", None, None)?.id, TaskId(1));
        Ok(())
    }

    #[test]
    fn test_load_nonexistent_file() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let store = store_in(&temp)?;
        assert!(store.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_whitespace_only_file() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join(DEFAULT_TASKS_FILE);
        fs::write(&path, "   \n  \t  ")?;

        assert!(TaskStore::open(&path)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_invalid_json() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join(DEFAULT_TASKS_FILE);
        fs::write(&path, "{ invalid json }")?;

        assert!(TaskStore::open(&path)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_object_instead_of_list() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join(DEFAULT_TASKS_FILE);
        fs::write(&path, r#"{"id": 1, "title": "not in a list"}"#)?;

        assert!(TaskStore::open(&path)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_skips_bad_records() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join(DEFAULT_TASKS_FILE);
        fs::write(
            &path,
            r#"[
  {"id": 1, "title": "good"},
  {"title": "no id"},
  {"id": 2, "title": "bad priority", "priority": 42},
  {"id": 1, "title": "duplicate"},
  {"id": 3, "title": "also good", "status": "done", "completed_at": "2025-07-29T09:00:00"}
]"#,
        )?;

        let store = TaskStore::open(&path)?;
        let titles: Vec<&str> = store.list(None).iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["good", "also good"]);
        assert_eq!(store.next_id()?, TaskId(4));
        Ok(())
    }

    #[test]
    fn test_reload_picks_up_external_changes() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let mut first = store_in(&temp)?;
        let mut second = store_in(&temp)?;

        second.add("from elsewhere", None, None)?;
        assert!(first.is_empty());

        first.load()?;
        assert_eq!(first.len(), 1);
        Ok(())
    }

    #[test]
    fn test_save_creates_backup_when_enabled() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let mut store = store_in(&temp)?.with_backup(true);

        store.add("first", None, None)?;
        store.add("second", None, None)?;

        let backup = temp.path().join("tasks.json.bak");
        assert!(backup.exists());
        let content = fs::read_to_string(&backup)?;
        assert!(content.contains("first"));
        assert!(!content.contains("second"));
        Ok(())
    }

    #[test]
    fn test_save_without_backup() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let mut store = store_in(&temp)?;
        store.add("first", None, None)?;
        store.add("second", None, None)?;

        assert!(!temp.path().join("tasks.json.bak").exists());
        Ok(())
    }

    #[test]
    fn test_save_to_missing_directory_is_storage_error() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let mut store = TaskStore::open(temp.path().join("missing").join("tasks.json"))?;

        let err = store.add("nowhere to go", None, None).unwrap_err();
        assert!(matches!(err, TaskError::Storage { .. }));
        assert!(store.is_empty());
        assert_eq!(store.next_id()?, TaskId(1));
        Ok(())
    }

    #[test]
    fn test_failed_save_rolls_back_mutations() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let dir = temp.path().join("data");
        fs::create_dir(&dir)?;
        let mut store = TaskStore::open(dir.join(DEFAULT_TASKS_FILE))?;
        let original = store.add("stays pending", None, Some(3))?;
        store.add("second", None, None)?;

        fs::remove_dir_all(&dir)?;

        assert!(store.mark_done(original.id).is_err());
        assert_eq!(store.get(original.id), Some(&original));

        let changes = TaskUpdate {
            title: Some("renamed".to_string()),
            ..Default::default()
        };
        assert!(store.update(original.id, changes).is_err());
        assert_eq!(store.require(original.id)?.title, "stays pending");

        assert!(store.remove(original.id).is_err());
        assert!(store.clear().is_err());
        let titles: Vec<&str> = store.list(None).iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["stays pending", "second"]);
        Ok(())
    }

    #[test]
    fn test_add_after_largest_id_fails_cleanly() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join(DEFAULT_TASKS_FILE);
        fs::write(&path, format!(r#"[{{"id": {}, "title": "last"}}]"#, u64::MAX))?;

        let mut store = TaskStore::open(&path)?;
        assert_eq!(store.len(), 1);
        assert!(matches!(
            store.next_id(),
            Err(TaskError::IdsExhausted(TaskId(u64::MAX)))
        ));

        let err = store.add("one more", None, None).unwrap_err();
        assert!(matches!(err, TaskError::IdsExhausted(_)));
        assert_eq!(store.len(), 1);
        Ok(())
    }

    #[test]
    fn test_ids_beyond_u32_are_kept() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join(DEFAULT_TASKS_FILE);
        fs::write(
            &path,
            r#"[{"id": 5000000000, "title": "big"}, {"id": 1, "title": "small"}]"#,
        )?;

        let mut store = TaskStore::open(&path)?;
        assert_eq!(store.len(), 2);
        assert_eq!(store.next_id()?, TaskId(5_000_000_001));

        store.mark_done(TaskId(1))?;
        let reopened = TaskStore::open(&path)?;
        assert_eq!(reopened.require(TaskId(5_000_000_000))?.title, "big");
        assert_eq!(store.add("next", None, None)?.id, TaskId(5_000_000_001));
        Ok(())
    }

    #[test]
    fn test_failed_backup_does_not_block_save() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let mut store = store_in(&temp)?.with_backup(true);
        store.add("first", None, None)?;

        // a directory where the backup file should go makes the copy fail
        fs::create_dir(temp.path().join("tasks.json.bak"))?;

        store.add("second", None, None)?;
        let content = fs::read_to_string(store.path())?;
        assert!(content.contains("second"));
        assert!(temp.path().join("tasks.json.bak").is_dir());
        Ok(())
    }

    #[test]
    fn test_file_is_rewritten_on_every_mutation() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let mut store = store_in(&temp)?;
        store.add("persisted", None, Some(4))?;
        store.mark_done(TaskId(1))?;

        let reopened = store_in(&temp)?;
        let task = reopened.require(TaskId(1))?;
        assert_eq!(task, store.require(TaskId(1))?);
        assert!(task.is_done());
        Ok(())
    }
}
