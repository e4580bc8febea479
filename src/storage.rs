//! Storage layer for todo
//!
//! The task list persists as one JSON document, by default
//! `~/.todo_data.json`. The document root is a list of task objects in the
//! legacy shape: status as three booleans (`done`, `pending`, `hold`), the
//! assignee under the `AssignedTo` key, dates as text, subtask ids as
//! `"<parent>-<local>"` composites. Loading converts that shape into typed
//! records in one explicit step; saving converts back. Mutations run as a
//! single locked read-modify-write cycle; the first-run seed takes the
//! same lock.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{self, Config};
use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::task::{Status, Subtask, Task, DEFAULT_PRIORITY};

/// Data file name under the home directory.
pub const DATA_FILE_NAME: &str = ".todo_data.json";

/// Environment variable naming a template file used to seed the data file
/// on first run (packaged-install hook).
pub const TEMPLATE_ENV: &str = "TODO_TEMPLATE";

/// Format dates are saved in.
const DATE_FORMAT_ISO: &str = "%Y-%m-%d";

/// Older documents carry day-first dates; accepted on load only.
const DATE_FORMAT_LEGACY: &str = "%d-%m-%Y";

/// Storage manager for the task data file
#[derive(Debug, Clone)]
pub struct Storage {
    data_file: PathBuf,
}

impl Storage {
    /// Create a storage manager for a specific data file
    pub fn new(data_file: PathBuf) -> Self {
        Self { data_file }
    }

    /// Resolve the data file location.
    ///
    /// Precedence: explicit path from the CLI, then the config file's
    /// `data_file`, then `~/.todo_data.json`.
    pub fn resolve(cli_file: Option<PathBuf>, config: &Config) -> Result<Self> {
        if let Some(path) = cli_file {
            return Ok(Self::new(path));
        }
        if let Some(path) = &config.data_file {
            return Ok(Self::new(path.clone()));
        }
        let home = config::home_dir().ok_or_else(|| {
            Error::OperationFailed("could not determine home directory".to_string())
        })?;
        Ok(Self::new(home.join(DATA_FILE_NAME)))
    }

    /// Path to the data file
    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    fn lock_file(&self) -> PathBuf {
        PathBuf::from(format!("{}.lock", self.data_file.display()))
    }

    /// First-run bootstrap: create the data file if it is absent.
    ///
    /// When `$TODO_TEMPLATE` names an existing file, its contents seed the
    /// data file; otherwise the file starts as an empty list. The seed
    /// write holds the same lock as [`Storage::update`]. A permission
    /// failure here is fatal to the invocation.
    pub fn bootstrap(&self) -> Result<()> {
        let template = std::env::var(TEMPLATE_ENV).ok().map(PathBuf::from);
        self.bootstrap_from(template.as_deref())
    }

    fn bootstrap_from(&self, template: Option<&Path>) -> Result<()> {
        if self.data_file.exists() {
            return Ok(());
        }
        // The unlocked check above can go stale against a concurrent
        // writer. Seed only under the update lock, after re-checking.
        let _lock = FileLock::acquire(self.lock_file(), DEFAULT_LOCK_TIMEOUT_MS)?;
        if self.data_file.exists() {
            return Ok(());
        }
        if let Some(template) = template {
            if template.is_file() {
                debug!(template = %template.display(), "seeding data file from template");
                let data = fs::read(template)?;
                return lock::write_atomic(&self.data_file, &data);
            }
            warn!(template = %template.display(), "template is not a file, starting empty");
        }
        debug!(path = %self.data_file.display(), "creating empty data file");
        lock::write_atomic_str(&self.data_file, "[]")
    }

    /// Load the full task list. A missing file reads as an empty list.
    pub fn load(&self) -> Result<Vec<Task>> {
        if !self.data_file.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.data_file)?;
        let stored: Vec<StoredTask> = serde_json::from_str(&content)?;
        debug!(count = stored.len(), "loaded task list");
        stored.into_iter().map(StoredTask::into_task).collect()
    }

    /// Save the full task list (atomic whole-file overwrite).
    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        let stored: Vec<StoredTask> = tasks.iter().map(StoredTask::from_task).collect();
        let json = serde_json::to_string_pretty(&stored)?;
        lock::write_atomic_str(&self.data_file, &json)
    }

    /// Run one locked read-modify-write cycle.
    ///
    /// The lock on the `.lock` sibling is held across load, mutation, and
    /// save; if the mutation fails nothing is written.
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Task>) -> Result<T>,
    {
        let _lock = FileLock::acquire(self.lock_file(), DEFAULT_LOCK_TIMEOUT_MS)?;
        let mut tasks = self.load()?;
        let result = f(&mut tasks)?;
        self.save(&tasks)?;
        Ok(result)
    }
}

fn default_priority() -> String {
    DEFAULT_PRIORITY.to_string()
}

/// One task as it sits in the JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredTask {
    id: u32,
    description: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    pending: bool,
    #[serde(default)]
    hold: bool,
    #[serde(default)]
    due: Option<String>,
    #[serde(rename = "AssignedTo", default)]
    assigned_to: String,
    #[serde(default = "default_priority")]
    priority: String,
    #[serde(default)]
    subtasks: Vec<StoredSubtask>,
}

/// One subtask as stored, with its composite string id.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSubtask {
    id: String,
    description: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    pending: bool,
    #[serde(default)]
    hold: bool,
    #[serde(default)]
    due: Option<String>,
    #[serde(rename = "AssignedTo", default)]
    assigned_to: String,
    #[serde(default = "default_priority")]
    priority: String,
}

impl StoredTask {
    fn into_task(self) -> Result<Task> {
        let subtasks = self
            .subtasks
            .into_iter()
            .map(StoredSubtask::into_subtask)
            .collect::<Result<Vec<_>>>()?;
        Ok(Task {
            id: self.id,
            description: self.description,
            status: Status::from_flags(self.done, self.pending, self.hold),
            due: parse_stored_due(self.due.as_deref())?,
            assigned_to: self.assigned_to,
            priority: self.priority,
            subtasks,
        })
    }

    fn from_task(task: &Task) -> Self {
        let (done, pending, hold) = task.status.flags();
        Self {
            id: task.id,
            description: task.description.clone(),
            done,
            pending,
            hold,
            due: task.due.map(format_due),
            assigned_to: task.assigned_to.clone(),
            priority: task.priority.clone(),
            subtasks: task
                .subtasks
                .iter()
                .map(|subtask| StoredSubtask::from_subtask(task, subtask))
                .collect(),
        }
    }
}

impl StoredSubtask {
    fn into_subtask(self) -> Result<Subtask> {
        let (done, pending, hold) = (self.done, self.pending, self.hold);
        Ok(Subtask {
            local: parse_stored_subtask_id(&self.id)?,
            description: self.description,
            status: Status::from_flags(done, pending, hold),
            due: parse_stored_due(self.due.as_deref())?,
            assigned_to: self.assigned_to,
            priority: self.priority,
        })
    }

    fn from_subtask(parent: &Task, subtask: &Subtask) -> Self {
        let (done, pending, hold) = subtask.status.flags();
        Self {
            id: parent.subtask_id(subtask),
            description: subtask.description.clone(),
            done,
            pending,
            hold,
            due: subtask.due.map(format_due),
            assigned_to: subtask.assigned_to.clone(),
            priority: subtask.priority.clone(),
        }
    }
}

/// Local index from a stored `"<parent>-<local>"` subtask id.
fn parse_stored_subtask_id(raw: &str) -> Result<u32> {
    raw.split_once('-')
        .and_then(|(_, local)| local.trim().parse::<u32>().ok())
        .ok_or_else(|| {
            Error::OperationFailed(format!("malformed subtask id '{raw}' in data file"))
        })
}

/// Parse a stored due value, accepting ISO and the older day-first form.
///
/// Text matching neither format fails the load; the document needs fixing
/// before a rewrite could silently drop the value.
fn parse_stored_due(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT_ISO)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, DATE_FORMAT_LEGACY))
        .map(Some)
        .map_err(|_| Error::InvalidDate(trimmed.to_string()))
}

fn format_due(due: NaiveDate) -> String {
    due.format(DATE_FORMAT_ISO).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::TaskRef;
    use crate::task;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    fn storage_in(dir: &TempDir) -> Storage {
        Storage::new(dir.path().join("tasks.json"))
    }

    fn date(text: &str) -> NaiveDate {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").expect("date")
    }

    #[test]
    fn resolve_prefers_cli_path_over_config() {
        let config = Config {
            data_file: Some(PathBuf::from("/tmp/from-config.json")),
            ..Config::default()
        };

        let storage = Storage::resolve(Some(PathBuf::from("/tmp/from-flag.json")), &config)
            .expect("resolve");
        assert_eq!(storage.data_file(), Path::new("/tmp/from-flag.json"));

        let storage = Storage::resolve(None, &config).expect("resolve");
        assert_eq!(storage.data_file(), Path::new("/tmp/from-config.json"));
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().expect("tempdir");
        let storage = storage_in(&dir);
        assert!(storage.load().expect("load").is_empty());
    }

    #[test]
    fn bootstrap_creates_empty_list() {
        let dir = TempDir::new().expect("tempdir");
        let storage = storage_in(&dir);

        storage.bootstrap_from(None).expect("bootstrap");
        let content = fs::read_to_string(storage.data_file()).expect("read");
        assert_eq!(content, "[]");

        // Second run leaves the file alone
        storage.save(&[sample_task(1)]).expect("save");
        storage.bootstrap_from(None).expect("bootstrap again");
        assert_eq!(storage.load().expect("load").len(), 1);
    }

    #[test]
    fn bootstrap_seeds_from_template() {
        let dir = TempDir::new().expect("tempdir");
        let storage = storage_in(&dir);
        let template = dir.path().join("template.json");
        let seeded = Storage::new(template.clone());
        seeded.save(&[sample_task(1)]).expect("write template");

        storage.bootstrap_from(Some(&template)).expect("bootstrap");
        let tasks = storage.load().expect("load");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].description, "task 1");
    }

    // The seed must not land while another invocation is mid-cycle, and
    // must back off entirely once that invocation has written its tasks.
    #[test]
    fn bootstrap_waits_for_the_update_lock() {
        let dir = TempDir::new().expect("tempdir");
        let storage = storage_in(&dir);
        let lock_path = PathBuf::from(format!("{}.lock", storage.data_file().display()));

        let held = FileLock::acquire(&lock_path, 1000).expect("hold lock");
        let bootstrapper = {
            let storage = storage.clone();
            thread::spawn(move || storage.bootstrap_from(None))
        };

        thread::sleep(Duration::from_millis(300));
        assert!(
            !storage.data_file().exists(),
            "seed written while the lock was held"
        );

        storage.save(&[sample_task(1)]).expect("save");
        drop(held);

        bootstrapper.join().expect("join").expect("bootstrap");
        let loaded = storage.load().expect("load");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].description, "task 1");
    }

    #[test]
    fn save_load_round_trips() {
        let dir = TempDir::new().expect("tempdir");
        let storage = storage_in(&dir);

        let mut tasks = Vec::new();
        task::add(&mut tasks, "write report", Some(date("2026-09-01")), "alice", "high")
            .expect("add");
        task::add(&mut tasks, "file taxes", None, "", "low").expect("add");
        task::add_subtask(&mut tasks, 1, "gather numbers", None, "bob", "medium")
            .expect("subtask");
        task::set_status(&mut tasks, TaskRef::Subtask(1, 1), Status::Pending).expect("pending");
        task::set_status(&mut tasks, TaskRef::Primary(2), Status::Hold).expect("hold");

        storage.save(&tasks).expect("save");
        let loaded = storage.load().expect("load");
        assert_eq!(loaded, tasks);
    }

    #[test]
    fn saved_document_keeps_legacy_field_names() {
        let dir = TempDir::new().expect("tempdir");
        let storage = storage_in(&dir);

        let mut tasks = Vec::new();
        task::add(&mut tasks, "write report", Some(date("2026-09-01")), "alice", "high")
            .expect("add");
        task::add_subtask(&mut tasks, 1, "gather numbers", None, "", "low").expect("subtask");
        storage.save(&tasks).expect("save");

        let raw = fs::read_to_string(storage.data_file()).expect("read");
        assert!(raw.contains("\"AssignedTo\""));
        assert!(raw.contains("\"done\""));
        assert!(raw.contains("\"pending\""));
        assert!(raw.contains("\"hold\""));
        assert!(raw.contains("\"1-1\""));
        assert!(raw.contains("2026-09-01"));
    }

    #[test]
    fn load_defaults_missing_fields() {
        let dir = TempDir::new().expect("tempdir");
        let storage = storage_in(&dir);
        fs::write(
            storage.data_file(),
            r#"[{"id": 1, "description": "bare"}]"#,
        )
        .expect("write");

        let tasks = storage.load().expect("load");
        assert_eq!(tasks.len(), 1);
        let task = &tasks[0];
        assert_eq!(task.status, Status::NotStarted);
        assert!(task.due.is_none());
        assert_eq!(task.assigned_to, "");
        assert_eq!(task.priority, "low");
        assert!(task.subtasks.is_empty());
    }

    #[test]
    fn load_accepts_day_first_dates_and_saves_iso() {
        let dir = TempDir::new().expect("tempdir");
        let storage = storage_in(&dir);
        fs::write(
            storage.data_file(),
            r#"[{"id": 1, "description": "old", "due": "25-12-2026"}]"#,
        )
        .expect("write");

        let tasks = storage.load().expect("load");
        assert_eq!(tasks[0].due, Some(date("2026-12-25")));

        storage.save(&tasks).expect("save");
        let raw = fs::read_to_string(storage.data_file()).expect("read");
        assert!(raw.contains("2026-12-25"));
        assert!(!raw.contains("25-12-2026"));
    }

    #[test]
    fn load_rejects_unparseable_date() {
        let dir = TempDir::new().expect("tempdir");
        let storage = storage_in(&dir);
        fs::write(
            storage.data_file(),
            r#"[{"id": 1, "description": "bad", "due": "next tuesday"}]"#,
        )
        .expect("write");

        let err = storage.load().expect_err("bad date");
        match err {
            Error::InvalidDate(value) => assert_eq!(value, "next tuesday"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_normalizes_conflicting_status_flags() {
        let dir = TempDir::new().expect("tempdir");
        let storage = storage_in(&dir);
        fs::write(
            storage.data_file(),
            r#"[{"id": 1, "description": "both", "done": true, "pending": true}]"#,
        )
        .expect("write");

        let tasks = storage.load().expect("load");
        assert_eq!(tasks[0].status, Status::Done);
    }

    #[test]
    fn load_rejects_malformed_subtask_id() {
        let dir = TempDir::new().expect("tempdir");
        let storage = storage_in(&dir);
        fs::write(
            storage.data_file(),
            r#"[{"id": 1, "description": "p", "subtasks": [{"id": "weird", "description": "s"}]}]"#,
        )
        .expect("write");

        let err = storage.load().expect_err("bad subtask id");
        assert!(matches!(err, Error::OperationFailed(_)));
    }

    #[test]
    fn update_persists_mutation() {
        let dir = TempDir::new().expect("tempdir");
        let storage = storage_in(&dir);

        let created = storage
            .update(|tasks| task::add(tasks, "from update", None, "", "low"))
            .expect("update");
        assert_eq!(created.id, 1);

        let loaded = storage.load().expect("load");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].description, "from update");
    }

    #[test]
    fn failed_update_writes_nothing() {
        let dir = TempDir::new().expect("tempdir");
        let storage = storage_in(&dir);
        storage.save(&[sample_task(1)]).expect("seed");
        let before = fs::read_to_string(storage.data_file()).expect("read");

        let result: Result<()> = storage.update(|tasks| {
            tasks.clear();
            Err(Error::NotFound("9".to_string()))
        });
        assert!(result.is_err());

        let after = fs::read_to_string(storage.data_file()).expect("read");
        assert_eq!(before, after);
    }

    fn sample_task(id: u32) -> Task {
        Task {
            id,
            description: format!("task {id}"),
            status: Status::NotStarted,
            due: None,
            assigned_to: String::new(),
            priority: DEFAULT_PRIORITY.to_string(),
            subtasks: Vec::new(),
        }
    }
}
