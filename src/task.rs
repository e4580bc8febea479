//! Task domain model for todo.
//!
//! The whole task list is loaded into memory at the start of an invocation
//! and written back whole after a mutation. Status is a single enumeration
//! here; the stored JSON keeps the legacy three-boolean shape and the
//! conversion lives at the storage boundary.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::id::TaskRef;

pub const DEFAULT_PRIORITY: &str = "low";
pub const PRIORITIES: [&str; 4] = ["critical", "high", "medium", "low"];

/// Task status. At most one of the stored flags is set at any time;
/// none set means `NotStarted`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    NotStarted,
    Pending,
    Hold,
    Done,
}

impl Status {
    /// Rebuild the status from the stored flags.
    ///
    /// An inconsistent combination (more than one flag set) normalizes with
    /// precedence Done > Hold > Pending.
    pub fn from_flags(done: bool, pending: bool, hold: bool) -> Status {
        if done {
            Status::Done
        } else if hold {
            Status::Hold
        } else if pending {
            Status::Pending
        } else {
            Status::NotStarted
        }
    }

    /// Stored representation as `(done, pending, hold)`.
    pub fn flags(&self) -> (bool, bool, bool) {
        match self {
            Status::NotStarted => (false, false, false),
            Status::Pending => (false, true, false),
            Status::Hold => (false, false, true),
            Status::Done => (true, false, false),
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Status::Done)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::NotStarted => "not started",
            Status::Pending => "pending",
            Status::Hold => "hold",
            Status::Done => "done",
        };
        write!(f, "{label}")
    }
}

/// A primary task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: u32,
    pub description: String,
    pub status: Status,
    pub due: Option<NaiveDate>,
    pub assigned_to: String,
    pub priority: String,
    pub subtasks: Vec<Subtask>,
}

/// A subtask owned by one primary task. Its public id is the composite
/// `"<parent>-<local>"`; only the local index is kept here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtask {
    pub local: u32,
    pub description: String,
    pub status: Status,
    pub due: Option<NaiveDate>,
    pub assigned_to: String,
    pub priority: String,
}

impl Task {
    /// Composite id for one of this task's subtasks.
    pub fn subtask_id(&self, subtask: &Subtask) -> String {
        format!("{}-{}", self.id, subtask.local)
    }

    /// Number of subtasks not yet Done.
    pub fn incomplete_subtasks(&self) -> usize {
        self.subtasks
            .iter()
            .filter(|subtask| !subtask.status.is_done())
            .count()
    }

    /// Apply a status transition. Entering Done is guarded: it fails while
    /// any subtask is not Done, leaving the current status untouched.
    pub fn set_status(&mut self, status: Status) -> Result<()> {
        if status.is_done() {
            let incomplete = self.incomplete_subtasks();
            if incomplete > 0 {
                return Err(Error::IncompleteSubtasks {
                    id: self.id,
                    incomplete,
                });
            }
        }
        self.status = status;
        Ok(())
    }
}

impl Subtask {
    /// Apply a status transition. Subtask transitions are never guarded.
    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }
}

/// Fields to overwrite in an edit. Absent fields are left unchanged; a
/// field cannot be cleared through an edit, only replaced.
#[derive(Debug, Clone, Default)]
pub struct EditPatch {
    pub description: Option<String>,
    pub due: Option<NaiveDate>,
    pub assigned_to: Option<String>,
    pub priority: Option<String>,
}

impl EditPatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.due.is_none()
            && self.assigned_to.is_none()
            && self.priority.is_none()
    }
}

/// Rank for priority sorting: position in [`PRIORITIES`], unknown values
/// after all known ones.
pub fn priority_rank(priority: &str) -> usize {
    let trimmed = priority.trim();
    PRIORITIES
        .iter()
        .position(|entry| entry.eq_ignore_ascii_case(trimmed))
        .unwrap_or(PRIORITIES.len())
}

/// Parse a date given on the command line. Input is strict ISO; only
/// stored documents get the legacy-format tolerance.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(trimmed.to_string()))
}

/// Validate a priority given on the command line, normalizing case.
/// Stored documents may carry other values; new input is restricted to
/// the known levels.
pub fn validate_priority(raw: &str) -> Result<String> {
    let lower = raw.trim().to_lowercase();
    if PRIORITIES.contains(&lower.as_str()) {
        Ok(lower)
    } else {
        Err(Error::InvalidArgument(format!(
            "invalid priority '{raw}': must be critical, high, medium, or low"
        )))
    }
}

/// Append a new primary task. The id is computed from the current count
/// (`len + 1`), which deliberately reuses the slot freed by deleting the
/// highest-numbered task.
pub fn add(
    tasks: &mut Vec<Task>,
    description: &str,
    due: Option<NaiveDate>,
    assigned_to: &str,
    priority: &str,
) -> Result<Task> {
    let description = validate_description(description)?;
    let task = Task {
        id: tasks.len() as u32 + 1,
        description,
        status: Status::NotStarted,
        due,
        assigned_to: assigned_to.to_string(),
        priority: priority.to_string(),
        subtasks: Vec::new(),
    };
    tasks.push(task.clone());
    Ok(task)
}

/// Append a subtask under `parent`. The local index follows the same
/// count-based rule as primary ids.
pub fn add_subtask(
    tasks: &mut [Task],
    parent: u32,
    description: &str,
    due: Option<NaiveDate>,
    assigned_to: &str,
    priority: &str,
) -> Result<Subtask> {
    let description = validate_description(description)?;
    let task = find_mut(tasks, parent)
        .ok_or_else(|| Error::NotFound(parent.to_string()))?;
    let subtask = Subtask {
        local: task.subtasks.len() as u32 + 1,
        description,
        status: Status::NotStarted,
        due,
        assigned_to: assigned_to.to_string(),
        priority: priority.to_string(),
    };
    task.subtasks.push(subtask.clone());
    Ok(subtask)
}

pub fn find(tasks: &[Task], id: u32) -> Option<&Task> {
    tasks.iter().find(|task| task.id == id)
}

pub fn find_mut(tasks: &mut [Task], id: u32) -> Option<&mut Task> {
    tasks.iter_mut().find(|task| task.id == id)
}

pub fn find_subtask(tasks: &[Task], parent: u32, local: u32) -> Option<(&Task, &Subtask)> {
    let task = find(tasks, parent)?;
    let subtask = task.subtasks.iter().find(|subtask| subtask.local == local)?;
    Some((task, subtask))
}

pub fn find_subtask_mut(tasks: &mut [Task], parent: u32, local: u32) -> Option<&mut Subtask> {
    find_mut(tasks, parent)?
        .subtasks
        .iter_mut()
        .find(|subtask| subtask.local == local)
}

/// Remove a task (cascading to its subtasks) or a single subtask.
pub fn remove(tasks: &mut Vec<Task>, target: TaskRef) -> Result<()> {
    match target {
        TaskRef::Primary(id) => {
            let index = tasks
                .iter()
                .position(|task| task.id == id)
                .ok_or_else(|| Error::NotFound(target.to_string()))?;
            tasks.remove(index);
            Ok(())
        }
        TaskRef::Subtask(parent, local) => {
            let task = find_mut(tasks, parent)
                .ok_or_else(|| Error::NotFound(target.to_string()))?;
            let index = task
                .subtasks
                .iter()
                .position(|subtask| subtask.local == local)
                .ok_or_else(|| Error::NotFound(target.to_string()))?;
            task.subtasks.remove(index);
            Ok(())
        }
    }
}

/// Apply an edit patch to a task or subtask.
pub fn edit(tasks: &mut [Task], target: TaskRef, patch: &EditPatch) -> Result<()> {
    match target {
        TaskRef::Primary(id) => {
            let task = find_mut(tasks, id)
                .ok_or_else(|| Error::NotFound(target.to_string()))?;
            apply_patch(
                patch,
                &mut task.description,
                &mut task.due,
                &mut task.assigned_to,
                &mut task.priority,
            );
        }
        TaskRef::Subtask(parent, local) => {
            let subtask = find_subtask_mut(tasks, parent, local)
                .ok_or_else(|| Error::NotFound(target.to_string()))?;
            apply_patch(
                patch,
                &mut subtask.description,
                &mut subtask.due,
                &mut subtask.assigned_to,
                &mut subtask.priority,
            );
        }
    }
    Ok(())
}

/// Apply a status transition to a task or subtask, enforcing the
/// completion guard for primary tasks.
pub fn set_status(tasks: &mut [Task], target: TaskRef, status: Status) -> Result<()> {
    match target {
        TaskRef::Primary(id) => {
            let task = find_mut(tasks, id)
                .ok_or_else(|| Error::NotFound(target.to_string()))?;
            task.set_status(status)
        }
        TaskRef::Subtask(parent, local) => {
            let subtask = find_subtask_mut(tasks, parent, local)
                .ok_or_else(|| Error::NotFound(target.to_string()))?;
            subtask.set_status(status);
            Ok(())
        }
    }
}

fn apply_patch(
    patch: &EditPatch,
    description: &mut String,
    due: &mut Option<NaiveDate>,
    assigned_to: &mut String,
    priority: &mut String,
) {
    if let Some(value) = &patch.description {
        *description = value.clone();
    }
    if let Some(value) = patch.due {
        *due = Some(value);
    }
    if let Some(value) = &patch.assigned_to {
        *assigned_to = value.clone();
    }
    if let Some(value) = &patch.priority {
        *priority = value.clone();
    }
}

fn validate_description(description: &str) -> Result<String> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument(
            "description cannot be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
