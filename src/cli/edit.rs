//! todo edit command implementation
//!
//! Overwrites the given fields of a task or subtask. Fields left off the
//! command line, or passed as empty strings, keep their stored value; a
//! field cannot be cleared, only replaced.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::id::TaskRef;
use crate::output::{emit_success, OutputOptions};
use crate::storage::Storage;
use crate::task::{self, EditPatch, Status, Task};

/// Options for the edit command
pub struct EditOptions {
    pub id: String,
    pub description: Option<String>,
    pub due: Option<String>,
    pub assigned_to: Option<String>,
    pub priority: Option<String>,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Record state after the edit
#[derive(Debug, Serialize)]
pub struct EditOutput {
    pub id: String,
    pub description: String,
    pub status: Status,
    pub due: Option<NaiveDate>,
    pub assigned_to: String,
    pub priority: String,
}

pub fn run(options: EditOptions) -> Result<()> {
    let config = Config::load_default()?;
    let storage = Storage::resolve(options.file.clone(), &config)?;
    storage.bootstrap()?;

    let target: TaskRef = options.id.parse()?;
    let patch = build_patch(&options)?;

    let output = storage.update(|tasks| {
        task::edit(tasks, target, &patch)?;
        snapshot(tasks, target).ok_or_else(|| Error::NotFound(target.to_string()))
    })?;

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "edit",
        &output,
        &format!("Task {target} updated."),
    )
}

/// Empty strings on the command line mean "leave unchanged", same as
/// omitting the flag.
fn build_patch(options: &EditOptions) -> Result<EditPatch> {
    let patch = EditPatch {
        description: filled(options.description.as_deref()),
        due: filled(options.due.as_deref())
            .map(|raw| task::parse_date(&raw))
            .transpose()?,
        assigned_to: filled(options.assigned_to.as_deref()),
        priority: filled(options.priority.as_deref())
            .map(|raw| task::validate_priority(&raw))
            .transpose()?,
    };

    if patch.is_empty() {
        return Err(Error::InvalidArgument(
            "nothing to change: pass --description, --due, --assigned-to, or --priority"
                .to_string(),
        ));
    }
    Ok(patch)
}

fn filled(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn snapshot(tasks: &[Task], target: TaskRef) -> Option<EditOutput> {
    match target {
        TaskRef::Primary(id) => {
            let task = task::find(tasks, id)?;
            Some(EditOutput {
                id: task.id.to_string(),
                description: task.description.clone(),
                status: task.status,
                due: task.due,
                assigned_to: task.assigned_to.clone(),
                priority: task.priority.clone(),
            })
        }
        TaskRef::Subtask(parent, local) => {
            let (task, subtask) = task::find_subtask(tasks, parent, local)?;
            Some(EditOutput {
                id: task.subtask_id(subtask),
                description: subtask.description.clone(),
                status: subtask.status,
                due: subtask.due,
                assigned_to: subtask.assigned_to.clone(),
                priority: subtask.priority.clone(),
            })
        }
    }
}
