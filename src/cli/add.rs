//! todo add and subtask command implementations
//!
//! Both append one record under the data-file lock and report the created
//! row. When `--assigned-to` is omitted the config file's owner is used.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::output::{emit_success, OutputOptions};
use crate::storage::Storage;
use crate::task::{self, Status};

/// Options for the add command
pub struct AddOptions {
    pub description: String,
    pub due: Option<String>,
    pub assigned_to: Option<String>,
    pub priority: String,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Options for the subtask command
pub struct SubtaskOptions {
    pub parent_id: u32,
    pub description: String,
    pub due: Option<String>,
    pub assigned_to: Option<String>,
    pub priority: String,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Created row for JSON output
#[derive(Debug, Serialize)]
pub struct AddOutput {
    pub id: String,
    pub description: String,
    pub status: Status,
    pub due: Option<NaiveDate>,
    pub assigned_to: String,
    pub priority: String,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let config = Config::load_default()?;
    let storage = Storage::resolve(options.file.clone(), &config)?;
    storage.bootstrap()?;

    let due = options.due.as_deref().map(task::parse_date).transpose()?;
    let priority = task::validate_priority(&options.priority)?;
    let assigned_to = assignee(options.assigned_to.as_deref(), &config);

    let created = storage.update(|tasks| {
        task::add(tasks, &options.description, due, &assigned_to, &priority)
    })?;

    let output = AddOutput {
        id: created.id.to_string(),
        description: created.description.clone(),
        status: created.status,
        due: created.due,
        assigned_to: created.assigned_to.clone(),
        priority: created.priority.clone(),
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "add",
        &output,
        &format!("Task {} added.", created.id),
    )
}

pub fn run_subtask(options: SubtaskOptions) -> Result<()> {
    let config = Config::load_default()?;
    let storage = Storage::resolve(options.file.clone(), &config)?;
    storage.bootstrap()?;

    let due = options.due.as_deref().map(task::parse_date).transpose()?;
    let priority = task::validate_priority(&options.priority)?;
    let assigned_to = assignee(options.assigned_to.as_deref(), &config);

    let created = storage.update(|tasks| {
        task::add_subtask(
            tasks,
            options.parent_id,
            &options.description,
            due,
            &assigned_to,
            &priority,
        )
    })?;

    let id = format!("{}-{}", options.parent_id, created.local);
    let output = AddOutput {
        id: id.clone(),
        description: created.description.clone(),
        status: created.status,
        due: created.due,
        assigned_to: created.assigned_to.clone(),
        priority: created.priority.clone(),
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "subtask",
        &output,
        &format!("Subtask {id} added."),
    )
}

fn assignee(flag: Option<&str>, config: &Config) -> String {
    match flag {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => config.owner.clone(),
    }
}
