//! todo pending, hold, and complete command implementations
//!
//! All three apply one status transition under the data-file lock. Only
//! completing a primary task is guarded; it fails while the task still has
//! incomplete subtasks.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::id::TaskRef;
use crate::output::{emit_success, OutputOptions};
use crate::storage::Storage;
use crate::task::{self, Status};

/// Options shared by the status commands
pub struct StatusOptions {
    pub id: String,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Applied transition for JSON output
#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub id: String,
    pub status: Status,
}

pub fn run_pending(options: StatusOptions) -> Result<()> {
    apply(options, Status::Pending, "pending")
}

pub fn run_hold(options: StatusOptions) -> Result<()> {
    apply(options, Status::Hold, "hold")
}

pub fn run_complete(options: StatusOptions) -> Result<()> {
    apply(options, Status::Done, "complete")
}

fn apply(options: StatusOptions, status: Status, command: &str) -> Result<()> {
    let config = Config::load_default()?;
    let storage = Storage::resolve(options.file.clone(), &config)?;
    storage.bootstrap()?;

    let target: TaskRef = options.id.parse()?;
    storage.update(|tasks| task::set_status(tasks, target, status))?;

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        command,
        &StatusOutput {
            id: target.to_string(),
            status,
        },
        &message(target, status),
    )
}

fn message(target: TaskRef, status: Status) -> String {
    match status {
        Status::Pending => format!("Task {target} marked as pending."),
        Status::Hold => format!("Task {target} put on hold."),
        Status::Done => format!("Task {target} marked as complete."),
        Status::NotStarted => format!("Task {target} reset."),
    }
}
