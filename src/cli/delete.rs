//! todo delete command implementation
//!
//! Deleting a primary task cascades to its subtasks; deleting a subtask
//! leaves the parent in place.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::id::TaskRef;
use crate::output::{emit_success, OutputOptions};
use crate::storage::Storage;
use crate::task;

/// Options for the delete command
pub struct DeleteOptions {
    pub id: String,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// Deleted target for JSON output
#[derive(Debug, Serialize)]
pub struct DeleteOutput {
    pub id: String,
}

pub fn run(options: DeleteOptions) -> Result<()> {
    let config = Config::load_default()?;
    let storage = Storage::resolve(options.file.clone(), &config)?;
    storage.bootstrap()?;

    let target: TaskRef = options.id.parse()?;
    storage.update(|tasks| task::remove(tasks, target))?;

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "delete",
        &DeleteOutput {
            id: target.to_string(),
        },
        &format!("Task {target} deleted."),
    )
}
