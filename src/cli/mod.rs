//! Command-line interface for todo
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command is defined in its own submodule.

use clap::{Parser, Subcommand};

use crate::error::Result;

mod add;
mod delete;
mod edit;
mod list;
mod status;

/// todo - personal task tracker
///
/// Tracks tasks and nested subtasks in a single JSON file under your home
/// directory, with filtered and sorted table views.
#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the task data file (defaults to ~/.todo_data.json)
    #[arg(long, global = true, env = "TODO_FILE")]
    pub file: Option<std::path::PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tasks
    List {
        /// Include completed tasks
        #[arg(short, long)]
        all: bool,

        /// Sort key: due, assigned, priority, or id
        #[arg(long, default_value = "due")]
        sort: String,

        /// Only tasks due on or before DATE (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        due_before: Option<String>,

        /// Only tasks due on or after DATE (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        due_after: Option<String>,

        /// Only tasks due today
        #[arg(long)]
        due_today: bool,

        /// Only tasks due within the next 7 days
        #[arg(long)]
        due_week: bool,

        /// Only tasks due within the next 30 days
        #[arg(long)]
        due_month: bool,

        /// Keep tasks whose description contains TEXT (case-insensitive)
        #[arg(long, value_name = "TEXT")]
        filter: Option<String>,
    },

    /// Add a task
    Add {
        /// Task description
        description: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        due: Option<String>,

        /// Person responsible for the task
        #[arg(long = "assigned-to", value_name = "NAME")]
        assigned_to: Option<String>,

        /// Priority: critical, high, medium, or low
        #[arg(long, default_value = "low", value_name = "LEVEL")]
        priority: String,
    },

    /// Add a subtask under an existing task
    Subtask {
        /// Parent task id
        parent_id: u32,

        /// Subtask description
        description: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        due: Option<String>,

        /// Person responsible for the subtask
        #[arg(long = "assigned-to", value_name = "NAME")]
        assigned_to: Option<String>,

        /// Priority: critical, high, medium, or low
        #[arg(long, default_value = "low", value_name = "LEVEL")]
        priority: String,
    },

    /// Mark a task or subtask as pending
    Pending {
        /// Task id (e.g. 3) or subtask id (e.g. 3-1)
        id: String,
    },

    /// Put a task or subtask on hold
    Hold {
        /// Task id (e.g. 3) or subtask id (e.g. 3-1)
        id: String,
    },

    /// Mark a task or subtask as complete
    Complete {
        /// Task id (e.g. 3) or subtask id (e.g. 3-1)
        id: String,
    },

    /// Delete a task or subtask
    Delete {
        /// Task id (e.g. 3) or subtask id (e.g. 3-1)
        id: String,
    },

    /// Edit fields of a task or subtask
    Edit {
        /// Task id (e.g. 3) or subtask id (e.g. 3-1)
        id: String,

        /// New description
        #[arg(long, value_name = "TEXT")]
        description: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        due: Option<String>,

        /// New assignee
        #[arg(long = "assigned-to", value_name = "NAME")]
        assigned_to: Option<String>,

        /// New priority: critical, high, medium, or low
        #[arg(long, value_name = "LEVEL")]
        priority: Option<String>,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::List {
                all,
                sort,
                due_before,
                due_after,
                due_today,
                due_week,
                due_month,
                filter,
            } => list::run(list::ListOptions {
                all,
                sort,
                due_before,
                due_after,
                due_today,
                due_week,
                due_month,
                filter,
                file: self.file,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Add {
                description,
                due,
                assigned_to,
                priority,
            } => add::run_add(add::AddOptions {
                description,
                due,
                assigned_to,
                priority,
                file: self.file,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Subtask {
                parent_id,
                description,
                due,
                assigned_to,
                priority,
            } => add::run_subtask(add::SubtaskOptions {
                parent_id,
                description,
                due,
                assigned_to,
                priority,
                file: self.file,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Pending { id } => status::run_pending(status::StatusOptions {
                id,
                file: self.file,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Hold { id } => status::run_hold(status::StatusOptions {
                id,
                file: self.file,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Complete { id } => status::run_complete(status::StatusOptions {
                id,
                file: self.file,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Delete { id } => delete::run(delete::DeleteOptions {
                id,
                file: self.file,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Edit {
                id,
                description,
                due,
                assigned_to,
                priority,
            } => edit::run(edit::EditOptions {
                id,
                description,
                due,
                assigned_to,
                priority,
                file: self.file,
                json: self.json,
                quiet: self.quiet,
            }),
        }
    }
}
