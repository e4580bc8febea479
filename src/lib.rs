//! todo - personal task tracker library
//!
//! This library provides the core functionality for the todo CLI tool:
//! a single-file JSON task store with nested subtasks, guarded completion,
//! and a filterable, sortable table view.
//!
//! # Core Concepts
//!
//! - **Tasks and subtasks**: numbered records, subtasks addressed as
//!   `<parent>-<local>` composites
//! - **Status**: one of not-started, pending, hold, done; stored as three
//!   booleans for compatibility with existing data files
//! - **Completion guard**: a task cannot complete while any of its
//!   subtasks is incomplete
//! - **Queries**: composable due-date windows, a keyword filter, and one
//!   sort key per invocation
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `~/.todo.toml`
//! - `error`: Error types and result aliases
//! - `id`: Task and subtask identifier parsing
//! - `task`: Task records, status transitions, and edits
//! - `query`: List filtering and sorting
//! - `render`: Table rendering for the list view
//! - `output`: Human confirmations and JSON envelopes
//! - `storage`: JSON persistence with defaulting and normalization
//! - `lock`: File locking and atomic writes for concurrency safety

pub mod cli;
pub mod config;
pub mod error;
pub mod id;
pub mod lock;
pub mod output;
pub mod query;
pub mod render;
pub mod storage;
pub mod task;

pub use error::{Error, Result};
