//! Task identifier parsing.
//!
//! Identifiers arrive as text on the command line: `3` names a primary
//! task, `3-1` names the first subtask of task 3. They are parsed once at
//! the command boundary into a [`TaskRef`]; everything below the CLI works
//! with the parsed form.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Parsed task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskRef {
    /// A primary task id.
    Primary(u32),
    /// A subtask as `(parent id, local index)`.
    Subtask(u32, u32),
}

impl TaskRef {
    /// Parse a textual identifier (`N` or `N-M`, both positive).
    pub fn parse(raw: &str) -> Result<TaskRef> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidArgument("task id cannot be empty".to_string()));
        }

        if let Some((parent, local)) = trimmed.split_once('-') {
            let parent = parse_part(parent, raw)?;
            let local = parse_part(local, raw)?;
            return Ok(TaskRef::Subtask(parent, local));
        }

        Ok(TaskRef::Primary(parse_part(trimmed, raw)?))
    }

    /// True when this names a subtask.
    pub fn is_subtask(&self) -> bool {
        matches!(self, TaskRef::Subtask(_, _))
    }
}

fn parse_part(part: &str, raw: &str) -> Result<u32> {
    match part.trim().parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(Error::InvalidArgument(format!(
            "invalid task id '{raw}' (expected a number like 3 or 3-1)"
        ))),
    }
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskRef::Primary(id) => write!(f, "{id}"),
            TaskRef::Subtask(parent, local) => write!(f, "{parent}-{local}"),
        }
    }
}

impl FromStr for TaskRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<TaskRef> {
        TaskRef::parse(s)
    }
}
