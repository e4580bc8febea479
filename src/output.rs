//! Shared output formatting for todo CLI commands.
//!
//! Every command emits either a one-line human confirmation (a table for
//! `list`) or, with `--json`, a stable envelope carrying the machine
//! payload. `--quiet` suppresses the human form only.

use colored::Colorize;
use serde::Serialize;

use crate::error::{Error, JsonError, Result};

pub const SCHEMA_VERSION: &str = "todo.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

/// Print the success envelope for a command's machine payload.
pub fn emit_data<T: Serialize>(command: &str, data: &T) -> Result<()> {
    #[derive(Serialize)]
    struct Envelope<'a, T: Serialize> {
        schema_version: &'static str,
        command: &'a str,
        status: &'static str,
        data: &'a T,
    }

    let payload = Envelope {
        schema_version: SCHEMA_VERSION,
        command,
        status: "success",
        data,
    };

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

/// Emit a successful command result: the envelope with `--json`, the
/// confirmation line otherwise.
pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    message: &str,
) -> Result<()> {
    if options.json {
        return emit_data(command, data);
    }

    if options.quiet {
        return Ok(());
    }

    println!("{} {message}", "✓".green());
    Ok(())
}

/// Emit an error, as an envelope with `--json` or to stderr otherwise.
pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let next_steps = error_next_steps(err);
    let hint = next_steps.first().map(|step| step.as_str());

    if json {
        #[derive(Serialize)]
        struct Envelope<'a> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            kind: &'static str,
            error: JsonError,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            kind: error_kind(err),
            error: JsonError::from(err),
            next_steps,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    eprintln!("{} {err}", "error:".red());
    if let Some(hint) = hint {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

/// Best-effort command name for error envelopes, usable even when clap
/// parsing itself failed.
pub fn infer_command_name_from_args() -> String {
    const VERBS: [&str; 8] = [
        "list", "add", "subtask", "pending", "hold", "complete", "delete", "edit",
    ];

    std::env::args()
        .skip(1)
        .find(|arg| VERBS.contains(&arg.as_str()))
        .unwrap_or_else(|| "todo".to_string())
}

fn error_kind(err: &Error) -> &'static str {
    match err.exit_code() {
        2 => "user_error",
        3 => "policy_blocked",
        _ => "operation_failed",
    }
}

fn error_next_steps(err: &Error) -> Vec<String> {
    match err {
        Error::NotFound(_) => vec!["todo list --all".to_string()],
        Error::IncompleteSubtasks { id, .. } => {
            vec![format!("todo complete {id}-<n> for each open subtask")]
        }
        Error::InvalidConfig(_) => vec!["fix ~/.todo.toml then retry".to_string()],
        _ => Vec::new(),
    }
}
