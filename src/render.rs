//! Table rendering for the list view
//!
//! Rows are flattened from a selection: each parent task followed by its
//! visible subtasks, the subtask id dimmed and the description carrying a
//! tree-branch marker. Cell colors only apply when stdout is a terminal,
//! which comfy-table handles itself.

use chrono::NaiveDate;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use serde::Serialize;

use crate::query::Selected;
use crate::task::{Status, Subtask, Task};

/// Shown when the status and date filters leave nothing.
pub const EMPTY_MESSAGE: &str = "No tasks to show.";

/// Shown when the keyword filter emptied a non-empty selection.
pub const NO_MATCH_MESSAGE: &str = "No tasks match filter.";

/// One flattened output row, shared by the table and `--json` paths.
#[derive(Debug, Serialize)]
pub struct Row {
    pub id: String,
    pub description: String,
    pub status: Status,
    pub due: Option<NaiveDate>,
    pub assigned_to: String,
    pub priority: String,
    pub subtask: bool,
}

/// Flatten a selection into rows, parents first, subtasks beneath.
pub fn rows(selected: &Selected<'_>) -> Vec<Row> {
    let mut rows = Vec::new();
    for listing in &selected.listings {
        rows.push(task_row(listing.task));
        for subtask in &listing.subtasks {
            rows.push(subtask_row(listing.task, subtask));
        }
    }
    rows
}

fn task_row(task: &Task) -> Row {
    Row {
        id: task.id.to_string(),
        description: task.description.clone(),
        status: task.status,
        due: task.due,
        assigned_to: task.assigned_to.clone(),
        priority: task.priority.clone(),
        subtask: false,
    }
}

fn subtask_row(parent: &Task, subtask: &Subtask) -> Row {
    Row {
        id: parent.subtask_id(subtask),
        description: subtask.description.clone(),
        status: subtask.status,
        due: subtask.due,
        assigned_to: subtask.assigned_to.clone(),
        priority: subtask.priority.clone(),
        subtask: true,
    }
}

/// Render the selection as a table, or the applicable no-tasks message.
pub fn render(selected: &Selected<'_>) -> String {
    if selected.is_empty() {
        return empty_message(selected).to_string();
    }
    table(selected).to_string()
}

/// Message for an empty selection.
pub fn empty_message(selected: &Selected<'_>) -> &'static str {
    if selected.before_keyword == 0 {
        EMPTY_MESSAGE
    } else {
        NO_MATCH_MESSAGE
    }
}

/// Build the list table.
pub fn table(selected: &Selected<'_>) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Description").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
        Cell::new("Due Date").fg(Color::Cyan),
        Cell::new("AssignedTo").fg(Color::Cyan),
        Cell::new("Priority").fg(Color::Cyan),
    ]);

    for listing in &selected.listings {
        add_task_row(&mut table, listing.task);
        for subtask in &listing.subtasks {
            add_subtask_row(&mut table, listing.task, subtask);
        }
    }

    table
}

fn add_task_row(table: &mut Table, task: &Task) {
    table.add_row(vec![
        Cell::new(task.id),
        Cell::new(&task.description),
        status_cell(task.status),
        Cell::new(due_text(task.due)),
        Cell::new(&task.assigned_to),
        priority_cell(&task.priority),
    ]);
}

fn add_subtask_row(table: &mut Table, parent: &Task, subtask: &Subtask) {
    table.add_row(vec![
        Cell::new(parent.subtask_id(subtask)).fg(Color::DarkGrey),
        Cell::new(format!("└─ {}", subtask.description)),
        status_cell(subtask.status),
        Cell::new(due_text(subtask.due)),
        Cell::new(&subtask.assigned_to),
        priority_cell(&subtask.priority),
    ]);
}

fn status_cell(status: Status) -> Cell {
    Cell::new(format!("{} {}", status_glyph(status), status)).fg(status_color(status))
}

fn priority_cell(priority: &str) -> Cell {
    let cell = Cell::new(priority);
    match priority_color(priority) {
        Some(color) => cell.fg(color),
        None => cell,
    }
}

fn due_text(due: Option<NaiveDate>) -> String {
    due.map(|date| date.to_string()).unwrap_or_default()
}

/// Status glyph shown ahead of the status text.
pub fn status_glyph(status: Status) -> &'static str {
    match status {
        Status::Done => "✓",
        Status::Hold => "=",
        Status::Pending => "»",
        Status::NotStarted => "✗",
    }
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Done => Color::Green,
        Status::Hold => Color::Yellow,
        Status::Pending => Color::Cyan,
        Status::NotStarted => Color::Red,
    }
}

// Unknown priorities stay uncolored rather than borrowing a known shade.
fn priority_color(priority: &str) -> Option<Color> {
    match priority.to_lowercase().as_str() {
        "critical" => Some(Color::Magenta),
        "high" => Some(Color::Yellow),
        "medium" => Some(Color::Cyan),
        "low" => Some(Color::Blue),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::TaskRef;
    use crate::query::{self, ListQuery};
    use crate::task;

    fn date(text: &str) -> NaiveDate {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").expect("date")
    }

    fn sample_tasks() -> Vec<Task> {
        let mut tasks = Vec::new();
        task::add(&mut tasks, "write report", Some(date("2026-09-01")), "alice", "high")
            .expect("add");
        task::add_subtask(&mut tasks, 1, "gather numbers", None, "bob", "medium")
            .expect("subtask");
        task::add(&mut tasks, "file taxes", None, "", "low").expect("add");
        task::set_status(&mut tasks, TaskRef::Primary(2), Status::Done).expect("done");
        tasks
    }

    fn select_all(tasks: &[Task]) -> Selected<'_> {
        let query = ListQuery {
            all: true,
            sort: query::SortKey::Id,
            ..ListQuery::default()
        };
        query::select(tasks, &query, date("2026-08-10"))
    }

    #[test]
    fn rows_flatten_parents_then_subtasks() {
        let tasks = sample_tasks();
        let selected = select_all(&tasks);
        let rows = rows(&selected);

        let ids: Vec<&str> = rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "1-1", "2"]);
        assert!(!rows[0].subtask);
        assert!(rows[1].subtask);
        assert_eq!(rows[1].description, "gather numbers");
        assert_eq!(rows[2].status, Status::Done);
    }

    #[test]
    fn table_carries_headers_rows_and_glyphs() {
        let tasks = sample_tasks();
        let selected = select_all(&tasks);
        let rendered = render(&selected);

        assert!(rendered.contains("ID"));
        assert!(rendered.contains("AssignedTo"));
        assert!(rendered.contains("write report"));
        assert!(rendered.contains("2026-09-01"));
        assert!(rendered.contains("└─ gather numbers"));
        assert!(rendered.contains("1-1"));
        assert!(rendered.contains("✓ done"));
        assert!(rendered.contains("✗ not started"));
    }

    #[test]
    fn empty_list_renders_nothing_to_show() {
        let tasks = Vec::new();
        let selected = query::select(&tasks, &ListQuery::default(), date("2026-08-10"));
        assert_eq!(render(&selected), EMPTY_MESSAGE);
    }

    #[test]
    fn emptying_keyword_renders_no_match() {
        let mut tasks = Vec::new();
        task::add(&mut tasks, "write report", None, "", "low").expect("add");

        let query = ListQuery {
            keyword: Some("zzz".to_string()),
            ..ListQuery::default()
        };
        let selected = query::select(&tasks, &query, date("2026-08-10"));
        assert_eq!(render(&selected), NO_MATCH_MESSAGE);
    }

    #[test]
    fn status_glyphs_cover_every_state() {
        assert_eq!(status_glyph(Status::Done), "✓");
        assert_eq!(status_glyph(Status::Hold), "=");
        assert_eq!(status_glyph(Status::Pending), "»");
        assert_eq!(status_glyph(Status::NotStarted), "✗");
    }
}
