//! Filtering and sorting for the list view
//!
//! A query runs in a fixed order: the done cut (skipped with `--all`), then
//! the date windows, then the keyword filter, then one sort. Date windows
//! compare against the effective due date, which substitutes `today + 7`
//! days for tasks without one. Subtasks are never filtered by date or
//! keyword; within a selected parent only their own done flag decides
//! visibility.

use chrono::{Duration, NaiveDate};

use crate::error::Error;
use crate::task::{self, Subtask, Task};

/// Days ahead an undated task is treated as due.
pub const DEFAULT_DUE_DAYS: i64 = 7;

const DUE_WEEK_DAYS: i64 = 7;
const DUE_MONTH_DAYS: i64 = 30;

/// Sort key for the list view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Due,
    Assigned,
    Priority,
    Id,
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::Due
    }
}

impl std::str::FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "due" => Ok(SortKey::Due),
            "assigned" => Ok(SortKey::Assigned),
            "priority" => Ok(SortKey::Priority),
            "id" => Ok(SortKey::Id),
            _ => Err(Error::InvalidArgument(format!(
                "invalid sort key '{s}': must be due, assigned, priority, or id"
            ))),
        }
    }
}

/// Filter and sort options for one list invocation
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub all: bool,
    pub due_before: Option<NaiveDate>,
    pub due_after: Option<NaiveDate>,
    pub due_today: bool,
    pub due_week: bool,
    pub due_month: bool,
    pub keyword: Option<String>,
    pub sort: SortKey,
}

/// One selected task with the subtask rows still visible under it.
#[derive(Debug)]
pub struct Listing<'a> {
    pub task: &'a Task,
    pub subtasks: Vec<&'a Subtask>,
}

/// Result of applying a query to the task list.
#[derive(Debug)]
pub struct Selected<'a> {
    pub listings: Vec<Listing<'a>>,
    /// Row count after the status and date filters but before the keyword
    /// filter. Distinguishes "nothing to show" from "nothing matched".
    pub before_keyword: usize,
}

impl Selected<'_> {
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

/// Effective due date: the stored value, or `today + 7` days when absent.
pub fn effective_due(task: &Task, today: NaiveDate) -> NaiveDate {
    task.due
        .unwrap_or_else(|| today + Duration::days(DEFAULT_DUE_DAYS))
}

/// Apply the query to the full task list.
pub fn select<'a>(tasks: &'a [Task], query: &ListQuery, today: NaiveDate) -> Selected<'a> {
    let mut listings: Vec<Listing<'a>> = tasks
        .iter()
        .filter(|task| query.all || !task.status.is_done())
        .filter(|task| in_date_window(effective_due(task, today), query, today))
        .map(|task| Listing {
            task,
            subtasks: task
                .subtasks
                .iter()
                .filter(|subtask| query.all || !subtask.status.is_done())
                .collect(),
        })
        .collect();

    let before_keyword = listings.len();
    if let Some(keyword) = query.keyword.as_deref() {
        let needle = keyword.to_lowercase();
        listings.retain(|listing| listing.task.description.to_lowercase().contains(&needle));
    }

    sort_listings(&mut listings, query.sort, today);
    Selected {
        listings,
        before_keyword,
    }
}

/// Date windows compose; a task must pass every one the query enables.
/// `due-before`/`due-after` are inclusive; week and month are half-open
/// from today.
fn in_date_window(due: NaiveDate, query: &ListQuery, today: NaiveDate) -> bool {
    if let Some(before) = query.due_before {
        if due > before {
            return false;
        }
    }
    if let Some(after) = query.due_after {
        if due < after {
            return false;
        }
    }
    if query.due_today && due != today {
        return false;
    }
    if query.due_week && !within_days(due, today, DUE_WEEK_DAYS) {
        return false;
    }
    if query.due_month && !within_days(due, today, DUE_MONTH_DAYS) {
        return false;
    }
    true
}

fn within_days(due: NaiveDate, today: NaiveDate, days: i64) -> bool {
    due >= today && due < today + Duration::days(days)
}

// Vec::sort_by_key is stable, so equal keys keep insertion order.
fn sort_listings(listings: &mut [Listing<'_>], sort: SortKey, today: NaiveDate) {
    match sort {
        SortKey::Due => listings.sort_by_key(|listing| effective_due(listing.task, today)),
        SortKey::Assigned => {
            listings.sort_by_key(|listing| listing.task.assigned_to.to_lowercase())
        }
        SortKey::Priority => {
            listings.sort_by_key(|listing| task::priority_rank(&listing.task.priority))
        }
        SortKey::Id => listings.sort_by_key(|listing| listing.task.id),
    }
}
