//! todo list command implementation
//!
//! Applies the filter and sort pipeline and prints the task table, or the
//! flattened rows as JSON.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};

use crate::config::Config;
use crate::error::Result;
use crate::output;
use crate::query::{self, ListQuery, SortKey};
use crate::render;
use crate::storage::Storage;
use crate::task;

/// Options for the list command
pub struct ListOptions {
    pub all: bool,
    pub sort: String,
    pub due_before: Option<String>,
    pub due_after: Option<String>,
    pub due_today: bool,
    pub due_week: bool,
    pub due_month: bool,
    pub filter: Option<String>,
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run(options: ListOptions) -> Result<()> {
    let config = Config::load_default()?;
    let storage = Storage::resolve(options.file.clone(), &config)?;
    storage.bootstrap()?;

    let query = build_query(&options)?;
    let tasks = storage.load()?;
    let today = Local::now().date_naive();
    let selected = query::select(&tasks, &query, today);

    if options.json {
        return output::emit_data("list", &render::rows(&selected));
    }
    if !options.quiet {
        println!("{}", render::render(&selected));
    }
    Ok(())
}

fn build_query(options: &ListOptions) -> Result<ListQuery> {
    let sort: SortKey = options.sort.parse()?;
    Ok(ListQuery {
        all: options.all,
        due_before: parse_optional_date(options.due_before.as_deref())?,
        due_after: parse_optional_date(options.due_after.as_deref())?,
        due_today: options.due_today,
        due_week: options.due_week,
        due_month: options.due_month,
        keyword: options.filter.clone(),
        sort,
    })
}

fn parse_optional_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.map(task::parse_date).transpose()
}
