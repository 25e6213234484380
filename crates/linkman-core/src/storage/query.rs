//! Filter translation
//!
//! Turns a [`LinkFilter`] into a conjunction of SQL predicates over the
//! `links` table.

use rusqlite::types::Value;

use crate::filter::{ArchivedMode, LinkFilter};

/// Columns selected for every link query, in `row_to_link` order
pub const LINK_COLUMNS: &str = "id, url, source, title, list, archived";

/// One condition on the `links` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    SourceEq(String),
    TitleContains(String),
    TitleNotEmpty,
    ListEq(String),
    Archived(bool),
}

impl Predicate {
    /// SQL fragment and its bound parameter, if any
    fn to_sql(&self) -> (&'static str, Option<Value>) {
        match self {
            Predicate::SourceEq(source) => ("source = ?", Some(Value::Text(source.clone()))),
            Predicate::TitleContains(title) => {
                ("instr(title, ?) > 0", Some(Value::Text(title.clone())))
            }
            Predicate::TitleNotEmpty => ("title <> ''", None),
            Predicate::ListEq(list) => ("list = ?", Some(Value::Text(list.clone()))),
            Predicate::Archived(archived) => {
                ("archived = ?", Some(Value::Integer(i64::from(*archived))))
            }
        }
    }
}

/// Convert a filter into its predicate set
pub fn translate(filter: &LinkFilter) -> Vec<Predicate> {
    let mut predicates = Vec::new();

    if filter.has_source() {
        predicates.push(Predicate::SourceEq(filter.source().to_string()));
    }

    if filter.has_title() {
        predicates.push(Predicate::TitleContains(filter.title().to_string()));
    }

    if filter.requires_title() {
        predicates.push(Predicate::TitleNotEmpty);
    }

    if !filter.is_all_lists() {
        predicates.push(Predicate::ListEq(filter.list().to_string()));
    }

    match filter.archived_mode() {
        ArchivedMode::Only => predicates.push(Predicate::Archived(true)),
        ArchivedMode::Exclude => predicates.push(Predicate::Archived(false)),
        ArchivedMode::Include => {}
    }

    predicates
}

/// Build a `SELECT` for the given predicates, ordered by id
pub fn select_links(predicates: &[Predicate]) -> (String, Vec<Value>) {
    let mut sql = format!("SELECT {} FROM links", LINK_COLUMNS);
    let mut params = Vec::new();

    let clauses: Vec<&str> = predicates
        .iter()
        .map(|predicate| {
            let (clause, param) = predicate.to_sql();
            params.extend(param);
            clause
        })
        .collect();

    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY id ASC");

    (sql, params)
}
