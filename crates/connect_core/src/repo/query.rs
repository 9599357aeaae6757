//! Parameterized SQL statement construction.
//!
//! # Responsibility
//! - Build INSERT / SELECT / UPDATE / soft-delete statements for entity
//!   tables from structured input.
//! - Keep every caller-supplied value out of statement text.
//!
//! # Invariants
//! - Placeholders are numbered `?1..?N` strictly in argument order; the only
//!   way to emit a placeholder is `Args::bind`, which pushes the value first.
//! - Table and column names are trusted static identifiers.
//! - Every read and mutation is restricted to live rows
//!   (`deleted_at IS NULL`), except INSERT.
//! - Substring filters compare case-sensitively through `instr`, never
//!   through SQLite `LIKE`, which folds ASCII case.

use crate::model::entity::{EntityId, FilterMatch, DELETED_AT_COLUMN, ID_COLUMN, UPDATED_AT_COLUMN};
use rusqlite::types::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-side "now" in Unix epoch milliseconds.
pub const NOW_MS_SQL: &str = "(strftime('%s', 'now') * 1000)";

const LIVE_ROW_SQL: &str = "deleted_at IS NULL";

/// Statement text plus its positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Value>,
}

/// Guard failures detected before any statement is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// INSERT without any row.
    EmptyInsert,
    /// INSERT row whose value count differs from the column list.
    ArityMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// UPDATE without any column to set.
    EmptyUpdate,
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInsert => write!(f, "insert requires at least one row"),
            Self::ArityMismatch {
                row,
                expected,
                actual,
            } => write!(
                f,
                "insert row {row} has {actual} values, expected {expected}"
            ),
            Self::EmptyUpdate => write!(f, "update requires at least one non-empty field"),
        }
    }
}

impl Error for QueryError {}

/// One `find` condition on a declared column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition<'a> {
    pub column: &'static str,
    pub value: &'a str,
    pub matching: FilterMatch,
}

#[derive(Debug, Default)]
struct Args {
    values: Vec<Value>,
}

impl Args {
    fn bind(&mut self, value: Value) -> String {
        self.values.push(value);
        format!("?{}", self.values.len())
    }
}

/// `INSERT INTO <table> (<columns>) VALUES (..), (..) RETURNING <returning>`.
pub fn insert(
    table: &str,
    columns: &[&str],
    rows: Vec<Vec<Value>>,
    returning: &str,
) -> Result<Statement, QueryError> {
    if rows.is_empty() {
        return Err(QueryError::EmptyInsert);
    }

    let mut args = Args::default();
    let mut tuples = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        if row.len() != columns.len() {
            return Err(QueryError::ArityMismatch {
                row: index,
                expected: columns.len(),
                actual: row.len(),
            });
        }
        let placeholders: Vec<String> = row.into_iter().map(|value| args.bind(value)).collect();
        tuples.push(format!("({})", placeholders.join(", ")));
    }

    Ok(Statement {
        sql: format!(
            "INSERT INTO {table} ({}) VALUES {} RETURNING {returning}",
            columns.join(", "),
            tuples.join(", ")
        ),
        args: args.values,
    })
}

/// Live rows matching every condition; no conditions selects all live rows.
///
/// Rows are ordered by id so output is stable, but no ordering is promised.
pub fn select(table: &str, columns: &str, conditions: &[Condition<'_>]) -> Statement {
    let mut args = Args::default();
    let mut clauses: Vec<String> = conditions
        .iter()
        .map(|condition| match condition.matching {
            FilterMatch::Contains => format!(
                "instr({}, {}) > 0",
                condition.column,
                args.bind(Value::Text(condition.value.to_string()))
            ),
            FilterMatch::Exact => format!(
                "{} = {}",
                condition.column,
                args.bind(Value::Text(condition.value.to_string()))
            ),
        })
        .collect();
    clauses.push(LIVE_ROW_SQL.to_string());

    Statement {
        sql: format!(
            "SELECT {columns} FROM {table} WHERE {} ORDER BY {ID_COLUMN} ASC",
            clauses.join(" AND ")
        ),
        args: args.values,
    }
}

/// One live row by id.
pub fn select_by_id(table: &str, columns: &str, id: EntityId) -> Statement {
    let mut args = Args::default();
    let id_param = args.bind(Value::Integer(id));
    Statement {
        sql: format!(
            "SELECT {columns} FROM {table} WHERE {ID_COLUMN} = {id_param} AND {LIVE_ROW_SQL} LIMIT 1"
        ),
        args: args.values,
    }
}

/// Sets only the given columns on one live row and returns the new row.
///
/// `updated_at` is refreshed by the store; an empty assignment list is
/// rejected instead of producing `SET` with nothing after it.
pub fn update_by_id(
    table: &str,
    assignments: Vec<(&str, Value)>,
    id: EntityId,
    returning: &str,
) -> Result<Statement, QueryError> {
    if assignments.is_empty() {
        return Err(QueryError::EmptyUpdate);
    }

    let mut args = Args::default();
    let mut sets: Vec<String> = assignments
        .into_iter()
        .map(|(column, value)| format!("{column} = {}", args.bind(value)))
        .collect();
    sets.push(format!("{UPDATED_AT_COLUMN} = {NOW_MS_SQL}"));
    let id_param = args.bind(Value::Integer(id));

    Ok(Statement {
        sql: format!(
            "UPDATE {table} SET {} WHERE {ID_COLUMN} = {id_param} AND {LIVE_ROW_SQL} RETURNING {returning}",
            sets.join(", ")
        ),
        args: args.values,
    })
}

/// Tombstones one live row.
pub fn soft_delete_by_id(table: &str, id: EntityId) -> Statement {
    let mut args = Args::default();
    let id_param = args.bind(Value::Integer(id));
    Statement {
        sql: format!(
            "UPDATE {table} SET {DELETED_AT_COLUMN} = {NOW_MS_SQL}, {UPDATED_AT_COLUMN} = {NOW_MS_SQL} \
             WHERE {ID_COLUMN} = {id_param} AND {LIVE_ROW_SQL}"
        ),
        args: args.values,
    }
}
