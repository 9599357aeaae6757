//! Shared entity description used by the generic CRUD pipeline.
//!
//! # Responsibility
//! - Describe each persisted entity as data: table, columns, field rules.
//! - Map one SQLite row back into the concrete entity type.
//!
//! # Invariants
//! - `TABLE` and every `FieldSpec::column` are fixed identifiers; they are
//!   spliced into SQL text and must never come from user input.
//! - `FIELDS` lists every writable scalar column in storage order.
//! - `id`, `created_at`, `updated_at` and `deleted_at` are store-owned and
//!   never appear in `FIELDS`.

use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// Store-assigned row identifier.
pub type EntityId = i64;

/// Lifecycle status shared by users and organisations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Active,
    Inactive,
}

impl Status {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// Accepted values of every `status` column.
pub const STATUS_VALUES: &[&str] = &[Status::Active.as_str(), Status::Inactive.as_str()];

/// One declarative validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Non-empty after trimming whitespace.
    Required,
    /// Character count (not bytes) within `min..=max`.
    Length { min: usize, max: usize },
    /// Exactly `n` ASCII digits.
    Digits(usize),
    /// Plausible e-mail address.
    Email,
    /// One of the listed values, compared exactly.
    OneOf(&'static [&'static str]),
}

/// How a non-empty filter value is matched in `find`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMatch {
    /// Case-sensitive substring match; `%` and `_` are plain characters.
    Contains,
    /// Whole-value equality, used for enumerated columns.
    Exact,
}

/// Declarative description of one writable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub column: &'static str,
    pub rules: &'static [Rule],
    pub matching: FilterMatch,
}

/// Columns every entity table carries besides its `FIELDS`.
pub const ID_COLUMN: &str = "id";
pub const CREATED_AT_COLUMN: &str = "created_at";
pub const UPDATED_AT_COLUMN: &str = "updated_at";
pub const DELETED_AT_COLUMN: &str = "deleted_at";

/// Capability implemented by every entity served by the CRUD pipeline.
///
/// The same struct shape is used as create input, partial update and find
/// filter: empty fields mean "absent" for updates and filters.
pub trait Entity: Clone {
    /// Lowercase singular name, e.g. `user`.
    const NAME: &'static str;
    /// Lowercase plural name, e.g. `users`.
    const PLURAL: &'static str;
    /// Capitalized singular name used in caller-facing messages.
    const LABEL: &'static str;
    /// Capitalized plural name used in caller-facing messages.
    const LABEL_PLURAL: &'static str;
    /// Backing table.
    const TABLE: &'static str;
    /// Writable columns and their rules.
    const FIELDS: &'static [FieldSpec];

    /// Store-assigned id; `None` until the row has been inserted.
    fn id(&self) -> Option<EntityId>;

    /// Raw value of the declared field `column`, `None` for unknown columns.
    fn field(&self, column: &str) -> Option<&str>;

    /// Builds the entity from a row selected with [`select_columns`].
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Column list (`id, <fields>, created_at, updated_at, deleted_at`) used by
/// every statement that returns entity rows.
pub fn select_columns<E: Entity>() -> String {
    let mut columns = Vec::with_capacity(E::FIELDS.len() + 4);
    columns.push(ID_COLUMN);
    columns.extend(E::FIELDS.iter().map(|spec| spec.column));
    columns.extend([CREATED_AT_COLUMN, UPDATED_AT_COLUMN, DELETED_AT_COLUMN]);
    columns.join(", ")
}

/// Trimmed value of every declared field, in `FIELDS` order.
pub fn field_values<E: Entity>(entity: &E) -> Vec<(&'static FieldSpec, &str)> {
    E::FIELDS
        .iter()
        .map(|spec| (spec, entity.field(spec.column).unwrap_or_default().trim()))
        .collect()
}

/// Fields carrying a non-empty value, i.e. the "present" part of a partial
/// update or filter.
pub fn present_fields<E: Entity>(entity: &E) -> Vec<(&'static FieldSpec, &str)> {
    field_values(entity)
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
}
