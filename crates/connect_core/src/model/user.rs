//! User domain model.
//!
//! # Invariants
//! - `mobile_number` is exactly 10 digits.
//! - `status` is one of `active` / `inactive`.
//! - `id` and timestamps are assigned by the store, never by callers.

use super::entity::{
    Entity, EntityId, FieldSpec, FilterMatch, Rule, Status, CREATED_AT_COLUMN, DELETED_AT_COLUMN,
    ID_COLUMN, STATUS_VALUES, UPDATED_AT_COLUMN,
};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

const USER_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        column: "name",
        rules: &[Rule::Required, Rule::Length { min: 2, max: 100 }],
        matching: FilterMatch::Contains,
    },
    FieldSpec {
        column: "handle",
        rules: &[Rule::Required, Rule::Length { min: 2, max: 100 }],
        matching: FilterMatch::Contains,
    },
    FieldSpec {
        column: "mobile_number",
        rules: &[Rule::Required, Rule::Digits(10)],
        matching: FilterMatch::Contains,
    },
    FieldSpec {
        column: "email",
        rules: &[Rule::Required, Rule::Email],
        matching: FilterMatch::Contains,
    },
    FieldSpec {
        column: "status",
        rules: &[Rule::Required, Rule::OneOf(STATUS_VALUES)],
        matching: FilterMatch::Exact,
    },
];

/// A person registered with the service.
///
/// Also used as partial update and find filter, where empty strings mean
/// "not provided".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: Option<EntityId>,
    pub name: String,
    pub handle: String,
    pub mobile_number: String,
    pub email: String,
    pub status: String,
    /// Unix epoch milliseconds.
    pub created_at: Option<i64>,
    /// Unix epoch milliseconds.
    pub updated_at: Option<i64>,
    /// Soft delete tombstone; `None` while the row is live.
    pub deleted_at: Option<i64>,
}

impl User {
    /// Creates an unsaved user.
    pub fn new(
        name: impl Into<String>,
        handle: impl Into<String>,
        mobile_number: impl Into<String>,
        email: impl Into<String>,
        status: Status,
    ) -> Self {
        Self {
            name: name.into(),
            handle: handle.into(),
            mobile_number: mobile_number.into(),
            email: email.into(),
            status: status.as_str().to_string(),
            ..Self::default()
        }
    }

    /// Returns whether this user has not been soft deleted.
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

impl Entity for User {
    const NAME: &'static str = "user";
    const PLURAL: &'static str = "users";
    const LABEL: &'static str = "User";
    const LABEL_PLURAL: &'static str = "Users";
    const TABLE: &'static str = "users";
    const FIELDS: &'static [FieldSpec] = USER_FIELDS;

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn field(&self, column: &str) -> Option<&str> {
        match column {
            "name" => Some(&self.name),
            "handle" => Some(&self.handle),
            "mobile_number" => Some(&self.mobile_number),
            "email" => Some(&self.email),
            "status" => Some(&self.status),
            _ => None,
        }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(ID_COLUMN)?),
            name: row.get("name")?,
            handle: row.get("handle")?,
            mobile_number: row.get("mobile_number")?,
            email: row.get("email")?,
            status: row.get("status")?,
            created_at: Some(row.get(CREATED_AT_COLUMN)?),
            updated_at: Some(row.get(UPDATED_AT_COLUMN)?),
            deleted_at: row.get(DELETED_AT_COLUMN)?,
        })
    }
}
