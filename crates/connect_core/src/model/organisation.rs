//! Organisation domain model.

use super::entity::{
    Entity, EntityId, FieldSpec, FilterMatch, Rule, Status, CREATED_AT_COLUMN, DELETED_AT_COLUMN,
    ID_COLUMN, STATUS_VALUES, UPDATED_AT_COLUMN,
};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

const ORGANISATION_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        column: "name",
        rules: &[Rule::Required, Rule::Length { min: 2, max: 100 }],
        matching: FilterMatch::Contains,
    },
    FieldSpec {
        column: "contact_number",
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

/// An organisation record. Empty strings mean "not provided" when used as a
/// partial update or filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organisation {
    pub id: Option<EntityId>,
    pub name: String,
    pub contact_number: String,
    pub email: String,
    pub status: String,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
    pub deleted_at: Option<i64>,
}

impl Organisation {
    /// Creates an unsaved organisation.
    pub fn new(
        name: impl Into<String>,
        contact_number: impl Into<String>,
        email: impl Into<String>,
        status: Status,
    ) -> Self {
        Self {
            name: name.into(),
            contact_number: contact_number.into(),
            email: email.into(),
            status: status.as_str().to_string(),
            ..Self::default()
        }
    }

    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

impl Entity for Organisation {
    const NAME: &'static str = "organisation";
    const PLURAL: &'static str = "organisations";
    const LABEL: &'static str = "Organisation";
    const LABEL_PLURAL: &'static str = "Organisations";
    const TABLE: &'static str = "organisations";
    const FIELDS: &'static [FieldSpec] = ORGANISATION_FIELDS;

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn field(&self, column: &str) -> Option<&str> {
        match column {
            "name" => Some(&self.name),
            "contact_number" => Some(&self.contact_number),
            "email" => Some(&self.email),
            "status" => Some(&self.status),
            _ => None,
        }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(ID_COLUMN)?),
            name: row.get("name")?,
            contact_number: row.get("contact_number")?,
            email: row.get("email")?,
            status: row.get("status")?,
            created_at: Some(row.get(CREATED_AT_COLUMN)?),
            updated_at: Some(row.get(UPDATED_AT_COLUMN)?),
            deleted_at: row.get(DELETED_AT_COLUMN)?,
        })
    }
}
