//! Generic entity repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/find/find_by_id/update_by_id/delete_by_id over any
//!   `Entity` table.
//! - Execute statements built by `repo::query` and map rows back.
//!
//! # Invariants
//! - Write paths run validation before SQL mutations.
//! - Update/delete existence checks are part of the mutating statement; zero
//!   affected rows is reported as `NotFound`, never as success.
//! - A write whose returned rows fail mapping is rolled back, so an error
//!   never leaves a change behind.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::entity::{
    field_values, present_fields, select_columns, Entity, EntityId, CREATED_AT_COLUMN,
    DELETED_AT_COLUMN, ID_COLUMN, UPDATED_AT_COLUMN,
};
use crate::model::organisation::Organisation;
use crate::model::user::User;
use crate::repo::query::{self, Condition, QueryError, Statement};
use crate::validate::{describe, validate, validate_partial, FieldError};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entity persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Input failed the entity rule table.
    Validation(Vec<FieldError>),
    /// Create input already carries a store-assigned id.
    IdentifierAssigned(EntityId),
    /// Statement construction guard failed before any I/O.
    Query(QueryError),
    /// Id does not reference a live row.
    NotFound(EntityId),
    /// Insert completed without returning the created row.
    NoRowReturned,
    /// Statement was aborted through the connection interrupt handle.
    Interrupted,
    /// Underlying SQLite error.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted row cannot be mapped to a valid entity.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "validation failed: {}", describe(errors)),
            Self::IdentifierAssigned(id) => {
                write!(f, "id must be empty on create, got {id}")
            }
            Self::Query(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "no live row with id {id}"),
            Self::NoRowReturned => write!(f, "insert returned no row"),
            Self::Interrupted => write!(f, "statement interrupted"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "entity repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "entity repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "entity repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Query(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<QueryError> for RepoError {
    fn from(value: QueryError) -> Self {
        Self::Query(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if value.sqlite_error_code() == Some(ErrorCode::OperationInterrupted) {
            return Self::Interrupted;
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface shared by every entity.
pub trait EntityRepository<E: Entity> {
    /// Inserts one entity and returns the stored row.
    fn create(&self, entity: &E) -> RepoResult<E>;
    /// Lists live rows matching every non-empty field of `filter`.
    fn find(&self, filter: &E) -> RepoResult<Vec<E>>;
    /// Gets one live row; `Ok(None)` when there is none.
    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<E>>;
    /// Applies the non-empty fields of `updates` and returns the new row.
    fn update_by_id(&self, updates: &E, id: EntityId) -> RepoResult<E>;
    /// Soft-deletes one live row.
    fn delete_by_id(&self, id: EntityId) -> RepoResult<()>;
}

/// SQLite-backed repository for entity `E`.
pub struct SqliteEntityRepository<'conn, E> {
    conn: &'conn Connection,
    _entity: PhantomData<fn() -> E>,
}

pub type SqliteUserRepository<'conn> = SqliteEntityRepository<'conn, User>;
pub type SqliteOrganisationRepository<'conn> = SqliteEntityRepository<'conn, Organisation>;

impl<'conn, E: Entity> SqliteEntityRepository<'conn, E> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not carry the columns `E` declares.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_entity_connection_ready::<E>(conn)?;
        Ok(Self {
            conn,
            _entity: PhantomData,
        })
    }

    /// Inserts several entities in one statement.
    ///
    /// Every entity is checked before anything is written. Rows come back in
    /// id order, which for fresh inserts is input order.
    pub fn create_many(&self, entities: &[E]) -> RepoResult<Vec<E>> {
        let mut rows: Vec<Vec<Value>> = Vec::with_capacity(entities.len());
        for entity in entities {
            if let Some(id) = entity.id() {
                return Err(RepoError::IdentifierAssigned(id));
            }
            let errors = validate(entity);
            if !errors.is_empty() {
                return Err(RepoError::Validation(errors));
            }
            rows.push(
                field_values(entity)
                    .into_iter()
                    .map(|(_, value)| Value::Text(value.to_string()))
                    .collect(),
            );
        }

        let columns: Vec<&str> = E::FIELDS.iter().map(|spec| spec.column).collect();
        let statement = query::insert(E::TABLE, &columns, rows, &select_columns::<E>())?;
        let mut created = self.write_returning(&statement)?;
        created.sort_by_key(|entity| entity.id());
        if created.len() != entities.len() {
            return Err(RepoError::NoRowReturned);
        }
        Ok(created)
    }

    /// Runs a `RETURNING` mutation and keeps its effect only when every
    /// returned row maps to a valid entity.
    fn write_returning(&self, statement: &Statement) -> RepoResult<Vec<E>> {
        let tx = self.conn.unchecked_transaction()?;
        let rows = query_rows::<E>(&tx, statement)?;
        tx.commit()?;
        Ok(rows)
    }
}

fn query_rows<E: Entity>(conn: &Connection, statement: &Statement) -> RepoResult<Vec<E>> {
    let mut stmt = conn.prepare(&statement.sql)?;
    let mut rows = stmt.query(params_from_iter(statement.args.iter()))?;
    let mut entities = Vec::new();

    while let Some(row) = rows.next()? {
        entities.push(parse_entity_row::<E>(row)?);
    }

    Ok(entities)
}

impl<E: Entity> EntityRepository<E> for SqliteEntityRepository<'_, E> {
    fn create(&self, entity: &E) -> RepoResult<E> {
        self.create_many(std::slice::from_ref(entity))?
            .pop()
            .ok_or(RepoError::NoRowReturned)
    }

    fn find(&self, filter: &E) -> RepoResult<Vec<E>> {
        let conditions: Vec<Condition<'_>> = present_fields(filter)
            .into_iter()
            .map(|(spec, value)| Condition {
                column: spec.column,
                value,
                matching: spec.matching,
            })
            .collect();

        let statement = query::select(E::TABLE, &select_columns::<E>(), &conditions);
        query_rows(self.conn, &statement)
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<E>> {
        let statement = query::select_by_id(E::TABLE, &select_columns::<E>(), id);
        Ok(query_rows(self.conn, &statement)?.pop())
    }

    fn update_by_id(&self, updates: &E, id: EntityId) -> RepoResult<E> {
        let assignments: Vec<(&str, Value)> = present_fields(updates)
            .into_iter()
            .map(|(spec, value)| (spec.column, Value::Text(value.to_string())))
            .collect();
        if assignments.is_empty() {
            return Err(QueryError::EmptyUpdate.into());
        }

        let errors = validate_partial(updates);
        if !errors.is_empty() {
            return Err(RepoError::Validation(errors));
        }

        let statement = query::update_by_id(E::TABLE, assignments, id, &select_columns::<E>())?;
        self.write_returning(&statement)?
            .pop()
            .ok_or(RepoError::NotFound(id))
    }

    fn delete_by_id(&self, id: EntityId) -> RepoResult<()> {
        let statement = query::soft_delete_by_id(E::TABLE, id);
        let changed = self
            .conn
            .execute(&statement.sql, params_from_iter(statement.args.iter()))?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_entity_row<E: Entity>(row: &Row<'_>) -> RepoResult<E> {
    let entity = E::from_row(row)
        .map_err(|err| RepoError::InvalidData(format!("{} row: {err}", E::TABLE)))?;

    let errors = validate(&entity);
    if !errors.is_empty() {
        return Err(RepoError::InvalidData(format!(
            "{} row {}: {}",
            E::TABLE,
            entity.id().unwrap_or_default(),
            describe(&errors)
        )));
    }

    Ok(entity)
}

fn ensure_entity_connection_ready<E: Entity>(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, E::TABLE)? {
        return Err(RepoError::MissingRequiredTable(E::TABLE));
    }

    let declared = E::FIELDS.iter().map(|spec| spec.column);
    let store_owned = [
        ID_COLUMN,
        CREATED_AT_COLUMN,
        UPDATED_AT_COLUMN,
        DELETED_AT_COLUMN,
    ];
    for column in store_owned.into_iter().chain(declared) {
        if !table_has_column(conn, E::TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: E::TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
