//! Entity use-case service.
//!
//! # Responsibility
//! - Validate input before it reaches persistence.
//! - Classify repository results into validation / not-found / internal
//!   outcomes understood by callers.
//!
//! # Invariants
//! - Store error text never becomes part of a validation outcome.
//! - Internal failures are logged with their detail before being returned.
//! - Service layer remains storage-agnostic.

use crate::model::entity::{Entity, EntityId};
use crate::repo::entity_repo::{EntityRepository, RepoError};
use crate::repo::query::QueryError;
use crate::validate::{describe, validate, validate_partial, FieldError};
use log::{debug, error, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Caller-facing outcome class of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    ValidationFailed,
    /// Lookup by id found no live row.
    NotFound,
    /// Update or delete had no live row to act on.
    NothingChanged,
    Internal,
}

impl OutcomeKind {
    /// HTTP-style status class for the outcome.
    pub fn http_status(self) -> u16 {
        match self {
            Self::ValidationFailed => 400,
            Self::NotFound => 404,
            Self::NothingChanged => 204,
            Self::Internal => 500,
        }
    }
}

/// Failed operation outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Input defect; every failing field is listed.
    Validation(Vec<FieldError>),
    /// Id given to a lookup does not reference a live row.
    NotFound { entity: &'static str, id: EntityId },
    /// Id given to an update or delete does not reference a live row.
    TargetMissing { entity: &'static str, id: EntityId },
    /// Store, statement or mapping failure. The detail is for logs.
    Internal(String),
}

impl ServiceError {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Validation(_) => OutcomeKind::ValidationFailed,
            Self::NotFound { .. } => OutcomeKind::NotFound,
            Self::TargetMissing { .. } => OutcomeKind::NothingChanged,
            Self::Internal(_) => OutcomeKind::Internal,
        }
    }

    pub fn http_status(&self) -> u16 {
        self.kind().http_status()
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "validation failed: {}", describe(errors)),
            Self::NotFound { entity, id } | Self::TargetMissing { entity, id } => {
                write!(f, "no {entity} available for the id {id}")
            }
            Self::Internal(_) => write!(f, "internal error"),
        }
    }
}

impl Error for ServiceError {}

/// Generic CRUD service over one entity repository.
pub struct EntityService<E: Entity, R: EntityRepository<E>> {
    repo: R,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, R: EntityRepository<E>> EntityService<E, R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            _entity: PhantomData,
        }
    }

    /// Validates and stores a new entity, returning the stored row.
    pub fn create(&self, entity: &E) -> ServiceResult<E> {
        let mut errors = validate(entity);
        if let Some(id) = entity.id() {
            errors.insert(
                0,
                FieldError::new("id", format!("must be empty on create, got {id}")),
            );
        }
        if !errors.is_empty() {
            return Err(self.rejected("create", errors));
        }

        let created = self
            .repo
            .create(entity)
            .map_err(|err| self.classify("create", err))?;
        debug!(
            "event=entity_create module=service status=ok entity={} id={}",
            E::NAME,
            created.id().unwrap_or_default()
        );
        Ok(created)
    }

    /// Lists live entities matching every non-empty field of `filter`.
    pub fn find(&self, filter: &E) -> ServiceResult<Vec<E>> {
        let found = self
            .repo
            .find(filter)
            .map_err(|err| self.classify("find", err))?;
        debug!(
            "event=entity_find module=service status=ok entity={} count={}",
            E::NAME,
            found.len()
        );
        Ok(found)
    }

    /// Gets one live entity by id.
    pub fn find_by_id(&self, id: EntityId) -> ServiceResult<E> {
        self.repo
            .find_by_id(id)
            .map_err(|err| self.classify("find_by_id", err))?
            .ok_or(ServiceError::NotFound {
                entity: E::NAME,
                id,
            })
    }

    /// Applies the non-empty fields of `updates` to a live entity.
    ///
    /// Present fields are checked against the same rules as `create`.
    pub fn update_by_id(&self, updates: &E, id: EntityId) -> ServiceResult<E> {
        let errors = validate_partial(updates);
        if !errors.is_empty() {
            return Err(self.rejected("update", errors));
        }

        let updated = self
            .repo
            .update_by_id(updates, id)
            .map_err(|err| self.classify("update", err))?;
        debug!(
            "event=entity_update module=service status=ok entity={} id={id}",
            E::NAME
        );
        Ok(updated)
    }

    /// Soft-deletes a live entity.
    pub fn delete_by_id(&self, id: EntityId) -> ServiceResult<()> {
        self.repo
            .delete_by_id(id)
            .map_err(|err| self.classify("delete", err))?;
        debug!(
            "event=entity_delete module=service status=ok entity={} id={id}",
            E::NAME
        );
        Ok(())
    }

    fn rejected(&self, operation: &str, errors: Vec<FieldError>) -> ServiceError {
        warn!(
            "event=entity_{operation} module=service status=rejected entity={} error_count={}",
            E::NAME,
            errors.len()
        );
        ServiceError::Validation(errors)
    }

    fn classify(&self, operation: &str, err: RepoError) -> ServiceError {
        match err {
            RepoError::Validation(errors) => self.rejected(operation, errors),
            RepoError::IdentifierAssigned(id) => self.rejected(
                operation,
                vec![FieldError::new(
                    "id",
                    format!("must be empty on create, got {id}"),
                )],
            ),
            RepoError::Query(QueryError::EmptyUpdate) => self.rejected(
                operation,
                vec![FieldError::new(
                    "_",
                    "at least one field must be provided",
                )],
            ),
            RepoError::NotFound(id) => ServiceError::TargetMissing {
                entity: E::NAME,
                id,
            },
            other => {
                error!(
                    "event=entity_{operation} module=service status=error entity={} error={other}",
                    E::NAME
                );
                ServiceError::Internal(other.to_string())
            }
        }
    }
}
