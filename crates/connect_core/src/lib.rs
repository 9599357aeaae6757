//! Core CRUD pipeline for users and organisations.
//!
//! Validation, parameterized query construction, persistence and
//! soft-delete lifecycle are implemented once, generically over the
//! [`Entity`] description, and served for both entity kinds.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validate;

pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::entity::{Entity, EntityId, FieldSpec, FilterMatch, Rule, Status};
pub use model::organisation::Organisation;
pub use model::user::User;
pub use repo::entity_repo::{
    EntityRepository, RepoError, RepoResult, SqliteEntityRepository,
    SqliteOrganisationRepository, SqliteUserRepository,
};
pub use repo::query::{QueryError, Statement};
pub use service::entity_service::{EntityService, OutcomeKind, ServiceError, ServiceResult};
pub use service::envelope::{Envelope, EnvelopeStatus};
pub use validate::{validate, validate_partial, FieldError};

/// Service over the user table.
pub type UserService<'conn> = EntityService<User, SqliteUserRepository<'conn>>;
/// Service over the organisation table.
pub type OrganisationService<'conn> = EntityService<Organisation, SqliteOrganisationRepository<'conn>>;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
