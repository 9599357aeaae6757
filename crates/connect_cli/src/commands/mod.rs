//! Subcommand dispatch.
//!
//! # Responsibility
//! - Turn parsed arguments into one service call per invocation.
//! - Wrap every outcome in an `Envelope` and pick the process exit code.

use clap::{Args, Subcommand};
use connect_core::db::migrations::latest_version;
use connect_core::{
    Entity, EntityId, EntityRepository, EntityService, Envelope, OrganisationService,
    OutcomeKind, ServiceError, ServiceResult, SqliteOrganisationRepository, SqliteUserRepository,
    UserService,
};
use log::error;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::json;
use std::process::ExitCode;

mod org;
mod user;

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Manage users
    User(user::UserCommand),
    /// Manage organisations
    Org(org::OrgCommand),
    /// Apply schema migrations and report the schema version
    Migrate,
}

#[derive(Debug, Args)]
pub(crate) struct IdArgs {
    /// Record id
    #[arg(long)]
    pub id: EntityId,
}

/// One CRUD call against a single entity kind.
pub(crate) enum EntityAction<E> {
    Create(E),
    Find(E),
    Get(EntityId),
    Update(EntityId, E),
    Delete(EntityId),
}

/// Printed envelope plus the failure class that decides the exit code.
pub(crate) struct Response {
    pub envelope: Envelope,
    pub kind: Option<OutcomeKind>,
}

impl Response {
    fn from_outcome<T>(outcome: &ServiceResult<T>, envelope: Envelope) -> Self {
        Self {
            envelope,
            kind: outcome.as_ref().err().map(ServiceError::kind),
        }
    }

    /// Failure before any entity operation ran.
    pub fn internal(message: &str, detail: impl ToString) -> Self {
        let detail = detail.to_string();
        error!("event=cli_command module=cli status=error message={message:?} error={detail}");
        let err = ServiceError::Internal(detail);
        Self {
            envelope: Envelope::failure(message, &err),
            kind: Some(err.kind()),
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self.kind {
            None => ExitCode::SUCCESS,
            Some(OutcomeKind::ValidationFailed) => ExitCode::from(2),
            Some(OutcomeKind::NotFound | OutcomeKind::NothingChanged) => ExitCode::from(3),
            Some(OutcomeKind::Internal) => ExitCode::FAILURE,
        }
    }
}

pub(crate) fn run(command: Commands, conn: &Connection) -> Response {
    match command {
        Commands::User(command) => match SqliteUserRepository::try_new(conn) {
            Ok(repo) => run_action(&UserService::new(repo), command.into_action()),
            Err(err) => Response::internal("Unable to open users", err),
        },
        Commands::Org(command) => match SqliteOrganisationRepository::try_new(conn) {
            Ok(repo) => run_action(&OrganisationService::new(repo), command.into_action()),
            Err(err) => Response::internal("Unable to open organisations", err),
        },
        Commands::Migrate => Response {
            envelope: Envelope::success(
                "Database migrated!",
                Some(json!({ "schema_version": latest_version() })),
            ),
            kind: None,
        },
    }
}

fn run_action<E, R>(service: &EntityService<E, R>, action: EntityAction<E>) -> Response
where
    E: Entity + Serialize,
    R: EntityRepository<E>,
{
    match action {
        EntityAction::Create(entity) => {
            let outcome = service.create(&entity);
            Response::from_outcome(&outcome, Envelope::created(&outcome))
        }
        EntityAction::Find(filter) => {
            let outcome = service.find(&filter);
            Response::from_outcome(&outcome, Envelope::found(&outcome))
        }
        EntityAction::Get(id) => {
            let outcome = service.find_by_id(id);
            Response::from_outcome(&outcome, Envelope::found_by_id(id, &outcome))
        }
        EntityAction::Update(id, updates) => {
            let outcome = service.update_by_id(&updates, id);
            Response::from_outcome(&outcome, Envelope::updated(&outcome))
        }
        EntityAction::Delete(id) => {
            let outcome = service.delete_by_id(id);
            Response::from_outcome(&outcome, Envelope::deleted::<E>(&outcome))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{run_action, EntityAction, Response};
    use connect_core::db::open_db_in_memory;
    use connect_core::{OutcomeKind, SqliteUserRepository, Status, User, UserService};
    use std::process::ExitCode;

    fn ann() -> User {
        User::new("Ann", "ann1", "9876543210", "a@x.com", Status::Active)
    }

    #[test]
    fn actions_map_outcomes_to_exit_codes() {
        let conn = open_db_in_memory().unwrap();
        let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());

        let created = run_action(&service, EntityAction::Create(ann()));
        assert!(created.kind.is_none());
        assert_eq!(created.exit_code(), ExitCode::SUCCESS);
        assert_eq!(created.envelope.message, "User created!");

        let invalid = run_action(&service, EntityAction::Create(User::default()));
        assert_eq!(invalid.kind, Some(OutcomeKind::ValidationFailed));
        assert_eq!(invalid.exit_code(), ExitCode::from(2));

        let deleted = run_action(&service, EntityAction::Delete(1));
        assert!(deleted.kind.is_none());

        let deleted_again = run_action(&service, EntityAction::Delete(1));
        assert_eq!(deleted_again.kind, Some(OutcomeKind::NothingChanged));
        assert_eq!(deleted_again.exit_code(), ExitCode::from(3));

        let missing = run_action(&service, EntityAction::Get(1));
        assert_eq!(missing.kind, Some(OutcomeKind::NotFound));
        assert_eq!(missing.exit_code(), ExitCode::from(3));
        assert_eq!(missing.envelope.message, "No users found for the id 1");
    }

    #[test]
    fn internal_response_hides_detail() {
        let response = Response::internal("Unable to open users", "no such table: users");

        assert_eq!(response.kind, Some(OutcomeKind::Internal));
        assert_eq!(response.exit_code(), ExitCode::FAILURE);
        let json = serde_json::to_string(&response.envelope).unwrap();
        assert!(!json.contains("no such table"));
    }
}
