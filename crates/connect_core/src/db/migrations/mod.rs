//! Schema steps for the entity store.
//!
//! # Responsibility
//! - Bring a fresh or older store up to the `users` / `organisations`
//!   layout this build reads and writes.
//! - Report the store's schema version to repositories.
//!
//! # Invariants
//! - `SCHEMA_STEPS` is sorted by `version` with no duplicates.
//! - All pending steps commit together or not at all; `PRAGMA user_version`
//!   always names the last committed step.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    /// Short name for log lines.
    label: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    label: "entities",
    sql: include_str!("0001_entities.sql"),
}];

/// Schema version a fully migrated store reports.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Schema version currently recorded in the store (`0` when untouched).
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

/// Runs every step newer than the store's recorded version.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the store was written by a newer build;
///   nothing is executed in that case.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let recorded = schema_version(conn)?;
    let latest = latest_version();

    if recorded > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: recorded,
            latest_supported: latest,
        });
    }

    let mut pending = pending_steps(recorded).peekable();
    if pending.peek().is_none() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        info!(
            "event=migration_apply module=db status=ok version={} step={}",
            step.version, step.label
        );
    }
    tx.commit()?;

    Ok(())
}

fn pending_steps(recorded: u32) -> impl Iterator<Item = &'static SchemaStep> {
    SCHEMA_STEPS
        .iter()
        .filter(move |step| step.version > recorded)
}

#[cfg(test)]
mod tests {
    use super::{latest_version, pending_steps, SCHEMA_STEPS};

    #[test]
    fn steps_are_strictly_increasing() {
        assert!(SCHEMA_STEPS
            .windows(2)
            .all(|pair| pair[0].version < pair[1].version));
        assert_eq!(latest_version(), SCHEMA_STEPS.len() as u32);
    }

    #[test]
    fn pending_steps_skip_recorded_versions() {
        assert_eq!(pending_steps(0).count(), SCHEMA_STEPS.len());
        assert_eq!(pending_steps(latest_version()).count(), 0);
    }
}
