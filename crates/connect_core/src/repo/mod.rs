//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Build parameterized statements for entity tables (`query`).
//! - Execute them and map rows back to entities (`entity_repo`).
//!
//! # Invariants
//! - Repository writes run the entity rule table before persistence.
//! - Repository APIs return semantic errors (`NotFound`) separately from DB
//!   transport errors and row-mapping errors.

pub mod entity_repo;
pub mod query;
