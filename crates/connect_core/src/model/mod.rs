//! Domain model for users and organisations.
//!
//! # Responsibility
//! - Define the records served by the CRUD pipeline.
//! - Describe each record declaratively through the `Entity` trait so that
//!   validation, query building and persistence stay generic.
//!
//! # Invariants
//! - Identifiers are assigned by the store exactly once.
//! - Deletion is represented by a `deleted_at` tombstone, not hard delete.

pub mod entity;
pub mod organisation;
pub mod user;
