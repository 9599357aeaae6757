//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and repository calls into use-case level APIs.
//! - Shape operation results into the caller-facing response envelope.
//! - Keep calling layers (CLI, HTTP) decoupled from storage details.

pub mod entity_service;
pub mod envelope;
