//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validator and ledger calls into use-case level APIs.
//! - Keep CLI/UI layers decoupled from storage details.

pub mod submission_service;
