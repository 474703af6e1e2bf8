//! Domain model for daily work-hour submissions.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep hour arithmetic exact and task keys strongly typed.
//!
//! # Invariants
//! - Hours never leave `0..=8` per entry.
//! - Category/subtask pairs are compared as a composite key, never as a
//!   concatenated string.

pub mod hours;
pub mod submission;
pub mod taxonomy;
pub mod work_type;
