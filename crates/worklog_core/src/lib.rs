//! Core domain logic for daily work-hour logging.
//! This crate is the single source of truth for the hour rules.

pub mod db;
pub mod ledger;
pub mod logging;
pub mod model;
pub mod report;
pub mod service;
pub mod validate;

pub use ledger::{LedgerError, LedgerQuery, LedgerResult, LedgerStore, MemoryLedger, SqliteLedger};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::hours::{EntryError, FieldValue, Hours, TotalHours, DAILY_HOURS, ENTRY_CAP};
pub use model::submission::{
    EntrySet, Submission, SubmissionError, SubmissionId, SubmissionRecord, TaskEntry,
};
pub use model::taxonomy::{Category, Subtask, TaskKey, Taxonomy, TaxonomyError};
pub use model::work_type::{WorkType, WorkTypeError};
pub use report::distribution::{Distribution, Grouping, Slice};
pub use service::submission_service::{Receipt, ServiceError, ServiceResult, SubmissionService};
pub use validate::{evaluate, evaluate_fields, Evaluation, ValidationError, Verdict};

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
