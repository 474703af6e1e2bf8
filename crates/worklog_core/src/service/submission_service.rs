//! Submission use-case service.
//!
//! # Responsibility
//! - Gate submissions through the hour validator before persistence.
//! - Expose ledger reads as submissions, export records and chart data.
//!
//! # Invariants
//! - A rejected submission never reaches the ledger.
//! - Service layer remains storage-agnostic (any `LedgerStore`).
//! - Log lines carry ids, counts and totals only; never person names.

use crate::ledger::{LedgerError, LedgerQuery, LedgerStore};
use crate::model::submission::{Submission, SubmissionId, SubmissionRecord};
use crate::model::taxonomy::{TaskKey, Taxonomy};
use crate::report::distribution::{Distribution, Grouping};
use crate::validate::{evaluate, Evaluation};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for submission use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Hour rule rejected the submission; the evaluation carries the message.
    Rejected(Evaluation),
    /// Entry key is not part of the configured taxonomy.
    UnknownTask(TaskKey),
    /// Persistence-layer failure.
    Ledger(LedgerError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(evaluation) => write!(f, "submission rejected: {}", evaluation.message),
            Self::UnknownTask(key) => write!(f, "task is not in the taxonomy: {key}"),
            Self::Ledger(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Ledger(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LedgerError> for ServiceError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

/// Acknowledgement for one accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub submission_id: SubmissionId,
    pub evaluation: Evaluation,
    /// One record per non-zero entry, ready for export collaborators.
    pub records: Vec<SubmissionRecord>,
}

/// Use-case service over one injected ledger store.
pub struct SubmissionService<L: LedgerStore> {
    ledger: L,
    taxonomy: Option<Taxonomy>,
}

impl<L: LedgerStore> SubmissionService<L> {
    pub fn new(ledger: L) -> Self {
        Self {
            ledger,
            taxonomy: None,
        }
    }

    /// Restricts entries to leaves of `taxonomy`.
    pub fn with_taxonomy(mut self, taxonomy: Taxonomy) -> Self {
        self.taxonomy = Some(taxonomy);
        self
    }

    pub fn taxonomy(&self) -> Option<&Taxonomy> {
        self.taxonomy.as_ref()
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Evaluates an in-progress submission without side effects.
    ///
    /// Intended to be re-invoked on every entry change.
    pub fn preview(&self, submission: &Submission) -> Evaluation {
        evaluate(submission.work_type, &submission.entries)
    }

    /// Validates and appends one submission.
    ///
    /// # Errors
    /// - `UnknownTask` when a taxonomy is attached and an entry is outside it.
    /// - `Rejected` when the hour rule fails; the ledger is untouched.
    /// - `Ledger` on storage failure (including duplicate ids).
    pub fn submit(&self, submission: &Submission) -> ServiceResult<Receipt> {
        self.check_taxonomy(submission)?;

        let evaluation = self.preview(submission);
        if !evaluation.allowed {
            warn!(
                "event=submission_reject module=service status=rejected submission_id={} work_type={} entries={} total={}",
                submission.id,
                submission.work_type,
                submission.entries.len(),
                evaluation.total
            );
            return Err(ServiceError::Rejected(evaluation));
        }

        let submission_id = self.ledger.append(submission).map_err(|err| {
            error!(
                "event=submission_accept module=service status=error submission_id={} error={}",
                submission.id, err
            );
            err
        })?;

        info!(
            "event=submission_accept module=service status=ok submission_id={} work_type={} entries={} total={}",
            submission_id,
            submission.work_type,
            submission.entries.len(),
            evaluation.total
        );

        Ok(Receipt {
            submission_id,
            records: submission.records(),
            evaluation,
        })
    }

    pub fn get(&self, id: SubmissionId) -> ServiceResult<Option<Submission>> {
        Ok(self.ledger.get(id)?)
    }

    pub fn list(&self, query: &LedgerQuery) -> ServiceResult<Vec<Submission>> {
        Ok(self.ledger.list(query)?)
    }

    /// Flattens matching submissions into export records, in append order.
    pub fn records(&self, query: &LedgerQuery) -> ServiceResult<Vec<SubmissionRecord>> {
        let submissions = self.ledger.list(query)?;
        Ok(submissions.iter().flat_map(Submission::records).collect())
    }

    /// Chart data over matching submissions.
    pub fn distribution(
        &self,
        query: &LedgerQuery,
        grouping: Grouping,
    ) -> ServiceResult<Distribution> {
        let submissions = self.ledger.list(query)?;
        Ok(Distribution::aggregate(
            submissions.iter().map(|submission| &submission.entries),
            grouping,
        ))
    }

    fn check_taxonomy(&self, submission: &Submission) -> ServiceResult<()> {
        let Some(taxonomy) = self.taxonomy.as_ref() else {
            return Ok(());
        };
        if let Some((key, _)) = submission
            .entries
            .iter()
            .find(|(key, _)| !taxonomy.contains(key))
        {
            warn!(
                "event=submission_reject module=service status=unknown_task submission_id={}",
                submission.id
            );
            return Err(ServiceError::UnknownTask(key.clone()));
        }
        Ok(())
    }
}
