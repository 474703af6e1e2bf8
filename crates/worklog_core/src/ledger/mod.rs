//! Append-only ledger of accepted submissions.
//!
//! # Responsibility
//! - Define the injected store contract used by the submission service.
//! - Provide a process-lifetime store and a durable SQLite store.
//!
//! # Invariants
//! - Stores only append; there is no update or delete path.
//! - Listing preserves append order.
//! - A submission id is appended at most once.

pub mod memory;
pub mod sqlite;

use crate::db::DbError;
use crate::model::submission::{Submission, SubmissionId};
use crate::model::work_type::WorkType;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use memory::MemoryLedger;
pub use sqlite::SqliteLedger;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger storage errors.
#[derive(Debug)]
pub enum LedgerError {
    Db(DbError),
    Duplicate(SubmissionId),
    InvalidData(String),
    /// A previous writer panicked while holding the in-memory log.
    Poisoned,
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Duplicate(id) => write!(f, "submission already recorded: {id}"),
            Self::InvalidData(message) => write!(f, "invalid ledger data: {message}"),
            Self::Poisoned => write!(f, "in-memory ledger lock poisoned"),
        }
    }
}

impl Error for LedgerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for LedgerError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Filter and pagination options for ledger reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerQuery {
    pub person: Option<String>,
    pub date: Option<NaiveDate>,
    pub work_type: Option<WorkType>,
    pub limit: Option<u32>,
    pub offset: u32,
}

impl LedgerQuery {
    pub fn for_person(person: impl Into<String>) -> Self {
        Self {
            person: Some(person.into()),
            ..Self::default()
        }
    }

    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    /// Filter predicate shared by stores that filter in process.
    pub fn matches(&self, submission: &Submission) -> bool {
        self.person
            .as_deref()
            .map_or(true, |person| submission.person == person.trim())
            && self.date.map_or(true, |date| submission.date == date)
            && self
                .work_type
                .map_or(true, |work_type| submission.work_type == work_type)
    }
}

/// Append-only store contract for accepted submissions.
pub trait LedgerStore {
    /// Appends one submission.
    ///
    /// # Errors
    /// - `Duplicate` when the id was already appended.
    fn append(&self, submission: &Submission) -> LedgerResult<SubmissionId>;
    fn get(&self, id: SubmissionId) -> LedgerResult<Option<Submission>>;
    /// Lists matching submissions in append order.
    fn list(&self, query: &LedgerQuery) -> LedgerResult<Vec<Submission>>;
    fn len(&self) -> LedgerResult<usize>;

    fn is_empty(&self) -> LedgerResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl<T: LedgerStore + ?Sized> LedgerStore for &T {
    fn append(&self, submission: &Submission) -> LedgerResult<SubmissionId> {
        (**self).append(submission)
    }

    fn get(&self, id: SubmissionId) -> LedgerResult<Option<Submission>> {
        (**self).get(id)
    }

    fn list(&self, query: &LedgerQuery) -> LedgerResult<Vec<Submission>> {
        (**self).list(query)
    }

    fn len(&self) -> LedgerResult<usize> {
        (**self).len()
    }
}
