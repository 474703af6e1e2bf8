//! Submission domain model.
//!
//! # Responsibility
//! - Hold one person's task-hour entries for one day and work type.
//! - Flatten accepted submissions into per-entry export records.
//!
//! # Invariants
//! - `EntrySet` never stores zero-hour entries.
//! - Re-entering a key overwrites its previous value.
//! - `person` is trimmed and non-empty.

use crate::model::hours::{Hours, TotalHours};
use crate::model::taxonomy::{Category, Subtask, TaskKey};
use crate::model::work_type::WorkType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one submission.
pub type SubmissionId = Uuid;

/// One assigned task leaf with its hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEntry {
    pub key: TaskKey,
    pub hours: Hours,
}

/// In-progress entry set keyed by task leaf.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<TaskEntry>", into = "Vec<TaskEntry>")]
pub struct EntrySet {
    entries: BTreeMap<TaskKey, Hours>,
}

impl EntrySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns hours to one leaf.
    ///
    /// Returns the previous value, if any. A zero value removes the entry.
    pub fn set(&mut self, key: TaskKey, hours: Hours) -> Option<Hours> {
        if hours.is_zero() {
            return self.entries.remove(&key);
        }
        self.entries.insert(key, hours)
    }

    pub fn clear(&mut self, key: &TaskKey) -> Option<Hours> {
        self.entries.remove(key)
    }

    pub fn get(&self, key: &TaskKey) -> Option<Hours> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact sum of all entries.
    pub fn total(&self) -> TotalHours {
        self.entries.values().sum()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&TaskKey, Hours)> {
        self.entries.iter().map(|(key, hours)| (key, *hours))
    }

    pub fn to_entries(&self) -> Vec<TaskEntry> {
        self.iter()
            .map(|(key, hours)| TaskEntry {
                key: key.clone(),
                hours,
            })
            .collect()
    }
}

impl FromIterator<(TaskKey, Hours)> for EntrySet {
    fn from_iter<I: IntoIterator<Item = (TaskKey, Hours)>>(iter: I) -> Self {
        let mut set = EntrySet::new();
        for (key, hours) in iter {
            set.set(key, hours);
        }
        set
    }
}

impl From<Vec<TaskEntry>> for EntrySet {
    fn from(value: Vec<TaskEntry>) -> Self {
        value
            .into_iter()
            .map(|entry| (entry.key, entry.hours))
            .collect()
    }
}

impl From<EntrySet> for Vec<TaskEntry> {
    fn from(value: EntrySet) -> Self {
        value.to_entries()
    }
}

/// Submission construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    EmptyPerson,
    NilId,
}

impl Display for SubmissionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPerson => write!(f, "person must not be empty"),
            Self::NilId => write!(f, "submission id must not be nil"),
        }
    }
}

impl Error for SubmissionError {}

/// One person's entries for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub person: String,
    pub date: NaiveDate,
    pub work_type: WorkType,
    pub entries: EntrySet,
}

impl Submission {
    /// Creates an empty submission with a generated id.
    pub fn new(
        person: &str,
        date: NaiveDate,
        work_type: WorkType,
    ) -> Result<Self, SubmissionError> {
        Self::with_id(Uuid::new_v4(), person, date, work_type)
    }

    /// Creates an empty submission with a caller-provided id.
    ///
    /// Used by storage read paths where identity already exists.
    pub fn with_id(
        id: SubmissionId,
        person: &str,
        date: NaiveDate,
        work_type: WorkType,
    ) -> Result<Self, SubmissionError> {
        if id.is_nil() {
            return Err(SubmissionError::NilId);
        }
        let person = person.trim();
        if person.is_empty() {
            return Err(SubmissionError::EmptyPerson);
        }
        Ok(Self {
            id,
            person: person.to_string(),
            date,
            work_type,
            entries: EntrySet::new(),
        })
    }

    /// Builder-style entry assignment.
    pub fn with_entry(mut self, key: TaskKey, hours: Hours) -> Self {
        self.entries.set(key, hours);
        self
    }

    pub fn total(&self) -> TotalHours {
        self.entries.total()
    }

    /// One export record per non-zero entry, in key order.
    pub fn records(&self) -> Vec<SubmissionRecord> {
        self.entries
            .iter()
            .map(|(key, hours)| SubmissionRecord {
                submission_id: self.id,
                date: self.date,
                person: self.person.clone(),
                work_type: self.work_type,
                category: key.category.clone(),
                subtask: key.subtask.clone(),
                hours,
            })
            .collect()
    }
}

/// Flat per-entry record handed to persistence collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub submission_id: SubmissionId,
    pub date: NaiveDate,
    pub person: String,
    pub work_type: WorkType,
    pub category: Category,
    pub subtask: Subtask,
    pub hours: Hours,
}
