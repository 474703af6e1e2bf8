//! Hour ledger validator.
//!
//! # Responsibility
//! - Decide whether one entry set may be submitted under a work type.
//! - Produce the user-facing status message and exact total.
//!
//! # Invariants
//! - `Normal`: allowed iff total == 8.
//! - `FieldOrTravel` / `HalfDayOrLeave`: allowed iff 0 < total <= 8.
//! - Evaluation is pure; the same input always yields the same `Evaluation`.
//! - Contract violations surface as `ValidationError`, never as panics.

pub mod rule;

use crate::model::hours::{EntryError, FieldValue, Hours, TotalHours};
use crate::model::submission::EntrySet;
use crate::model::taxonomy::TaskKey;
use crate::model::work_type::WorkType;
use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use rule::{rule_for, HourRule, Verdict};

/// Result of one validator pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub allowed: bool,
    pub verdict: Verdict,
    pub message: String,
    pub total: TotalHours,
    /// Raw fields left out of the total (blank or non-numeric).
    pub ignored: Vec<TaskKey>,
}

/// Contract violation raised by raw-field evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Entry { key: TaskKey, source: EntryError },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entry { key, source } => write!(f, "invalid entry {key}: {source}"),
        }
    }
}

impl Error for ValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Entry { source, .. } => Some(source),
        }
    }
}

/// Evaluates a validated entry set under one work type.
pub fn evaluate(work_type: WorkType, entries: &EntrySet) -> Evaluation {
    evaluate_total(work_type, entries.total(), Vec::new())
}

/// Evaluates raw form fields.
///
/// Blank and non-numeric fields are excluded from the sum and reported in
/// `Evaluation::ignored`. Repeated keys keep the last numeric value.
///
/// # Errors
/// - `ValidationError::Entry` when a numeric field is negative or above the
///   per-entry cap.
pub fn evaluate_fields(
    work_type: WorkType,
    fields: &[(TaskKey, &str)],
) -> Result<Evaluation, ValidationError> {
    let (entries, ignored) = collect_fields(fields)?;
    Ok(evaluate_total(work_type, entries.total(), ignored))
}

/// Parses raw form fields into an entry set plus the keys that were skipped.
pub fn collect_fields(
    fields: &[(TaskKey, &str)],
) -> Result<(EntrySet, Vec<TaskKey>), ValidationError> {
    let mut entries = EntrySet::new();
    let mut ignored = Vec::new();

    for (key, raw) in fields {
        match Hours::parse(raw) {
            FieldValue::Missing => {
                debug!("event=field_ignored module=validate reason=missing key={key}");
                ignored.push(key.clone());
            }
            FieldValue::NotNumeric(_) => {
                debug!("event=field_ignored module=validate reason=not_numeric key={key}");
                ignored.push(key.clone());
            }
            FieldValue::Number(value) => {
                let hours = Hours::new(value).map_err(|source| ValidationError::Entry {
                    key: key.clone(),
                    source,
                })?;
                entries.set(key.clone(), hours);
            }
        }
    }

    Ok((entries, ignored))
}

fn evaluate_total(work_type: WorkType, total: TotalHours, ignored: Vec<TaskKey>) -> Evaluation {
    let rule = rule_for(work_type);
    let verdict = rule.judge(total);
    Evaluation {
        allowed: verdict.is_accepted(),
        verdict,
        message: rule.describe(verdict, total),
        total,
        ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::{evaluate, evaluate_fields, ValidationError, Verdict};
    use crate::model::hours::{EntryError, Hours};
    use crate::model::submission::EntrySet;
    use crate::model::taxonomy::TaskKey;
    use crate::model::work_type::WorkType;
    use rust_decimal::Decimal;

    fn key(category: &str, subtask: &str) -> TaskKey {
        TaskKey::new(category, subtask).unwrap()
    }

    #[test]
    fn normal_short_reports_missing_hours() {
        let entries: EntrySet = [(key("R&D", "실험"), Hours::from_tenths(35).unwrap())]
            .into_iter()
            .collect();
        let evaluation = evaluate(WorkType::Normal, &entries);
        assert!(!evaluation.allowed);
        assert_eq!(
            evaluation.verdict,
            Verdict::Short {
                missing: Decimal::new(45, 1)
            }
        );
        assert!(evaluation.message.contains("4.5 hours short"));
    }

    #[test]
    fn empty_set_under_leave_asks_for_hours() {
        let evaluation = evaluate(WorkType::HalfDayOrLeave, &EntrySet::new());
        assert!(!evaluation.allowed);
        assert_eq!(evaluation.verdict, Verdict::Empty);
        assert!(evaluation.message.contains("enter hours"));
    }

    #[test]
    fn raw_fields_skip_blank_and_text() {
        let fields = [
            (key("개발", "조사"), "3"),
            (key("개발", "실험"), ""),
            (key("개발", "설계"), "abc"),
        ];
        let evaluation = evaluate_fields(WorkType::FieldOrTravel, &fields).unwrap();
        assert!(evaluation.allowed);
        assert_eq!(evaluation.total.value(), Decimal::from(3));
        assert_eq!(
            evaluation.ignored,
            vec![key("개발", "실험"), key("개발", "설계")]
        );
    }

    #[test]
    fn raw_fields_reject_out_of_range_values() {
        let fields = [(key("개발", "조사"), "-1")];
        let err = evaluate_fields(WorkType::Normal, &fields).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Entry {
                key: key("개발", "조사"),
                source: EntryError::NegativeHours(Decimal::from(-1)),
            }
        );

        let fields = [(key("개발", "조사"), "9")];
        let err = evaluate_fields(WorkType::Normal, &fields).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Entry {
                source: EntryError::HoursAboveCap(_),
                ..
            }
        ));
    }

    #[test]
    fn raw_fields_repeated_key_keeps_last_value() {
        let fields = [(key("조직", "회의"), "2"), (key("조직", "회의"), "8")];
        let evaluation = evaluate_fields(WorkType::Normal, &fields).unwrap();
        assert!(evaluation.allowed);
    }
}
