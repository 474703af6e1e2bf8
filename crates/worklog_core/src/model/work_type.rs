//! Declared attendance mode for one day.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Attendance mode that selects the daily hour rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkType {
    /// Regular office day. Requires exactly the full daily hours.
    Normal,
    /// Field work or business travel.
    FieldOrTravel,
    /// Half-day off or leave.
    HalfDayOrLeave,
}

/// Stable id for `WorkType::Normal`.
pub const WORK_TYPE_NORMAL: &str = "normal";
/// Stable id for `WorkType::FieldOrTravel`.
pub const WORK_TYPE_FIELD_OR_TRAVEL: &str = "field_or_travel";
/// Stable id for `WorkType::HalfDayOrLeave`.
pub const WORK_TYPE_HALF_DAY_OR_LEAVE: &str = "half_day_or_leave";

impl WorkType {
    pub const ALL: [WorkType; 3] = [
        WorkType::Normal,
        WorkType::FieldOrTravel,
        WorkType::HalfDayOrLeave,
    ];

    /// Stable string id used in storage and wire formats.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => WORK_TYPE_NORMAL,
            Self::FieldOrTravel => WORK_TYPE_FIELD_OR_TRAVEL,
            Self::HalfDayOrLeave => WORK_TYPE_HALF_DAY_OR_LEAVE,
        }
    }

    /// User-facing form label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "일반",
            Self::FieldOrTravel => "외근/출장",
            Self::HalfDayOrLeave => "반차/휴가",
        }
    }

    /// Parses a stable id or a form label.
    pub fn parse(value: &str) -> Result<Self, WorkTypeError> {
        let normalized = value.trim();
        if normalized.is_empty() {
            return Err(WorkTypeError::Empty);
        }

        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized || kind.label() == normalized)
            .ok_or_else(|| WorkTypeError::Unsupported(normalized.to_string()))
    }
}

impl Display for WorkType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Work type parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkTypeError {
    Empty,
    Unsupported(String),
}

impl Display for WorkTypeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "work type must not be empty"),
            Self::Unsupported(value) => write!(
                f,
                "work type is unsupported: {value}; expected normal|field_or_travel|half_day_or_leave"
            ),
        }
    }
}

impl Error for WorkTypeError {}

#[cfg(test)]
mod tests {
    use super::{WorkType, WorkTypeError};

    #[test]
    fn parses_ids_and_labels() {
        assert_eq!(WorkType::parse("normal").unwrap(), WorkType::Normal);
        assert_eq!(WorkType::parse(" 외근/출장 ").unwrap(), WorkType::FieldOrTravel);
        assert_eq!(
            WorkType::parse("half_day_or_leave").unwrap(),
            WorkType::HalfDayOrLeave
        );
    }

    #[test]
    fn rejects_empty_and_unknown() {
        assert_eq!(WorkType::parse("  ").unwrap_err(), WorkTypeError::Empty);
        assert_eq!(
            WorkType::parse("Normal").unwrap_err(),
            WorkTypeError::Unsupported("Normal".to_string())
        );
    }
}
