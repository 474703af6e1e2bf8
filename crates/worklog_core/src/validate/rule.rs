//! Work-type hour rules as a strategy table.
//!
//! Each `WorkType` maps to exactly one `HourRule`. A rule judges the exact
//! total and renders the user-facing message for its verdict. Work types
//! that share a threshold share one rule row.

use crate::model::hours::{TotalHours, DAILY_HOURS};
use crate::model::work_type::WorkType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of judging one total against a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    Accepted,
    /// Nothing entered yet.
    Empty,
    /// Below the required total by `missing` hours.
    Short { missing: Decimal },
    /// Above the allowed total by `excess` hours.
    Over { excess: Decimal },
}

impl Verdict {
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// One strategy-table row.
#[derive(Debug)]
pub struct HourRule {
    pub name: &'static str,
    judge: fn(Decimal) -> Verdict,
    describe: fn(Verdict, Decimal) -> String,
}

impl HourRule {
    pub fn judge(&self, total: TotalHours) -> Verdict {
        (self.judge)(total.value())
    }

    pub fn describe(&self, verdict: Verdict, total: TotalHours) -> String {
        (self.describe)(verdict, total.value())
    }
}

static EXACT_DAY: HourRule = HourRule {
    name: "exact_day",
    judge: judge_exact_day,
    describe: describe_exact_day,
};

static UP_TO_DAY: HourRule = HourRule {
    name: "up_to_day",
    judge: judge_up_to_day,
    describe: describe_up_to_day,
};

/// Returns the rule row for one work type.
pub fn rule_for(work_type: WorkType) -> &'static HourRule {
    match work_type {
        WorkType::Normal => &EXACT_DAY,
        WorkType::FieldOrTravel | WorkType::HalfDayOrLeave => &UP_TO_DAY,
    }
}

fn daily() -> Decimal {
    Decimal::from(DAILY_HOURS)
}

fn judge_exact_day(total: Decimal) -> Verdict {
    let daily = daily();
    if total == daily {
        Verdict::Accepted
    } else if total < daily {
        Verdict::Short {
            missing: (daily - total).normalize(),
        }
    } else {
        Verdict::Over {
            excess: (total - daily).normalize(),
        }
    }
}

fn judge_up_to_day(total: Decimal) -> Verdict {
    let daily = daily();
    if total <= Decimal::ZERO {
        Verdict::Empty
    } else if total > daily {
        Verdict::Over {
            excess: (total - daily).normalize(),
        }
    } else {
        Verdict::Accepted
    }
}

fn describe_exact_day(verdict: Verdict, total: Decimal) -> String {
    let total = total.normalize();
    match verdict {
        Verdict::Accepted => format!("total {total} hours; ready to submit"),
        Verdict::Short { missing } => format!(
            "a normal work day requires exactly {DAILY_HOURS} hours; {missing} hours short (total {total})"
        ),
        Verdict::Over { excess } => format!(
            "a normal work day requires exactly {DAILY_HOURS} hours; {excess} hours over (total {total})"
        ),
        Verdict::Empty => format!(
            "a normal work day requires exactly {DAILY_HOURS} hours; enter hours"
        ),
    }
}

fn describe_up_to_day(verdict: Verdict, total: Decimal) -> String {
    let total = total.normalize();
    match verdict {
        Verdict::Accepted => format!("total {total} hours; ready to submit"),
        Verdict::Empty => "no hours entered; enter hours before submitting".to_string(),
        Verdict::Over { excess } => format!(
            "total {total} hours exceeds {DAILY_HOURS} hours by {excess}"
        ),
        Verdict::Short { missing } => format!("total {total} hours; {missing} hours short"),
    }
}

#[cfg(test)]
mod tests {
    use super::{rule_for, Verdict};
    use crate::model::hours::TotalHours;
    use crate::model::work_type::WorkType;

    #[test]
    fn each_work_type_dispatches_to_its_threshold() {
        assert_eq!(rule_for(WorkType::Normal).name, "exact_day");
        assert_eq!(rule_for(WorkType::FieldOrTravel).name, "up_to_day");
        assert_eq!(rule_for(WorkType::HalfDayOrLeave).name, "up_to_day");
    }

    #[test]
    fn zero_total_is_short_for_normal_and_empty_otherwise() {
        assert!(matches!(
            rule_for(WorkType::Normal).judge(TotalHours::ZERO),
            Verdict::Short { .. }
        ));
        for work_type in [WorkType::FieldOrTravel, WorkType::HalfDayOrLeave] {
            assert_eq!(rule_for(work_type).judge(TotalHours::ZERO), Verdict::Empty);
        }
    }
}
