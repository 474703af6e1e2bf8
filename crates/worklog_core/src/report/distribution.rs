//! Hour distribution for the day's pie chart.
//!
//! # Invariants
//! - Groups are keyed by typed labels, never by joined text.
//! - Zero-hour groups never appear as slices.
//! - Slices sort by hours descending, then label ascending.
//! - `share` is a percentage of the distribution total, rounded half away
//!   from zero to one decimal place.

use crate::model::hours::TotalHours;
use crate::model::submission::EntrySet;
use crate::model::taxonomy::{Category, Subtask};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const SHARE_DECIMALS: u32 = 1;

/// Aggregation level for slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    Category,
    Task,
}

/// One chart slice. `subtask` is set only for task grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slice {
    pub label: String,
    pub category: Category,
    pub subtask: Option<Subtask>,
    pub hours: TotalHours,
    pub share: Decimal,
}

/// Ordered chart data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Distribution {
    pub total: TotalHours,
    pub slices: Vec<Slice>,
}

impl Distribution {
    pub fn by_category(entries: &EntrySet) -> Self {
        Self::aggregate([entries], Grouping::Category)
    }

    pub fn by_task(entries: &EntrySet) -> Self {
        Self::aggregate([entries], Grouping::Task)
    }

    /// Aggregates many entry sets (e.g. a week of submissions) into one chart.
    pub fn aggregate<'a>(
        entry_sets: impl IntoIterator<Item = &'a EntrySet>,
        grouping: Grouping,
    ) -> Self {
        let mut groups: BTreeMap<(Category, Option<Subtask>), TotalHours> = BTreeMap::new();
        for entries in entry_sets {
            for (key, hours) in entries.iter() {
                let group = match grouping {
                    Grouping::Category => (key.category.clone(), None),
                    Grouping::Task => (key.category.clone(), Some(key.subtask.clone())),
                };
                let slot = groups.entry(group).or_default();
                *slot = *slot + hours;
            }
        }

        let total = groups
            .values()
            .fold(TotalHours::ZERO, |acc, hours| acc + *hours);
        let total_value = total.value();

        let mut slices: Vec<Slice> = groups
            .into_iter()
            .filter(|(_, hours)| !hours.is_zero())
            .map(|((category, subtask), hours)| Slice {
                label: slice_label(&category, subtask.as_ref()),
                share: share_of(hours.value(), total_value),
                category,
                subtask,
                hours,
            })
            .collect();
        slices.sort_by(|a, b| {
            b.hours
                .cmp(&a.hours)
                .then_with(|| a.label.cmp(&b.label))
                .then_with(|| a.subtask.cmp(&b.subtask))
        });

        Self { total, slices }
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

fn slice_label(category: &Category, subtask: Option<&Subtask>) -> String {
    match subtask {
        Some(subtask) => format!("{category}/{subtask}"),
        None => category.to_string(),
    }
}

fn share_of(part: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    (part * Decimal::ONE_HUNDRED / total)
        .round_dp_with_strategy(SHARE_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}
