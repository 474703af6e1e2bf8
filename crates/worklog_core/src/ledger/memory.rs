//! Process-lifetime ledger store.
//!
//! Entries live only as long as the owning process; a restart starts empty.

use super::{LedgerError, LedgerQuery, LedgerResult, LedgerStore};
use crate::model::submission::{Submission, SubmissionId};
use std::sync::{Mutex, MutexGuard};

/// In-memory append-only ledger.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    log: Mutex<Vec<Submission>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> LedgerResult<MutexGuard<'_, Vec<Submission>>> {
        self.log.lock().map_err(|_| LedgerError::Poisoned)
    }
}

impl LedgerStore for MemoryLedger {
    fn append(&self, submission: &Submission) -> LedgerResult<SubmissionId> {
        let mut log = self.lock()?;
        if log.iter().any(|existing| existing.id == submission.id) {
            return Err(LedgerError::Duplicate(submission.id));
        }
        log.push(submission.clone());
        Ok(submission.id)
    }

    fn get(&self, id: SubmissionId) -> LedgerResult<Option<Submission>> {
        let log = self.lock()?;
        Ok(log.iter().find(|submission| submission.id == id).cloned())
    }

    fn list(&self, query: &LedgerQuery) -> LedgerResult<Vec<Submission>> {
        let log = self.lock()?;
        let matching = log
            .iter()
            .filter(|submission| query.matches(submission))
            .skip(query.offset as usize);
        let items = match query.limit {
            Some(limit) => matching.take(limit as usize).cloned().collect(),
            None => matching.cloned().collect(),
        };
        Ok(items)
    }

    fn len(&self) -> LedgerResult<usize> {
        Ok(self.lock()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryLedger;
    use crate::ledger::{LedgerError, LedgerQuery, LedgerStore};
    use crate::model::submission::Submission;
    use crate::model::work_type::WorkType;
    use chrono::NaiveDate;

    fn submission(person: &str, day: u32) -> Submission {
        let date = NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        Submission::new(person, date, WorkType::Normal).unwrap()
    }

    #[test]
    fn appends_in_order_and_rejects_duplicates() {
        let ledger = MemoryLedger::new();
        let first = submission("kim", 3);
        let second = submission("lee", 4);
        ledger.append(&first).unwrap();
        ledger.append(&second).unwrap();

        let err = ledger.append(&first).unwrap_err();
        assert!(matches!(err, LedgerError::Duplicate(id) if id == first.id));

        let all = ledger.list(&LedgerQuery::default()).unwrap();
        assert_eq!(all, vec![first, second]);
    }

    #[test]
    fn list_filters_and_paginates() {
        let ledger = MemoryLedger::new();
        for day in 1..=4 {
            ledger.append(&submission("kim", day)).unwrap();
        }
        ledger.append(&submission("lee", 1)).unwrap();

        let kim = ledger.list(&LedgerQuery::for_person("kim")).unwrap();
        assert_eq!(kim.len(), 4);

        let page = LedgerQuery {
            person: Some("kim".to_string()),
            limit: Some(2),
            offset: 1,
            ..LedgerQuery::default()
        };
        let page = ledger.list(&page).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].date.to_string(), "2025-03-02");
        assert_eq!(ledger.len().unwrap(), 5);
    }
}
