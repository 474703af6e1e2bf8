//! Durable ledger store on SQLite.
//!
//! # Invariants
//! - One submission and all its entries are written in a single transaction.
//! - Read paths re-validate persisted rows and reject corruption instead of
//!   masking it (bad hours, unknown work type, total mismatch).
//! - Schema triggers block UPDATE and DELETE on ledger tables.

use super::{LedgerError, LedgerQuery, LedgerResult, LedgerStore};
use crate::model::hours::Hours;
use crate::model::submission::{Submission, SubmissionId};
use crate::model::taxonomy::TaskKey;
use crate::model::work_type::WorkType;
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

const SUBMISSION_SELECT_SQL: &str = "SELECT
    id,
    person,
    work_date,
    work_type,
    total_hours
FROM submissions";

/// SQLite-backed append-only ledger.
pub struct SqliteLedger<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLedger<'conn> {
    /// Wraps a connection returned by `db::open_db*` (migrations applied).
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn load_entries(&self, submission: &mut Submission) -> LedgerResult<()> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT category, subtask, hours
             FROM submission_entries
             WHERE submission_id = ?1
             ORDER BY category ASC, subtask ASC;",
        )?;
        let mut rows = stmt.query([submission.id.to_string()])?;

        while let Some(row) = rows.next()? {
            let category: String = row.get("category")?;
            let subtask: String = row.get("subtask")?;
            let key = TaskKey::new(&category, &subtask).map_err(|err| {
                LedgerError::InvalidData(format!(
                    "invalid task key in submission {}: {err}",
                    submission.id
                ))
            })?;
            let hours_text: String = row.get("hours")?;
            let hours = parse_hours(&hours_text)?;
            if hours.is_zero() {
                return Err(LedgerError::InvalidData(format!(
                    "zero-hour entry {key} persisted for submission {}",
                    submission.id
                )));
            }
            submission.entries.set(key, hours);
        }

        Ok(())
    }
}

impl LedgerStore for SqliteLedger<'_> {
    fn append(&self, submission: &Submission) -> LedgerResult<SubmissionId> {
        let tx = self.conn.unchecked_transaction()?;

        let exists = tx
            .query_row(
                "SELECT 1 FROM submissions WHERE id = ?1;",
                [submission.id.to_string()],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if exists {
            return Err(LedgerError::Duplicate(submission.id));
        }

        tx.execute(
            "INSERT INTO submissions (id, person, work_date, work_type, total_hours)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                submission.id.to_string(),
                submission.person.as_str(),
                submission.date.format(DATE_FORMAT).to_string(),
                submission.work_type.as_str(),
                submission.total().to_string(),
            ],
        )?;

        {
            let mut insert_entry = tx.prepare_cached(
                "INSERT INTO submission_entries (submission_id, category, subtask, hours)
                 VALUES (?1, ?2, ?3, ?4);",
            )?;
            for (key, hours) in submission.entries.iter() {
                insert_entry.execute(params![
                    submission.id.to_string(),
                    key.category.as_str(),
                    key.subtask.as_str(),
                    hours.to_string(),
                ])?;
            }
        }

        tx.commit()?;
        Ok(submission.id)
    }

    fn get(&self, id: SubmissionId) -> LedgerResult<Option<Submission>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SUBMISSION_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let (mut submission, stored_total) = parse_submission_row(row)?;
        self.load_entries(&mut submission)?;
        check_total(&submission, stored_total)?;
        Ok(Some(submission))
    }

    fn list(&self, query: &LedgerQuery) -> LedgerResult<Vec<Submission>> {
        let mut sql = format!("{SUBMISSION_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(person) = query.person.as_deref() {
            sql.push_str(" AND person = ?");
            bind_values.push(Value::Text(person.trim().to_string()));
        }
        if let Some(date) = query.date {
            sql.push_str(" AND work_date = ?");
            bind_values.push(Value::Text(date.format(DATE_FORMAT).to_string()));
        }
        if let Some(work_type) = query.work_type {
            sql.push_str(" AND work_type = ?");
            bind_values.push(Value::Text(work_type.as_str().to_string()));
        }

        sql.push_str(" ORDER BY seq ASC");

        match query.limit {
            Some(limit) => {
                sql.push_str(" LIMIT ? OFFSET ?");
                bind_values.push(Value::Integer(i64::from(limit)));
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
            None if query.offset > 0 => {
                sql.push_str(" LIMIT -1 OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
            None => {}
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut headers = Vec::new();
        while let Some(row) = rows.next()? {
            headers.push(parse_submission_row(row)?);
        }
        drop(rows);

        let mut submissions = Vec::with_capacity(headers.len());
        for (mut submission, stored_total) in headers {
            self.load_entries(&mut submission)?;
            check_total(&submission, stored_total)?;
            submissions.push(submission);
        }
        Ok(submissions)
    }

    fn len(&self) -> LedgerResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM submissions;", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| LedgerError::InvalidData(format!("negative row count {count}")))
    }
}

fn parse_submission_row(row: &Row<'_>) -> LedgerResult<(Submission, Decimal)> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        LedgerError::InvalidData(format!("invalid uuid value `{id_text}` in submissions.id"))
    })?;

    let date_text: String = row.get("work_date")?;
    let date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|_| {
        LedgerError::InvalidData(format!(
            "invalid date `{date_text}` in submissions.work_date"
        ))
    })?;

    let work_type_text: String = row.get("work_type")?;
    let work_type = WorkType::parse(&work_type_text).map_err(|err| {
        LedgerError::InvalidData(format!("{err} in submissions.work_type"))
    })?;

    let person: String = row.get("person")?;
    let submission = Submission::with_id(id, &person, date, work_type)
        .map_err(|err| LedgerError::InvalidData(format!("submission {id_text}: {err}")))?;

    let total_text: String = row.get("total_hours")?;
    let total = Decimal::from_str(&total_text).map_err(|_| {
        LedgerError::InvalidData(format!(
            "invalid total `{total_text}` in submissions.total_hours"
        ))
    })?;

    Ok((submission, total))
}

fn parse_hours(text: &str) -> LedgerResult<Hours> {
    let value = Decimal::from_str(text).map_err(|_| {
        LedgerError::InvalidData(format!("invalid hours `{text}` in submission_entries.hours"))
    })?;
    Hours::new(value).map_err(|err| LedgerError::InvalidData(err.to_string()))
}

fn check_total(submission: &Submission, stored_total: Decimal) -> LedgerResult<()> {
    let computed = submission.total().value();
    if computed != stored_total {
        return Err(LedgerError::InvalidData(format!(
            "submission {} total mismatch: stored {} computed {}",
            submission.id,
            stored_total.normalize(),
            computed.normalize()
        )));
    }
    Ok(())
}
