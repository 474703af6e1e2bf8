use chrono::NaiveDate;
use rust_decimal::Decimal;
use worklog_core::db::open_db_in_memory;
use worklog_core::{
    Grouping, Hours, LedgerError, LedgerQuery, LedgerStore, MemoryLedger, ServiceError,
    SqliteLedger, Submission, SubmissionService, TaskKey, Taxonomy, Verdict, WorkType,
};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

fn entry(category: &str, subtask: &str, tenths: i64) -> (TaskKey, Hours) {
    (
        TaskKey::new(category, subtask).unwrap(),
        Hours::from_tenths(tenths).unwrap(),
    )
}

fn submission(person: &str, day: u32, work_type: WorkType, items: &[(&str, &str, i64)]) -> Submission {
    items.iter().fold(
        Submission::new(person, date(day), work_type).unwrap(),
        |acc, (category, subtask, tenths)| {
            let (key, hours) = entry(category, subtask, *tenths);
            acc.with_entry(key, hours)
        },
    )
}

#[test]
fn accepted_submission_is_appended_with_records() {
    let service = SubmissionService::new(MemoryLedger::new());
    let day = submission(
        "kim",
        2,
        WorkType::Normal,
        &[("R&D", "실험", 40), ("조직", "문서작성", 40)],
    );

    let receipt = service.submit(&day).unwrap();

    assert_eq!(receipt.submission_id, day.id);
    assert!(receipt.evaluation.allowed);
    assert_eq!(receipt.records.len(), 2);
    let record = &receipt.records[0];
    assert_eq!(record.person, "kim");
    assert_eq!(record.date, date(2));
    assert_eq!(record.work_type, WorkType::Normal);
    assert_eq!(record.category.as_str(), "R&D");
    assert_eq!(record.subtask.as_str(), "실험");
    assert_eq!(record.hours.value(), Decimal::from(4));
    assert_eq!(service.ledger().len().unwrap(), 1);
}

#[test]
fn rejected_submission_leaves_ledger_untouched() {
    let service = SubmissionService::new(MemoryLedger::new());
    let short = submission("kim", 2, WorkType::Normal, &[("R&D", "실험", 35)]);

    let err = service.submit(&short).unwrap_err();
    match err {
        ServiceError::Rejected(evaluation) => {
            assert!(!evaluation.allowed);
            assert!(matches!(evaluation.verdict, Verdict::Short { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(service.ledger().is_empty().unwrap());
}

#[test]
fn preview_has_no_side_effects() {
    let service = SubmissionService::new(MemoryLedger::new());
    let leave = submission("lee", 3, WorkType::HalfDayOrLeave, &[("기타", "기타", 40)]);

    let first = service.preview(&leave);
    let second = service.preview(&leave);
    assert!(first.allowed);
    assert_eq!(first, second);
    assert!(service.ledger().is_empty().unwrap());
}

#[test]
fn taxonomy_gate_rejects_unknown_leaves() {
    let service = SubmissionService::new(MemoryLedger::new())
        .with_taxonomy(Taxonomy::default_catalog());
    let day = submission("kim", 2, WorkType::FieldOrTravel, &[("R&D", "조사", 40)]);

    let err = service.submit(&day).unwrap_err();
    assert!(matches!(err, ServiceError::UnknownTask(ref key) if key.to_string() == "R&D/조사"));
    assert!(service.ledger().is_empty().unwrap());
}

#[test]
fn duplicate_submit_surfaces_ledger_error() {
    let service = SubmissionService::new(MemoryLedger::new());
    let day = submission("kim", 2, WorkType::FieldOrTravel, &[("개발", "조사", 50)]);

    service.submit(&day).unwrap();
    let err = service.submit(&day).unwrap_err();
    assert!(matches!(err, ServiceError::Ledger(LedgerError::Duplicate(_))));
}

#[test]
fn records_and_distribution_span_matching_submissions() {
    let conn = open_db_in_memory().unwrap();
    let ledger = SqliteLedger::new(&conn);
    let service = SubmissionService::new(&ledger);

    service
        .submit(&submission(
            "kim",
            2,
            WorkType::Normal,
            &[("개발", "구현", 60), ("조직", "회의", 20)],
        ))
        .unwrap();
    service
        .submit(&submission("kim", 3, WorkType::HalfDayOrLeave, &[("개발", "구현", 40)]))
        .unwrap();
    service
        .submit(&submission("lee", 2, WorkType::Normal, &[("영업", "견적", 80)]))
        .unwrap();

    let kim = LedgerQuery::for_person("kim");
    let records = service.records(&kim).unwrap();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|record| record.person == "kim"));

    let chart = service.distribution(&kim, Grouping::Category).unwrap();
    assert_eq!(chart.total.value(), Decimal::from(12));
    assert_eq!(chart.slices[0].label, "개발");
    assert_eq!(chart.slices[0].hours.value(), Decimal::from(10));
    assert_eq!(chart.slices[0].share, Decimal::new(833, 1));

    let by_day = service.list(&LedgerQuery::for_date(date(2))).unwrap();
    assert_eq!(by_day.len(), 2);
    assert_eq!(ledger.len().unwrap(), 3);
}
