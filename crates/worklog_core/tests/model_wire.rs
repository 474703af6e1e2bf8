use chrono::NaiveDate;
use uuid::Uuid;
use worklog_core::{evaluate, Hours, Submission, TaskKey, WorkType};

#[test]
fn submission_serialization_uses_expected_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    let submission = Submission::with_id(id, " kim ", date, WorkType::FieldOrTravel)
        .unwrap()
        .with_entry(
            TaskKey::new("개발", "조사").unwrap(),
            Hours::from_tenths(25).unwrap(),
        );

    let json = serde_json::to_value(&submission).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["person"], "kim");
    assert_eq!(json["date"], "2025-06-02");
    assert_eq!(json["work_type"], "field_or_travel");
    assert_eq!(json["entries"][0]["key"]["category"], "개발");
    assert_eq!(json["entries"][0]["key"]["subtask"], "조사");
    assert_eq!(json["entries"][0]["hours"], "2.5");

    let decoded: Submission = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, submission);
}

#[test]
fn deserialize_rejects_hours_above_cap() {
    let value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "person": "kim",
        "date": "2025-06-02",
        "work_type": "normal",
        "entries": [
            { "key": { "category": "개발", "subtask": "조사" }, "hours": "8.5" }
        ]
    });

    let err = serde_json::from_value::<Submission>(value).unwrap_err();
    assert!(
        err.to_string().contains("must not exceed 8"),
        "unexpected error: {err}"
    );
}

#[test]
fn deserialize_rejects_blank_labels() {
    let value = serde_json::json!({ "category": "  ", "subtask": "조사" });
    assert!(serde_json::from_value::<TaskKey>(value).is_err());
}

#[test]
fn with_id_rejects_nil_id_and_blank_person() {
    let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    assert!(Submission::with_id(Uuid::nil(), "kim", date, WorkType::Normal).is_err());
    assert!(Submission::new("   ", date, WorkType::Normal).is_err());
}

#[test]
fn evaluation_serializes_verdict_kind() {
    let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    let submission = Submission::new("kim", date, WorkType::Normal)
        .unwrap()
        .with_entry(
            TaskKey::new("R&D", "실험").unwrap(),
            Hours::from_tenths(35).unwrap(),
        );

    let evaluation = evaluate(submission.work_type, &submission.entries);
    let json = serde_json::to_value(&evaluation).unwrap();
    assert_eq!(json["allowed"], false);
    assert_eq!(json["verdict"]["kind"], "short");
    assert_eq!(json["verdict"]["missing"], "4.5");
    assert_eq!(json["total"], "3.5");
}
