// tests/collector_normalize.rs
use chrono::{TimeZone, Utc};

use feedback_triage::classify::{classify_category, KeywordTables};
use feedback_triage::collector::{collect, normalize, normalize_text};
use feedback_triage::feedback::SourceRecord;

#[test]
fn empty_is_ok() {
    assert_eq!(normalize_text(""), "");
}

#[test]
fn unescapes_entities_and_keeps_markup_verbatim() {
    let s = "Дуже&nbsp;<b>швидко</b> &amp; зручно";
    assert_eq!(normalize_text(s), "Дуже <b>швидко</b> & зручно");
}

#[test]
fn text_between_angle_brackets_survives_and_still_classifies() {
    let raw = r#"{"kind":"social","id":"c3","text":"ціна a<b та c>d",
                  "created_at":"2026-10-02T00:00:00Z"}"#;
    let rec: SourceRecord = serde_json::from_str(raw).unwrap();
    let item = normalize(rec);
    assert_eq!(item.text, "ціна a<b та c>d");
    assert_eq!(
        classify_category(&item.text, &KeywordTables::builtin()),
        "price"
    );
}

#[test]
fn folds_whitespace_and_nbsp() {
    let s = "A\u{00A0}\n\tB   C";
    assert_eq!(normalize_text(s), "A B C");
}

#[test]
fn json_records_normalize_into_one_shape() {
    let raw = r#"[
        {"kind":"rated","id":7,"content":"  Погано  ","rating":2,"source":"playstore",
         "created_at":"2026-10-01T00:00:00Z"},
        {"kind":"social","id":"c1","text":"Супер!","username":"u","likes_count":3,
         "timestamp":"1790000000","created_at":"2026-10-02T00:00:00Z"}
    ]"#;
    let records: Vec<SourceRecord> = serde_json::from_str(raw).unwrap();
    let items = collect(records);

    assert_eq!(items[0].id, "instagram_c1");
    assert_eq!(items[0].likes, 3);
    assert_eq!(items[0].date, Utc.timestamp_opt(1_790_000_000, 0).unwrap());

    assert_eq!(items[1].id, "7");
    assert_eq!(items[1].text, "Погано");
    assert_eq!(items[1].likes, 0);
    assert_eq!(items[1].date, Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap());
}

#[test]
fn missing_text_becomes_empty_string() {
    let raw = r#"{"kind":"social","id":"c2","created_at":"2026-10-02T00:00:00Z"}"#;
    let rec: SourceRecord = serde_json::from_str(raw).unwrap();
    let item = normalize(rec);
    assert_eq!(item.text, "");
    assert_eq!(item.author, "");
    assert_eq!(item.date, item.created_at);
}
