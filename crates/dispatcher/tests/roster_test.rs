use std::sync::Arc;

use chrono::NaiveDate;
use escalator_core::{config::RosterConfig, EscalatorError};
use escalator_dispatcher::RosterReader;
use escalator_infrastructure::InMemoryObjectStore;
use escalator_testing_utils::RosterBuilder;
use serde_json::{json, Value};

fn reader() -> RosterReader {
    RosterReader::new(Arc::new(InMemoryObjectStore::new()), RosterConfig::default())
}

#[test]
fn test_rows_in_order_with_normalized_phones() {
    let roster = RosterBuilder::new()
        .with_row("鈴木", "2026-10-18", "090-2222-2222")
        .with_row("高橋", 46313, "(080) 3333 3333")
        .build_bytes();

    let candidates = reader().parse_workbook(&roster).unwrap();

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].name, "鈴木");
    assert_eq!(candidates[0].phone, "+819022222222");
    assert_eq!(candidates[1].phone, "+818033333333");
    let today = NaiveDate::from_ymd_opt(2026, 10, 18);
    assert_eq!(candidates[0].scheduled_date, today);
    assert_eq!(candidates[1].scheduled_date, today);
}

#[test]
fn test_bad_phones_are_dropped() {
    let roster = RosterBuilder::new()
        .with_row("短い", "2026-10-18", "03-1234")
        .with_row("国外", "2026-10-18", "+1 484 301 9679")
        .with_cells(json!("空"), json!("2026-10-18"), Value::Null)
        // 数値セルは先頭の0が失われるため規範化できない
        .with_cells(json!("数値"), json!("2026-10-18"), json!(9012345678u64))
        .with_row("有効", "2026-10-18", "09012345678")
        .build_bytes();

    let candidates = reader().parse_workbook(&roster).unwrap();

    let names: Vec<_> = candidates.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["有効"]);
}

#[test]
fn test_missing_name_and_date() {
    let roster = RosterBuilder::new()
        .with_cells(Value::Null, json!("いつか"), json!("090-5555-5555"))
        .with_raw_row(vec![json!("短い行")])
        .build_bytes();

    let candidates = reader().parse_workbook(&roster).unwrap();

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].name, "不明");
    assert_eq!(candidates[0].scheduled_date, None);
}

#[test]
fn test_header_only_roster_is_empty() {
    let candidates = reader()
        .parse_workbook(&RosterBuilder::new().build_bytes())
        .unwrap();
    assert!(candidates.is_empty());
}

#[test]
fn test_invalid_workbook() {
    let err = reader().parse_workbook(b"not json").unwrap_err();
    assert!(matches!(err, EscalatorError::RosterFormat(_)));
}
