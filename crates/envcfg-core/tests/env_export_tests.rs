//! `.env` export format tests
//!
//! The export text is the one format other tools consume, so key order and
//! quoting are pinned here byte for byte.

use chrono::{NaiveDate, NaiveDateTime};
use envcfg_core::{render_env, ConfigMap, NewRecord};

fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 31)
        .unwrap()
        .and_hms_opt(23, 59, 0)
        .unwrap()
}

#[test]
fn test_export_orders_keys_regardless_of_input_order() {
    let config = ConfigMap::parse_json(r#"{"B_KEY": "1", "A_KEY": "has space"}"#).unwrap();

    let out = render_env("payments", Some(&config), fixed_time());

    assert_eq!(
        out,
        "# Configuration for payments\n\
         # Generated on 2025-01-31 23:59:00\n\
         \n\
         A_KEY=\"has space\"\n\
         B_KEY=1\n"
    );
}

#[test]
fn test_export_uses_ordinal_key_order() {
    let config: ConfigMap = [("b", "1"), ("B", "2"), ("_x", "3"), ("A1", "4")]
        .into_iter()
        .collect();

    let out = render_env("p", Some(&config), fixed_time());
    let keys: Vec<&str> = out
        .lines()
        .skip(3)
        .map(|l| l.split('=').next().unwrap())
        .collect();

    assert_eq!(keys, vec!["A1", "B", "_x", "b"]);
}

#[test]
fn test_export_quotes_without_escaping() {
    let config: ConfigMap = [
        ("HASH", "abc#123"),
        ("EQ", "a=b"),
        ("QUOTED", "he said \"no\""),
        ("URL", "https://x.test/path?q=1"),
        ("PLAIN", "value"),
    ]
    .into_iter()
    .collect();

    let out = render_env("p", Some(&config), fixed_time());
    let body: Vec<&str> = out.lines().skip(3).collect();

    assert_eq!(
        body,
        vec![
            "EQ=\"a=b\"",
            "HASH=\"abc#123\"",
            "PLAIN=value",
            "QUOTED=\"he said \"no\"\"",
            "URL=\"https://x.test/path?q=1\"",
        ]
    );
}

#[test]
fn test_export_empty_map_is_header_only() {
    let out = render_env("p", Some(&ConfigMap::new()), fixed_time());
    assert_eq!(out.lines().count(), 3);
    assert!(out.ends_with("\n\n"));
}

#[test]
fn test_record_display_and_export_agree_on_order() {
    let config = ConfigMap::parse_json(r#"{"Z":"1","M":"2","A":"3"}"#).unwrap();
    let record = NewRecord::new("p").with_config(config.clone()).into_record(1);

    let display = record.config_display();
    let pos = |k: &str| display.find(&format!("\"{}\"", k)).unwrap();
    assert!(pos("A") < pos("M") && pos("M") < pos("Z"));

    let out = render_env(&record.project, record.config.as_ref(), fixed_time());
    let keys: Vec<&str> = out.lines().skip(3).map(|l| &l[..1]).collect();
    assert_eq!(keys, vec!["A", "M", "Z"]);
}
