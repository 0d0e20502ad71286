#![allow(clippy::unwrap_used, clippy::expect_used)]

use envcfg_core::errors::{CfgErrorKind, RecordError};
use envcfg_core::logging_facility::test_capture::init_test_capture;
use envcfg_core::{log_op_end, log_op_error, log_op_start};
use envcfg_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_ERR_KIND,
    FIELD_RECORD_ID,
};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, record_id = 3);

    let events = capture.events_for_op(op_name);
    let start = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_START))
        .expect("start event");
    assert_eq!(start.field(FIELD_RECORD_ID), Some("3"));
    assert!(start.component.is_some());
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events_for_op(op_name);
    let end_events: Vec<_> = events
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = RecordError::RecordNotFound { id: 11 };
    log_op_error!(op_name, err, duration_ms = 10);

    let events = capture.events_for_op(op_name);
    let error_event = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("error event");

    assert_eq!(error_event.level, tracing::Level::ERROR);
    assert_eq!(
        error_event.field(FIELD_ERR_KIND),
        Some(format!("{:?}", CfgErrorKind::NotFound).as_str())
    );
    assert_eq!(error_event.field(FIELD_ERR_CODE), Some("ERR_NOT_FOUND"));
}

#[test]
fn test_capture_count_events() {
    let capture = init_test_capture();
    let op_name = "test_capture_count_unique_4";

    log_op_start!(op_name);
    log_op_end!(op_name, duration_ms = 1);

    let n = capture.count_events(|e| e.op.as_deref() == Some(op_name));
    assert_eq!(n, 2);
}
