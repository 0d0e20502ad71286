//! Canonical schema constants for structured logging and events
//!
//! `tracing` macros take field names as literal identifiers, so the emitting
//! side (the `log_op_*` macros and the service) spells them out. These
//! constants are the same names on the reading side: the test capture
//! layer and every assertion on captured events look fields up through them.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Entity identifiers
pub const FIELD_RECORD_ID: &str = "record_id";
pub const FIELD_PROJECT: &str = "project";

// Collection sizes
pub const FIELD_ROW_COUNT: &str = "row_count";
pub const FIELD_SKIPPED_COUNT: &str = "skipped_count";
pub const FIELD_ROWS_AFFECTED: &str = "rows_affected";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";
pub const FIELD_REASON: &str = "reason";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_ROW_SKIPPED: &str = "row_skipped";
