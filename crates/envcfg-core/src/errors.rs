use crate::model::RecordId;
use thiserror::Error;

/// Result type alias using RecordError
pub type Result<T> = std::result::Result<T, RecordError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure a caller can observe from the persistence layer falls into
/// exactly one of these kinds. Each kind maps to a stable code so callers
/// can branch on "not found" versus "rejected by the store" without parsing
/// messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CfgErrorKind {
    /// Store unreachable, credentials rejected, or settings unusable
    Connection,
    /// Input rejected before any store call (empty project, bad config JSON)
    Validation,
    /// A stored row could not be decoded into a record
    RowDecode,
    /// The store rejected a statement
    Persistence,
    /// No record with the requested id
    NotFound,
    Serialization,
    Internal,
}

impl CfgErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            CfgErrorKind::Connection => "ERR_CONNECTION",
            CfgErrorKind::Validation => "ERR_VALIDATION",
            CfgErrorKind::RowDecode => "ERR_ROW_DECODE",
            CfgErrorKind::Persistence => "ERR_PERSISTENCE",
            CfgErrorKind::NotFound => "ERR_NOT_FOUND",
            CfgErrorKind::Serialization => "ERR_SERIALIZATION",
            CfgErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the kind for programmatic handling plus the operation and record
/// id it happened in, for messages and logs.
#[derive(Debug, Clone, PartialEq)]
pub struct CfgError {
    kind: CfgErrorKind,
    op: Option<String>,
    record_id: Option<RecordId>,
    message: String,
}

impl CfgError {
    /// Create a new error with the specified kind
    pub fn new(kind: CfgErrorKind) -> Self {
        Self {
            kind,
            op: None,
            record_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add record id context
    pub fn with_record_id(mut self, id: RecordId) -> Self {
        self.record_id = Some(id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> CfgErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn record_id(&self) -> Option<RecordId> {
        self.record_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// True when the error means "no such record" rather than a failure
    pub fn is_not_found(&self) -> bool {
        self.kind == CfgErrorKind::NotFound
    }
}

impl std::fmt::Display for CfgError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(record_id) = self.record_id {
            write!(f, " (record_id: {})", record_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for CfgError {}

// ========== End Error Facility ==========

/// Domain errors raised by the model, validation rules and renderers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// Project name is empty or whitespace-only
    #[error("Project name is required")]
    EmptyProject,

    /// Configuration text is not parseable JSON
    #[error("Invalid JSON in configuration: {reason}")]
    InvalidConfigJson { reason: String },

    /// Configuration JSON parsed but is not an object
    #[error("Configuration must be a JSON object of strings, found {found}")]
    ConfigNotObject { found: String },

    /// Configuration object has a value that is not a string
    #[error("Configuration value for key '{key}' must be a string, found {found}")]
    NonStringValue { key: String, found: String },

    /// No record with this id
    #[error("Configuration with ID {id} not found")]
    RecordNotFound { id: RecordId },

    /// A stored row could not be decoded
    #[error("Row {id} could not be decoded: {reason}")]
    MalformedRow { id: RecordId, reason: String },

    /// JSON encoding of an outgoing value failed
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<RecordError> for CfgError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::EmptyProject => CfgError::new(CfgErrorKind::Validation)
                .with_op("validate_project")
                .with_message("Project name is required"),

            RecordError::InvalidConfigJson { .. }
            | RecordError::ConfigNotObject { .. }
            | RecordError::NonStringValue { .. } => CfgError::new(CfgErrorKind::Validation)
                .with_op("parse_config")
                .with_message(err.to_string()),

            RecordError::RecordNotFound { id } => CfgError::new(CfgErrorKind::NotFound)
                .with_record_id(id)
                .with_message(format!("Configuration with ID {} not found", id)),

            RecordError::MalformedRow { id, reason } => CfgError::new(CfgErrorKind::RowDecode)
                .with_record_id(id)
                .with_message(reason),

            RecordError::Serialization { message } => {
                CfgError::new(CfgErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for RecordError {
    fn from(err: serde_json::Error) -> Self {
        RecordError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code_op_and_record() {
        let err = CfgError::new(CfgErrorKind::Persistence)
            .with_op("update")
            .with_record_id(7)
            .with_message("disk full");
        assert_eq!(
            err.to_string(),
            "[ERR_PERSISTENCE] in operation 'update': disk full (record_id: 7)"
        );
    }

    #[test]
    fn test_display_without_context() {
        let err = CfgError::new(CfgErrorKind::Internal);
        assert_eq!(err.to_string(), "[ERR_INTERNAL]");
    }

    #[test]
    fn test_not_found_maps_to_not_found_kind() {
        let err: CfgError = RecordError::RecordNotFound { id: 42 }.into();
        assert!(err.is_not_found());
        assert_eq!(err.record_id(), Some(42));
        assert_eq!(err.message(), "Configuration with ID 42 not found");
    }

    #[test]
    fn test_malformed_row_is_row_decode_not_validation() {
        let err: CfgError = RecordError::MalformedRow {
            id: 3,
            reason: "bad json".to_string(),
        }
        .into();
        assert_eq!(err.kind(), CfgErrorKind::RowDecode);
        assert_ne!(err.kind(), CfgErrorKind::Validation);
    }
}
