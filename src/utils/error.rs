use std::fmt;
use thiserror::Error;

/// 欄位驗證失敗的種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    MissingRequired,
    NullNotAllowed,
    TypeMismatch,
    InvalidEnumValue,
    OutOfRange,
    UnknownField,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::MissingRequired => "missing_required",
            ViolationKind::NullNotAllowed => "null_not_allowed",
            ViolationKind::TypeMismatch => "type_mismatch",
            ViolationKind::InvalidEnumValue => "invalid_enum_value",
            ViolationKind::OutOfRange => "out_of_range",
            ViolationKind::UnknownField => "unknown_field",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field that failed `construct` or `from_wire`.
///
/// `model` is always the innermost schema that owns `field`, so a violation
/// inside a nested object names the nested model. `path` locates the value
/// inside the whole payload (`$` is the payload root).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{model}.{field} ({kind}) at {path}: expected {expected}")]
pub struct ValidationError {
    pub model: String,
    pub field: String,
    pub path: String,
    pub kind: ViolationKind,
    pub expected: String,
}

/// Outcome of one candidate tried while resolving a union.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionAttempt {
    pub candidate: String,
    pub failure: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Schema,
    Configuration,
    Transport,
    Io,
}

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unknown schema: {name}")]
    UnknownSchema { name: String },

    #[error("{}", union_message(.union_schema, .matched, .attempts))]
    AmbiguousOrUnmatchedUnion {
        union_schema: String,
        matched: Vec<String>,
        attempts: Vec<UnionAttempt>,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigError { field: String, message: String },

    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[cfg(feature = "http")]
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Node responded with HTTP {status}: {reason}")]
    HttpStatus { status: u16, reason: String },
}

fn union_message(union_schema: &str, matched: &[String], attempts: &[UnionAttempt]) -> String {
    if matched.len() > 1 {
        return format!(
            "Ambiguous union '{}': candidates {} all matched",
            union_schema,
            matched.join(", ")
        );
    }

    let reasons: Vec<String> = attempts
        .iter()
        .filter_map(|a| a.failure.as_ref().map(|f| format!("{}: {}", a.candidate, f)))
        .collect();
    format!("No candidate of union '{}' matched [{}]", union_schema, reasons.join("; "))
}

impl ModelError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ModelError::Validation(_)
            | ModelError::UnknownSchema { .. }
            | ModelError::AmbiguousOrUnmatchedUnion { .. }
            | ModelError::SerializationError(_) => ErrorCategory::Schema,
            ModelError::ConfigError { .. } | ModelError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            #[cfg(feature = "http")]
            ModelError::ApiError(_) => ErrorCategory::Transport,
            ModelError::HttpStatus { .. } => ErrorCategory::Transport,
            ModelError::IoError(_) => ErrorCategory::Io,
        }
    }

    /// Only transport failures are worth retrying; schema errors mean the
    /// payload or the caller is wrong and will fail again.
    pub fn is_retryable(&self) -> bool {
        match self {
            #[cfg(feature = "http")]
            ModelError::ApiError(e) => e.is_timeout() || e.is_connect(),
            ModelError::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            ModelError::Validation(v) => Some(v),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
