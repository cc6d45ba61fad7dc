//! Error types and exit codes for logbook
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args, unknown fields)
//! - 3: Data/store error (missing store, malformed document, lookup failures)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the logbook binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data/store error - missing store, malformed document (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during logbook operations
#[derive(Error, Debug)]
pub enum LogbookError {
    // Usage errors (exit code 2)
    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    #[error("unknown field: {field} (expected one of: {expected})")]
    UnknownField { field: String, expected: String },

    // Data/store errors (exit code 3)
    #[error("store not found (searched from {search_root:?})")]
    StoreNotFound { search_root: PathBuf },

    #[error("invalid store: {reason}")]
    InvalidStore { reason: String },

    #[error("malformed document {path:?}: {reason}")]
    MalformedDocument { path: PathBuf, reason: String },

    #[error("{kind} not found: {query}")]
    NotFound { kind: String, query: String },

    #[error("{}", format_ambiguous(.kind, .query, .candidates))]
    Ambiguous {
        kind: String,
        query: String,
        candidates: Vec<String>,
    },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to {operation}: {reason}")]
    FailedOperation { operation: String, reason: String },

    #[error("{0}")]
    Other(String),
}

fn format_ambiguous(kind: &str, query: &str, candidates: &[String]) -> String {
    let mut out = format!(
        "ambiguous {} '{}' matches {} candidates:",
        kind,
        query,
        candidates.len()
    );
    for (i, candidate) in candidates.iter().enumerate() {
        out.push_str(&format!("\n  {}. {}", i + 1, candidate));
    }
    out
}

impl LogbookError {
    /// Create an error for a document that could not be split or decoded
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        LogbookError::MalformedDocument {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an error for a name query that matched nothing
    pub fn not_found(kind: &str, query: impl std::fmt::Display) -> Self {
        LogbookError::NotFound {
            kind: kind.to_string(),
            query: query.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        LogbookError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for a failed filesystem operation on a specific path
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        LogbookError::FailedOperation {
            operation: format!("{} {}", operation, path),
            reason: error.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            LogbookError::UsageError(_)
            | LogbookError::InvalidValue { .. }
            | LogbookError::UnknownField { .. } => ExitCode::Usage,

            LogbookError::StoreNotFound { .. }
            | LogbookError::InvalidStore { .. }
            | LogbookError::MalformedDocument { .. }
            | LogbookError::NotFound { .. }
            | LogbookError::Ambiguous { .. } => ExitCode::Data,

            LogbookError::Io(_)
            | LogbookError::Yaml(_)
            | LogbookError::Json(_)
            | LogbookError::FailedOperation { .. }
            | LogbookError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            LogbookError::UsageError(_) => "usage_error",
            LogbookError::InvalidValue { .. } => "invalid_value",
            LogbookError::UnknownField { .. } => "unknown_field",
            LogbookError::StoreNotFound { .. } => "store_not_found",
            LogbookError::InvalidStore { .. } => "invalid_store",
            LogbookError::MalformedDocument { .. } => "malformed_document",
            LogbookError::NotFound { .. } => "not_found",
            LogbookError::Ambiguous { .. } => "ambiguous",
            LogbookError::Io(_) => "io_error",
            LogbookError::Yaml(_) => "yaml_error",
            LogbookError::Json(_) => "json_error",
            LogbookError::FailedOperation { .. } => "failed_operation",
            LogbookError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        let mut error_obj = serde_json::json!({
            "code": self.exit_code() as i32,
            "type": self.error_type(),
            "message": self.to_string(),
        });

        if let LogbookError::Ambiguous { candidates, .. } = self {
            error_obj["candidates"] = serde_json::json!(candidates);
        }

        serde_json::json!({ "error": error_obj })
    }
}

/// Result type alias for logbook operations
pub type Result<T> = std::result::Result<T, LogbookError>;
