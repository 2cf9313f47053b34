//! Error types and exit codes for specgrade
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args)
//! - 3: Data error (unreadable contract, invalid template, store failure)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the specgrade CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - bad contract, template, or store (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during grading operations
#[derive(Error, Debug)]
pub enum GradeError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human, json, or records)")]
    UnknownFormat(String),

    #[error("unknown trend window: {0}")]
    InvalidWindow(String),

    #[error("{0}")]
    UsageError(String),

    // Data errors (exit code 3)
    #[error("contract not found: {path:?}")]
    ContractNotFound { path: PathBuf },

    #[error("failed to parse contract: {reason}")]
    ContractParse { reason: String },

    #[error("template not found: {path:?}")]
    TemplateNotFound { path: PathBuf },

    #[error("invalid template: {reason}")]
    InvalidTemplate { reason: String },

    #[error("store error: {reason}")]
    Store { reason: String },

    #[error("unknown rule: {rule_id}")]
    UnknownRule { rule_id: String },

    // Generic failures (exit code 1)
    #[error("failed to fetch contract from {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("grading cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl GradeError {
    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            GradeError::UnknownFormat(_)
            | GradeError::InvalidWindow(_)
            | GradeError::UsageError(_) => ExitCode::Usage,

            GradeError::ContractNotFound { .. }
            | GradeError::ContractParse { .. }
            | GradeError::TemplateNotFound { .. }
            | GradeError::InvalidTemplate { .. }
            | GradeError::Store { .. }
            | GradeError::UnknownRule { .. } => ExitCode::Data,

            GradeError::Fetch { .. }
            | GradeError::Cancelled
            | GradeError::Io(_)
            | GradeError::Yaml(_)
            | GradeError::Json(_)
            | GradeError::Toml(_)
            | GradeError::Other(_) => ExitCode::Failure,
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
                "isError": true,
            }
        })
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            GradeError::UnknownFormat(_) => "unknown_format",
            GradeError::InvalidWindow(_) => "invalid_window",
            GradeError::UsageError(_) => "usage_error",
            GradeError::ContractNotFound { .. } => "contract_not_found",
            GradeError::ContractParse { .. } => "contract_parse",
            GradeError::TemplateNotFound { .. } => "template_not_found",
            GradeError::InvalidTemplate { .. } => "invalid_template",
            GradeError::Store { .. } => "store_error",
            GradeError::UnknownRule { .. } => "unknown_rule",
            GradeError::Fetch { .. } => "fetch_error",
            GradeError::Cancelled => "cancelled",
            GradeError::Io(_) => "io_error",
            GradeError::Yaml(_) => "yaml_error",
            GradeError::Json(_) => "json_error",
            GradeError::Toml(_) => "toml_error",
            GradeError::Other(_) => "other",
        }
    }
}

impl From<rusqlite::Error> for GradeError {
    fn from(err: rusqlite::Error) -> Self {
        GradeError::Store {
            reason: err.to_string(),
        }
    }
}

/// Result type alias for grading operations
pub type Result<T> = std::result::Result<T, GradeError>;
