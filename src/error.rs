// Engine error types.
//
// Per-record and per-keyword failures are values, not aborts: they travel
// alongside successful results so every output row can be traced back to
// either a number or an explicit error kind. Only structural problems with
// the input as a whole (missing columns, unreadable files) stop a request.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by the analytics engine and its loader.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("record {row}: invalid `{field}` ({reason})")]
    MalformedInput {
        row: usize,
        field: String,
        reason: String,
    },

    #[error("input is missing required column `{column}`")]
    MissingColumn { column: String },

    #[error("invalid keyword {keyword:?}: {reason}")]
    InvalidKeyword { keyword: String, reason: String },

    #[error(
        "not enough posts with engagement for {keyword:?}: \
         {count_true} with keyword, {count_false} without (need {minimum} on each side)"
    )]
    InsufficientSample {
        keyword: String,
        count_true: usize,
        count_false: usize,
        minimum: usize,
    },

    #[error("each sample needs at least {minimum} values, got {len_first} and {len_second}")]
    SampleTooSmall {
        len_first: usize,
        len_second: usize,
        minimum: usize,
    },

    #[error("statistic is not a finite number: {reason}")]
    NonFiniteStatistic { reason: String },

    #[error("engagement undefined: view count is zero")]
    DivisionUndefined,

    #[error("unsupported input format for {path} (expected .csv, .json, .jsonl or .ndjson)")]
    UnsupportedFormat { path: String },

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serializable classification of an [`EngineError`], used in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MalformedInput,
    MissingColumn,
    InvalidKeyword,
    InsufficientSample,
    NonFiniteStatistic,
    DivisionUndefined,
    Io,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedInput => "MalformedInput",
            ErrorKind::MissingColumn => "MissingColumn",
            ErrorKind::InvalidKeyword => "InvalidKeyword",
            ErrorKind::InsufficientSample => "InsufficientSample",
            ErrorKind::NonFiniteStatistic => "NonFiniteStatistic",
            ErrorKind::DivisionUndefined => "DivisionUndefined",
            ErrorKind::Io => "Io",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::MalformedInput { .. } => ErrorKind::MalformedInput,
            EngineError::MissingColumn { .. } => ErrorKind::MissingColumn,
            EngineError::InvalidKeyword { .. } => ErrorKind::InvalidKeyword,
            EngineError::InsufficientSample { .. } | EngineError::SampleTooSmall { .. } => {
                ErrorKind::InsufficientSample
            }
            EngineError::NonFiniteStatistic { .. } => ErrorKind::NonFiniteStatistic,
            EngineError::DivisionUndefined => ErrorKind::DivisionUndefined,
            EngineError::UnsupportedFormat { .. }
            | EngineError::Io(_)
            | EngineError::Csv(_)
            | EngineError::Json(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn non_finite(reason: impl Into<String>) -> Self {
        EngineError::NonFiniteStatistic {
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(row: usize, field: &str, reason: impl Into<String>) -> Self {
        EngineError::MalformedInput {
            row,
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// An error attached to a report row: its kind plus the rendered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&EngineError> for RowError {
    fn from(err: &EngineError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<EngineError> for RowError {
    fn from(err: EngineError) -> Self {
        RowError::from(&err)
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
