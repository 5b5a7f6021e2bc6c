//! Error types for the dedup pipeline

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Crate error type
#[derive(Error, Debug)]
pub enum DedupError {
    /// A required file (stop words, corpus, raw data, config) is absent
    #[error("resource missing: {}", .path.display())]
    ResourceMissing { path: PathBuf },

    /// No usable text or tokens were supplied
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// Vectorization attempted over zero documents
    #[error("cannot build a vector space over an empty corpus")]
    EmptyCorpus,

    /// Malformed input data
    #[error("vectorization failed: {0}")]
    Vectorization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Machine-checkable error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ResourceMissing,
    EmptyInput,
    EmptyCorpus,
    VectorizationFailure,
    Io,
    Config,
}

impl DedupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DedupError::ResourceMissing { .. } => ErrorKind::ResourceMissing,
            DedupError::EmptyInput(_) => ErrorKind::EmptyInput,
            DedupError::EmptyCorpus => ErrorKind::EmptyCorpus,
            DedupError::Vectorization(_) | DedupError::Csv(_) => ErrorKind::VectorizationFailure,
            DedupError::Io(_) => ErrorKind::Io,
            DedupError::TomlParse(_) | DedupError::Json(_) | DedupError::Config(_) => ErrorKind::Config,
        }
    }

    /// Structured form for callers that report errors as data
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

/// `{ "kind": ..., "message": ... }`
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, DedupError>;
