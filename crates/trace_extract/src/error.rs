use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraceLoadError {
    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read trace file {path:?}: {source}")]
    File {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse trace JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("trace line {line_number}: {message}")]
    Line { line_number: usize, message: String },
    #[error("trace must be a JSON array of events or JSONL objects (found {found})")]
    Shape { found: &'static str },
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read registry file {path:?}: {source}")]
    File {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse registry TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("registry {field} must not be empty")]
    EmptyIdentifier { field: &'static str },
    #[error("output key {0:?} is registered more than once")]
    DuplicateKey(String),
}

/// Why a targeted extraction produced nothing.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum ExtractError {
    #[error("no event by {author} carries {output_key}")]
    NotFound { author: String, output_key: String },
    #[error("entry {entry_index}: {output_key} has no fenced json block")]
    MissingFence {
        entry_index: usize,
        output_key: String,
    },
    #[error("entry {entry_index}: {output_key} holds invalid fenced json: {message}")]
    InvalidJson {
        entry_index: usize,
        output_key: String,
        message: String,
    },
}
