//! Taskmirror - a local, numerically-indexed mirror of a remote task list.
//!
//! This library provides the core functionality for the `tm` CLI tool:
//! fetching raw project/label/task state from the remote service, filtering
//! it down to the visible subset, assigning stable display indices, caching
//! the derived snapshot on disk, and answering queries against it.

pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod query;
pub mod remote;
pub mod snapshot;

/// Library-level error type for taskmirror operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Remote service unreachable or the request was rejected.
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// A raw remote record is missing required fields.
    #[error("Malformed {kind} record (id {id})")]
    MalformedRecord { kind: &'static str, id: String },

    /// No cached task carries the requested display index.
    #[error("No task with index {0}")]
    IndexNotFound(u32),

    /// A name query matched no visible project or label.
    #[error("{0}")]
    NoMatch(String),

    #[error("No API token found: create {0} containing your token")]
    MissingToken(std::path::PathBuf),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Lookup misses are reported to the user and exit cleanly; everything
    /// else aborts the command with a non-zero status.
    pub fn is_benign(&self) -> bool {
        matches!(self, Error::IndexNotFound(_) | Error::NoMatch(_))
    }
}

/// Result type alias for taskmirror operations.
pub type Result<T> = std::result::Result<T, Error>;
