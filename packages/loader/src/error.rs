//! Error types for the loader.
//!
//! Every failure aborts the run. Conversion itself has no error variant:
//! any well-formed XML tree maps to a value.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the loader library.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The XML source path does not exist.
    #[error("XML file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The XML source could not be parsed.
    #[error("XML parsing failed for {}: {source}", .path.display())]
    MalformedInput {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    /// Database or collection name rejected before connecting.
    #[error("Invalid {kind} name '{name}': {reason}")]
    InvalidName {
        kind: &'static str,
        name: String,
        reason: &'static str,
    },

    /// Configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The document store rejected an operation.
    ///
    /// The driver error is kept as-is, including any per-document
    /// write errors reported for a partially applied batch.
    #[error("Storage operation on collection '{collection}' failed: {source}")]
    Storage {
        collection: String,
        #[source]
        source: mongodb::error::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;
