//! Error types for catalog loading, matching and merging.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to callers.
///
/// Recoverable conditions (a missing fact file for one relation, a document
/// that fails segmentation, a count/sentence mismatch after merging) are
/// logged and reported, never returned as errors.
#[derive(Error, Debug)]
pub enum FactError {
    /// File could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed input record; aborts loading
    #[error("Malformed record in {path} (line {line}): {message}")]
    DataFormat {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Merge inputs disagree on the fact key set
    #[error("Structural inconsistency in {file}: fact {relation}/{subject} is not present in every snapshot")]
    StructuralInconsistency {
        file: String,
        relation: String,
        /// Empty when the whole relation is missing from one side
        subject: String,
    },

    /// External segmentation or tokenization failed for one document
    #[error("Segmentation failed: {0}")]
    Segmentation(String),

    /// External entity linker failed for one sentence
    #[error("Entity linking failed: {0}")]
    Linking(String),

    /// No snapshot files to merge
    #[error("No snapshot files found in {0}")]
    NoSnapshots(PathBuf),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FactError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FactError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn data_format(
        path: impl Into<PathBuf>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        FactError::DataFormat {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// True for per-document failures that the run skips over.
    pub fn is_document_local(&self) -> bool {
        matches!(self, FactError::Segmentation(_) | FactError::Linking(_))
    }
}

pub type Result<T> = std::result::Result<T, FactError>;
