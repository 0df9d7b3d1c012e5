//! Corpus reading.
//!
//! A corpus is a JSON-lines file, one document object per line. Only the text
//! field is used; everything else on the record is ignored.

use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::warn;

use crate::error::{FactError, Result};

/// Read the `text_key` field of every document in a JSON-lines corpus.
///
/// Unreadable lines and records without a string `text_key` are skipped with
/// a warning. Blank lines are ignored.
pub fn read_documents(path: &Path, text_key: &str) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| FactError::io(path, e))?;
    let mut documents = Vec::new();

    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| FactError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        match document_text(&line, text_key) {
            Some(text) => documents.push(text),
            None => warn!(
                "Skipping {} line {}: no '{}' text field",
                path.display(),
                idx + 1,
                text_key
            ),
        }
    }

    Ok(documents)
}

/// Text of one corpus record, if it has a string field `text_key`.
pub fn document_text(line: &str, text_key: &str) -> Option<String> {
    let value: Value = serde_json::from_str(line).ok()?;
    match value.get(text_key)? {
        Value::String(text) => Some(text.clone()),
        _ => None,
    }
}
