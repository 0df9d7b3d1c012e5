//! Merge options.

use serde::{Deserialize, Serialize};

/// How snapshots are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// Drop sentence sets from the merged output, keeping only counts.
    pub remove_sentences: bool,
    /// Reset a count to its sentence-set size when the sum overshoots it.
    pub correct_possible_duplicates: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            remove_sentences: false,
            correct_possible_duplicates: true,
        }
    }
}

/// Parse a command-line boolean: `true`/`false`, `yes`/`no`, `1`/`0`, any case.
pub fn parse_flag(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        other => Err(format!("expected true or false, got '{}'", other)),
    }
}
