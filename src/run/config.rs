//! Run configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{FactError, Result};

/// Which matcher variant drives the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Surface-form n-grams plus whole-word object search
    #[default]
    Surface,
    /// Entity ids from `[Q1 Q2]` sentence annotations
    Linked,
}

/// How documents are split into sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SegmentationKind {
    /// Punctuation-based sentence splitting
    #[default]
    Rules,
    /// One sentence per line
    Lines,
}

/// Settings for a matching run. Every field has a default, so a config file
/// only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Key of the document text in each corpus record.
    pub text_key: String,
    /// Keep matched sentences in the snapshots.
    pub save_sentences: bool,
    /// Number of shards; 0 means one per worker thread.
    pub shards: usize,
    pub strategy: StrategyKind,
    pub segmentation: SegmentationKind,
    /// Snapshot files are named `{prefix}_{shard:05}.json`.
    pub output_file_prefix: String,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            text_key: "text".to_string(),
            save_sentences: false,
            shards: 0,
            strategy: StrategyKind::Surface,
            segmentation: SegmentationKind::Rules,
            output_file_prefix: "relation_info".to_string(),
        }
    }
}

impl MatchConfig {
    /// Load a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| FactError::io(path, e))?;
        serde_json::from_str(&content)
            .map_err(|e| FactError::data_format(path, e.line(), e.to_string()))
    }

    /// Shard count to actually use for `documents` documents.
    pub fn effective_shards(&self, documents: usize) -> usize {
        let requested = if self.shards == 0 {
            worker_count()
        } else {
            self.shards
        };
        requested.clamp(1, documents.max(1))
    }

    /// Snapshot file name for one shard.
    pub fn snapshot_file_name(&self, shard: usize) -> String {
        format!("{}_{:05}.json", self.output_file_prefix, shard)
    }
}

#[cfg(feature = "parallel")]
fn worker_count() -> usize {
    rayon::current_num_threads()
}

#[cfg(not(feature = "parallel"))]
fn worker_count() -> usize {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: MatchConfig =
            serde_json::from_str(r#"{"save_sentences": true, "strategy": "linked"}"#).unwrap();
        assert!(config.save_sentences);
        assert_eq!(config.strategy, StrategyKind::Linked);
        assert_eq!(config.text_key, "text");
        assert_eq!(config.segmentation, SegmentationKind::Rules);
    }

    #[test]
    fn test_snapshot_file_name() {
        let config = MatchConfig::default();
        assert_eq!(config.snapshot_file_name(3), "relation_info_00003.json");
    }

    #[test]
    fn test_effective_shards() {
        let config = MatchConfig {
            shards: 8,
            ..MatchConfig::default()
        };
        assert_eq!(config.effective_shards(3), 3);
        assert_eq!(config.effective_shards(100), 8);
        assert_eq!(config.effective_shards(0), 1);
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"text_key": "body", "shards": 2}"#).unwrap();

        let config = MatchConfig::from_file(&path).unwrap();
        assert_eq!(config.text_key, "body");
        assert_eq!(config.shards, 2);

        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            MatchConfig::from_file(&path),
            Err(FactError::DataFormat { .. })
        ));
    }
}
