// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Shard-parallel matching.
//!
//! Documents are cut into contiguous shards and every shard gets its own
//! [`OccurrenceMatcher`]: a private clone of the catalog and a private ledger.
//! The surface-form index and the strategy are read-only and shared by
//! reference across all workers. Nothing is locked during matching; shard
//! results are combined afterwards by [`crate::merge`].

#[cfg(feature = "parallel")]
use indicatif::ProgressBar;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::info;

use crate::contracts::check_catalog_counts;
use crate::matcher::{MatchStats, MatchStrategy, OccurrenceMatcher};
use crate::text::TextPipeline;
use crate::types::Catalog;

/// One shard's matched catalog.
#[derive(Debug, Clone)]
pub struct ShardResult {
    pub shard: usize,
    pub catalog: Catalog,
    pub stats: MatchStats,
}

/// Cut `documents` into at most `shards` contiguous, non-empty slices.
///
/// An empty corpus still yields one (empty) shard so the run produces a
/// snapshot with every fact at zero.
pub fn split_shards(documents: &[String], shards: usize) -> Vec<&[String]> {
    if documents.is_empty() {
        return vec![documents];
    }
    let size = documents.len().div_ceil(shards.max(1));
    documents.chunks(size).collect()
}

fn match_shard(
    shard: usize,
    catalog: &Catalog,
    documents: &[String],
    strategy: &dyn MatchStrategy,
    pipeline: &dyn TextPipeline,
    save_sentences: bool,
    #[cfg(feature = "parallel")] progress: &ProgressBar,
) -> ShardResult {
    let mut matcher = OccurrenceMatcher::new(catalog.clone(), strategy, pipeline, save_sentences);
    for document in documents {
        matcher.process_document(document);
        #[cfg(feature = "parallel")]
        progress.inc(1);
    }

    let (catalog, stats) = matcher.into_parts();
    check_catalog_counts(&catalog);
    info!(
        "Shard {}: {} documents ({} skipped), {} new occurrences",
        shard, stats.documents, stats.skipped_documents, stats.new_occurrences
    );
    ShardResult {
        shard,
        catalog,
        stats,
    }
}

/// Match all shards in parallel with progress reporting.
#[cfg(feature = "parallel")]
pub fn match_shards_with_progress(
    catalog: &Catalog,
    documents: &[String],
    shards: usize,
    strategy: &dyn MatchStrategy,
    pipeline: &dyn TextPipeline,
    save_sentences: bool,
    progress: &ProgressBar,
) -> Vec<ShardResult> {
    split_shards(documents, shards)
        .into_par_iter()
        .enumerate()
        .map(|(shard, slice)| {
            match_shard(shard, catalog, slice, strategy, pipeline, save_sentences, progress)
        })
        .collect()
}

/// Match all shards in order.
/// Non-parallel fallback (no progress).
#[cfg(not(feature = "parallel"))]
pub fn match_shards_with_progress(
    catalog: &Catalog,
    documents: &[String],
    shards: usize,
    strategy: &dyn MatchStrategy,
    pipeline: &dyn TextPipeline,
    save_sentences: bool,
) -> Vec<ShardResult> {
    split_shards(documents, shards)
        .into_iter()
        .enumerate()
        .map(|(shard, slice)| match_shard(shard, catalog, slice, strategy, pipeline, save_sentences))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Document {}.", i)).collect()
    }

    #[test]
    fn test_split_shards_even() {
        let documents = docs(6);
        let shards = split_shards(&documents, 3);
        assert_eq!(shards.iter().map(|s| s.len()).collect::<Vec<_>>(), vec![2, 2, 2]);
    }

    #[test]
    fn test_split_shards_uneven() {
        let documents = docs(5);
        let shards = split_shards(&documents, 3);
        assert_eq!(shards.iter().map(|s| s.len()).collect::<Vec<_>>(), vec![2, 2, 1]);
        assert_eq!(shards.concat(), documents);
    }

    #[test]
    fn test_split_shards_more_shards_than_documents() {
        let documents = docs(2);
        assert_eq!(split_shards(&documents, 8).len(), 2);
    }

    #[test]
    fn test_split_shards_empty_corpus() {
        let shards = split_shards(&[], 4);
        assert_eq!(shards.len(), 1);
        assert!(shards[0].is_empty());
    }
}
