//! End-to-end matching runs: load, index, match shards, write snapshots.

pub mod config;
pub mod document;
pub mod parallel;

pub use config::{MatchConfig, SegmentationKind, StrategyKind};
pub use document::{document_text, read_documents};
pub use parallel::{split_shards, ShardResult};

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};

use crate::catalog::load_catalog;
use crate::error::{FactError, Result};
use crate::index::{SubjectIndex, SurfaceFormIndex};
use crate::matcher::{
    AnnotationLinker, LinkedEntityStrategy, MatchStats, MatchStrategy, SurfaceFormStrategy,
};
use crate::merge::{join_snapshot_files, MergeOptions, MergeReport};
use crate::snapshot::write_snapshot;
use crate::text::{LineSegmentedPipeline, RuleBasedPipeline, TextPipeline};
use crate::types::{Catalog, RelationId};

/// Inputs and outputs of a full run.
#[derive(Debug, Clone)]
pub struct RunPaths {
    /// Relation metadata JSON.
    pub relation_info: PathBuf,
    /// Directory of `{relation_id}.jsonl` fact files.
    pub facts_dir: PathBuf,
    /// JSON-lines corpus.
    pub corpus: PathBuf,
    /// Snapshot output directory.
    pub output_dir: PathBuf,
}

/// Result of matching a corpus.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub shards: Vec<ShardResult>,
    pub snapshot_paths: Vec<PathBuf>,
    pub stats: MatchStats,
}

/// Result of a full run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub relations: usize,
    pub facts: usize,
    /// Relations skipped for lack of a fact file.
    pub missing: Vec<RelationId>,
    pub outcome: MatchOutcome,
    pub merge: Option<MergeReport>,
}

#[cfg(feature = "parallel")]
fn create_progress_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.cyan} {prefix:<12} [{bar:40.cyan/dim}] {pos}/{len} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("━━╸")
}

/// Match `documents` against `catalog` and write one snapshot per shard
/// into `output_dir`.
pub fn match_corpus(
    catalog: &Catalog,
    documents: &[String],
    config: &MatchConfig,
    output_dir: &Path,
) -> Result<MatchOutcome> {
    let pipeline: &dyn TextPipeline = match config.segmentation {
        SegmentationKind::Rules => &RuleBasedPipeline,
        SegmentationKind::Lines => &LineSegmentedPipeline,
    };

    let shards = match config.strategy {
        StrategyKind::Surface => {
            let index = SurfaceFormIndex::build(catalog, pipeline);
            info!(
                "Indexed {} surface forms (longest {} tokens)",
                index.len(),
                index.max_ngram_len()
            );
            let strategy = SurfaceFormStrategy::new(&index);
            run_shards(catalog, documents, config, &strategy, pipeline)
        }
        StrategyKind::Linked => {
            let subjects = SubjectIndex::build(catalog);
            let strategy = LinkedEntityStrategy::new(&subjects, AnnotationLinker);
            run_shards(catalog, documents, config, &strategy, pipeline)
        }
    };

    fs::create_dir_all(output_dir).map_err(|e| FactError::io(output_dir, e))?;

    let mut stats = MatchStats::default();
    let mut snapshot_paths = Vec::with_capacity(shards.len());
    for shard in &shards {
        let path = output_dir.join(config.snapshot_file_name(shard.shard));
        write_snapshot(&shard.catalog, &path)?;
        stats.absorb(&shard.stats);
        snapshot_paths.push(path);
    }

    info!(
        "Matched {} documents in {} shards: {} new occurrences, {} skipped documents",
        stats.documents,
        shards.len(),
        stats.new_occurrences,
        stats.skipped_documents
    );

    Ok(MatchOutcome {
        shards,
        snapshot_paths,
        stats,
    })
}

#[cfg(feature = "parallel")]
fn run_shards(
    catalog: &Catalog,
    documents: &[String],
    config: &MatchConfig,
    strategy: &dyn MatchStrategy,
    pipeline: &dyn TextPipeline,
) -> Vec<ShardResult> {
    let shards = log_shard_plan(documents, config, strategy);

    let progress = ProgressBar::new(documents.len() as u64);
    progress.set_style(create_progress_style());
    progress.set_prefix("Matching");
    progress.set_message("documents...");

    let results = parallel::match_shards_with_progress(
        catalog,
        documents,
        shards,
        strategy,
        pipeline,
        config.save_sentences,
        &progress,
    );
    progress.finish_with_message(format!("{} shards", results.len()));
    results
}

#[cfg(not(feature = "parallel"))]
fn run_shards(
    catalog: &Catalog,
    documents: &[String],
    config: &MatchConfig,
    strategy: &dyn MatchStrategy,
    pipeline: &dyn TextPipeline,
) -> Vec<ShardResult> {
    let shards = log_shard_plan(documents, config, strategy);
    parallel::match_shards_with_progress(
        catalog,
        documents,
        shards,
        strategy,
        pipeline,
        config.save_sentences,
    )
}

fn log_shard_plan(documents: &[String], config: &MatchConfig, strategy: &dyn MatchStrategy) -> usize {
    let shards = config.effective_shards(documents.len());
    info!(
        "Matching {} documents in {} shards with the {} strategy",
        documents.len(),
        shards,
        strategy.name()
    );
    shards
}

/// Load the catalog, match the corpus and optionally merge the snapshots.
pub fn run_match(
    paths: &RunPaths,
    config: &MatchConfig,
    merge: Option<MergeOptions>,
) -> Result<RunSummary> {
    let loaded = load_catalog(&paths.relation_info, &paths.facts_dir)?;
    let documents = read_documents(&paths.corpus, &config.text_key)?;
    info!(
        "Loaded {} facts in {} relations and {} documents",
        loaded.catalog.fact_count(),
        loaded.catalog.relation_count(),
        documents.len()
    );

    let outcome = match_corpus(&loaded.catalog, &documents, config, &paths.output_dir)?;
    let merge = merge
        .map(|options| join_snapshot_files(&outcome.snapshot_paths, &paths.output_dir, options))
        .transpose()?;

    Ok(RunSummary {
        relations: loaded.catalog.relation_count(),
        facts: loaded.catalog.fact_count(),
        missing: loaded.missing,
        outcome,
        merge,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge_snapshots;
    use crate::testing::{hamilton_catalog, hamilton_documents};

    #[test]
    fn test_match_corpus_writes_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let config = MatchConfig {
            shards: 2,
            save_sentences: true,
            ..MatchConfig::default()
        };

        let outcome =
            match_corpus(&hamilton_catalog(), &hamilton_documents(), &config, dir.path()).unwrap();

        assert_eq!(outcome.shards.len(), 2);
        assert_eq!(outcome.stats.documents, hamilton_documents().len());
        for path in &outcome.snapshot_paths {
            assert!(path.exists());
        }
        assert!(dir.path().join("relation_info_00000.json").exists());
        assert!(dir.path().join("relation_info_00001.json").exists());
    }

    #[test]
    fn test_sharding_does_not_change_counts() {
        let dir = tempfile::tempdir().unwrap();
        let single = MatchConfig {
            shards: 1,
            save_sentences: true,
            ..MatchConfig::default()
        };
        let sharded = MatchConfig {
            shards: 3,
            ..single.clone()
        };

        let one = match_corpus(&hamilton_catalog(), &hamilton_documents(), &single, &dir.path().join("a"))
            .unwrap();
        let many = match_corpus(&hamilton_catalog(), &hamilton_documents(), &sharded, &dir.path().join("b"))
            .unwrap();

        let named = |outcome: MatchOutcome| {
            outcome
                .shards
                .into_iter()
                .map(|s| (s.shard.to_string(), s.catalog))
                .collect::<Vec<_>>()
        };
        let (merged_one, _) = merge_snapshots(named(one), MergeOptions::default()).unwrap();
        let (merged_many, _) = merge_snapshots(named(many), MergeOptions::default()).unwrap();
        assert_eq!(merged_one, merged_many);
    }
}
