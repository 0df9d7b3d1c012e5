// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Combining per-shard snapshots into one catalog.
//!
//! Every shard matched its own slice of the corpus against its own copy of the
//! same catalog, so every snapshot must carry exactly the same fact keys. Per
//! fact, counts are summed and retained sentence sets are unioned.
//!
//! Two shards can independently count the same sentence (it appears in both
//! slices). The sum then overshoots the number of distinct sentences, and the
//! merger resets the count to the union's size with a warning. The correction
//! is applied once, after all snapshots are folded in, so the result does not
//! depend on merge order. It is one-directional: a sentence set larger than
//! the count is left alone.
//!
//! Snapshots are folded in sorted name order so logs are reproducible.
//!
//! # INVARIANTS
//!
//! 1. **SAME_KEYS**: all inputs share one fact key set, else `StructuralInconsistency`
//! 2. **ORDER_FREE**: any permutation of the inputs yields the same catalog
//! 3. **NEVER_ABOVE_UNION**: with correction on and sentences retained,
//!    `occurrences <= |sentences|`

mod options;

pub use options::{parse_flag, MergeOptions};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{FactError, Result};
use crate::snapshot::{read_snapshot, write_snapshot};
use crate::types::{Catalog, Fact, FactKey};

/// File name of the merged snapshot.
pub const JOINED_FILE_NAME: &str = "joined_relation_info.json";

/// What a merge did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    /// Snapshot names in the order they were folded in.
    pub inputs: Vec<String>,
    /// Facts whose count was reset to their sentence-set size.
    pub corrected: Vec<FactKey>,
    /// Where the merged snapshot was written, if it was.
    pub output: Option<PathBuf>,
}

/// Incremental merger. Feed snapshots with [`SnapshotMerger::merge`], then
/// call [`SnapshotMerger::finish`].
#[derive(Debug)]
pub struct SnapshotMerger {
    options: MergeOptions,
    merged: Option<Catalog>,
    inputs: Vec<String>,
}

impl SnapshotMerger {
    pub fn new(options: MergeOptions) -> Self {
        Self {
            options,
            merged: None,
            inputs: Vec::new(),
        }
    }

    /// Fold one snapshot in. `name` identifies it in logs and errors.
    pub fn merge(&mut self, name: &str, snapshot: Catalog) -> Result<()> {
        self.inputs.push(name.to_string());

        let Some(merged) = self.merged.as_mut() else {
            self.merged = Some(snapshot);
            return Ok(());
        };

        check_same_keys(merged, &snapshot, name)?;
        for (relation_id, subject_id, fact) in snapshot.iter() {
            if let Some(target) = merged.get_mut(relation_id, subject_id) {
                combine(target, fact);
            }
        }
        Ok(())
    }

    /// Apply the count correction and sentence stripping, return the result.
    pub fn finish(self) -> (Catalog, MergeReport) {
        let mut merged = self.merged.unwrap_or_default();
        let mut corrected = Vec::new();

        if self.options.correct_possible_duplicates {
            for (relation_id, subject_id, fact) in merged.iter_mut() {
                let Some(sentences) = &fact.sentences else {
                    continue;
                };
                let distinct = sentences.len() as u64;
                if distinct < fact.occurrences {
                    warn!(
                        "Mismatch in occurrences ({}) and sentences ({}) for {}/{}, may contain duplicate occurrences. Correcting occurrences!",
                        fact.occurrences, distinct, relation_id, subject_id
                    );
                    fact.occurrences = distinct;
                    corrected.push(FactKey::new(relation_id, subject_id));
                }
            }
        }

        if self.options.remove_sentences {
            merged.strip_sentences();
        }

        let report = MergeReport {
            inputs: self.inputs,
            corrected,
            output: None,
        };
        (merged, report)
    }
}

/// Sum counts; union sentence sets if both sides kept them.
fn combine(target: &mut Fact, other: &Fact) {
    target.occurrences += other.occurrences;
    target.sentences = match (target.sentences.take(), &other.sentences) {
        (Some(mut mine), Some(theirs)) => {
            mine.extend(theirs.iter().cloned());
            Some(mine)
        }
        // One side dropped its sentences; the union would be incomplete.
        _ => None,
    };
}

fn check_same_keys(merged: &Catalog, snapshot: &Catalog, name: &str) -> Result<()> {
    let inconsistency = |relation: &str, subject: &str| FactError::StructuralInconsistency {
        file: name.to_string(),
        relation: relation.to_string(),
        subject: subject.to_string(),
    };

    // Relations with no facts do not show up in `iter()`.
    let missing_relation = snapshot
        .relation_ids()
        .find(|relation_id| !merged.contains_relation(relation_id))
        .or_else(|| merged.relation_ids().find(|relation_id| !snapshot.contains_relation(relation_id)));
    if let Some(relation_id) = missing_relation {
        return Err(inconsistency(relation_id, ""));
    }

    for (relation_id, subject_id, _) in snapshot.iter() {
        if merged.get(relation_id, subject_id).is_none() {
            return Err(inconsistency(relation_id, subject_id));
        }
    }
    if merged.fact_count() != snapshot.fact_count() {
        for (relation_id, subject_id, _) in merged.iter() {
            if snapshot.get(relation_id, subject_id).is_none() {
                return Err(inconsistency(relation_id, subject_id));
            }
        }
    }
    Ok(())
}

/// Merge named snapshots, folding them in sorted name order.
pub fn merge_snapshots(
    mut snapshots: Vec<(String, Catalog)>,
    options: MergeOptions,
) -> Result<(Catalog, MergeReport)> {
    snapshots.sort_by(|a, b| a.0.cmp(&b.0));

    let mut merger = SnapshotMerger::new(options);
    for (name, snapshot) in snapshots {
        merger.merge(&name, snapshot)?;
    }
    Ok(merger.finish())
}

/// Snapshot files in `dir`: `*.json` except the joined output, sorted by name.
pub fn list_snapshot_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| FactError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| FactError::io(dir, e))?.path();
        let is_snapshot = path.is_file()
            && path.extension().is_some_and(|ext| ext == "json")
            && path.file_name().is_some_and(|name| name != JOINED_FILE_NAME);
        if is_snapshot {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Merge every snapshot in `dir` and write `joined_relation_info.json` there.
pub fn join_snapshot_dir(dir: &Path, options: MergeOptions) -> Result<MergeReport> {
    let files = list_snapshot_files(dir)?;
    join_snapshot_files(&files, dir, options)
}

/// Merge exactly `files` and write `joined_relation_info.json` into `dir`.
///
/// Other `*.json` files in `dir`, such as shards left over from an earlier
/// run, are not read.
pub fn join_snapshot_files(files: &[PathBuf], dir: &Path, options: MergeOptions) -> Result<MergeReport> {
    if files.is_empty() {
        return Err(FactError::NoSnapshots(dir.to_path_buf()));
    }
    info!("Joining {} relation info files into {}", files.len(), dir.display());

    let read = |path: &PathBuf| -> Result<(String, Catalog)> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok((name, read_snapshot(path)?))
    };

    #[cfg(feature = "parallel")]
    let snapshots = files.par_iter().map(read).collect::<Result<Vec<_>>>()?;
    #[cfg(not(feature = "parallel"))]
    let snapshots = files.iter().map(read).collect::<Result<Vec<_>>>()?;

    let (merged, mut report) = merge_snapshots(snapshots, options)?;

    let output = dir.join(JOINED_FILE_NAME);
    write_snapshot(&merged, &output)?;
    info!(
        "Joined relation info files into {} ({} corrected)",
        output.display(),
        report.corrected.len()
    );
    report.output = Some(output);
    Ok(report)
}
