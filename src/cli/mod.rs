// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the factscan command-line interface.
//!
//! Three subcommands: `match` to count fact occurrences in a corpus and write
//! per-shard snapshots, `merge` to join a directory of snapshots, and
//! `inspect` to summarize one snapshot.

pub mod commands;
pub mod display;

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use factscan::merge::{parse_flag, MergeOptions};
use factscan::run::{MatchConfig, SegmentationKind, StrategyKind};

#[derive(Parser)]
#[command(
    name = "factscan",
    about = "Count knowledge-base fact occurrences in a text corpus",
    version
)]
pub struct Cli {
    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match a corpus against a fact catalog and write snapshots
    Match {
        /// Relation metadata JSON ({relation_id: {domains: [...]}})
        #[arg(short, long)]
        relation_info: PathBuf,

        /// Directory of {relation_id}.jsonl fact files (default: next to relation info)
        #[arg(short, long)]
        facts_dir: Option<PathBuf>,

        /// JSON-lines corpus, one document per line
        #[arg(short, long)]
        corpus: PathBuf,

        /// Output directory for snapshot files
        #[arg(short, long)]
        output: PathBuf,

        /// JSON run configuration; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Document field holding the text
        #[arg(long)]
        text_key: Option<String>,

        /// Keep matched sentences in the snapshots
        #[arg(long)]
        save_sentences: bool,

        /// Number of shards (0 = one per worker thread)
        #[arg(long)]
        shards: Option<usize>,

        #[arg(long, value_enum)]
        strategy: Option<StrategyKind>,

        #[arg(long, value_enum)]
        segmentation: Option<SegmentationKind>,

        /// Snapshot file name prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Join the snapshots into joined_relation_info.json afterwards
        #[arg(long)]
        merge: bool,

        #[command(flatten)]
        merge_flags: MergeFlags,
    },

    /// Join every snapshot in a directory into joined_relation_info.json
    Merge {
        /// Directory containing snapshot files
        dir: PathBuf,

        #[command(flatten)]
        merge_flags: MergeFlags,
    },

    /// Summarize a snapshot file
    Inspect {
        /// Snapshot file to inspect
        file: PathBuf,

        /// Number of top facts to list
        #[arg(long, default_value = "10")]
        top: usize,
    },
}

/// Merge options as command-line booleans.
#[derive(Args, Debug, Clone, Copy)]
pub struct MergeFlags {
    /// Drop sentence sets from the merged output
    #[arg(long, value_name = "BOOL", default_value = "false", action = ArgAction::Set, value_parser = parse_flag)]
    pub remove_sentences: bool,

    /// Reset counts that exceed their distinct sentence count
    #[arg(long, value_name = "BOOL", default_value = "true", action = ArgAction::Set, value_parser = parse_flag)]
    pub correct_possible_duplicates: bool,
}

impl From<MergeFlags> for MergeOptions {
    fn from(flags: MergeFlags) -> Self {
        MergeOptions {
            remove_sentences: flags.remove_sentences,
            correct_possible_duplicates: flags.correct_possible_duplicates,
        }
    }
}

/// Command-line overrides on top of a loaded config.
pub struct ConfigOverrides {
    pub text_key: Option<String>,
    pub save_sentences: bool,
    pub shards: Option<usize>,
    pub strategy: Option<StrategyKind>,
    pub segmentation: Option<SegmentationKind>,
    pub prefix: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(self, mut config: MatchConfig) -> MatchConfig {
        if let Some(text_key) = self.text_key {
            config.text_key = text_key;
        }
        if self.save_sentences {
            config.save_sentences = true;
        }
        if let Some(shards) = self.shards {
            config.shards = shards;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(segmentation) = self.segmentation {
            config.segmentation = segmentation;
        }
        if let Some(prefix) = self.prefix {
            config.output_file_prefix = prefix;
        }
        config
    }
}
