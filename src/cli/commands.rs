//! Subcommand handlers and their terminal summaries.

use std::path::{Path, PathBuf};

use factscan::merge::{join_snapshot_dir, MergeOptions, MergeReport};
use factscan::run::{run_match, MatchConfig, RunPaths, RunSummary};
use factscan::snapshot::read_snapshot;
use factscan::Result;

use super::display::*;
use super::ConfigOverrides;

pub struct MatchArgs {
    pub relation_info: PathBuf,
    pub facts_dir: Option<PathBuf>,
    pub corpus: PathBuf,
    pub output: PathBuf,
    pub config: Option<PathBuf>,
    pub overrides: ConfigOverrides,
    pub merge: Option<MergeOptions>,
}

pub fn match_command(args: MatchArgs) -> Result<()> {
    let base = match &args.config {
        Some(path) => MatchConfig::from_file(path)?,
        None => MatchConfig::default(),
    };
    let config = args.overrides.apply(base);

    let facts_dir = args
        .facts_dir
        .unwrap_or_else(|| default_facts_dir(&args.relation_info));
    let paths = RunPaths {
        relation_info: args.relation_info,
        facts_dir,
        corpus: args.corpus,
        output_dir: args.output,
    };

    let summary = run_match(&paths, &config, args.merge)?;
    print_run_summary(&summary, &config);
    Ok(())
}

/// Fact files live next to the relation metadata unless told otherwise.
fn default_facts_dir(relation_info: &Path) -> PathBuf {
    match relation_info.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

pub fn merge_command(dir: &Path, options: MergeOptions) -> Result<()> {
    let report = join_snapshot_dir(dir, options)?;
    section_top("MERGE");
    print_merge_report(&report);
    section_bot();
    Ok(())
}

pub fn inspect_command(file: &Path, top: usize) -> Result<()> {
    let catalog = read_snapshot(file)?;

    section_top("SNAPSHOT");
    field("File", &truncate(&file.display().to_string(), BOX_WIDTH - 24));
    field("Relations", &format_count(catalog.relation_count() as u64));
    field("Facts", &format_count(catalog.fact_count() as u64));
    field("Matched facts", &format_count(catalog.matched_facts() as u64));
    field("Occurrences", &format_count(catalog.total_occurrences()));

    let top_facts = catalog.top_facts(top);
    if !top_facts.is_empty() {
        section_mid("TOP FACTS");
        for (key, fact) in top_facts {
            let label = format!("{} → {}", fact.subj_label, fact.obj_label);
            row(&format!(
                " {}  {} {}",
                styled(&[GREEN, BOLD], &format!("{:>8}", format_count(fact.occurrences))),
                styled(&[DIM], &format!("{:<20}", truncate(&key.to_string(), 20))),
                truncate(&label, BOX_WIDTH - 33)
            ));
        }
    }
    section_bot();
    Ok(())
}

fn print_run_summary(summary: &RunSummary, config: &MatchConfig) {
    let stats = &summary.outcome.stats;

    section_top("MATCH");
    field("Relations", &format_count(summary.relations as u64));
    field("Facts", &format_count(summary.facts as u64));
    if !summary.missing.is_empty() {
        field(
            "Missing fact files",
            &styled(&[YELLOW], &truncate(&summary.missing.join(", "), BOX_WIDTH - 24)),
        );
    }
    field("Documents", &format_count(stats.documents as u64));
    if stats.skipped_documents > 0 {
        field(
            "Skipped documents",
            &styled(&[YELLOW], &format_count(stats.skipped_documents as u64)),
        );
    }
    field("Sentences", &format_count(stats.sentences as u64));
    field("Occurrences", &format_count(stats.new_occurrences as u64));
    field("Strategy", &format!("{:?}", config.strategy).to_lowercase());
    field("Snapshots", &format_count(summary.outcome.snapshot_paths.len() as u64));

    if let Some(report) = &summary.merge {
        section_mid("MERGE");
        print_merge_report(report);
    }
    section_bot();
}

fn print_merge_report(report: &MergeReport) {
    field("Inputs", &format_count(report.inputs.len() as u64));
    let corrected = format_count(report.corrected.len() as u64);
    if report.corrected.is_empty() {
        field("Corrected counts", &corrected);
    } else {
        field("Corrected counts", &styled(&[YELLOW], &corrected));
    }
    if let Some(output) = &report.output {
        field("Output", &truncate(&output.display().to_string(), BOX_WIDTH - 24));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factscan::catalog::RELATION_INFO_FILE;

    #[test]
    fn test_default_facts_dir() {
        assert_eq!(
            default_facts_dir(Path::new("data/facts/relation_info.json")),
            PathBuf::from("data/facts")
        );
        assert_eq!(default_facts_dir(Path::new(RELATION_INFO_FILE)), PathBuf::from("."));
    }
}
