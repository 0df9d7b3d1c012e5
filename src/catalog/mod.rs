// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fact catalog loading.
//!
//! Input is a relation-metadata JSON object (`{relation_id: {domains: [...]}}`)
//! and one JSON-lines file per relation, `<facts_dir>/<relation_id>.jsonl`.
//!
//! Two failure modes, treated very differently:
//! - A relation with **no fact file** is logged and skipped. Metadata often
//!   lists relations that were never exported; that should not kill a run.
//! - A **malformed record** aborts the load. A silently incomplete catalog
//!   would make every downstream occurrence number meaningless.
//!
//! After all relations are loaded, one closure pass copies each entity's
//! subject aliases into the object aliases of every fact pointing at it. The
//! closure is one hop: aliases of aliases are not followed.

mod record;

pub use record::FactRecord;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::contracts::check_object_alias_closure;
use crate::error::{FactError, Result};
use crate::types::{Catalog, RelationId, RelationInfoMap};

/// Default file name of the relation metadata inside a facts directory.
pub const RELATION_INFO_FILE: &str = "relation_info.json";

/// Result of loading a catalog.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub relation_info: RelationInfoMap,
    /// Relations listed in the metadata whose fact file was absent.
    pub missing: Vec<RelationId>,
}

/// Read the relation metadata object.
pub fn load_relation_info(path: &Path) -> Result<RelationInfoMap> {
    let content = fs::read_to_string(path).map_err(|e| FactError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| FactError::data_format(path, e.line(), e.to_string()))
}

/// Path of a relation's fact file.
pub fn fact_file_path(facts_dir: &Path, relation_id: &str) -> PathBuf {
    facts_dir.join(format!("{}.jsonl", relation_id))
}

/// Parse one relation's fact file. `Ok(None)` when the file does not exist.
pub fn load_fact_records(path: &Path) -> Result<Option<Vec<FactRecord>>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(FactError::io(path, e)),
    };

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str::<FactRecord>(line)
                .map_err(|e| FactError::data_format(path, idx + 1, e.to_string()))
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

/// Load metadata and every relation's facts, then resolve object aliases.
pub fn load_catalog(relation_info_path: &Path, facts_dir: &Path) -> Result<LoadedCatalog> {
    let relation_info = load_relation_info(relation_info_path)?;
    let (catalog, missing) = build_catalog(&relation_info, facts_dir)?;
    Ok(LoadedCatalog {
        catalog,
        relation_info,
        missing,
    })
}

/// Build the catalog for the relations listed in `relation_info`.
///
/// Returns the catalog and the relations that were skipped for lack of a fact
/// file. Relation files are parsed in parallel when the `parallel` feature is on.
pub fn build_catalog(
    relation_info: &RelationInfoMap,
    facts_dir: &Path,
) -> Result<(Catalog, Vec<RelationId>)> {
    let relation_ids: Vec<&RelationId> = relation_info.keys().collect();

    #[cfg(feature = "parallel")]
    let loaded = relation_ids
        .par_iter()
        .map(|relation_id| {
            load_fact_records(&fact_file_path(facts_dir, relation_id))
                .map(|records| (relation_id.to_string(), records))
        })
        .collect::<Result<Vec<_>>>()?;

    #[cfg(not(feature = "parallel"))]
    let loaded = relation_ids
        .iter()
        .map(|relation_id| {
            load_fact_records(&fact_file_path(facts_dir, relation_id))
                .map(|records| (relation_id.to_string(), records))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut catalog = Catalog::new();
    let mut missing = Vec::new();

    for (relation_id, records) in loaded {
        let Some(records) = records else {
            error!(
                "File not found: {}",
                fact_file_path(facts_dir, &relation_id).display()
            );
            missing.push(relation_id);
            continue;
        };

        info!("Extracting entity information for {} ({} facts)", relation_id, records.len());
        let facts = catalog.relation_entry(&relation_id);
        for record in records {
            let (subject_id, fact) = record.into_fact();
            facts.insert(subject_id, fact);
        }
    }

    resolve_object_aliases(&mut catalog);
    Ok((catalog, missing))
}

/// One-hop object-alias closure.
///
/// For every fact, union into `obj_aliases` the `subj_aliases` of every fact
/// (in any relation) whose subject is this fact's object. Subject aliases are
/// inverted by subject id first, so the pass is linear in the number of facts.
pub fn resolve_object_aliases(catalog: &mut Catalog) {
    let mut aliases_by_subject: HashMap<String, BTreeSet<String>> = HashMap::new();
    for (_, subject_id, fact) in catalog.iter() {
        aliases_by_subject
            .entry(subject_id.to_string())
            .or_default()
            .extend(fact.subj_aliases.iter().cloned());
    }

    for (_, _, fact) in catalog.iter_mut() {
        if let Some(aliases) = aliases_by_subject.get(&fact.obj_id) {
            fact.obj_aliases.extend(aliases.iter().cloned());
        }
    }

    check_object_alias_closure(catalog);
}
