// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Core data types for fact matching.
//!
//! A **fact** is a `(relation_id, subject_id)` pair carrying the subject's
//! surface forms, the object it points to, and the occurrence bookkeeping the
//! matcher fills in. The **catalog** holds every fact, grouped by relation.
//!
//! The serde layout of [`Catalog`] *is* the persisted snapshot format:
//!
//! ```text
//! { relation_id: { subject_id: { subj_label, subj_aliases, obj_id, obj_label,
//!                                obj_aliases, occurrences, sentences } } }
//! ```
//!
//! Sets serialize as JSON arrays. `BTreeSet`/`BTreeMap` keep the output
//! deterministic so two snapshots of the same run diff cleanly.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Relation identifier, e.g. `"P6"`.
pub type RelationId = String;

/// Subject (entity) identifier, e.g. `"Q30"`.
pub type SubjectId = String;

/// Key of a fact inside the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FactKey {
    pub relation_id: RelationId,
    pub subject_id: SubjectId,
}

impl FactKey {
    pub fn new(relation_id: impl Into<String>, subject_id: impl Into<String>) -> Self {
        Self {
            relation_id: relation_id.into(),
            subject_id: subject_id.into(),
        }
    }
}

impl std::fmt::Display for FactKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.relation_id, self.subject_id)
    }
}

/// Descriptive metadata for a relation. Not used by matching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationInfo {
    #[serde(default)]
    pub domains: Vec<String>,
}

/// Relation metadata as read from the relation-info file.
pub type RelationInfoMap = BTreeMap<RelationId, RelationInfo>;

/// One fact and its occurrence bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    pub subj_label: String,
    #[serde(default)]
    pub subj_aliases: BTreeSet<String>,
    pub obj_id: String,
    pub obj_label: String,
    /// Filled by the alias closure pass after loading.
    #[serde(default)]
    pub obj_aliases: BTreeSet<String>,
    #[serde(default)]
    pub occurrences: u64,
    /// Matched sentences. `None` when sentences are not retained; in that
    /// case `occurrences` is authoritative and never recomputed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentences: Option<BTreeSet<String>>,
}

impl Fact {
    /// Create a fact with zero occurrences and empty object aliases.
    pub fn new(
        subj_label: impl Into<String>,
        subj_aliases: impl IntoIterator<Item = String>,
        obj_id: impl Into<String>,
        obj_label: impl Into<String>,
    ) -> Self {
        Self {
            subj_label: subj_label.into(),
            subj_aliases: subj_aliases.into_iter().collect(),
            obj_id: obj_id.into(),
            obj_label: obj_label.into(),
            obj_aliases: BTreeSet::new(),
            occurrences: 0,
            sentences: Some(BTreeSet::new()),
        }
    }

    /// Subject label followed by every subject alias.
    pub fn subject_surface_forms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.subj_label.as_str()).chain(self.subj_aliases.iter().map(String::as_str))
    }

    /// Object label followed by every object alias.
    pub fn object_surface_forms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.obj_label.as_str()).chain(self.obj_aliases.iter().map(String::as_str))
    }

    /// Drop retained sentences, keeping the last known count.
    pub fn strip_sentences(&mut self) {
        self.sentences = None;
    }
}

/// All facts, keyed by relation then subject.
///
/// Built once at load time. The matcher only touches `occurrences` and
/// `sentences`; no facts are added or removed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    relations: BTreeMap<RelationId, BTreeMap<SubjectId, Fact>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a (possibly empty) fact table exists for `relation_id`.
    pub fn relation_entry(&mut self, relation_id: &str) -> &mut BTreeMap<SubjectId, Fact> {
        self.relations.entry(relation_id.to_string()).or_default()
    }

    /// Insert or replace a fact.
    pub fn insert(&mut self, relation_id: &str, subject_id: &str, fact: Fact) {
        self.relation_entry(relation_id)
            .insert(subject_id.to_string(), fact);
    }

    pub fn get(&self, relation_id: &str, subject_id: &str) -> Option<&Fact> {
        self.relations.get(relation_id)?.get(subject_id)
    }

    pub fn get_mut(&mut self, relation_id: &str, subject_id: &str) -> Option<&mut Fact> {
        self.relations.get_mut(relation_id)?.get_mut(subject_id)
    }

    pub fn fact(&self, key: &FactKey) -> Option<&Fact> {
        self.get(&key.relation_id, &key.subject_id)
    }

    pub fn fact_mut(&mut self, key: &FactKey) -> Option<&mut Fact> {
        self.get_mut(&key.relation_id, &key.subject_id)
    }

    pub fn contains_relation(&self, relation_id: &str) -> bool {
        self.relations.contains_key(relation_id)
    }

    pub fn relation(&self, relation_id: &str) -> Option<&BTreeMap<SubjectId, Fact>> {
        self.relations.get(relation_id)
    }

    /// Relation ids in sorted order.
    pub fn relation_ids(&self) -> impl Iterator<Item = &str> {
        self.relations.keys().map(String::as_str)
    }

    /// Iterate `(relation_id, subject_id, fact)` in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &Fact)> {
        self.relations.iter().flat_map(|(relation_id, facts)| {
            facts
                .iter()
                .map(move |(subject_id, fact)| (relation_id.as_str(), subject_id.as_str(), fact))
        })
    }

    /// Mutable counterpart of [`Catalog::iter`].
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &str, &mut Fact)> {
        self.relations.iter_mut().flat_map(|(relation_id, facts)| {
            facts
                .iter_mut()
                .map(move |(subject_id, fact)| (relation_id.as_str(), subject_id.as_str(), fact))
        })
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    pub fn fact_count(&self) -> usize {
        self.relations.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.fact_count() == 0
    }

    /// Number of facts with at least one occurrence.
    pub fn matched_facts(&self) -> usize {
        self.iter().filter(|(_, _, fact)| fact.occurrences > 0).count()
    }

    pub fn total_occurrences(&self) -> u64 {
        self.iter().map(|(_, _, fact)| fact.occurrences).sum()
    }

    /// Drop retained sentences from every fact.
    pub fn strip_sentences(&mut self) {
        for (_, _, fact) in self.iter_mut() {
            fact.strip_sentences();
        }
    }

    /// Every fact key, sorted.
    pub fn keys(&self) -> Vec<FactKey> {
        self.iter()
            .map(|(relation_id, subject_id, _)| FactKey::new(relation_id, subject_id))
            .collect()
    }

    /// The `n` matched facts with the most occurrences, ties in key order.
    pub fn top_facts(&self, n: usize) -> Vec<(FactKey, &Fact)> {
        let mut matched: Vec<(FactKey, &Fact)> = self
            .iter()
            .filter(|(_, _, fact)| fact.occurrences > 0)
            .map(|(relation_id, subject_id, fact)| (FactKey::new(relation_id, subject_id), fact))
            .collect();
        matched.sort_by(|a, b| b.1.occurrences.cmp(&a.1.occurrences).then_with(|| a.0.cmp(&b.0)));
        matched.truncate(n);
        matched
    }
}
