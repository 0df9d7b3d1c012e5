// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Reverse lookups built from the catalog.
//!
//! Two read-only structures, built once and shared across matcher instances:
//! - **Surface-form index**: tokenized, lower-cased subject label/alias → the
//!   facts it can trigger. Probed with every n-gram of every sentence.
//! - **Subject index**: subject id → relations it is a subject of. Used when
//!   an entity linker supplies ids instead of surface forms.
//!
//! # INVARIANTS
//!
//! 1. **AMBIGUITY_PRESERVED**: a key shared by several facts maps to all of them
//! 2. **MAX_NGRAM_TIGHT**: `max_ngram_len` equals the token count of the longest key

use crate::text::TextPipeline;
use crate::types::{Catalog, FactKey, RelationId, SubjectId};
use std::collections::{BTreeSet, HashMap};

/// Surface form → facts whose subject it names.
#[derive(Debug, Clone, Default)]
pub struct SurfaceFormIndex {
    forms: HashMap<String, BTreeSet<FactKey>>,
    max_ngram_len: usize,
}

impl SurfaceFormIndex {
    /// Register every subject label and alias of every fact.
    ///
    /// Keys go through `pipeline.surface_key`, the same tokenization that
    /// sentences get, so a key and an n-gram of a sentence compare equal
    /// exactly when the surface form appears as a token span.
    pub fn build(catalog: &Catalog, pipeline: &dyn TextPipeline) -> Self {
        let mut forms: HashMap<String, BTreeSet<FactKey>> = HashMap::new();

        for (relation_id, subject_id, fact) in catalog.iter() {
            for surface_form in fact.subject_surface_forms() {
                let key = pipeline.surface_key(surface_form);
                if key.is_empty() {
                    continue;
                }
                forms
                    .entry(key)
                    .or_default()
                    .insert(FactKey::new(relation_id, subject_id));
            }
        }

        let max_ngram_len = forms
            .keys()
            .map(|key| key.split(' ').count())
            .max()
            .unwrap_or(0);

        Self {
            forms,
            max_ngram_len,
        }
    }

    /// Facts triggered by an n-gram (already lower-cased and space-joined).
    pub fn lookup(&self, ngram: &str) -> Option<&BTreeSet<FactKey>> {
        self.forms.get(ngram)
    }

    /// Token count of the longest key. Zero for an empty catalog.
    pub fn max_ngram_len(&self) -> usize {
        self.max_ngram_len
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.forms.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

/// Subject id → relations that have a fact for it.
#[derive(Debug, Clone, Default)]
pub struct SubjectIndex {
    relations: HashMap<SubjectId, Vec<RelationId>>,
}

impl SubjectIndex {
    pub fn build(catalog: &Catalog) -> Self {
        let mut relations: HashMap<SubjectId, Vec<RelationId>> = HashMap::new();
        for (relation_id, subject_id, _) in catalog.iter() {
            relations
                .entry(subject_id.to_string())
                .or_default()
                .push(relation_id.to_string());
        }
        Self { relations }
    }

    /// Relations in which `subject_id` is a subject, in sorted order.
    pub fn relations_of(&self, subject_id: &str) -> &[RelationId] {
        self.relations
            .get(subject_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
