// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Occurrence matching: the per-document hot path.
//!
//! An [`OccurrenceMatcher`] owns one catalog and one [`SentenceLedger`] for the
//! duration of a run. Documents are segmented by a [`TextPipeline`], each
//! sentence is handed to a [`MatchStrategy`] that decides which facts it
//! attests, and the ledger makes sure each `(fact, sentence)` pair is counted
//! once.
//!
//! Two strategies, picked at construction:
//! - [`SurfaceFormStrategy`]: n-grams against the surface-form index, object
//!   confirmed by whole-word search
//! - [`LinkedEntityStrategy`]: ids from an external entity linker
//!
//! Nothing here is shared mutably. Parallel runs give every shard its own
//! matcher (own catalog clone, own ledger) and combine the results with
//! [`crate::merge`].
//!
//! # INVARIANTS
//!
//! 1. **COUNT_EQUALS_SENTENCES**: with sentences retained, `occurrences == |sentences|`
//! 2. **IDEMPOTENT**: feeding a sentence twice never counts it twice
//! 3. **MONOTONIC**: no count decreases during a run
//! 4. **DOCUMENT_ATOMIC**: a document that fails segmentation or linking
//!    leaves the catalog untouched

mod ledger;
mod linked;
mod surface;

pub use ledger::SentenceLedger;
pub use linked::{
    decorate_sentence_with_ids, AnnotationLinker, EntityLinker, LinkedEntityStrategy,
    LinkedSentence,
};
pub use surface::SurfaceFormStrategy;

use std::borrow::Cow;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::contracts::{check_fact_counts, check_occurrences_monotonic};
use crate::error::Result;
use crate::text::{Sentence, TextPipeline};
use crate::types::{Catalog, FactKey};

/// Facts attested by one sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceMatch<'s> {
    /// Text to record for the matched facts.
    pub text: Cow<'s, str>,
    pub facts: BTreeSet<FactKey>,
}

/// Decides which facts a sentence attests.
pub trait MatchStrategy: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn match_sentence<'s>(&self, sentence: &'s Sentence, catalog: &Catalog)
        -> Result<SentenceMatch<'s>>;
}

/// Counters for one matcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub documents: usize,
    pub skipped_documents: usize,
    pub sentences: usize,
    /// `(fact, sentence)` pairs newly recorded.
    pub new_occurrences: usize,
}

impl MatchStats {
    pub fn absorb(&mut self, other: &MatchStats) {
        self.documents += other.documents;
        self.skipped_documents += other.skipped_documents;
        self.sentences += other.sentences;
        self.new_occurrences += other.new_occurrences;
    }
}

/// Streaming matcher over one catalog.
pub struct OccurrenceMatcher<'a> {
    catalog: Catalog,
    ledger: SentenceLedger,
    strategy: &'a dyn MatchStrategy,
    pipeline: &'a dyn TextPipeline,
    save_sentences: bool,
    stats: MatchStats,
}

impl<'a> OccurrenceMatcher<'a> {
    /// Take ownership of a catalog, either freshly loaded or read back from
    /// a snapshot.
    ///
    /// Existing counts are the starting point and only grow. With
    /// `save_sentences`, sentences already retained are seeded into the
    /// ledger so they are not counted twice. Without it, retained sentence
    /// sets are dropped up front and only counts are kept.
    pub fn new(
        mut catalog: Catalog,
        strategy: &'a dyn MatchStrategy,
        pipeline: &'a dyn TextPipeline,
        save_sentences: bool,
    ) -> Self {
        let mut ledger = SentenceLedger::new();
        if save_sentences {
            for (relation_id, subject_id, fact) in catalog.iter() {
                let key = FactKey::new(relation_id, subject_id);
                for sentence in fact.sentences.iter().flatten() {
                    ledger.record(&key, sentence);
                }
            }
        } else {
            catalog.strip_sentences();
        }
        Self {
            catalog,
            ledger,
            strategy,
            pipeline,
            save_sentences,
            stats: MatchStats::default(),
        }
    }

    /// Match one document. Returns `false` if the document was skipped.
    pub fn process_document(&mut self, text: &str) -> bool {
        self.stats.documents += 1;

        let sentences = match self.pipeline.sentences(text) {
            Ok(sentences) => sentences,
            Err(e) => {
                warn!("Skipping document {}: {}", self.stats.documents, e);
                self.stats.skipped_documents += 1;
                return false;
            }
        };

        // Resolve every sentence before touching the catalog so a failure
        // halfway through leaves no partial counts behind.
        let matches = match sentences
            .iter()
            .map(|sentence| self.strategy.match_sentence(sentence, &self.catalog))
            .collect::<Result<Vec<_>>>()
        {
            Ok(matches) => matches,
            Err(e) => {
                warn!("Skipping document {}: {}", self.stats.documents, e);
                self.stats.skipped_documents += 1;
                return false;
            }
        };

        self.stats.sentences += sentences.len();
        for sentence_match in &matches {
            self.record(sentence_match);
        }
        true
    }

    /// Match many documents in order.
    pub fn process_documents<I, S>(&mut self, documents: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for document in documents {
            self.process_document(document.as_ref());
        }
        debug!(
            "{} matcher: {} documents, {} sentences, {} new occurrences",
            self.strategy.name(),
            self.stats.documents,
            self.stats.sentences,
            self.stats.new_occurrences
        );
    }

    /// Match a single pre-segmented sentence. Returns the number of facts it
    /// newly counted for.
    pub fn process_sentence(&mut self, sentence: &Sentence) -> Result<usize> {
        let sentence_match = self.strategy.match_sentence(sentence, &self.catalog)?;
        self.stats.sentences += 1;
        Ok(self.record(&sentence_match))
    }

    fn record(&mut self, sentence_match: &SentenceMatch<'_>) -> usize {
        let mut recorded = 0;
        for key in &sentence_match.facts {
            if self.ledger.record(key, &sentence_match.text).is_none() {
                continue;
            }
            let Some(fact) = self.catalog.fact_mut(key) else {
                continue;
            };

            let before = fact.occurrences;
            // An uncorrected join may carry more occurrences than sentences.
            let consistent = fact.sentences.as_ref().map_or(true, |s| s.len() as u64 == before);
            fact.occurrences += 1;
            check_occurrences_monotonic(before, fact.occurrences);
            if self.save_sentences {
                fact.sentences
                    .get_or_insert_with(BTreeSet::new)
                    .insert(sentence_match.text.to_string());
            }
            if consistent {
                check_fact_counts(fact);
            }
            recorded += 1;
        }
        self.stats.new_occurrences += recorded;
        recorded
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &SentenceLedger {
        &self.ledger
    }

    pub fn stats(&self) -> MatchStats {
        self.stats
    }

    /// Finish the run, returning the updated catalog.
    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    pub fn into_parts(self) -> (Catalog, MatchStats) {
        (self.catalog, self.stats)
    }
}
