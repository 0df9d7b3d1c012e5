//! Per-run sentence dedup table.
//!
//! A sentence counts at most once per fact, no matter how many n-gram windows
//! or aliases fire inside it, and no matter how many documents repeat it. The
//! ledger is keyed `subject → relation → {sentence hash}`, grows monotonically
//! and lives exactly as long as one matching run. It is never persisted: only
//! the counts and sentences it produces end up in a snapshot.

use std::collections::{HashMap, HashSet};

use crate::text::sentence_hash;
use crate::types::{FactKey, RelationId, SubjectId};

#[derive(Debug, Clone, Default)]
pub struct SentenceLedger {
    seen: HashMap<SubjectId, HashMap<RelationId, HashSet<String>>>,
}

impl SentenceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `sentence` for `key`.
    ///
    /// Returns the new number of distinct sentences for the fact, or `None` if
    /// the sentence was already recorded for it.
    pub fn record(&mut self, key: &FactKey, sentence: &str) -> Option<usize> {
        let hashes = self
            .seen
            .entry(key.subject_id.clone())
            .or_default()
            .entry(key.relation_id.clone())
            .or_default();

        if hashes.insert(sentence_hash(sentence)) {
            Some(hashes.len())
        } else {
            None
        }
    }

    pub fn contains(&self, key: &FactKey, sentence: &str) -> bool {
        self.hashes(key)
            .is_some_and(|hashes| hashes.contains(&sentence_hash(sentence)))
    }

    /// Number of distinct sentences recorded for `key`.
    pub fn count(&self, key: &FactKey) -> usize {
        self.hashes(key).map_or(0, HashSet::len)
    }

    /// Sentence hashes recorded for `key`.
    pub fn hashes(&self, key: &FactKey) -> Option<&HashSet<String>> {
        self.seen.get(&key.subject_id)?.get(&key.relation_id)
    }

    /// Number of facts with at least one recorded sentence.
    pub fn fact_count(&self) -> usize {
        self.seen.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
