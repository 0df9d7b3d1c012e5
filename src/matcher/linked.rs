//! Entity-id matching for sentences that went through an entity linker.
//!
//! Instead of surface-form n-grams, an external linker resolves each sentence
//! to a set of entity ids. A fact is attested when both its subject id and its
//! object id are in that set. Dedup and counting are the same as for
//! surface-form matching.
//!
//! [`AnnotationLinker`] reads ids from a trailing `[Q1 Q2 ...]` annotation, the
//! format written by [`decorate_sentence_with_ids`], so a corpus can be linked
//! once offline and matched many times.

use std::borrow::Cow;
use std::collections::BTreeSet;

use super::{MatchStrategy, SentenceMatch};
use crate::error::{FactError, Result};
use crate::index::SubjectIndex;
use crate::text::Sentence;
use crate::types::{Catalog, FactKey};

/// A sentence with its linked entity ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedSentence {
    /// Sentence text without any linker markup.
    pub text: String,
    pub entities: BTreeSet<String>,
}

/// External entity-linking collaborator.
pub trait EntityLinker: Send + Sync {
    fn link(&self, sentence: &str) -> Result<LinkedSentence>;
}

/// Append linked ids to a sentence as `"<sentence> [id id ...]"`.
pub fn decorate_sentence_with_ids<I, S>(sentence: &str, entity_ids: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let ids: Vec<String> = entity_ids
        .into_iter()
        .map(|id| id.as_ref().to_string())
        .collect();
    format!("{} [{}]", sentence, ids.join(" "))
}

/// Reads entity ids from a trailing `[...]` annotation.
///
/// A sentence without an annotation links to nothing. A closing bracket with
/// no opening bracket is a linking failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationLinker;

impl EntityLinker for AnnotationLinker {
    fn link(&self, sentence: &str) -> Result<LinkedSentence> {
        let trimmed = sentence.trim_end();
        if !trimmed.ends_with(']') {
            return Ok(LinkedSentence {
                text: sentence.to_string(),
                entities: BTreeSet::new(),
            });
        }

        let open = trimmed.rfind('[').ok_or_else(|| {
            FactError::Linking(format!("unbalanced entity annotation in '{}'", sentence))
        })?;

        let entities = trimmed[open + 1..trimmed.len() - 1]
            .split_whitespace()
            .map(str::to_string)
            .collect();

        Ok(LinkedSentence {
            text: trimmed[..open].trim_end().to_string(),
            entities,
        })
    }
}

/// Linked-id strategy.
pub struct LinkedEntityStrategy<'a, L: EntityLinker> {
    subjects: &'a SubjectIndex,
    linker: L,
}

impl<'a, L: EntityLinker> LinkedEntityStrategy<'a, L> {
    pub fn new(subjects: &'a SubjectIndex, linker: L) -> Self {
        Self { subjects, linker }
    }
}

impl<L: EntityLinker> MatchStrategy for LinkedEntityStrategy<'_, L> {
    fn name(&self) -> &'static str {
        "linked"
    }

    fn match_sentence<'s>(
        &self,
        sentence: &'s Sentence,
        catalog: &Catalog,
    ) -> Result<SentenceMatch<'s>> {
        let linked = self.linker.link(&sentence.text)?;
        let mut facts = BTreeSet::new();

        for entity in &linked.entities {
            for relation_id in self.subjects.relations_of(entity) {
                let Some(fact) = catalog.get(relation_id, entity) else {
                    continue;
                };
                if linked.entities.contains(&fact.obj_id) {
                    facts.insert(FactKey::new(relation_id.as_str(), entity.as_str()));
                }
            }
        }

        Ok(SentenceMatch {
            text: Cow::Owned(linked.text),
            facts,
        })
    }
}
