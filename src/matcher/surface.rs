//! N-gram matching against the surface-form index.
//!
//! For each sentence: fold the tokens, generate every contiguous window of
//! 1..=min(len, max_ngram_len) tokens, probe the index, and for each candidate
//! fact confirm the object side with a whole-word search for the object label
//! or any object alias in the sentence text.

use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};

use super::{MatchStrategy, SentenceMatch};
use crate::error::Result;
use crate::index::SurfaceFormIndex;
use crate::text::{contains_folded_word, fold_case, Sentence};
use crate::types::{Catalog, Fact, FactKey};

/// Surface-form n-gram strategy.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceFormStrategy<'a> {
    index: &'a SurfaceFormIndex,
}

impl<'a> SurfaceFormStrategy<'a> {
    pub fn new(index: &'a SurfaceFormIndex) -> Self {
        Self { index }
    }
}

impl MatchStrategy for SurfaceFormStrategy<'_> {
    fn name(&self) -> &'static str {
        "surface"
    }

    fn match_sentence<'s>(
        &self,
        sentence: &'s Sentence,
        catalog: &Catalog,
    ) -> Result<SentenceMatch<'s>> {
        let mut facts = BTreeSet::new();
        let max_n = sentence.tokens.len().min(self.index.max_ngram_len());
        if max_n == 0 {
            return Ok(SentenceMatch {
                text: Cow::Borrowed(&sentence.text),
                facts,
            });
        }

        let tokens: Vec<String> = sentence.tokens.iter().map(|t| fold_case(t)).collect();
        let folded_text = fold_case(&sentence.text);
        let mut rejected: HashSet<&FactKey> = HashSet::new();

        for n in 1..=max_n {
            for window in tokens.windows(n) {
                let ngram = window.join(" ");
                let Some(candidates) = self.index.lookup(&ngram) else {
                    continue;
                };

                for key in candidates {
                    if facts.contains(key) || rejected.contains(key) {
                        continue;
                    }
                    let Some(fact) = catalog.fact(key) else {
                        continue;
                    };
                    if object_attested(fact, &folded_text) {
                        facts.insert(key.clone());
                    } else {
                        rejected.insert(key);
                    }
                }
            }
        }

        Ok(SentenceMatch {
            text: Cow::Borrowed(&sentence.text),
            facts,
        })
    }
}

/// Object label first, then aliases; the first whole-word hit wins.
fn object_attested(fact: &Fact, folded_text: &str) -> bool {
    fact.object_surface_forms()
        .any(|form| contains_folded_word(folded_text, &fold_case(form.trim())))
}
