// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text handling: segmentation, tokenization and word-boundary matching.
//!
//! Sentence segmentation and tokenization belong to an NLP pipeline that sits
//! outside the matcher. [`TextPipeline`] is the seam: anything that can split a
//! document into sentences and a sentence into tokens can drive matching.
//! [`RuleBasedPipeline`] is the built-in implementation, good enough for
//! English prose and deterministic across platforms. [`LineSegmentedPipeline`]
//! trusts upstream segmentation and takes one sentence per line.
//!
//! The same pipeline must tokenize both the catalog's surface forms (when the
//! index is built) and the corpus sentences (when n-grams are generated),
//! otherwise an alias like `"U.S."` would never line up with the tokens of a
//! sentence mentioning it.

mod boundary;
mod pipeline;

pub use boundary::{contains_folded_word, contains_word, fold_case, is_word_char};
pub use pipeline::{LineSegmentedPipeline, RuleBasedPipeline};

use crate::error::Result;
use sha2::{Digest, Sha256};

/// One segmented sentence with its tokens in original case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub text: String,
    pub tokens: Vec<String>,
}

/// External segmentation/tokenization collaborator.
///
/// Implementations must be deterministic: the same text always yields the
/// same sentences and tokens.
pub trait TextPipeline: Send + Sync {
    /// Split a document into sentences. An error skips the whole document.
    fn segment(&self, text: &str) -> Result<Vec<String>>;

    /// Split one sentence (or one surface form) into tokens.
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Segment and tokenize a document in one pass.
    fn sentences(&self, text: &str) -> Result<Vec<Sentence>> {
        Ok(self
            .segment(text)?
            .into_iter()
            .map(|text| {
                let tokens = self.tokenize(&text);
                Sentence { text, tokens }
            })
            .collect())
    }

    /// Lower-cased, single-space-joined token form of a surface form.
    ///
    /// This is the key format of the surface-form index and of every n-gram
    /// probed against it.
    fn surface_key(&self, surface_form: &str) -> String {
        self.tokenize(surface_form)
            .iter()
            .map(|token| fold_case(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// SHA-256 hex digest of a sentence, used as its dedup identity.
pub fn sentence_hash(sentence: &str) -> String {
    let digest = Sha256::digest(sentence.as_bytes());
    digest.iter().map(|byte| format!("{:02x}", byte)).collect()
}
