//! Built-in rule-based segmenter and tokenizer.
//!
//! # Segmentation
//!
//! A sentence ends at `.`, `!` or `?` (optionally followed by closing quotes or
//! brackets) when the next non-space character starts a new sentence: an
//! uppercase letter, a digit, or an opening quote/bracket. A period does not
//! end a sentence after an abbreviation, i.e. a single letter (`"A."`) or a
//! token with inner periods (`"U.S."`, `"D.C."`).
//!
//! # Tokenization
//!
//! Whitespace separates tokens; leading and trailing punctuation is split off
//! into tokens of its own, inner punctuation stays (`"D.C"`, `"7,580"`), and
//! a single-letter initial keeps its period (`"A."`):
//!
//! ```text
//! "Washington, D.C blah."  →  ["Washington", ",", "D.C", "blah", "."]
//! "(U.S.A.)"               →  ["(", "U.S.A", ".", ")"]
//! ```

use super::TextPipeline;
use crate::error::Result;

const LEADING_PUNCT: &[char] = &['(', '[', '{', '"', '\'', '“', '‘', '«', '¿', '¡'];
const TRAILING_PUNCT: &[char] = &[
    ')', ']', '}', '"', '\'', '”', '’', '»', ',', ';', ':', '!', '?', '.', '…',
];
const TERMINATORS: &[char] = &['.', '!', '?'];
const CLOSERS: &[char] = &[')', ']', '}', '"', '\'', '”', '’', '»'];
const OPENERS: &[char] = &['(', '[', '{', '"', '\'', '“', '‘', '«'];

/// Deterministic English-oriented pipeline with no model dependencies.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedPipeline;

impl RuleBasedPipeline {
    pub fn new() -> Self {
        Self
    }
}

impl TextPipeline for RuleBasedPipeline {
    fn segment(&self, text: &str) -> Result<Vec<String>> {
        Ok(split_sentences(text))
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        for chunk in text.split_whitespace() {
            split_chunk(chunk, &mut tokens);
        }
        tokens
    }
}

/// One sentence per non-empty line, tokenized like [`RuleBasedPipeline`].
///
/// For corpora that were segmented upstream, e.g. linker output where every
/// line ends with an `[id ...]` annotation the rule segmenter would split.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineSegmentedPipeline;

impl LineSegmentedPipeline {
    pub fn new() -> Self {
        Self
    }
}

impl TextPipeline for LineSegmentedPipeline {
    fn segment(&self, text: &str) -> Result<Vec<String>> {
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        RuleBasedPipeline.tokenize(text)
    }
}

/// Split one whitespace-delimited chunk into tokens.
fn split_chunk(chunk: &str, tokens: &mut Vec<String>) {
    let chars: Vec<char> = chunk.chars().collect();
    let mut start = 0;
    let mut end = chars.len();

    while start < end && LEADING_PUNCT.contains(&chars[start]) {
        tokens.push(chars[start].to_string());
        start += 1;
    }

    let mut trailing = Vec::new();
    while end > start && TRAILING_PUNCT.contains(&chars[end - 1]) {
        trailing.push(chars[end - 1].to_string());
        end -= 1;
    }

    // Initials keep their period: "A." stays one token.
    if end - start == 1 && chars[start].is_alphabetic() && trailing.last().is_some_and(|t| t == ".") {
        trailing.pop();
        end += 1;
    }

    if start < end {
        tokens.push(chars[start..end].iter().collect());
    }
    tokens.extend(trailing.into_iter().rev());
}

fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut sentence_start = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        let (_, c) = chars[i];
        if !TERMINATORS.contains(&c) {
            i += 1;
            continue;
        }

        // Swallow runs like "?!" and closing quotes/brackets.
        let mut j = i + 1;
        while j < chars.len() && (TERMINATORS.contains(&chars[j].1) || CLOSERS.contains(&chars[j].1)) {
            j += 1;
        }

        if j < chars.len() && !chars[j].1.is_whitespace() {
            i = j;
            continue;
        }

        let mut next = j;
        while next < chars.len() && chars[next].1.is_whitespace() {
            next += 1;
        }

        let at_end = next >= chars.len();
        let starts_sentence = !at_end && {
            let n = chars[next].1;
            n.is_uppercase() || n.is_ascii_digit() || OPENERS.contains(&n)
        };

        if at_end || (starts_sentence && !(c == '.' && ends_with_abbreviation(&chars, i))) {
            let end_byte = chars.get(j).map_or(text.len(), |(byte, _)| *byte);
            push_sentence(&mut sentences, &text[sentence_start..end_byte]);
            sentence_start = chars.get(next).map_or(text.len(), |(byte, _)| *byte);
        }
        i = j;
    }

    if sentence_start < text.len() {
        push_sentence(&mut sentences, &text[sentence_start..]);
    }
    sentences
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}

/// Whether the word ending with the period at `period_idx` is an abbreviation.
fn ends_with_abbreviation(chars: &[(usize, char)], period_idx: usize) -> bool {
    let mut word_start = period_idx;
    while word_start > 0 && !chars[word_start - 1].1.is_whitespace() {
        word_start -= 1;
    }

    let word: Vec<char> = chars[word_start..period_idx]
        .iter()
        .map(|(_, c)| *c)
        .skip_while(|c| OPENERS.contains(c))
        .collect();

    let single_letter = word.len() == 1 && word[0].is_alphabetic();
    let dotted = word.contains(&'.') && word.iter().any(|c| c.is_alphabetic());
    single_letter || dotted
}
