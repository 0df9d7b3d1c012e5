//! Runtime contracts for catalog and occurrence invariants.
//!
//! Debug-mode assertions that check the properties the rest of the crate
//! relies on. They:
//!
//! 1. Are **zero-cost in release builds** (`debug_assert!` / `cfg!(debug_assertions)`)
//! 2. Provide **early failure detection** during development and tests
//!
//! # INVARIANTS (DO NOT REMOVE THESE CHECKS)
//!
//! | Contract Function                  | Invariant                                           |
//! |------------------------------------|-----------------------------------------------------|
//! | `check_fact_counts`                | `occurrences == |sentences|` when sentences are kept|
//! | `check_catalog_counts`             | the above, for every fact                           |
//! | `check_object_alias_closure`       | obj_aliases ⊇ subj_aliases of the object's facts    |
//! | `check_occurrences_monotonic`      | a count never decreases during a run                |
//!
//! # Usage
//!
//! ```ignore
//! use factscan::contracts::*;
//!
//! // In debug builds, this panics if the invariant is violated
//! check_catalog_counts(&catalog);
//! ```

use std::collections::{BTreeSet, HashMap};

use crate::types::{Catalog, Fact};

// ============================================================================
// OCCURRENCE CONTRACTS
// ============================================================================

/// Check that a fact's count agrees with its retained sentences.
///
/// # Panics (debug builds only)
/// Panics if sentences are retained and `occurrences != sentences.len()`.
#[inline]
pub fn check_fact_counts(fact: &Fact) {
    if let Some(sentences) = &fact.sentences {
        debug_assert_eq!(
            fact.occurrences,
            sentences.len() as u64,
            "Contract violation: occurrences {} != |sentences| {} for '{}'",
            fact.occurrences,
            sentences.len(),
            fact.subj_label
        );
    }
}

/// Check count/sentence agreement for every fact in the catalog.
#[inline]
pub fn check_catalog_counts(catalog: &Catalog) {
    if cfg!(debug_assertions) {
        for (_, _, fact) in catalog.iter() {
            check_fact_counts(fact);
        }
    }
}

/// Check that a count did not go down.
#[inline]
pub fn check_occurrences_monotonic(before: u64, after: u64) {
    debug_assert!(
        after >= before,
        "Contract violation: occurrence count decreased from {} to {}",
        before,
        after
    );
}

// ============================================================================
// CATALOG CONTRACTS
// ============================================================================

/// Check the one-hop object-alias closure.
///
/// Every fact's `obj_aliases` must contain the `subj_aliases` of every fact
/// whose subject is that fact's object.
pub fn check_object_alias_closure(catalog: &Catalog) {
    if !cfg!(debug_assertions) {
        return;
    }

    let mut aliases_by_subject: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for (_, subject_id, fact) in catalog.iter() {
        aliases_by_subject
            .entry(subject_id)
            .or_default()
            .extend(fact.subj_aliases.iter().map(String::as_str));
    }

    for (relation_id, subject_id, fact) in catalog.iter() {
        if let Some(expected) = aliases_by_subject.get(fact.obj_id.as_str()) {
            for alias in expected {
                debug_assert!(
                    fact.obj_aliases.contains(*alias),
                    "Contract violation: {}/{} is missing object alias '{}'",
                    relation_id,
                    subject_id,
                    alias
                );
            }
        }
    }
}
