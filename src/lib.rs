//! Count how often knowledge-base facts are attested in a text corpus.
//!
//! A fact is a `(relation, subject) → object` triple with labels and aliases
//! on both ends. A sentence attests a fact when it contains a surface form of
//! the subject as a token span and a surface form of the object as a whole
//! word. Every fact carries its occurrence count and, optionally, the set of
//! sentences that attested it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  catalog/    │────▶│  index/      │────▶│  matcher/    │
//! │ (load facts, │     │ (surface-form│     │ (n-grams,    │
//! │ alias closure│     │  → fact keys)│     │  ledger)     │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!        │                                         │
//!        │              ┌──────────────┐           ▼
//!        └─────────────▶│  run/        │──▶ snapshot per shard
//!                       │ (shards,     │           │
//!                       │  rayon)      │           ▼
//!                       └──────────────┘     ┌──────────────┐
//!                                            │  merge/      │
//!                                            │ (sum, union, │
//!                                            │  correction) │
//!                                            └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use factscan::index::SurfaceFormIndex;
//! use factscan::matcher::{OccurrenceMatcher, SurfaceFormStrategy};
//! use factscan::text::RuleBasedPipeline;
//! use factscan::{Catalog, Fact};
//!
//! let mut catalog = Catalog::new();
//! catalog.insert(
//!     "P_00",
//!     "Q30",
//!     Fact::new("United States of America", vec!["USA".to_string()], "Q61", "Washington, D.C"),
//! );
//!
//! let pipeline = RuleBasedPipeline::new();
//! let index = SurfaceFormIndex::build(&catalog, &pipeline);
//! let strategy = SurfaceFormStrategy::new(&index);
//! let mut matcher = OccurrenceMatcher::new(catalog, &strategy, &pipeline, true);
//!
//! matcher.process_document("USA blah Washington, D.C again.");
//! assert_eq!(matcher.catalog().get("P_00", "Q30").unwrap().occurrences, 1);
//! ```

// Module declarations
pub mod catalog;
pub mod contracts;
pub mod error;
pub mod index;
pub mod matcher;
pub mod merge;
pub mod run;
pub mod snapshot;
pub mod testing;
pub mod text;
mod types;

pub use error::{FactError, Result};
pub use types::{
    Catalog, Fact, FactKey, RelationId, RelationInfo, RelationInfoMap, SubjectId,
};
