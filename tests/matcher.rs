//! Occurrence matching over in-memory catalogs.

mod common;

use common::*;
use factscan::index::SurfaceFormIndex;
use factscan::matcher::{
    decorate_sentence_with_ids, AnnotationLinker, LinkedEntityStrategy, OccurrenceMatcher,
    SurfaceFormStrategy,
};
use factscan::index::SubjectIndex;
use factscan::text::{LineSegmentedPipeline, RuleBasedPipeline};
use factscan::{Catalog, FactKey};

fn match_documents(catalog: Catalog, documents: &[String]) -> (Catalog, factscan::matcher::SentenceLedger) {
    let pipeline = RuleBasedPipeline::new();
    let index = SurfaceFormIndex::build(&catalog, &pipeline);
    let strategy = SurfaceFormStrategy::new(&index);
    let mut matcher = OccurrenceMatcher::new(catalog, &strategy, &pipeline, true);
    matcher.process_documents(documents);
    let ledger = matcher.ledger().clone();
    (matcher.into_catalog(), ledger)
}

fn hashes(ledger: &factscan::matcher::SentenceLedger, relation_id: &str, subject_id: &str) -> Vec<String> {
    let mut hashes: Vec<String> = ledger
        .hashes(&FactKey::new(relation_id, subject_id))
        .map(|set| set.iter().cloned().collect())
        .unwrap_or_default();
    hashes.sort();
    hashes
}

// ============================================================================
// SURFACE-FORM INDEX
// ============================================================================

#[test]
fn test_index_keys_are_tokenized_surface_forms() {
    let index = SurfaceFormIndex::build(&hamilton_catalog(), &RuleBasedPipeline::new());

    assert_eq!(
        index.keys(),
        vec![
            "a. ham",
            "alexander hamilton",
            "alexander hamilton , us treasury secretary",
            "america",
            "bernhardt",
            "hamilton",
            "publius",
            "rainer bernhardt",
            "rainer herbert georg bernhardt",
            "rb",
            "the united states of america",
            "u.s .",
            "u.s.a .",
            "united states of america",
            "us",
            "usa",
        ]
    );
    assert_eq!(index.max_ngram_len(), 6);
    assert_eq!(index.lookup("rb").map(|keys| keys.len()), Some(3));
}

// ============================================================================
// SURFACE-FORM MATCHING
// ============================================================================

#[test]
fn test_hamilton_corpus() {
    let (catalog, ledger) = match_documents(hamilton_catalog(), &hamilton_documents());

    assert_eq!(occurrences(&catalog, "P_00", "Q30"), 5);
    assert_eq!(
        sentences(&catalog, "P_00", "Q30"),
        vec![
            "Publius blah blah blah the USA based in Washington, D.C blah.",
            "United States of America (U.S.A.) blah blah blah Washington, D.C blah.",
            "United States of America blah Alexander blah blah Washington, D.C blah.",
            "United States of America blah blah blah Washington, D.C blah.",
            "United of America (U.S.A.) blah blah blah Washington, D.C blah.",
        ]
    );

    assert_eq!(occurrences(&catalog, "P_00", "Q178903"), 4);
    assert_eq!(
        sentences(&catalog, "P_00", "Q178903"),
        vec![
            "Alexander Hamilton blah blah blah the United States of America.",
            "Hamilton blah blah blah United States of America.",
            "Publius blah blah blah the USA based in Washington, D.C blah.",
            "US blah blah blah A. Ham.",
        ]
    );

    assert_eq!(occurrences(&catalog, "P_01", "Q2127993"), 2);
    assert_eq!(
        sentences(&catalog, "P_01", "Q2127993"),
        vec![
            "Bernhardt blah blah blah United States of America.",
            "Rainer Herbert Georg Bernhardt blah blah blah the USA blah.",
        ]
    );

    assert_eq!(occurrences(&catalog, "P_01", "Q178903"), 0);
    assert!(sentences(&catalog, "P_01", "Q178903").is_empty());

    // Dedup identity is the SHA-256 of the sentence text.
    assert_eq!(
        hashes(&ledger, "P_00", "Q178903"),
        vec![
            "b64eaa32020333c76be1e83b584d32c33a7f250d0ecfe98f46dfc91bd2509fb6",
            "c973711103f7a50890ef1e3789133b954fc126dc757133dd829a83cd4145a913",
            "e2c4cbc00f366ee1edaab3a9e421e2c588a2ddc82d6ff426cf51ccfbf6426173",
            "f8a98d33b32b0c785b4114a9e2147c26f5cd3b4f921e40a725ff7f58eafde200",
        ]
    );
    assert_eq!(
        hashes(&ledger, "P_01", "Q2127993"),
        vec![
            "404c6a14471986e2daf51c268da06a0534361c72814896837592c29da31aa946",
            "fe072923fdc442f126819371b4e387d2785c26c016bf73f5e2dffeefe5b64c8f",
        ]
    );
    assert_eq!(ledger.fact_count(), 3);
}

#[test]
fn test_limpopo_corpus() {
    let mut catalog = Catalog::new();
    catalog.insert("P_00", "Q173017", make_fact("Limpopo River", &["Limpopo"], "Q15", "Africa"));

    let documents: Vec<String> = [
        "kilometres (7,580 sq mi) in the provinces of Limpopo and Mpumalanga in northeastern South Africa, and extends 360 kilometres (220 mi) from north to south and 65 kilometres (40 mi) from east to west.",
        "For two thousand years Arab merchants plied East Africa’s Indian Ocean shores, from Mogadishu (Somalia) to the mouth of the Limpopo River (Mozambique), arriving with the north easterly Kaskazi, departing on the south easterly Kusi.",
        "Phalaborwa, Limpopo is the only town in South Africa that borders the Kruger National Park.",
        "The park lies in the north-east of South Africa, in the eastern parts of Limpopo and Mpumalanga provinces.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let (catalog, ledger) = match_documents(catalog, &documents);

    assert_eq!(occurrences(&catalog, "P_00", "Q173017"), 4);
    assert_eq!(sentences(&catalog, "P_00", "Q173017").len(), 4);
    assert_eq!(
        hashes(&ledger, "P_00", "Q173017"),
        vec![
            "08d8c790c82dbb48a1707ba13f410bbde8e91b5db2a83ed35cebec0064305373",
            "38012880db7aecd82513360bf492bea368f0ec2bda0ff343ca3d4d40696f5152",
            "71547cd430be3dc81d52f02dad956f08b96770b76f5ac0f9a293ed3872fb20e2",
            "b6431d6dca3c86ef3c8e2e72d54b8bdec2ca791ae69956e70729a156646330ec",
        ]
    );
}

#[test]
fn test_two_sentence_document() {
    let documents = vec![
        "United States of America blah Washington, D.C blah. USA blah Washington, D.C again.".to_string(),
    ];
    let (catalog, _) = match_documents(usa_catalog(), &documents);

    assert_eq!(occurrences(&catalog, "P_00", "Q30"), 2);
    assert_eq!(
        sentences(&catalog, "P_00", "Q30"),
        vec![
            "USA blah Washington, D.C again.",
            "United States of America blah Washington, D.C blah.",
        ]
    );
}

#[test]
fn test_word_boundaries() {
    let mut catalog = Catalog::new();
    catalog.insert("P1", "Q1", make_fact("Nepal", &[], "Q2", "US"));
    let documents = vec!["Nepal and USA is big.".to_string(), "Nepal and the US is big.".to_string()];

    let (catalog, _) = match_documents(catalog, &documents);
    assert_eq!(sentences(&catalog, "P1", "Q1"), vec!["Nepal and the US is big."]);
}

#[test]
fn test_same_sentence_in_two_documents_counts_once() {
    let documents = vec![
        "USA blah Washington, D.C again.".to_string(),
        "Something else. USA blah Washington, D.C again.".to_string(),
    ];
    let (catalog, _) = match_documents(usa_catalog(), &documents);
    assert_eq!(occurrences(&catalog, "P_00", "Q30"), 1);
}

// ============================================================================
// LINKED-ENTITY MATCHING
// ============================================================================

#[test]
fn test_linked_matching_over_annotated_lines() {
    let catalog = hamilton_catalog();
    let subjects = SubjectIndex::build(&catalog);
    let strategy = LinkedEntityStrategy::new(&subjects, AnnotationLinker);
    let pipeline = LineSegmentedPipeline::new();
    let mut matcher = OccurrenceMatcher::new(catalog, &strategy, &pipeline, true);

    let document = [
        decorate_sentence_with_ids("Hamilton served the young republic.", ["Q178903", "Q30"]),
        decorate_sentence_with_ids("Bernhardt met Hamilton. Then left.", ["Q2127993", "Q178903"]),
        decorate_sentence_with_ids("Hamilton served the young republic.", ["Q178903", "Q30"]),
        "An unannotated line about the US.".to_string(),
    ]
    .join("\n");
    matcher.process_document(&document);

    let catalog = matcher.into_catalog();
    assert_eq!(occurrences(&catalog, "P_00", "Q178903"), 1);
    assert_eq!(
        sentences(&catalog, "P_00", "Q178903"),
        vec!["Hamilton served the young republic."]
    );
    assert_eq!(occurrences(&catalog, "P_01", "Q178903"), 1);
    assert_eq!(occurrences(&catalog, "P_01", "Q2127993"), 0);
    assert_eq!(occurrences(&catalog, "P_00", "Q30"), 0);
}

#[test]
fn test_unbalanced_annotation_skips_whole_document() {
    let catalog = hamilton_catalog();
    let subjects = SubjectIndex::build(&catalog);
    let strategy = LinkedEntityStrategy::new(&subjects, AnnotationLinker);
    let pipeline = LineSegmentedPipeline::new();
    let mut matcher = OccurrenceMatcher::new(catalog, &strategy, &pipeline, true);

    let document = format!(
        "{}\nBroken line Q30]",
        decorate_sentence_with_ids("Hamilton served the young republic.", ["Q178903", "Q30"])
    );
    assert!(!matcher.process_document(&document));

    assert_eq!(matcher.stats().skipped_documents, 1);
    assert_eq!(matcher.catalog().total_occurrences(), 0);
}
