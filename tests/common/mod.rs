//! Shared test utilities and fixtures.

#![allow(dead_code, unused_imports)]

use factscan::Catalog;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// Re-export canonical test utilities from factscan::testing
pub use factscan::testing::{hamilton_catalog, hamilton_documents, make_fact, usa_catalog};

// ============================================================================
// FILE WRITERS
// ============================================================================

/// Write one JSON value per line.
pub fn write_jsonl(path: &Path, values: &[Value]) {
    let content: String = values.iter().map(|value| format!("{}\n", value)).collect();
    fs::write(path, content).unwrap();
}

/// Write a corpus file with one `{"text": ...}` record per document.
pub fn write_corpus(path: &Path, documents: &[&str]) {
    let records: Vec<Value> = documents.iter().map(|text| json!({ "text": text })).collect();
    write_jsonl(path, &records);
}

pub fn write_snapshot_json(path: &Path, snapshot: &Value) {
    fs::write(path, serde_json::to_string_pretty(snapshot).unwrap()).unwrap();
}

pub fn fact_record(sub_id: &str, sub_label: &str, sub_aliases: &[&str], obj_id: &str, obj_label: &str) -> Value {
    json!({
        "sub_id": sub_id,
        "sub_label": sub_label,
        "sub_aliases": sub_aliases,
        "obj_id": obj_id,
        "obj_label": obj_label,
    })
}

// ============================================================================
// CATALOG FIXTURES
// ============================================================================

/// A facts directory: `relation_info.json` plus one `.jsonl` per relation.
pub struct FactsFixture {
    pub dir: TempDir,
}

impl FactsFixture {
    pub fn new(relation_info: Value) -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("relation_info.json"), relation_info.to_string()).unwrap();
        Self { dir }
    }

    pub fn with_relation(self, relation_id: &str, records: &[Value]) -> Self {
        write_jsonl(&self.dir.path().join(format!("{}.jsonl", relation_id)), records);
        self
    }

    pub fn relation_info_path(&self) -> PathBuf {
        self.dir.path().join("relation_info.json")
    }

    pub fn facts_dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Heads-of-government facts for P6; P19 is listed but has no fact file.
pub fn heads_of_government() -> FactsFixture {
    FactsFixture::new(json!({
        "P6": {"domains": ["Political", "Biographical", "Historical"]},
        "P19": {"domains": ["Biographical"]},
    }))
    .with_relation(
        "P6",
        &[
            fact_record("Q1519", "Abu Dhabi", &["Abū Dhabi", "Abudhabi"], "Q1059948", "Khalifa bin Zayed Al Nahyan"),
            fact_record("Q399", "Armenia", &["Republic of Armenia", "🇦🇲", "ARM", "AM"], "Q7035479", "Nikol Pashinyan"),
            fact_record("Q548114", "Free State of Fiume", &[], "Q193236", "Gabriele D'Annunzio"),
            fact_record(
                "Q837",
                "Nepal",
                &["NPL", "Federal Democratic Republic of Nepal", "NEP", "NP", "🇳🇵"],
                "Q3195923",
                "Khadga Prasad Sharma Oli",
            ),
        ],
    )
}

/// The Hamilton/Bernhardt facts as files, object aliases unresolved.
pub fn hamilton_fixture() -> FactsFixture {
    let usa = ["the United States of America", "America", "U.S.A.", "USA", "U.S.", "US"];
    let hamilton = ["Publius", "Hamilton", "Alexander Hamilton, US Treasury secretary", "A. Ham", "RB"];
    let bernhardt = ["Rainer Herbert Georg Bernhardt", "Bernhardt", "RB"];

    FactsFixture::new(json!({
        "P_00": {"domains": ["stuff"]},
        "P_01": {"domains": ["hi"]},
    }))
    .with_relation(
        "P_00",
        &[
            fact_record("Q30", "United States of America", &usa, "Q61", "Washington, D.C"),
            fact_record("Q178903", "Alexander Hamilton", &hamilton, "Q30", "United States of America"),
        ],
    )
    .with_relation(
        "P_01",
        &[
            fact_record("Q2127993", "Rainer Bernhardt", &bernhardt, "Q30", "United States of America"),
            fact_record("Q178903", "Alexander Hamilton", &hamilton, "Q2127993", "Rainer Bernhardt"),
        ],
    )
}

// ============================================================================
// SNAPSHOT FIXTURES
// ============================================================================

fn snapshot_fact(
    subj_label: &str,
    subj_aliases: &[&str],
    obj_id: &str,
    obj_label: &str,
    occurrences: u64,
    sentences: &[&str],
) -> Value {
    json!({
        "subj_label": subj_label,
        "subj_aliases": subj_aliases,
        "obj_id": obj_id,
        "obj_label": obj_label,
        "obj_aliases": [],
        "occurrences": occurrences,
        "sentences": sentences,
    })
}

const ABU_DHABI_SENTENCE: &str = "Abu Dhabi blah blah blah Khalifa bin Zayed Al Nahyan.";
const NEPAL_SENTENCE: &str = "Nepal NPL is cool Khadga Prasad Sharma Oli";

/// First of two shard snapshots over the same five facts.
pub fn shard_snapshot_1() -> Value {
    json!({
        "P6": {
            "Q1519": snapshot_fact("Abu Dhabi", &["Abudhabi", "Abū Dhabi"], "Q1059948", "Khalifa bin Zayed Al Nahyan", 1, &[ABU_DHABI_SENTENCE]),
            "Q399": snapshot_fact("Armenia", &["🇦🇲", "AM", "Republic of Armenia", "ARM"], "Q7035479", "Nikol Pashinyan", 1, &["Armenia blah blah blah Nikol Pashinyan"]),
        },
        "P2": {
            "Q548114": snapshot_fact("Free State of Fiume", &[], "Q193236", "Gabriele D'Annunzio", 0, &[]),
            "Q5626824": snapshot_fact("Gülcemal Sultan", &[], "Q222", "Albania", 0, &[]),
            "Q837": snapshot_fact("Nepal", &["Federal Democratic Republic of Nepal", "NEP", "NP", "NPL", "🇳🇵"], "Q3195923", "Khadga Prasad Sharma Oli", 1, &[NEPAL_SENTENCE]),
        },
    })
}

/// Second shard snapshot: Abu Dhabi and Nepal re-count the same sentences.
pub fn shard_snapshot_2() -> Value {
    json!({
        "P6": {
            "Q1519": snapshot_fact("Abu Dhabi", &["Abudhabi", "Abū Dhabi"], "Q1059948", "Khalifa bin Zayed Al Nahyan", 1, &[ABU_DHABI_SENTENCE]),
            "Q399": snapshot_fact("Armenia", &["🇦🇲", "AM", "Republic of Armenia", "ARM"], "Q7035479", "Nikol Pashinyan", 1, &["Armenia blah blah blah Nikol Pashinyan blub"]),
        },
        "P2": {
            "Q548114": snapshot_fact("Free State of Fiume", &[], "Q193236", "Gabriele D'Annunzio", 0, &[]),
            "Q5626824": snapshot_fact("Gülcemal Sultan", &[], "Q222", "Albania", 2, &["sentence 1", "sentence 2"]),
            "Q837": snapshot_fact("Nepal", &["Federal Democratic Republic of Nepal", "NEP", "NP", "NPL", "🇳🇵"], "Q3195923", "Khadga Prasad Sharma Oli", 1, &[NEPAL_SENTENCE]),
        },
    })
}

pub fn catalog_from(value: Value) -> Catalog {
    serde_json::from_value(value).unwrap()
}

/// Occurrence count of one fact, panicking if it is absent.
pub fn occurrences(catalog: &Catalog, relation_id: &str, subject_id: &str) -> u64 {
    catalog
        .get(relation_id, subject_id)
        .unwrap_or_else(|| panic!("missing fact {}/{}", relation_id, subject_id))
        .occurrences
}

/// Retained sentences of one fact, sorted.
pub fn sentences(catalog: &Catalog, relation_id: &str, subject_id: &str) -> Vec<String> {
    catalog
        .get(relation_id, subject_id)
        .and_then(|fact| fact.sentences.as_ref())
        .map(|sentences| sentences.iter().cloned().collect())
        .unwrap_or_default()
}
