//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical fixtures so tests agree on what "the sample catalog" is.

#![doc(hidden)]

use crate::types::{Catalog, Fact};

/// Create a fact with zero occurrences and no object aliases.
pub fn make_fact(subj_label: &str, subj_aliases: &[&str], obj_id: &str, obj_label: &str) -> Fact {
    Fact::new(
        subj_label,
        subj_aliases.iter().map(|alias| alias.to_string()),
        obj_id,
        obj_label,
    )
}

/// Create a fact whose object aliases are already resolved.
pub fn make_fact_with_obj_aliases(
    subj_label: &str,
    subj_aliases: &[&str],
    obj_id: &str,
    obj_label: &str,
    obj_aliases: &[&str],
) -> Fact {
    let mut fact = make_fact(subj_label, subj_aliases, obj_id, obj_label);
    fact.obj_aliases = obj_aliases.iter().map(|alias| alias.to_string()).collect();
    fact
}

pub const USA_ALIASES: &[&str] = &[
    "the United States of America",
    "America",
    "U.S.A.",
    "USA",
    "U.S.",
    "US",
];

pub const HAMILTON_ALIASES: &[&str] = &[
    "Publius",
    "Hamilton",
    "Alexander Hamilton, US Treasury secretary",
    "A. Ham",
    "RB",
];

pub const BERNHARDT_ALIASES: &[&str] = &["Rainer Herbert Georg Bernhardt", "Bernhardt", "RB"];

/// Two relations, four facts, object aliases resolved.
///
/// `"RB"` is deliberately ambiguous between Hamilton and Bernhardt.
pub fn hamilton_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert(
        "P_00",
        "Q30",
        make_fact("United States of America", USA_ALIASES, "Q61", "Washington, D.C"),
    );
    catalog.insert(
        "P_00",
        "Q178903",
        make_fact_with_obj_aliases(
            "Alexander Hamilton",
            HAMILTON_ALIASES,
            "Q30",
            "United States of America",
            USA_ALIASES,
        ),
    );
    catalog.insert(
        "P_01",
        "Q2127993",
        make_fact_with_obj_aliases(
            "Rainer Bernhardt",
            BERNHARDT_ALIASES,
            "Q30",
            "United States of America",
            USA_ALIASES,
        ),
    );
    catalog.insert(
        "P_01",
        "Q178903",
        make_fact_with_obj_aliases(
            "Alexander Hamilton",
            HAMILTON_ALIASES,
            "Q2127993",
            "Rainer Bernhardt",
            BERNHARDT_ALIASES,
        ),
    );
    catalog
}

/// One-fact catalog: the United States and its capital.
pub fn usa_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert(
        "P_00",
        "Q30",
        make_fact("United States of America", USA_ALIASES, "Q61", "Washington, D.C"),
    );
    catalog
}

/// Documents exercising label, alias, object-alias and ambiguous-alias hits.
pub fn hamilton_documents() -> Vec<String> {
    vec![
        "United States of America blah blah blah Washington, D.C blah. \
         United States of America blah Alexander blah blah Washington, D.C blah. \
         United States of America (U.S.A.) blah blah blah Washington, D.C blah."
            .to_string(),
        "United of America (U.S.A.) blah blah blah Washington, D.C blah. \
         Alexander Hamilton blah blah blah the United States of America."
            .to_string(),
        "Publius blah blah blah the USA based in Washington, D.C blah. \
         Hamilton blah blah blah United States of America. \
         US blah blah blah A. Ham. \
         United States of America (U.S.A.) blah blah blah Washington, D.C blah."
            .to_string(),
        "Rainer Herbert Georg Bernhardt blah blah blah the USA blah. \
         Bernhardt blah blah blah United States of America."
            .to_string(),
        "Joachim Sauer and Merkel. A. Merkel blah blah blah Joachim Sauer.".to_string(),
    ]
}
