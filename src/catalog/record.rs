use serde::Deserialize;

use crate::types::Fact;

/// One line of a per-relation fact file.
///
/// Extra fields in the source line are ignored.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct FactRecord {
    pub sub_id: String,
    pub sub_label: String,
    pub sub_aliases: Vec<String>,
    pub obj_id: String,
    pub obj_label: String,
}

impl FactRecord {
    /// Fresh fact: zero occurrences, empty sentences, object aliases unresolved.
    pub fn into_fact(self) -> (String, Fact) {
        let fact = Fact::new(self.sub_label, self.sub_aliases, self.obj_id, self.obj_label);
        (self.sub_id, fact)
    }
}
