//! Field extraction - recovers `LABEL : value` pairs from normalized task text

use crate::catalog::{FieldCatalog, CONCAT_EMBEDDED_LABEL, CONCAT_VICTIM_LABEL};
use std::collections::BTreeMap;

/// Extract every catalog field from a normalized description.
///
/// A value is the run of text between a label's `<label> :` header and the
/// next occurrence of *any* catalog label followed by a colon, or the end of
/// the text. Matching is case-insensitive; values come back trimmed.
///
/// The returned map always contains every catalog label; labels the text
/// never mentions map to an empty string. Empty or garbage text therefore
/// yields the all-empty map rather than an error.
pub fn extract_fields(catalog: &FieldCatalog, text: &str) -> BTreeMap<String, String> {
    let mut fields: BTreeMap<String, String> = catalog
        .labels()
        .iter()
        .map(|label| (label.clone(), String::new()))
        .collect();

    if text.is_empty() {
        return fields;
    }

    for (idx, label) in catalog.labels().iter().enumerate() {
        let Some(header) = catalog.header(idx).find(text) else {
            continue;
        };
        let value_start = header.end();
        let value_end = catalog
            .boundary()
            .find(&text[value_start..])
            .map(|b| value_start + b.start())
            .unwrap_or(text.len());
        let value = text[value_start..value_end].trim();
        fields.insert(label.clone(), value.to_string());
    }

    repair_concatenated_value(&mut fields);
    fields
}

/// Compensate for the upstream concatenation bug.
///
/// When the editor drops the colon after `💡 R$ ANUAL (PREVISTO)`, the
/// boundary scan cannot stop there and the whole run lands in the
/// `💡 TIPO DE PROJETO` value. Split the value on the embedded label text,
/// keep the prefix, and promote the suffix into the embedded label's slot.
/// A stray `💡` the editor leaves at the tail of the prefix is removed.
fn repair_concatenated_value(fields: &mut BTreeMap<String, String>) {
    if !fields.contains_key(CONCAT_EMBEDDED_LABEL) {
        return;
    }
    let Some(victim) = fields.get(CONCAT_VICTIM_LABEL) else {
        return;
    };

    let (prefix, promoted) = match victim.split_once(CONCAT_EMBEDDED_LABEL) {
        Some((prefix, suffix)) => (prefix.to_string(), Some(suffix.trim().to_string())),
        None => (victim.clone(), None),
    };

    let repaired = prefix.trim().trim_end_matches('💡').trim_end().to_string();
    fields.insert(CONCAT_VICTIM_LABEL.to_string(), repaired);
    if let Some(promoted) = promoted {
        fields.insert(CONCAT_EMBEDDED_LABEL.to_string(), promoted);
    }
}
