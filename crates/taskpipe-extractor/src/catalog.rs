//! The Field Catalog - the fixed label list with precompiled matchers

use crate::error::CatalogError;
use regex::Regex;
use tracing::warn;

/// The production label list, in dataset column order.
///
/// This list is data inherited from the downstream BI datasets, pictographs
/// included. Several entries are substrings of other entries; see
/// [`FieldCatalog::ambiguous_pairs`].
pub const DEFAULT_FIELD_LABELS: &[&str] = &[
    "CARTEIRA DEMANDANTE",
    "E-MAIL",
    "ESCOPO",
    "OBS",
    "OBJETIVO DO GANHO",
    "KPI GANHO",
    "💡 TIPO DE PROJETO",
    "TIPO DE PROJETO",
    "TIPO DE OPERAÇÃO",
    "PRODUTO",
    "OPERAÇÃO",
    "SITE",
    "UNIDADE DE NEGÓCIO",
    "DIRETOR TAHTO",
    "CLIENTE",
    "TIPO",
    "💡 R$ ANUAL (PREVISTO)",
    "GERENTE OI",
    "FERRAMENTA ENVOLVIDA",
    "CENÁRIO PROPOSTO",
    "DATA ALVO",
];

/// Label whose value absorbs the following field when the upstream
/// concatenation bug drops the colon
pub(crate) const CONCAT_VICTIM_LABEL: &str = "💡 TIPO DE PROJETO";

/// Label whose header text ends up embedded in [`CONCAT_VICTIM_LABEL`]'s value
pub(crate) const CONCAT_EMBEDDED_LABEL: &str = "💡 R$ ANUAL (PREVISTO)";

/// An immutable, ordered set of known field labels with one precompiled
/// matcher per label.
///
/// Construct once at process start and pass by reference into
/// [`crate::extract_fields`]; compilation of the matchers happens here, not
/// per task.
#[derive(Debug, Clone)]
pub struct FieldCatalog {
    labels: Vec<String>,
    /// Per-label header matcher: `<label> : ` (case-insensitive)
    headers: Vec<Regex>,
    /// Matches any catalog label followed by a colon - the end of a value
    boundary: Regex,
}

impl FieldCatalog {
    /// Build a catalog from an ordered label list.
    ///
    /// Logs one warning naming the label pairs where one label is contained
    /// in another: for those, value boundaries depend on match order rather
    /// than on an unambiguous grammar, and the upstream text has been seen
    /// to exploit exactly that.
    pub fn new<S: AsRef<str>>(labels: &[S]) -> Result<Self, CatalogError> {
        if labels.is_empty() {
            return Err(CatalogError::Empty);
        }

        let labels: Vec<String> = labels.iter().map(|l| l.as_ref().to_string()).collect();
        for (i, label) in labels.iter().enumerate() {
            if labels[..i].contains(label) {
                return Err(CatalogError::DuplicateLabel(label.clone()));
            }
        }

        let headers = labels
            .iter()
            .map(|label| Regex::new(&format!(r"(?i){}\s*:\s*", regex::escape(label))))
            .collect::<Result<Vec<_>, _>>()?;

        let alternation = labels
            .iter()
            .map(|label| regex::escape(label))
            .collect::<Vec<_>>()
            .join("|");
        let boundary = Regex::new(&format!(r"(?i)(?:{})\s*:", alternation))?;

        let catalog = Self {
            labels,
            headers,
            boundary,
        };

        let ambiguous = catalog.ambiguous_pairs();
        if !ambiguous.is_empty() {
            warn!(
                pairs = ?ambiguous,
                "field catalog contains labels embedded in other labels; \
                 extraction for these depends on label order"
            );
        }

        Ok(catalog)
    }

    /// The production catalog ([`DEFAULT_FIELD_LABELS`]).
    pub fn production() -> Self {
        Self::new(DEFAULT_FIELD_LABELS).expect("production label list is valid")
    }

    /// The catalog labels, in order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when the catalog has no labels (never, post-construction).
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Header matcher for the label at `idx`.
    pub(crate) fn header(&self, idx: usize) -> &Regex {
        &self.headers[idx]
    }

    /// Matcher for "any catalog label followed by a colon".
    pub(crate) fn boundary(&self) -> &Regex {
        &self.boundary
    }

    /// Label pairs `(contained, container)` where one label's text appears
    /// inside another's, case-insensitively.
    ///
    /// The extraction contract assumes no label is a prefix of another; the
    /// production list violates that assumption, so the violation is computed
    /// and reported rather than silently relied upon.
    pub fn ambiguous_pairs(&self) -> Vec<(&str, &str)> {
        let lowered: Vec<String> = self.labels.iter().map(|l| l.to_lowercase()).collect();
        let mut pairs = Vec::new();
        for (i, inner) in lowered.iter().enumerate() {
            for (j, outer) in lowered.iter().enumerate() {
                if i != j && outer.contains(inner.as_str()) {
                    pairs.push((self.labels[i].as_str(), self.labels[j].as_str()));
                }
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_catalog_builds() {
        let catalog = FieldCatalog::new(DEFAULT_FIELD_LABELS).unwrap();
        assert_eq!(catalog.len(), 21);
        assert_eq!(catalog.labels()[0], "CARTEIRA DEMANDANTE");
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let labels: &[&str] = &[];
        assert!(matches!(
            FieldCatalog::new(labels),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let result = FieldCatalog::new(&["ESCOPO", "OBS", "ESCOPO"]);
        assert!(matches!(result, Err(CatalogError::DuplicateLabel(l)) if l == "ESCOPO"));
    }

    #[test]
    fn test_ambiguous_pairs_found_in_production_list() {
        let catalog = FieldCatalog::production();
        let pairs = catalog.ambiguous_pairs();

        // The known offenders: TIPO is embedded in every TIPO DE ... label,
        // OPERAÇÃO in TIPO DE OPERAÇÃO, and the pictograph variant contains
        // its plain twin.
        assert!(pairs.contains(&("TIPO DE PROJETO", "💡 TIPO DE PROJETO")));
        assert!(pairs.contains(&("TIPO", "TIPO DE PROJETO")));
        assert!(pairs.contains(&("OPERAÇÃO", "TIPO DE OPERAÇÃO")));
    }

    #[test]
    fn test_clean_catalog_has_no_ambiguous_pairs() {
        let catalog = FieldCatalog::new(&["ESCOPO", "OBS", "CLIENTE"]).unwrap();
        assert!(catalog.ambiguous_pairs().is_empty());
    }
}
