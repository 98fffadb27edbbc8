//! Export of normalized records to spreadsheet files.

pub mod csv;
pub mod xlsx;

use taskpipe_domain::NormalizedRecord;
use taskpipe_extractor::FieldCatalog;
use thiserror::Error;

pub use self::csv::write_csv;
pub use self::xlsx::write_xlsx;

/// Fixed record columns, in dataset order; catalog labels follow these.
const RECORD_COLUMNS: &[&str] = &[
    "Projeto",
    "ID",
    "Status",
    "Name",
    "Priority",
    "Líder",
    "Email líder",
    "date_created",
    "date_updated",
    "current_status",
    "time_in_current_status",
];

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV writing failed
    #[error("CSV export error: {0}")]
    Csv(#[from] ::csv::Error),

    /// XLSX writing failed
    #[error("XLSX export error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Filesystem error
    #[error("Export I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Column headers: fixed record columns followed by catalog labels.
pub fn header_columns(catalog: &FieldCatalog) -> Vec<String> {
    let mut headers: Vec<String> = RECORD_COLUMNS.iter().map(|c| c.to_string()).collect();
    headers.extend(catalog.labels().iter().cloned());
    headers
}

/// One record rendered as strings, in [`header_columns`] order.
pub fn record_row(record: &NormalizedRecord, catalog: &FieldCatalog) -> Vec<String> {
    let mut row = vec![
        record.seq.to_string(),
        record.id.clone(),
        record.status.clone(),
        record.name.clone(),
        record.priority.clone().unwrap_or_default(),
        record.leader.clone().unwrap_or_default(),
        record.leader_email.clone().unwrap_or_default(),
        record.date_created.clone(),
        record.date_updated.clone(),
        record.current_status.clone().unwrap_or_default(),
        record.time_in_current_status.clone().unwrap_or_default(),
    ];
    row.extend(
        catalog
            .labels()
            .iter()
            .map(|label| record.fields.get(label).cloned().unwrap_or_default()),
    );
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    pub(crate) fn catalog() -> FieldCatalog {
        FieldCatalog::new(&["ESCOPO", "E-MAIL"]).unwrap()
    }

    pub(crate) fn record() -> NormalizedRecord {
        let mut fields = BTreeMap::new();
        fields.insert("ESCOPO".to_string(), "automatizar".to_string());
        fields.insert("E-MAIL".to_string(), "x@y.com".to_string());

        NormalizedRecord {
            seq: 1,
            id: "t1".to_string(),
            status: "em andamento".to_string(),
            name: "Projeto X".to_string(),
            priority: Some("high".to_string()),
            leader: Some("maria".to_string()),
            leader_email: None,
            date_created: "01-01-2024 00:00:00".to_string(),
            date_updated: "02-01-2024 00:00:00".to_string(),
            current_status: None,
            time_in_current_status: None,
            fields,
        }
    }

    #[test]
    fn test_headers_are_fixed_columns_then_labels() {
        let headers = header_columns(&catalog());
        assert_eq!(headers.len(), RECORD_COLUMNS.len() + 2);
        assert_eq!(headers[0], "Projeto");
        assert_eq!(headers[headers.len() - 2], "ESCOPO");
        assert_eq!(headers[headers.len() - 1], "E-MAIL");
    }

    #[test]
    fn test_row_aligns_with_headers() {
        let headers = header_columns(&catalog());
        let row = record_row(&record(), &catalog());
        assert_eq!(row.len(), headers.len());
        assert_eq!(row[0], "1");
        assert_eq!(row[1], "t1");
        // Absent optionals export as empty cells
        assert_eq!(row[6], "");
        assert_eq!(row[row.len() - 2], "automatizar");
    }
}
