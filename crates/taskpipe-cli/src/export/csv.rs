//! CSV export.

use super::{header_columns, record_row, ExportError};
use std::path::Path;
use taskpipe_domain::NormalizedRecord;
use taskpipe_extractor::FieldCatalog;

/// Write the records as CSV to the given path.
pub fn write_csv(
    path: &Path,
    catalog: &FieldCatalog,
    records: &[NormalizedRecord],
) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(header_columns(catalog))?;
    for record in records {
        wtr.write_record(record_row(record, catalog))?;
    }

    wtr.flush()?;
    Ok(())
}
