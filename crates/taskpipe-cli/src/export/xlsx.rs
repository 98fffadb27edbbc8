//! XLSX export with a bold, frozen header row.

use super::{header_columns, record_row, ExportError};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use taskpipe_domain::NormalizedRecord;
use taskpipe_extractor::FieldCatalog;

/// Write the records as an Excel workbook to the given path.
pub fn write_xlsx(
    path: &Path,
    catalog: &FieldCatalog,
    records: &[NormalizedRecord],
) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let header_format = Format::new().set_bold();
    for (col, header) in header_columns(catalog).iter().enumerate() {
        worksheet.write_with_format(0, col as u16, header.as_str(), &header_format)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (row_index, record) in records.iter().enumerate() {
        let row = (row_index + 1) as u32;
        for (col, value) in record_row(record, catalog).iter().enumerate() {
            worksheet.write(row, col as u16, value.as_str())?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::tests::{catalog, record};
    use super::*;

    #[test]
    fn test_xlsx_file_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.xlsx");

        write_xlsx(&path, &catalog(), &[record()]).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }

    #[test]
    fn test_empty_batch_still_produces_a_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");

        write_xlsx(&path, &catalog(), &[]).unwrap();
        assert!(path.exists());
    }
}
