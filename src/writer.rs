//! Workbook writing on top of rust_xlsxwriter

use crate::error::Result;
use crate::types::CellValue;
use rust_xlsxwriter::Workbook;
use std::path::Path;

/// Name of the sheet every new workbook starts with.
pub(crate) const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// An in-memory workbook being built, saved on demand.
///
/// Always carries at least one sheet so that a freshly created workbook can
/// be written to without setup.
pub(crate) struct WriteBook {
    workbook: Workbook,
    sheet_names: Vec<String>,
}

impl WriteBook {
    pub(crate) fn new() -> Self {
        let mut workbook = Workbook::new();
        // the first worksheet is auto-named "Sheet1"
        workbook.add_worksheet();

        WriteBook {
            workbook,
            sheet_names: vec![DEFAULT_SHEET_NAME.to_string()],
        }
    }

    pub(crate) fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    pub(crate) fn has_sheet(&self, name: &str) -> bool {
        self.sheet_names.iter().any(|n| n == name)
    }

    /// Adds the sheet when it does not exist yet.
    pub(crate) fn ensure_sheet(&mut self, name: &str) -> Result<()> {
        if self.has_sheet(name) {
            return Ok(());
        }
        self.workbook.add_worksheet().set_name(name)?;
        self.sheet_names.push(name.to_string());
        Ok(())
    }

    /// Writes one row of cells at `row` on `sheet_name`, preserving cell
    /// types. Empty cells are skipped rather than written as blanks.
    pub(crate) fn write_row(
        &mut self,
        sheet_name: &str,
        row: u32,
        cells: &[CellValue],
    ) -> Result<()> {
        let worksheet = self.workbook.worksheet_from_name(sheet_name)?;

        for (col, cell) in cells.iter().enumerate() {
            let col = col as u16;
            match cell {
                CellValue::Empty => {}
                CellValue::String(s) => {
                    worksheet.write_string(row, col, s.as_str())?;
                }
                CellValue::Int(i) => {
                    worksheet.write_number(row, col, *i as f64)?;
                }
                CellValue::Uint(u) => {
                    worksheet.write_number(row, col, *u as f64)?;
                }
                CellValue::Float(f) => {
                    worksheet.write_number(row, col, *f)?;
                }
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row, col, *b)?;
                }
                CellValue::DateTime(d) => {
                    worksheet.write_number(row, col, *d)?;
                }
            }
        }

        Ok(())
    }

    pub(crate) fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.workbook.save(path)?;
        Ok(())
    }

    pub(crate) fn export_buffer(&mut self) -> Result<Vec<u8>> {
        Ok(self.workbook.save_to_buffer()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::Builder;

    #[test]
    fn test_new_workbook_has_default_sheet() {
        let book = WriteBook::new();
        assert!(book.has_sheet(DEFAULT_SHEET_NAME));
        assert_eq!(book.sheet_names(), &[DEFAULT_SHEET_NAME.to_string()]);
    }

    #[test]
    fn test_ensure_sheet_is_idempotent() {
        let mut book = WriteBook::new();
        book.ensure_sheet("People").unwrap();
        book.ensure_sheet("People").unwrap();
        assert_eq!(book.sheet_names().len(), 2);
    }

    #[test]
    fn test_write_and_save() {
        let temp = Builder::new().suffix(".xlsx").tempfile().unwrap();
        let mut book = WriteBook::new();

        book.write_row(
            DEFAULT_SHEET_NAME,
            0,
            &[
                CellValue::String("id".to_string()),
                CellValue::Int(42),
                CellValue::Float(1.1),
                CellValue::Bool(true),
                CellValue::Empty,
            ],
        )
        .unwrap();

        book.save(temp.path()).unwrap();

        let buffer = book.export_buffer().unwrap();
        assert!(!buffer.is_empty());
    }
}
