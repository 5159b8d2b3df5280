//! Workbook reading on top of calamine

use crate::error::{ExcelError, Result};
use crate::types::CellValue;
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use std::io::{BufReader, Cursor};
use std::path::Path;

/// An open workbook, backed by a file on disk or by an in-memory buffer.
///
/// Supports XLSX, XLS, and ODS formats. Format is auto-detected.
pub(crate) enum ReadBook {
    Disk(Sheets<BufReader<std::fs::File>>),
    Memory(Sheets<Cursor<Vec<u8>>>),
}

impl ReadBook {
    pub(crate) fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let workbook =
            open_workbook_auto(path).map_err(|e| ExcelError::Read(e.to_string()))?;
        Ok(ReadBook::Disk(workbook))
    }

    pub(crate) fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|e| ExcelError::Read(e.to_string()))?;
        Ok(ReadBook::Memory(workbook))
    }

    pub(crate) fn sheet_names(&self) -> Vec<String> {
        match self {
            ReadBook::Disk(workbook) => workbook.sheet_names(),
            ReadBook::Memory(workbook) => workbook.sheet_names(),
        }
    }

    /// Loads the used range of `sheet_name` and positions a row walker on
    /// its first row.
    pub(crate) fn rows(&mut self, sheet_name: &str) -> Result<SheetRows> {
        let range = match self {
            ReadBook::Disk(workbook) => workbook.worksheet_range(sheet_name),
            ReadBook::Memory(workbook) => workbook.worksheet_range(sheet_name),
        };

        let range = range.map_err(|e| {
            let error_str = e.to_string();
            if error_str.contains("not found") {
                let available = self.sheet_names().join(", ");
                ExcelError::SheetNotFound {
                    sheet: sheet_name.to_string(),
                    available,
                }
            } else {
                ExcelError::Read(error_str)
            }
        })?;

        Ok(SheetRows::new(range))
    }
}

/// Forward-only walker over the used range of one sheet.
///
/// Cell coordinates are relative to the used range, so a sheet whose data
/// starts at C3 still yields its first cell at column 0.
pub(crate) struct SheetRows {
    range: Range<Data>,
    start_row: u32,
    start_col: u32,
    height: usize,
    width: usize,
    next_row: usize,
    current: Option<Vec<String>>,
}

impl SheetRows {
    pub(crate) fn new(range: Range<Data>) -> Self {
        let (start_row, start_col) = range.start().unwrap_or((0, 0));
        let (height, width) = range.get_size();

        SheetRows {
            range,
            start_row,
            start_col,
            height,
            width,
            next_row: 0,
            current: None,
        }
    }

    /// Moves to the next row, stringifying its cells. Returns false once
    /// the used range is exhausted.
    pub(crate) fn advance(&mut self) -> bool {
        if self.next_row >= self.height {
            self.current = None;
            return false;
        }

        let row_idx = self.start_row + self.next_row as u32;
        let mut cells = Vec::with_capacity(self.width);
        for col in 0..self.width {
            let cell = self
                .range
                .get_value((row_idx, self.start_col + col as u32))
                .map(data_to_cell)
                .unwrap_or(CellValue::Empty);
            cells.push(cell.as_string());
        }

        self.next_row += 1;
        self.current = Some(cells);
        true
    }

    /// Takes the row produced by the last [`advance`](Self::advance).
    pub(crate) fn take_current(&mut self) -> Option<Vec<String>> {
        self.current.take()
    }
}

/// Convert calamine Data to our CellValue
fn data_to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Float(f) => CellValue::Float(*f),
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(d) => CellValue::DateTime(d.as_f64()),
        Data::Error(e) => CellValue::String(format!("{:?}", e)),
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
    }
}
