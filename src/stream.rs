//! Batched encoding of records into a sheet
//!
//! A [`Stream`] appends records to one sheet across any number of batches.
//! The header row is derived from the record type and written lazily, just
//! before the first record, so a stream that never receives data leaves the
//! sheet untouched.

use crate::error::{ExcelError, Result};
use crate::record::{full_type_name, tag_to_cells, tags_of, AsRecord};
use crate::types::CellValue;
use crate::writer::WriteBook;

/// Row-appending encoder bound to one sheet of a [`File`](crate::File).
///
/// Row numbering continues across batches, so interleaved calls to
/// [`write_many`](Self::write_many) build one contiguous table.
pub struct Stream<'a> {
    book: &'a mut WriteBook,
    sheet_name: String,
    headers_set: Vec<Vec<String>>,
    header_tags: Vec<&'static str>,
    headers_written: bool,
    row_now: usize,
}

impl<'a> Stream<'a> {
    pub(crate) fn new(
        book: &'a mut WriteBook,
        sheet_name: String,
        headers_set: Vec<Vec<String>>,
    ) -> Self {
        Stream {
            book,
            sheet_name,
            headers_set,
            header_tags: Vec::new(),
            headers_written: false,
            row_now: 0,
        }
    }

    /// Appends one row per record, writing the header row first when this
    /// is the stream's first data.
    ///
    /// Records reachable through references, boxes, or `Option` are
    /// unwrapped; a `None` or an unmappable value still occupies a row,
    /// left entirely empty.
    pub fn write_many<T: AsRecord>(&mut self, records: &[T]) -> Result<()> {
        for record in records {
            if !self.headers_written {
                self.init_header_tags::<T>()?;
                self.write_headers()?;
            }

            let row = self.build_row(record);
            self.book
                .write_row(&self.sheet_name, self.row_now as u32, &row)?;
            self.row_now += 1;
        }

        Ok(())
    }

    /// Total rows emitted so far, header rows included.
    pub fn rows_written(&self) -> usize {
        self.row_now
    }

    /// Finishes the stream. The sheet's content stays in the owning
    /// [`File`](crate::File) until it is saved or exported.
    pub fn close(self) -> Result<()> {
        Ok(())
    }

    fn init_header_tags<T: AsRecord>(&mut self) -> Result<()> {
        if !self.header_tags.is_empty() {
            return Ok(());
        }

        let tags = tags_of::<T>();
        if tags.is_empty() {
            return Err(ExcelError::TagNotFound {
                type_name: full_type_name::<T>(),
            });
        }
        self.header_tags = (*tags).clone();
        Ok(())
    }

    fn write_headers(&mut self) -> Result<()> {
        if self.headers_set.is_empty() {
            let cells: Vec<CellValue> = self
                .header_tags
                .iter()
                .map(|tag| CellValue::String(tag.to_string()))
                .collect();
            self.book.write_row(&self.sheet_name, 0, &cells)?;
            self.row_now = 1;
        } else {
            for (line, labels) in self.headers_set.iter().enumerate() {
                let cells: Vec<CellValue> = labels
                    .iter()
                    .map(|label| CellValue::String(label.trim().to_string()))
                    .collect();
                self.book.write_row(&self.sheet_name, line as u32, &cells)?;
            }
            self.row_now = self.headers_set.len();
        }

        self.headers_written = true;
        Ok(())
    }

    fn build_row<T: AsRecord>(&self, record: &T) -> Vec<CellValue> {
        match record.as_record() {
            Some(base) => {
                let cells = tag_to_cells(base);
                self.header_tags
                    .iter()
                    .map(|tag| cells.get(tag).cloned().unwrap_or(CellValue::Empty))
                    .collect()
            }
            None => vec![CellValue::Empty; self.header_tags.len()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel_record;
    use crate::writer::DEFAULT_SHEET_NAME;

    excel_record! {
        #[derive(Debug, Default, Clone, PartialEq)]
        struct Point {
            x: i64 => "x",
            y: i64 => "y",
        }
    }

    excel_record! {
        #[derive(Debug, Default, Clone)]
        struct Unmapped {
            hidden: i64,
        }
    }

    fn points(n: i64) -> Vec<Point> {
        (0..n).map(|i| Point { x: i, y: i * 2 }).collect()
    }

    #[test]
    fn test_row_numbering_continues_across_batches() {
        let mut book = WriteBook::new();
        let mut stream = Stream::new(&mut book, DEFAULT_SHEET_NAME.to_string(), Vec::new());

        stream.write_many(&points(3)).unwrap();
        stream.write_many(&points(3)).unwrap();

        // one derived header row plus six data rows
        assert_eq!(stream.rows_written(), 7);
        stream.close().unwrap();
    }

    #[test]
    fn test_empty_batches_write_nothing() {
        let mut book = WriteBook::new();
        let mut stream = Stream::new(&mut book, DEFAULT_SHEET_NAME.to_string(), Vec::new());

        stream.write_many(&Vec::<Point>::new()).unwrap();
        assert_eq!(stream.rows_written(), 0);
    }

    #[test]
    fn test_explicit_header_lines_take_priority() {
        let mut book = WriteBook::new();
        let headers = vec![
            vec!["  x  ".to_string(), "y".to_string()],
            vec!["left".to_string(), "right".to_string()],
        ];
        let mut stream = Stream::new(&mut book, DEFAULT_SHEET_NAME.to_string(), headers);

        stream.write_many(&points(1)).unwrap();

        // two header lines plus one data row
        assert_eq!(stream.rows_written(), 3);
    }

    #[test]
    fn test_type_without_tags_is_rejected() {
        let mut book = WriteBook::new();
        let mut stream = Stream::new(&mut book, DEFAULT_SHEET_NAME.to_string(), Vec::new());

        let err = stream
            .write_many(&[Unmapped { hidden: 1 }])
            .unwrap_err();
        assert!(matches!(err, ExcelError::TagNotFound { .. }));
    }
}
