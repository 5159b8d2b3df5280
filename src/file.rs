//! The workbook facade tying decode and encode together
//!
//! A [`File`] owns up to two workbooks: a read-side one opened from disk or
//! bytes, and a write-side one built in memory. Decoding always reads from
//! the former, writing always targets the latter, and configuration set on
//! the facade flows into every cursor and stream it creates.

use std::any::Any;
use std::path::Path;

use indexmap::IndexMap;

use crate::cursor::Cursor;
use crate::error::{ExcelError, Result};
use crate::parser::ParserRegistry;
use crate::reader::ReadBook;
use crate::record::{AsRecord, Record};
use crate::stream::Stream;
use crate::writer::{WriteBook, DEFAULT_SHEET_NAME};

/// Upper bound on rows consumed by [`File::decode_all`] unless overridden.
pub const DEFAULT_MAX_DECODE_ALL_COUNT: usize = 100_000;

/// A spreadsheet being decoded, built, or both.
///
/// # Examples
///
/// ```no_run
/// use excelmap::{excel_record, File};
///
/// excel_record! {
///     #[derive(Debug, Default, Clone)]
///     pub struct Customer {
///         pub id: String => "id",
///         pub name: String => "name",
///         pub age: i64 => "age",
///     }
/// }
///
/// let mut file = File::open("customers.xlsx").unwrap();
/// let mut customers: Vec<Customer> = Vec::new();
/// file.decode_all(&mut customers).unwrap();
/// ```
pub struct File {
    source: Option<ReadBook>,
    output: WriteBook,
    sheet_name: Option<String>,
    headers_set: Vec<Vec<String>>,
    header_overrides: IndexMap<String, usize>,
    max_decode_all_count: usize,
    registry: ParserRegistry,
}

impl File {
    fn with_source(source: Option<ReadBook>) -> Self {
        File {
            source,
            output: WriteBook::new(),
            sheet_name: None,
            headers_set: Vec::new(),
            header_overrides: IndexMap::new(),
            max_decode_all_count: DEFAULT_MAX_DECODE_ALL_COUNT,
            registry: ParserRegistry::new(),
        }
    }

    /// Opens a workbook from disk for decoding.
    ///
    /// Supports XLSX, XLS, and ODS formats, auto-detected from the file
    /// extension.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::with_source(Some(ReadBook::open(path)?)))
    }

    /// Opens a workbook from an in-memory buffer for decoding.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Ok(Self::with_source(Some(ReadBook::from_bytes(bytes)?)))
    }

    /// Creates an empty file for writing, starting with one `Sheet1`.
    pub fn new() -> Self {
        Self::with_source(None)
    }

    /// Creates a file and writes `records` to its default sheet in one
    /// call. Save or export the returned file to persist it.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use excelmap::{excel_record, File};
    ///
    /// excel_record! {
    ///     #[derive(Debug, Default, Clone)]
    ///     pub struct Point {
    ///         pub x: i64 => "x",
    ///         pub y: i64 => "y",
    ///     }
    /// }
    ///
    /// let points = vec![Point { x: 1, y: 2 }, Point { x: 3, y: 4 }];
    /// let mut file = File::build(&points).unwrap();
    /// file.save("points.xlsx").unwrap();
    /// ```
    pub fn build<T: AsRecord>(records: &[T]) -> Result<Self> {
        let mut file = Self::new();
        file.write(records)?;
        Ok(file)
    }

    /// Pins the sheet used by the decode operations and
    /// [`sheet_headers`](Self::sheet_headers).
    pub fn set_sheet_name(&mut self, name: impl Into<String>) {
        self.sheet_name = Some(name.into());
    }

    /// The active sheet: the configured name if set, otherwise the first
    /// sheet of the workbook being read (or being written, for files
    /// created in memory).
    pub fn sheet_name(&self) -> Result<String> {
        if let Some(name) = &self.sheet_name {
            return Ok(name.clone());
        }
        let names = match &self.source {
            Some(source) => source.sheet_names(),
            None => self.output.sheet_names().to_vec(),
        };
        names.first().cloned().ok_or(ExcelError::NoSheetFound)
    }

    /// Supplies explicit header lines for streams, replacing tag-derived
    /// headers. Each inner vec is one row of labels.
    pub fn set_headers(&mut self, headers: Vec<Vec<String>>) {
        self.headers_set = headers;
    }

    /// The explicit header lines currently configured.
    pub fn headers_set(&self) -> &[Vec<String>] {
        &self.headers_set
    }

    /// Replaces the manual label-to-column overrides merged on top of the
    /// header row when decoding. Overrides win per key.
    pub fn set_header_index(&mut self, index: IndexMap<String, usize>) {
        self.header_overrides = index;
    }

    /// Caps how many rows [`decode_all`](Self::decode_all) will consume.
    pub fn set_max_decode_all_count(&mut self, max: usize) {
        self.max_decode_all_count = max;
    }

    /// Registers a parser for every field of value type `T`, inherited by
    /// cursors created afterwards.
    pub fn register_type_parser<T, F>(&mut self, parser: F)
    where
        T: Any,
        F: Fn(&str, usize, usize) -> Result<T> + Send + Sync + 'static,
    {
        self.registry.register_type_parser(parser);
    }

    /// Registers a parser for the field tagged `tag`, inherited by cursors
    /// created afterwards.
    pub fn register_tag_parser<T, F>(&mut self, tag: impl Into<String>, parser: F)
    where
        T: Any,
        F: Fn(&str, usize, usize) -> Result<T> + Send + Sync + 'static,
    {
        self.registry.register_tag_parser(tag, parser);
    }

    /// Reads the active sheet's header row as raw labels.
    pub fn sheet_headers(&mut self) -> Result<Vec<String>> {
        let sheet = self.sheet_name()?;
        let source = match self.source.as_mut() {
            Some(source) => source,
            None => return Err(ExcelError::HeaderNotFound { sheet }),
        };

        let mut rows = source.rows(&sheet)?;
        if !rows.advance() {
            return Err(ExcelError::HeaderNotFound { sheet });
        }
        Ok(rows.take_current().unwrap_or_default())
    }

    /// Builds a decode cursor over the active sheet, positioned on the
    /// first data row.
    ///
    /// The cursor inherits the facade's parser registrations and header
    /// overrides as they are at this moment; later changes do not reach it.
    pub fn cursor(&mut self) -> Result<Cursor> {
        let sheet = self.sheet_name()?;
        let source = match self.source.as_mut() {
            Some(source) => source,
            None => return Err(ExcelError::HeaderNotFound { sheet }),
        };

        let mut rows = source.rows(&sheet)?;
        if !rows.advance() {
            return Err(ExcelError::HeaderNotFound { sheet });
        }
        let labels = rows.take_current().unwrap_or_default();

        let mut header_index: IndexMap<String, usize> = IndexMap::new();
        for (column, label) in labels.into_iter().enumerate() {
            if label.is_empty() {
                continue;
            }
            // duplicate labels resolve to the rightmost column
            header_index.insert(label, column);
        }
        for (label, column) in &self.header_overrides {
            header_index.insert(label.clone(), *column);
        }

        let mut registry = ParserRegistry::with_defaults();
        registry.merge(&self.registry);

        Ok(Cursor::new(header_index, rows, registry))
    }

    /// Decodes the first data row of the active sheet.
    ///
    /// Every call starts from the top; hold a [`cursor`](Self::cursor) to
    /// decode successive rows.
    pub fn decode_one<R: Record>(&mut self) -> Result<Option<R>> {
        self.cursor()?.decode_one()
    }

    /// Decodes up to `limit` rows into `out`, clearing it first. See
    /// [`Cursor::decode_many`] for the failure semantics.
    pub fn decode_many<R: Record>(&mut self, out: &mut Vec<R>, limit: usize) -> Result<usize> {
        self.cursor()?.decode_many(out, limit)
    }

    /// Decodes every data row of the active sheet into `out`.
    ///
    /// Fails with [`ExcelError::RowCountOverLimit`] when the sheet holds
    /// more rows than the configured maximum; the decoded maximum stays in
    /// `out`.
    pub fn decode_all<R: Record>(&mut self, out: &mut Vec<R>) -> Result<usize> {
        let max = self.max_decode_all_count;
        let mut cursor = self.cursor()?;
        let count = cursor.decode_many(out, max)?;
        if count == max && cursor.next() {
            return Err(ExcelError::RowCountOverLimit { max });
        }
        Ok(count)
    }

    /// Opens a stream on the default sheet.
    ///
    /// Streams always target `Sheet1` unless created through
    /// [`stream_to`](Self::stream_to); the configured sheet name only
    /// affects the decode side.
    pub fn stream(&mut self) -> Result<Stream<'_>> {
        self.stream_to(DEFAULT_SHEET_NAME)
    }

    /// Opens a stream on `sheet_name`, creating the sheet when absent.
    pub fn stream_to(&mut self, sheet_name: &str) -> Result<Stream<'_>> {
        self.output.ensure_sheet(sheet_name)?;
        Ok(Stream::new(
            &mut self.output,
            sheet_name.to_string(),
            self.headers_set.clone(),
        ))
    }

    /// Writes `records` to the default sheet in one stream session.
    pub fn write<T: AsRecord>(&mut self, records: &[T]) -> Result<()> {
        self.write_to(DEFAULT_SHEET_NAME, records)
    }

    /// Writes `records` to `sheet_name` in one stream session. Writing a
    /// sheet again restarts at the first row and overwrites.
    pub fn write_to<T: AsRecord>(&mut self, sheet_name: &str, records: &[T]) -> Result<()> {
        let mut stream = self.stream_to(sheet_name)?;
        stream.write_many(records)?;
        stream.close()
    }

    /// Saves the written sheets to `path` as an XLSX workbook.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.output.save(path)
    }

    /// Serializes the written sheets to an in-memory XLSX buffer.
    pub fn export_buffer(&mut self) -> Result<Vec<u8>> {
        self.output.export_buffer()
    }
}

impl Default for File {
    fn default() -> Self {
        Self::new()
    }
}
