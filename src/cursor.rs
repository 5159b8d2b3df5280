//! Row-by-row decoding of a sheet into records
//!
//! A [`Cursor`] walks the data rows of one sheet, below its header row, and
//! materializes one record per row. Decoding a row stops at its first bad
//! field, so a batch call never returns a half-parsed record.

use std::any::Any;

use indexmap::IndexMap;

use crate::error::{ExcelError, Result};
use crate::parser::ParserRegistry;
use crate::reader::SheetRows;
use crate::record::{tag_index_of, tags_of, Record};

/// Snapshot of one field being decoded, handed to the cursor's observer.
///
/// Exactly one event fires per mapped field per row: with `value` set on
/// success, with `error` set on failure, and with `column` unset when the
/// field's tag has no matching header label.
pub struct FieldEvent<'a> {
    /// The field's mapping tag.
    pub tag: &'a str,
    /// Raw cell text the parser received. Empty when the tag is unmatched.
    pub raw: &'a str,
    /// The parsed value, before it is moved into the record.
    pub value: Option<&'a dyn Any>,
    /// The resolution or parse failure, when one occurred.
    pub error: Option<&'a ExcelError>,
    /// Zero-based sheet column the cell came from. `None` when the tag is
    /// not present in the header row.
    pub column: Option<usize>,
    /// One-based index of the data row, not counting the header.
    pub row: usize,
}

/// Callback invoked once per mapped field per decoded row.
pub type FieldObserver = Box<dyn FnMut(&FieldEvent<'_>)>;

/// Streaming decoder over the data rows of one sheet.
///
/// Created through [`File::cursor`](crate::File::cursor), already positioned
/// past the header row. The cursor owns its own parser registry, seeded from
/// the file's, so parsers registered here affect this cursor alone.
pub struct Cursor {
    header_index: IndexMap<String, usize>,
    rows: SheetRows,
    registry: ParserRegistry,
    row_now: usize,
    observer: Option<FieldObserver>,
}

impl Cursor {
    pub(crate) fn new(
        header_index: IndexMap<String, usize>,
        rows: SheetRows,
        registry: ParserRegistry,
    ) -> Self {
        Cursor {
            header_index,
            rows,
            registry,
            row_now: 0,
            observer: None,
        }
    }

    /// Installs the observer called for every handled field. Replaces any
    /// previous observer.
    pub fn on_field_handled<F>(&mut self, observer: F)
    where
        F: FnMut(&FieldEvent<'_>) + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    /// Registers a parser for every field of value type `T`, on this cursor
    /// only.
    pub fn register_type_parser<T, F>(&mut self, parser: F)
    where
        T: Any,
        F: Fn(&str, usize, usize) -> Result<T> + Send + Sync + 'static,
    {
        self.registry.register_type_parser(parser);
    }

    /// Registers a parser for the field tagged `tag`, on this cursor only.
    pub fn register_tag_parser<T, F>(&mut self, tag: impl Into<String>, parser: F)
    where
        T: Any,
        F: Fn(&str, usize, usize) -> Result<T> + Send + Sync + 'static,
    {
        self.registry.register_tag_parser(tag, parser);
    }

    /// Advances to the next data row. Returns false once the sheet is
    /// exhausted.
    pub fn next(&mut self) -> bool {
        self.row_now += 1;
        self.rows.advance()
    }

    /// One-based index of the data row the cursor currently stands on.
    pub fn row_now(&self) -> usize {
        self.row_now
    }

    /// Decodes the next row into a record. Returns `Ok(None)` once the
    /// sheet is exhausted.
    pub fn decode_one<R: Record>(&mut self) -> Result<Option<R>> {
        if !self.next() {
            return Ok(None);
        }
        Ok(Some(self.build_record()?))
    }

    /// Decodes up to `limit` rows into `out`, clearing it first, and
    /// returns how many records were appended.
    ///
    /// Stops early on the first row that fails to decode; records decoded
    /// before the failure stay in `out`.
    pub fn decode_many<R: Record>(&mut self, out: &mut Vec<R>, limit: usize) -> Result<usize> {
        out.clear();
        let mut count = 0;
        while count < limit && self.next() {
            out.push(self.build_record()?);
            count += 1;
        }
        Ok(count)
    }

    fn build_record<R: Record>(&mut self) -> Result<R> {
        let cells = self.rows.take_current().unwrap_or_default();
        let tags = tags_of::<R>();
        let tag_index = tag_index_of::<R>();
        let fields = R::fields();
        let row = self.row_now;

        let mut record = R::default();

        for &tag in tags.iter() {
            let Some(column) = self.header_index.get(tag).copied() else {
                // tag absent from the header row, leave the field default
                self.emit(&FieldEvent {
                    tag,
                    raw: "",
                    value: None,
                    error: None,
                    column: None,
                    row,
                });
                continue;
            };

            // short rows read as empty cells
            let raw = cells.get(column).map(String::as_str).unwrap_or("");
            let spec = &fields[tag_index[tag]];

            let parser = match self.registry.resolve(tag, (spec.type_id)(), (spec.type_name)()) {
                Ok(parser) => parser,
                Err(err) => {
                    self.emit(&FieldEvent {
                        tag,
                        raw,
                        value: None,
                        error: Some(&err),
                        column: Some(column),
                        row,
                    });
                    return Err(err);
                }
            };

            let value = match parser(raw, column, row) {
                Ok(value) => value,
                Err(err) => {
                    self.emit(&FieldEvent {
                        tag,
                        raw,
                        value: None,
                        error: Some(&err),
                        column: Some(column),
                        row,
                    });
                    return Err(err);
                }
            };

            self.emit(&FieldEvent {
                tag,
                raw,
                value: Some(value.as_ref()),
                error: None,
                column: Some(column),
                row,
            });

            if !(spec.set)(&mut record, value) {
                return Err(ExcelError::FieldType {
                    tag: tag.to_string(),
                    expected: (spec.type_name)(),
                });
            }
        }

        Ok(record)
    }

    fn emit(&mut self, event: &FieldEvent<'_>) {
        if let Some(observer) = self.observer.as_mut() {
            observer(event);
        }
    }
}
