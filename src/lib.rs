//! # excelmap
//!
//! A struct-tag-driven mapping layer between spreadsheet rows and typed
//! Rust records.
//!
//! ## Features
//!
//! - **Tag-Driven Mapping**: declare a struct once with [`excel_record!`];
//!   fields bind to header labels, not column positions
//! - **Typed Decoding**: rows become records through a pluggable
//!   per-type/per-tag parser registry with clear precedence rules
//! - **Streaming Write**: headers are derived from the first record and
//!   batches keep appending to the same sheet
//! - **Field Observability**: an optional per-field callback sees every
//!   raw cell, parsed value, and failure as rows decode
//! - **Header Control**: explicit header lines and manual label-to-column
//!   overrides for sheets that do not match their records
//! - **Multiple Formats**: reads XLSX, XLS, and ODS; writes XLSX
//! - **Context-Rich Errors**: sheet names, row and column positions, and
//!   the offending raw text travel inside every failure
//!
//! ## Quick Start
//!
//! ### Decoding a sheet into records
//!
//! ```rust,no_run
//! use excelmap::{excel_record, File};
//!
//! excel_record! {
//!     #[derive(Debug, Default, Clone)]
//!     pub struct Customer {
//!         pub id: String => "id",
//!         pub name: String => "name",
//!         pub age: i64 => "age",
//!         pub rank: f64 => "rank",
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut file = File::open("customers.xlsx")?;
//!
//! let mut customers: Vec<Customer> = Vec::new();
//! file.decode_all(&mut customers)?;
//!
//! for customer in &customers {
//!     println!("{} is {}", customer.name, customer.age);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Encoding records into a workbook
//!
//! ```rust,no_run
//! use excelmap::{excel_record, File};
//!
//! excel_record! {
//!     #[derive(Debug, Default, Clone)]
//!     pub struct Point {
//!         pub x: i64 => "x",
//!         pub y: i64 => "y",
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let points = vec![Point { x: 1, y: 2 }, Point { x: 3, y: 4 }];
//!
//! let mut file = File::new();
//! file.write(&points)?;
//! file.save("points.xlsx")?;
//! # Ok(())
//! # }
//! ```

pub mod cursor;
pub mod error;
pub mod file;
pub mod parser;
mod reader;
pub mod record;
pub mod stream;
pub mod types;
mod writer;

pub use cursor::{Cursor, FieldEvent, FieldObserver};
pub use error::{ExcelError, Result};
pub use file::{File, DEFAULT_MAX_DECODE_ALL_COUNT};
pub use parser::{FieldParser, ParserRegistry};
pub use record::{
    full_type_name, tag_index_of, tag_to_cells, tags_of, AsRecord, FieldSpec, Record,
};
pub use stream::Stream;
pub use types::{CellValue, ToCell};

pub use indexmap::IndexMap;
