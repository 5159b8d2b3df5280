//! Cell value model shared by the decode and encode paths

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

/// A single cell value.
///
/// Read-side rows are surfaced as `CellValue`s converted from the workbook's
/// native cells; write-side rows are built from record fields through
/// [`ToCell`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellValue {
    /// Empty cell
    Empty,
    /// String value
    String(String),
    /// Signed integer value
    Int(i64),
    /// Unsigned integer value
    Uint(u64),
    /// Float value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// DateTime value (Excel serial date number)
    DateTime(f64),
}

impl CellValue {
    /// Convert the cell value to its text form.
    ///
    /// This is the text the decode parsers receive: floats drop a trailing
    /// `.0`, booleans render as `true`/`false`, empty cells as `""`.
    pub fn as_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::String(s) => s.clone(),
            CellValue::Int(i) => itoa::Buffer::new().format(*i).to_string(),
            CellValue::Uint(u) => itoa::Buffer::new().format(*u).to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(d) => d.to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

/// Conversion from a record field into a cell.
///
/// Implemented for the primitive types the default parsers cover, for
/// `chrono` dates (rendered as ISO text so they survive a round trip), and
/// for `Option<T>` (`None` becomes an empty cell). Implement it for your own
/// field types to make them encodable.
pub trait ToCell {
    /// The field's current value as a cell.
    fn to_cell(&self) -> CellValue;
}

macro_rules! int_to_cell {
    ($($t:ty)*) => {
        $(
            impl ToCell for $t {
                fn to_cell(&self) -> CellValue {
                    CellValue::Int(*self as i64)
                }
            }
        )*
    };
}

macro_rules! uint_to_cell {
    ($($t:ty)*) => {
        $(
            impl ToCell for $t {
                fn to_cell(&self) -> CellValue {
                    CellValue::Uint(*self as u64)
                }
            }
        )*
    };
}

int_to_cell!(i8 i16 i32 i64 isize);
uint_to_cell!(u8 u16 u32 u64 usize);

impl ToCell for f32 {
    fn to_cell(&self) -> CellValue {
        CellValue::Float(f64::from(*self))
    }
}

impl ToCell for f64 {
    fn to_cell(&self) -> CellValue {
        CellValue::Float(*self)
    }
}

impl ToCell for bool {
    fn to_cell(&self) -> CellValue {
        CellValue::Bool(*self)
    }
}

impl ToCell for String {
    fn to_cell(&self) -> CellValue {
        CellValue::String(self.clone())
    }
}

impl ToCell for &str {
    fn to_cell(&self) -> CellValue {
        CellValue::String((*self).to_string())
    }
}

impl ToCell for NaiveDate {
    fn to_cell(&self) -> CellValue {
        CellValue::String(self.format("%Y-%m-%d").to_string())
    }
}

impl ToCell for NaiveDateTime {
    fn to_cell(&self) -> CellValue {
        CellValue::String(self.format("%Y-%m-%d %H:%M:%S").to_string())
    }
}

impl<T: ToCell> ToCell for Option<T> {
    fn to_cell(&self) -> CellValue {
        match self {
            Some(value) => value.to_cell(),
            None => CellValue::Empty,
        }
    }
}

impl ToCell for CellValue {
    fn to_cell(&self) -> CellValue {
        self.clone()
    }
}
