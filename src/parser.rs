//! Cell parsers: turning raw cell text into typed field values
//!
//! Parsers are resolved per field, tag first and value type second. The
//! registry ships defaults for the primitive types and accepts custom
//! parsers for anything else.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{ExcelError, Result};

/// A parser for one cell. Receives the raw text plus the zero-based column
/// and one-based row it came from, for error reporting.
pub type FieldParser = Arc<dyn Fn(&str, usize, usize) -> Result<Box<dyn Any>> + Send + Sync>;

/// Parser lookup table keyed by field tag and by value type.
///
/// Tag parsers win over type parsers, so a single column can be parsed
/// differently from every other column of the same type.
#[derive(Clone, Default)]
pub struct ParserRegistry {
    type_parsers: HashMap<TypeId, FieldParser>,
    tag_parsers: HashMap<String, FieldParser>,
}

impl ParserRegistry {
    /// Creates an empty registry with no parsers at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry preloaded with parsers for the primitive types:
    /// the signed and unsigned integers, both floats, `String` and `bool`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_type_parser(|raw: &str, _, _| Ok(raw.to_string()));
        registry.register_type_parser(parse_number::<i8>);
        registry.register_type_parser(parse_number::<i16>);
        registry.register_type_parser(parse_number::<i32>);
        registry.register_type_parser(parse_number::<i64>);
        registry.register_type_parser(parse_number::<isize>);
        registry.register_type_parser(parse_number::<u8>);
        registry.register_type_parser(parse_number::<u16>);
        registry.register_type_parser(parse_number::<u32>);
        registry.register_type_parser(parse_number::<u64>);
        registry.register_type_parser(parse_number::<f32>);
        registry.register_type_parser(parse_number::<f64>);
        registry.register_type_parser(parse_bool);
        registry
    }

    /// Registers a parser for every field whose value type is `T`.
    /// Replaces any previous parser for the same type.
    pub fn register_type_parser<T, F>(&mut self, parser: F)
    where
        T: Any,
        F: Fn(&str, usize, usize) -> Result<T> + Send + Sync + 'static,
    {
        let parser: FieldParser = Arc::new(move |raw, column, row| {
            parser(raw, column, row).map(|value| Box::new(value) as Box<dyn Any>)
        });
        self.type_parsers.insert(TypeId::of::<T>(), parser);
    }

    /// Registers a parser for the single field tagged `tag`, taking
    /// precedence over any type parser.
    pub fn register_tag_parser<T, F>(&mut self, tag: impl Into<String>, parser: F)
    where
        T: Any,
        F: Fn(&str, usize, usize) -> Result<T> + Send + Sync + 'static,
    {
        let parser: FieldParser = Arc::new(move |raw, column, row| {
            parser(raw, column, row).map(|value| Box::new(value) as Box<dyn Any>)
        });
        self.tag_parsers.insert(tag.into(), parser);
    }

    /// Copies every parser from `other` into this registry, overriding
    /// entries that collide.
    pub fn merge(&mut self, other: &ParserRegistry) {
        for (type_id, parser) in &other.type_parsers {
            self.type_parsers.insert(*type_id, Arc::clone(parser));
        }
        for (tag, parser) in &other.tag_parsers {
            self.tag_parsers.insert(tag.clone(), Arc::clone(parser));
        }
    }

    /// Looks up the parser registered for `tag`.
    pub fn tag_parser(&self, tag: &str) -> Result<FieldParser> {
        self.tag_parsers
            .get(tag)
            .cloned()
            .ok_or_else(|| ExcelError::TagParserNotFound {
                tag: tag.to_string(),
            })
    }

    /// Looks up the parser registered for the value type `type_id`.
    /// `type_name` is only used in the error message.
    pub fn type_parser(&self, type_id: TypeId, type_name: &'static str) -> Result<FieldParser> {
        self.type_parsers
            .get(&type_id)
            .cloned()
            .ok_or(ExcelError::TypeParserNotFound { type_name })
    }

    /// Resolves the parser for a field: its tag parser when one exists,
    /// otherwise the parser for its value type.
    pub fn resolve(
        &self,
        tag: &str,
        type_id: TypeId,
        type_name: &'static str,
    ) -> Result<FieldParser> {
        if let Ok(parser) = self.tag_parser(tag) {
            return Ok(parser);
        }
        self.type_parser(type_id, type_name)
    }
}

fn parse_number<T>(raw: &str, column: usize, row: usize) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse::<T>().map_err(|err| ExcelError::Parse {
        raw: raw.to_string(),
        column,
        row,
        message: err.to_string(),
    })
}

/// Accepts the literal boolean spellings `1`, `t`, `T`, `TRUE`, `true`,
/// `True` and their falsy counterparts. Anything else is a parse error.
fn parse_bool(raw: &str, column: usize, row: usize) -> Result<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ExcelError::Parse {
            raw: raw.to_string(),
            column,
            row,
            message: "invalid boolean literal".to_string(),
        }),
    }
}
