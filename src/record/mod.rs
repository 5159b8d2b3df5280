//! Record descriptors: the static field table behind every mappable struct
//!
//! A mappable struct carries one [`FieldSpec`] per field, in declaration
//! order. The table is built at compile time by [`excel_record!`], so the
//! decode and encode paths never introspect types per row; they walk fn
//! pointers.

pub mod index;
pub mod reflect;

pub use index::{tag_index_of, tag_to_cells, tags_of};
pub use reflect::{full_type_name, AsRecord};

use std::any::{Any, TypeId};

use crate::types::CellValue;

/// Tag namespace used in cache keys.
pub(crate) const TAG_NAMESPACE: &str = "excel";

/// Descriptor for one struct field.
///
/// Fields with an empty [`tag`](FieldSpec::tag) exist in the table (their
/// position is counted) but are invisible to decode and encode.
pub struct FieldSpec<R> {
    /// Mapping tag; empty means the field is excluded.
    pub tag: &'static str,
    /// Name of the field's value type.
    pub type_name: fn() -> &'static str,
    /// `TypeId` of the field's value type.
    pub type_id: fn() -> TypeId,
    /// Moves a parsed value into the field. Returns false when the value's
    /// runtime type does not match the field.
    pub set: fn(&mut R, Box<dyn Any>) -> bool,
    /// Reads the field's current value as a cell.
    pub get: fn(&R) -> CellValue,
}

/// A struct that maps to worksheet rows.
///
/// Normally implemented through [`excel_record!`]; a manual implementation
/// additionally needs an [`AsRecord`] impl with `Target = Self`.
pub trait Record: AsRecord<Target = Self> + Default + Sized + 'static {
    /// Field descriptors in declaration order, one per struct field.
    fn fields() -> &'static [FieldSpec<Self>];
}

/// Declares a record struct and its field-to-column mapping.
///
/// Each field optionally maps to a header label with `=> "label"`; a field
/// without a label keeps its place in the struct but is invisible to both
/// decode and encode. The struct itself must derive (or implement)
/// `Default`.
///
/// # Examples
///
/// ```
/// use excelmap::excel_record;
///
/// excel_record! {
///     #[derive(Debug, Default, Clone, PartialEq)]
///     pub struct Customer {
///         pub id: String => "id",
///         pub name: String => "name",
///         pub age: i64 => "age",
///         pub note: String,
///     }
/// }
///
/// let tags = excelmap::tags_of::<Customer>();
/// assert_eq!(*tags, vec!["id", "name", "age"]);
/// ```
#[macro_export]
macro_rules! excel_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $field_ty:ty $(=> $tag:literal)?
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $field_ty,
            )+
        }

        impl $crate::AsRecord for $name {
            type Target = $name;

            fn as_record(&self) -> ::core::option::Option<&$name> {
                ::core::option::Option::Some(self)
            }
        }

        impl $crate::Record for $name {
            fn fields() -> &'static [$crate::FieldSpec<$name>] {
                static FIELDS: &[$crate::FieldSpec<$name>] = &[
                    $(
                        $crate::FieldSpec {
                            tag: $crate::excel_record!(@tag $($tag)?),
                            type_name: ::std::any::type_name::<$field_ty>,
                            type_id: ::std::any::TypeId::of::<$field_ty>,
                            set: $crate::excel_record!(@set $field, $field_ty, $($tag)?),
                            get: $crate::excel_record!(@get $field, $($tag)?),
                        },
                    )+
                ];
                FIELDS
            }
        }
    };

    (@tag) => {
        ""
    };
    (@tag $tag:literal) => {
        $tag
    };

    (@set $field:ident, $field_ty:ty,) => {
        |_record, _value| false
    };
    (@set $field:ident, $field_ty:ty, $tag:literal) => {
        |record, value| match value.downcast::<$field_ty>() {
            ::core::result::Result::Ok(value) => {
                record.$field = *value;
                true
            }
            ::core::result::Result::Err(_) => false,
        }
    };

    (@get $field:ident,) => {
        |_record| $crate::CellValue::Empty
    };
    (@get $field:ident, $tag:literal) => {
        |record| $crate::ToCell::to_cell(&record.$field)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel_record;

    excel_record! {
        /// Two exposed fields around a hidden one.
        #[derive(Debug, Default, Clone, PartialEq)]
        struct Sample {
            first: String => "first",
            hidden: i64,
            last: bool => "last",
        }
    }

    #[test]
    fn test_field_table_shape() {
        let fields = Sample::fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].tag, "first");
        assert_eq!(fields[1].tag, "");
        assert_eq!(fields[2].tag, "last");
        assert_eq!((fields[0].type_id)(), TypeId::of::<String>());
        assert!((fields[2].type_name)().ends_with("bool"));
    }

    #[test]
    fn test_set_downcasts_or_rejects() {
        let fields = Sample::fields();
        let mut sample = Sample::default();

        assert!((fields[0].set)(&mut sample, Box::new("hello".to_string())));
        assert_eq!(sample.first, "hello");

        // wrong runtime type is reported, not applied
        assert!(!(fields[0].set)(&mut sample, Box::new(42i64)));
        assert_eq!(sample.first, "hello");

        // hidden fields reject everything
        assert!(!(fields[1].set)(&mut sample, Box::new(42i64)));
    }

    #[test]
    fn test_get_reads_exposed_fields_only() {
        let sample = Sample {
            first: "a".to_string(),
            hidden: 9,
            last: true,
        };
        let fields = Sample::fields();
        assert_eq!((fields[0].get)(&sample), CellValue::String("a".to_string()));
        assert_eq!((fields[1].get)(&sample), CellValue::Empty);
        assert_eq!((fields[2].get)(&sample), CellValue::Bool(true));
    }
}
