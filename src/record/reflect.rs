//! Resolution of reference and container types to their base record type

use crate::record::Record;

/// Anything that resolves to a record type once references and containers
/// are peeled away.
///
/// `excel_record!` implements this for the record itself with
/// `Target = Self`; the blanket impls below recurse through `&T`, `&mut T`,
/// `Box<T>`, `Option<T>`, `Vec<T>`, slices, and arrays, so
/// `full_type_name::<&[Box<Customer>]>()` names `Customer` and
/// `Stream::write_many` accepts slices of any of those shapes.
pub trait AsRecord {
    /// The base record type this type resolves to.
    type Target: Record;

    /// The base record value, when this value carries exactly one.
    ///
    /// `Option` resolves to its payload; collection types resolve to `None`
    /// (they describe many records, not one).
    fn as_record(&self) -> Option<&Self::Target>;
}

impl<T: AsRecord + ?Sized> AsRecord for &T {
    type Target = T::Target;

    fn as_record(&self) -> Option<&Self::Target> {
        (**self).as_record()
    }
}

impl<T: AsRecord + ?Sized> AsRecord for &mut T {
    type Target = T::Target;

    fn as_record(&self) -> Option<&Self::Target> {
        (**self).as_record()
    }
}

impl<T: AsRecord + ?Sized> AsRecord for Box<T> {
    type Target = T::Target;

    fn as_record(&self) -> Option<&Self::Target> {
        (**self).as_record()
    }
}

impl<T: AsRecord> AsRecord for Option<T> {
    type Target = T::Target;

    fn as_record(&self) -> Option<&Self::Target> {
        self.as_ref().and_then(T::as_record)
    }
}

impl<T: AsRecord> AsRecord for Vec<T> {
    type Target = T::Target;

    fn as_record(&self) -> Option<&Self::Target> {
        None
    }
}

impl<T: AsRecord> AsRecord for [T] {
    type Target = T::Target;

    fn as_record(&self) -> Option<&Self::Target> {
        None
    }
}

impl<T: AsRecord, const N: usize> AsRecord for [T; N] {
    type Target = T::Target;

    fn as_record(&self) -> Option<&Self::Target> {
        None
    }
}

/// Fully-qualified name of the base record type behind `T`.
///
/// `std::any::type_name` includes the module path, so two record types with
/// the same bare name in different modules never collide as cache keys.
pub fn full_type_name<T: AsRecord + ?Sized>() -> &'static str {
    std::any::type_name::<T::Target>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel_record;

    excel_record! {
        #[derive(Debug, Default, Clone, PartialEq)]
        struct Plain {
            label: String => "label",
        }
    }

    mod other {
        crate::excel_record! {
            #[derive(Debug, Default, Clone, PartialEq)]
            pub struct Plain {
                pub label: String => "label",
            }
        }
    }

    #[test]
    fn test_nested_containers_resolve_to_base() {
        assert!(full_type_name::<Plain>().ends_with("Plain"));
        assert_eq!(
            full_type_name::<Vec<Box<&Plain>>>(),
            full_type_name::<Plain>()
        );
        assert_eq!(full_type_name::<[Option<Plain>; 4]>(), full_type_name::<Plain>());
    }

    #[test]
    fn test_same_bare_name_does_not_collide() {
        assert_ne!(full_type_name::<Plain>(), full_type_name::<other::Plain>());
    }

    #[test]
    fn test_as_record_values() {
        let plain = Plain {
            label: "x".to_string(),
        };
        assert!(plain.as_record().is_some());
        assert!((&plain).as_record().is_some());

        let some = Some(plain.clone());
        let none: Option<Plain> = None;
        assert_eq!(some.as_record(), Some(&plain));
        assert!(none.as_record().is_none());

        let many = vec![plain];
        assert!(many.as_record().is_none());
    }
}
