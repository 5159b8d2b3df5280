//! Tag walks over record descriptors, memoized process-wide
//!
//! The tag list and tag-position index of a record type never change at
//! runtime, so both are computed once per type and kept for the life of the
//! process. Any thread may populate the caches; entries are never evicted.

use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use indexmap::IndexMap;

use crate::record::reflect::{full_type_name, AsRecord};
use crate::record::{Record, TAG_NAMESPACE};
use crate::types::CellValue;

static TAGS_CACHE: LazyLock<DashMap<String, Arc<Vec<&'static str>>>> =
    LazyLock::new(DashMap::new);

static TAG_INDEX_CACHE: LazyLock<DashMap<String, Arc<IndexMap<&'static str, usize>>>> =
    LazyLock::new(DashMap::new);

fn cache_key<T: AsRecord + ?Sized>() -> String {
    format!("{}_{}", TAG_NAMESPACE, full_type_name::<T>())
}

/// Exposed tags of `T`'s base record type, in field declaration order.
///
/// Fields with an empty tag are skipped. The order fixes the default
/// header-write order.
pub fn tags_of<T: AsRecord + ?Sized>() -> Arc<Vec<&'static str>> {
    let key = cache_key::<T>();
    if let Some(hit) = TAGS_CACHE.get(&key) {
        return Arc::clone(hit.value());
    }

    let tags: Vec<&'static str> = <T::Target as Record>::fields()
        .iter()
        .map(|field| field.tag)
        .filter(|tag| !tag.is_empty())
        .collect();
    let tags = Arc::new(tags);
    TAGS_CACHE.insert(key, Arc::clone(&tags));
    tags
}

/// Tag to declaration-order field position for `T`'s base record type.
///
/// Positions count every field, exposed or not, so they index straight into
/// [`Record::fields`]. A duplicate tag resolves to its last declaration.
pub fn tag_index_of<T: AsRecord + ?Sized>() -> Arc<IndexMap<&'static str, usize>> {
    let key = cache_key::<T>();
    if let Some(hit) = TAG_INDEX_CACHE.get(&key) {
        return Arc::clone(hit.value());
    }

    let index: IndexMap<&'static str, usize> = <T::Target as Record>::fields()
        .iter()
        .enumerate()
        .filter(|(_, field)| !field.tag.is_empty())
        .map(|(position, field)| (field.tag, position))
        .collect();
    let index = Arc::new(index);
    TAG_INDEX_CACHE.insert(key, Arc::clone(&index));
    index
}

/// Current cell value of every exposed field of `record`.
///
/// Depends on the record's contents, so it is never cached.
pub fn tag_to_cells<R: Record>(record: &R) -> IndexMap<&'static str, CellValue> {
    R::fields()
        .iter()
        .filter(|field| !field.tag.is_empty())
        .map(|field| (field.tag, (field.get)(record)))
        .collect()
}
