//! # Invalidation Predicates
//!
//! Ready-made predicates for [`ContentCache::remove_matching`](crate::ContentCache::remove_matching).
//!
//! Deciding *what* to invalidate is left to the caller; these helpers only
//! cover the common shapes of that decision: by value type, by key prefix,
//! or by a set of value types.
//!
//! # Examples
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use contentcache_core::{predicate, AssetEntry, ContentCache, OrderedStore};
//!
//! let cache = ContentCache::with_host_normalizer(Rc::new(RefCell::new(OrderedStore::new())));
//! cache.set("Portraits/Haley", AssetEntry::new(vec![0u8; 4]));
//! cache.set("Data/Fonts", AssetEntry::new(String::from("font")));
//!
//! let removed = cache.remove_matching(predicate::of_type::<Vec<u8>>(), false).unwrap();
//! assert_eq!(removed, ["Portraits/Haley"]);
//! ```

use std::any::Any;

use crate::ValueType;

/// Matches entries whose value is a `T`.
pub fn of_type<T: Any>() -> impl FnMut(&str, ValueType) -> bool {
    let wanted = ValueType::of::<T>();
    move |_key: &str, value_type: ValueType| value_type == wanted
}

/// Matches entries whose value type is one of `types`.
pub fn any_of_types(types: &[ValueType]) -> impl FnMut(&str, ValueType) -> bool {
    let types = types.to_vec();
    move |_key: &str, value_type: ValueType| types.contains(&value_type)
}

/// Matches entries whose canonical key starts with `prefix`.
///
/// The comparison is exact: pass an already-normalized prefix.
pub fn key_prefix(prefix: impl Into<String>) -> impl FnMut(&str, ValueType) -> bool {
    let prefix = prefix.into();
    move |key: &str, _value_type: ValueType| key.starts_with(prefix.as_str())
}
