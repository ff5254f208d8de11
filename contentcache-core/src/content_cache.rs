use std::any::Any;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::error::{CacheError, Result};
use crate::{AssetEntry, AssetStore, KeyNormalizer, ValueType};

#[cfg(feature = "stats")]
use crate::CacheStats;

/// Facade over a host-owned asset store.
///
/// `ContentCache` combines three responsibilities:
///
/// - **Key normalization**: [`normalize_key`](Self::normalize_key) maps raw
///   asset identifiers onto canonical store keys
/// - **Entry access**: [`get`](Self::get), [`set`](Self::set),
///   [`contains_key`](Self::contains_key) and [`remove`](Self::remove)
///   operate on keys that are already canonical
/// - **Bulk invalidation**: [`remove_matching`](Self::remove_matching) removes
///   every entry accepted by a caller-supplied predicate
///
/// # Store Ownership
///
/// The store is owned by the host and shared with the cache through an
/// `Rc<RefCell<S>>` handle. The cache never creates, clears or drops it.
/// Access is single-threaded and caller-serialized; the cache takes no locks.
///
/// # Caller Contract
///
/// The entry accessors perform no normalization. Passing a raw key to them
/// is not an error, it simply misses.
///
/// # Examples
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use contentcache_core::{AssetEntry, ContentCache, KeyNormalizer, OrderedStore, Platform};
///
/// let store = Rc::new(RefCell::new(OrderedStore::new()));
/// let cache = ContentCache::new(store, KeyNormalizer::for_platform(Platform::Unix));
///
/// let key = cache.normalize_key("Characters\\Abigail.xnb");
/// cache.set(key.clone(), AssetEntry::new(String::from("sprite")));
///
/// assert_eq!(key, "Characters/Abigail");
/// assert_eq!(&*cache.get_as::<String>(&key).unwrap(), "sprite");
///
/// let removed = cache
///     .remove_matching(|_key, ty| ty.is::<String>(), false)
///     .unwrap();
/// assert_eq!(removed, ["Characters/Abigail"]);
/// assert!(cache.is_empty());
/// ```
pub struct ContentCache<S: AssetStore> {
    store: Rc<RefCell<S>>,
    normalizer: KeyNormalizer,
    #[cfg(feature = "stats")]
    stats: CacheStats,
}

impl<S: AssetStore> ContentCache<S> {
    pub fn new(store: Rc<RefCell<S>>, normalizer: KeyNormalizer) -> Self {
        Self {
            store,
            normalizer,
            #[cfg(feature = "stats")]
            stats: CacheStats::new(),
        }
    }

    /// Creates a cache that normalizes keys for the platform this crate was built for.
    pub fn with_host_normalizer(store: Rc<RefCell<S>>) -> Self {
        Self::new(store, KeyNormalizer::host().clone())
    }

    /// Returns the shared handle to the underlying store.
    pub fn store(&self) -> &Rc<RefCell<S>> {
        &self.store
    }

    pub fn normalizer(&self) -> &KeyNormalizer {
        &self.normalizer
    }

    /// Returns the cache statistics.
    ///
    /// This method is only available when the `stats` feature is enabled.
    #[cfg(feature = "stats")]
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    // ==================== Key Normalization ====================

    pub fn normalize_path_separators(&self, path: &str) -> String {
        self.normalizer.normalize_separators(path)
    }

    pub fn normalize_key(&self, key: &str) -> String {
        self.normalizer.normalize_key(key)
    }

    // ==================== Entry Access ====================

    /// Borrows the entry stored under a canonical key.
    ///
    /// The returned guard keeps the store borrowed; drop it before mutating
    /// the store.
    pub fn get(&self, key: &str) -> Result<Ref<'_, AssetEntry>> {
        match Ref::filter_map(self.store.borrow(), |store| store.get(key)) {
            Ok(entry) => {
                #[cfg(feature = "stats")]
                self.stats.record_hit();
                trace!(key, "cache hit");
                Ok(entry)
            }
            Err(_) => {
                #[cfg(feature = "stats")]
                self.stats.record_miss();
                trace!(key, "cache miss");
                Err(CacheError::NotFound {
                    key: key.to_string(),
                })
            }
        }
    }

    /// Borrows the value stored under a canonical key as a concrete type.
    pub fn get_as<T: Any>(&self, key: &str) -> Result<Ref<'_, T>> {
        let entry = self.get(key)?;
        Ref::filter_map(entry, |entry| entry.downcast_ref::<T>()).map_err(|entry| {
            CacheError::TypeMismatch {
                key: key.to_string(),
                expected: std::any::type_name::<T>(),
                actual: entry.value_type().name(),
            }
        })
    }

    /// Inserts or overwrites an entry.
    ///
    /// An overwritten value is dropped without being disposed; callers that
    /// need disposal remove the old entry with `remove(key, true)` first.
    pub fn set(&self, key: impl Into<String>, entry: AssetEntry) {
        let key = key.into();
        trace!(key = %key, value_type = %entry.value_type(), "cache set");
        self.store.borrow_mut().insert(key, entry);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.store.borrow().contains_key(key)
    }

    /// Returns a snapshot of the keys currently in the store.
    ///
    /// The snapshot is taken eagerly, so the store may be mutated freely
    /// while the iterator is alive.
    pub fn keys(&self) -> Keys {
        let keys: Vec<String> = self.store.borrow().keys().map(str::to_string).collect();
        Keys {
            inner: keys.into_iter(),
        }
    }

    pub fn len(&self) -> usize {
        self.store.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.borrow().is_empty()
    }

    /// Removes the entry stored under a canonical key.
    ///
    /// Returns `Ok(false)` when there is no such entry. With `dispose` set and
    /// a disposable entry, the value is disposed before its mapping is
    /// removed.
    ///
    /// Disposing outside of a full teardown is unsafe for any other holder of
    /// the value. A failing disposal is returned as [`CacheError::Dispose`]
    /// and the entry stays in the store.
    pub fn remove(&self, key: &str, dispose: bool) -> Result<bool> {
        let mut store = self.store.borrow_mut();
        let Some(entry) = store.get_mut(key) else {
            return Ok(false);
        };

        if dispose && entry.is_disposable() {
            if let Err(source) = entry.dispose() {
                warn!(key, error = %source, "failed to dispose cached asset");
                return Err(CacheError::Dispose {
                    key: key.to_string(),
                    source,
                });
            }
            #[cfg(feature = "stats")]
            self.stats.record_disposal();
            debug!(key, "disposed cached asset");
        }

        let removed = store.remove(key).is_some();
        if removed {
            #[cfg(feature = "stats")]
            self.stats.record_removal();
            trace!(key, "removed cached asset");
        }
        Ok(removed)
    }

    // ==================== Bulk Invalidation ====================

    /// Removes every entry whose key and value type satisfy `predicate`.
    ///
    /// Keys are snapshotted before anything is removed and visited in store
    /// order. The store is not borrowed while `predicate` runs, so the
    /// predicate may mutate it: entries that disappear before their turn are
    /// skipped and entries inserted during the scan are not visited.
    ///
    /// Returns the keys that were actually removed, in visiting order. A
    /// disposal failure aborts the scan and is returned; entries removed
    /// before it stay removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::cell::RefCell;
    /// use std::rc::Rc;
    /// use contentcache_core::{AssetEntry, AssetStore, ContentCache, OrderedStore};
    ///
    /// let store = Rc::new(RefCell::new(OrderedStore::new()));
    /// {
    ///     let mut store = store.borrow_mut();
    ///     store.insert("A".to_string(), AssetEntry::new(1u32));
    ///     store.insert("B".to_string(), AssetEntry::new("b"));
    ///     store.insert("C".to_string(), AssetEntry::new(3u32));
    /// }
    ///
    /// let cache = ContentCache::with_host_normalizer(store);
    /// let removed = cache.remove_matching(|_key, ty| ty.is::<u32>(), false).unwrap();
    ///
    /// assert_eq!(removed, ["A", "C"]);
    /// assert_eq!(cache.keys().collect::<Vec<_>>(), ["B"]);
    /// ```
    pub fn remove_matching<F>(&self, mut predicate: F, dispose: bool) -> Result<Vec<String>>
    where
        F: FnMut(&str, ValueType) -> bool,
    {
        let snapshot: Vec<String> = self.store.borrow().keys().map(str::to_string).collect();
        let scanned = snapshot.len();
        let mut removed = Vec::new();

        for key in snapshot {
            let value_type = self.store.borrow().get(&key).map(AssetEntry::value_type);
            let Some(value_type) = value_type else {
                trace!(key = %key, "skipping key removed during scan");
                continue;
            };

            if !predicate(&key, value_type) {
                continue;
            }

            match self.remove(&key, dispose) {
                Ok(true) => removed.push(key),
                Ok(false) => {}
                Err(err) => {
                    warn!(
                        removed = removed.len(),
                        scanned, "bulk invalidation aborted by disposal failure"
                    );
                    return Err(err);
                }
            }
        }

        debug!(
            scanned,
            removed = removed.len(),
            dispose,
            "invalidated cached assets"
        );
        Ok(removed)
    }
}

impl<S: AssetStore> fmt::Debug for ContentCache<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("ContentCache");
        match self.store.try_borrow() {
            Ok(store) => debug.field("len", &store.len()),
            Err(_) => debug.field("len", &"<borrowed>"),
        };
        debug.field("normalizer", &self.normalizer).finish()
    }
}

/// Snapshot iterator over the keys of a content cache.
///
/// Created by [`ContentCache::keys`].
#[derive(Debug, Clone)]
pub struct Keys {
    inner: std::vec::IntoIter<String>,
}

impl Iterator for Keys {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Keys {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dispose, DisposeError, OrderedStore, Platform};
    use std::cell::Cell;

    struct TypeX;
    struct TypeY;

    struct Texture {
        disposed: Rc<Cell<u32>>,
    }

    impl Dispose for Texture {
        fn dispose(&mut self) -> std::result::Result<(), DisposeError> {
            self.disposed.set(self.disposed.get() + 1);
            Ok(())
        }
    }

    struct LostDevice;

    impl Dispose for LostDevice {
        fn dispose(&mut self) -> std::result::Result<(), DisposeError> {
            Err("device lost".into())
        }
    }

    fn new_cache() -> ContentCache<OrderedStore> {
        ContentCache::new(
            Rc::new(RefCell::new(OrderedStore::new())),
            KeyNormalizer::for_platform(Platform::Unix),
        )
    }

    fn xyx_cache() -> ContentCache<OrderedStore> {
        let cache = new_cache();
        cache.set("A", AssetEntry::new(TypeX));
        cache.set("B", AssetEntry::new(TypeY));
        cache.set("C", AssetEntry::new(TypeX));
        cache
    }

    #[test]
    fn test_get_after_set() {
        let cache = new_cache();
        cache.set("Data/Fonts", AssetEntry::new(42u64));

        assert_eq!(cache.get("Data/Fonts").unwrap().downcast_ref::<u64>(), Some(&42));
        assert_eq!(*cache.get_as::<u64>("Data/Fonts").unwrap(), 42);
    }

    #[test]
    fn test_get_missing_key() {
        let cache = new_cache();
        let err = cache.get("Data/Fonts").unwrap_err();
        assert!(matches!(err, CacheError::NotFound { ref key } if key == "Data/Fonts"));
    }

    #[test]
    fn test_get_unnormalized_key_misses() {
        let cache = new_cache();
        cache.set(cache.normalize_key("Data\\Fonts.xnb"), AssetEntry::new(1u8));

        assert!(cache.contains_key("Data/Fonts"));
        assert!(!cache.contains_key("Data\\Fonts.xnb"));
        assert!(cache.get("Data\\Fonts.xnb").is_err());
    }

    #[test]
    fn test_get_as_wrong_type() {
        let cache = new_cache();
        cache.set("Maps/Farm", AssetEntry::new(String::from("farm")));

        match cache.get_as::<u32>("Maps/Farm") {
            Err(CacheError::TypeMismatch { key, expected, .. }) => {
                assert_eq!(key, "Maps/Farm");
                assert_eq!(expected, "u32");
            }
            other => panic!("expected type mismatch, got {:?}", other.map(|_| ())),
        };
    }

    #[test]
    fn test_set_overwrites_without_disposing() {
        let disposed = Rc::new(Cell::new(0));
        let cache = new_cache();
        cache.set(
            "Maps/Farm",
            AssetEntry::disposable(Texture {
                disposed: disposed.clone(),
            }),
        );
        cache.set("Maps/Farm", AssetEntry::new(7u8));

        assert_eq!(disposed.get(), 0);
        assert_eq!(cache.len(), 1);
        assert_eq!(*cache.get_as::<u8>("Maps/Farm").unwrap(), 7);
    }

    #[test]
    fn test_remove_absent_key() {
        let cache = xyx_cache();
        assert!(!cache.remove("Z", true).unwrap());
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_remove_disposes_once() {
        let disposed = Rc::new(Cell::new(0));
        let cache = new_cache();
        cache.set(
            "Maps/Farm",
            AssetEntry::disposable(Texture {
                disposed: disposed.clone(),
            }),
        );

        assert!(cache.remove("Maps/Farm", true).unwrap());
        assert_eq!(disposed.get(), 1);
        assert!(!cache.contains_key("Maps/Farm"));
        assert!(!cache.remove("Maps/Farm", true).unwrap());
        assert_eq!(disposed.get(), 1);
    }

    #[test]
    fn test_remove_without_dispose_flag() {
        let disposed = Rc::new(Cell::new(0));
        let cache = new_cache();
        cache.set(
            "Maps/Farm",
            AssetEntry::disposable(Texture {
                disposed: disposed.clone(),
            }),
        );

        assert!(cache.remove("Maps/Farm", false).unwrap());
        assert_eq!(disposed.get(), 0);
    }

    #[test]
    fn test_remove_dispose_failure_keeps_entry() {
        let cache = new_cache();
        cache.set("Maps/Farm", AssetEntry::disposable(LostDevice));

        let err = cache.remove("Maps/Farm", true).unwrap_err();
        assert!(matches!(err, CacheError::Dispose { ref key, .. } if key == "Maps/Farm"));
        assert!(cache.contains_key("Maps/Farm"));
    }

    #[test]
    fn test_remove_matching_by_type() {
        let cache = xyx_cache();
        let removed = cache
            .remove_matching(|_, ty| ty == ValueType::of::<TypeX>(), false)
            .unwrap();

        assert_eq!(removed, ["A", "C"]);
        assert_eq!(cache.keys().collect::<Vec<_>>(), ["B"]);
    }

    #[test]
    fn test_remove_matching_sees_keys_and_types() {
        let cache = xyx_cache();
        let mut seen = Vec::new();
        let removed = cache
            .remove_matching(
                |key, ty| {
                    seen.push((key.to_string(), ty));
                    false
                },
                false,
            )
            .unwrap();

        assert!(removed.is_empty());
        assert_eq!(
            seen,
            [
                ("A".to_string(), ValueType::of::<TypeX>()),
                ("B".to_string(), ValueType::of::<TypeY>()),
                ("C".to_string(), ValueType::of::<TypeX>()),
            ]
        );
    }

    #[test]
    fn test_remove_matching_predicate_removes_later_key() {
        let cache = xyx_cache();
        let removed = cache
            .remove_matching(
                |key, ty| {
                    if key == "A" {
                        cache.store().borrow_mut().remove("C");
                    }
                    ty.is::<TypeX>()
                },
                false,
            )
            .unwrap();

        assert_eq!(removed, ["A"]);
        assert_eq!(cache.keys().collect::<Vec<_>>(), ["B"]);
    }

    #[test]
    fn test_remove_matching_predicate_removes_current_key() {
        let cache = xyx_cache();
        let removed = cache
            .remove_matching(
                |key, _| {
                    if key == "B" {
                        cache.remove("B", false).unwrap();
                    }
                    true
                },
                false,
            )
            .unwrap();

        assert_eq!(removed, ["A", "C"]);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_remove_matching_ignores_inserted_keys() {
        let cache = xyx_cache();
        let mut visited = 0;
        let removed = cache
            .remove_matching(
                |_, _| {
                    visited += 1;
                    cache.set(format!("New/{visited}"), AssetEntry::new(TypeX));
                    false
                },
                false,
            )
            .unwrap();

        assert!(removed.is_empty());
        assert_eq!(visited, 3);
        assert_eq!(cache.len(), 6);
    }

    #[test]
    fn test_remove_matching_disposes() {
        let disposed = Rc::new(Cell::new(0));
        let cache = new_cache();
        for key in ["Maps/Farm", "Maps/Town"] {
            cache.set(
                key,
                AssetEntry::disposable(Texture {
                    disposed: disposed.clone(),
                }),
            );
        }
        cache.set("Data/Fonts", AssetEntry::new(0u8));

        let removed = cache.remove_matching(|_, _| true, true).unwrap();
        assert_eq!(removed, ["Maps/Farm", "Maps/Town", "Data/Fonts"]);
        assert_eq!(disposed.get(), 2);
    }

    #[test]
    fn test_remove_matching_dispose_failure_aborts() {
        let cache = new_cache();
        cache.set("A", AssetEntry::new(TypeX));
        cache.set("B", AssetEntry::disposable(LostDevice));
        cache.set("C", AssetEntry::new(TypeX));

        let err = cache.remove_matching(|_, _| true, true).unwrap_err();
        assert_eq!(err.key(), Some("B"));
        assert_eq!(cache.keys().collect::<Vec<_>>(), ["B", "C"]);
    }

    #[test]
    fn test_keys_snapshot_survives_mutation() {
        let cache = xyx_cache();
        let keys = cache.keys();
        assert_eq!(keys.len(), 3);

        cache.remove("B", false).unwrap();
        assert_eq!(keys.collect::<Vec<_>>(), ["A", "B", "C"]);
    }

    #[cfg(feature = "stats")]
    #[test]
    fn test_stats_tracking() {
        let disposed = Rc::new(Cell::new(0));
        let cache = new_cache();
        cache.set(
            "Maps/Farm",
            AssetEntry::disposable(Texture {
                disposed: disposed.clone(),
            }),
        );
        cache.set("Data/Fonts", AssetEntry::new(0u8));

        let _ = cache.get("Maps/Farm");
        let _ = cache.get("Maps/Town");
        cache.remove_matching(|_, _| true, true).unwrap();

        let stats = cache.stats();
        assert_eq!(stats.hits(), 1);
        assert_eq!(stats.misses(), 1);
        assert_eq!(stats.removals(), 2);
        assert_eq!(stats.disposals(), 1);
    }
}
