use std::collections::{HashMap, VecDeque};

use crate::AssetEntry;

/// The host-owned mapping from canonical key to cached asset.
///
/// The cache never creates or destroys the store; the host implements this
/// trait for whatever container actually holds its loaded assets and hands
/// the cache a shared handle to it. Keys are assumed to be canonical.
///
/// `keys` defines the order in which bulk invalidation visits entries and
/// reports removed keys.
pub trait AssetStore {
    fn get(&self, key: &str) -> Option<&AssetEntry>;

    fn get_mut(&mut self, key: &str) -> Option<&mut AssetEntry>;

    /// Inserts or overwrites an entry, returning the previous one.
    fn insert(&mut self, key: String, entry: AssetEntry) -> Option<AssetEntry>;

    fn remove(&mut self, key: &str) -> Option<AssetEntry>;

    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Store backed by a plain `HashMap`. Iteration order is unspecified.
impl AssetStore for HashMap<String, AssetEntry> {
    fn get(&self, key: &str) -> Option<&AssetEntry> {
        HashMap::get(self, key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut AssetEntry> {
        HashMap::get_mut(self, key)
    }

    fn insert(&mut self, key: String, entry: AssetEntry) -> Option<AssetEntry> {
        HashMap::insert(self, key, entry)
    }

    fn remove(&mut self, key: &str) -> Option<AssetEntry> {
        HashMap::remove(self, key)
    }

    fn contains_key(&self, key: &str) -> bool {
        HashMap::contains_key(self, key)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(HashMap::keys(self).map(String::as_str))
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

/// Insertion-ordered asset store.
///
/// Entries live in a `HashMap` for O(1) lookup while a `VecDeque` records
/// the order in which keys were first inserted. Overwriting a key keeps its
/// original position.
///
/// # Examples
///
/// ```
/// use contentcache_core::{AssetEntry, AssetStore, OrderedStore};
///
/// let mut store = OrderedStore::new();
/// store.insert("Maps/Farm".to_string(), AssetEntry::new(1u32));
/// store.insert("Data/Fonts".to_string(), AssetEntry::new(2u32));
/// store.insert("Maps/Farm".to_string(), AssetEntry::new(3u32));
///
/// let keys: Vec<&str> = store.keys().collect();
/// assert_eq!(keys, ["Maps/Farm", "Data/Fonts"]);
/// ```
#[derive(Debug, Default)]
pub struct OrderedStore {
    map: HashMap<String, AssetEntry>,
    order: VecDeque<String>,
}

impl OrderedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    /// Removes every entry without disposing anything.
    pub fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }
}

impl AssetStore for OrderedStore {
    fn get(&self, key: &str) -> Option<&AssetEntry> {
        self.map.get(key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut AssetEntry> {
        self.map.get_mut(key)
    }

    fn insert(&mut self, key: String, entry: AssetEntry) -> Option<AssetEntry> {
        if !self.map.contains_key(&key) {
            self.order.push_back(key.clone());
        }
        self.map.insert(key, entry)
    }

    fn remove(&mut self, key: &str) -> Option<AssetEntry> {
        let removed = self.map.remove(key)?;
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
        Some(removed)
    }

    fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.order.iter().map(String::as_str))
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}

impl FromIterator<(String, AssetEntry)> for OrderedStore {
    fn from_iter<I: IntoIterator<Item = (String, AssetEntry)>>(iter: I) -> Self {
        let mut store = OrderedStore::new();
        for (key, entry) in iter {
            store.insert(key, entry);
        }
        store
    }
}
