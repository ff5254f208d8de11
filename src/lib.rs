//! # Contentcache
//!
//! A small cache manager that sits in front of an asset store owned by the
//! host application.
//!
//! Contentcache never loads or decodes assets. It manages entries that
//! already exist in the host's store, and does two things carefully:
//!
//! - **Key identity**: raw asset names arrive with mixed separators, stray
//!   slashes and compiled-bundle extensions. [`KeyNormalizer`] reduces them all
//!   to one canonical key.
//! - **Invalidation**: [`ContentCache::remove_matching`] removes every entry
//!   a caller-supplied predicate selects, optionally disposing the values,
//!   without ever corrupting its own scan.
//!
//! ## Quick Start
//!
//! The host owns the store and shares it with the cache:
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use contentcache::{AssetEntry, ContentCache, KeyNormalizer, OrderedStore, Platform};
//!
//! let store = Rc::new(RefCell::new(OrderedStore::new()));
//! let cache = ContentCache::new(store.clone(), KeyNormalizer::for_platform(Platform::Unix));
//!
//! // Every representation of the same asset maps to one key
//! let key = cache.normalize_key("Maps\\\\Farm.xnb");
//! assert_eq!(key, "Maps/Farm");
//! assert_eq!(cache.normalize_key("Maps/Farm/"), key);
//!
//! cache.set(key.clone(), AssetEntry::new(String::from("farm map")));
//! assert!(cache.contains_key(&key));
//! ```
//!
//! ## Custom Normalization
//!
//! Separators, bundle extension and the platform cleanup step are fixed at
//! construction:
//!
//! ```rust
//! use contentcache::{KeyNormalizer, NormalizerConfig};
//!
//! let config = NormalizerConfig::builder()
//!     .separators(['/', '\\'])
//!     .preferred_separator('/')
//!     .bundle_extension(".pak")
//!     .cleanup(|path| path.to_lowercase())
//!     .build()
//!     .unwrap();
//!
//! let normalizer = KeyNormalizer::new(config);
//! assert_eq!(normalizer.normalize_key("Audio\\Music.PAK"), "Audio/Music");
//! assert_eq!(normalizer.normalize_key("Audio\\Music"), "audio/music");
//! ```
//!
//! ## Disposal
//!
//! Values holding external resources implement [`Dispose`] and are stored with
//! [`AssetEntry::disposable`]. Disposal only runs when a removal asks for it,
//! and a failing disposal is returned to the caller:
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use contentcache::{AssetEntry, ContentCache, Dispose, DisposeError, OrderedStore};
//!
//! struct Texture {
//!     released: bool,
//! }
//!
//! impl Dispose for Texture {
//!     fn dispose(&mut self) -> Result<(), DisposeError> {
//!         self.released = true;
//!         Ok(())
//!     }
//! }
//!
//! let cache = ContentCache::with_host_normalizer(Rc::new(RefCell::new(OrderedStore::new())));
//! cache.set("Tilesheets/Outdoors", AssetEntry::disposable(Texture { released: false }));
//!
//! let removed = cache
//!     .remove_matching(|key, _ty| key.starts_with("Tilesheets"), true)
//!     .unwrap();
//! assert_eq!(removed, ["Tilesheets/Outdoors"]);
//! ```

pub use contentcache_core::*;
