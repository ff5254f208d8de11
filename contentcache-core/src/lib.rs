//! # Contentcache Core
//!
//! Core types for managing a host-owned asset cache.
//!
//! This crate does not load or decode assets. It manages entries that
//! already live in a key→value store owned by the host: it maps raw asset
//! identifiers onto canonical keys, gives typed access to entries, and
//! removes (optionally disposing) every entry a caller-supplied predicate
//! selects.
//!
//! ## Features
//!
//! - **Key normalization**: Separator collapsing, bundle-extension stripping
//!   and injected platform cleanup
//! - **Typed access**: Type-erased entries with runtime type introspection
//! - **Safe bulk invalidation**: Snapshot-then-mutate scans that tolerate a
//!   predicate mutating the store
//! - **Disposal**: Optional resource cleanup on removal, with failures
//!   propagated to the caller
//! - **Statistics**: Optional lookup/removal counters (with `stats` feature)
//!
//! ## Module Organization
//!
//! - [`normalizer`] - Canonical key computation and its configuration
//! - [`platform`] - Host platforms and built-in cleanup strategies
//! - [`predicate`] - Ready-made invalidation predicates
//! - `entry` - Type-erased cached values and disposal
//! - `store` - The host-implemented store trait and an insertion-ordered store
//! - `content_cache` - The cache facade
//!
mod content_cache;
mod entry;
mod error;
mod store;

pub mod normalizer;
pub mod platform;
pub mod predicate;

#[cfg(feature = "stats")]
mod stats;

pub use content_cache::{ContentCache, Keys};
pub use entry::{AssetEntry, Dispose, DisposeError, ValueType};
pub use error::{CacheError, Result};
pub use normalizer::{KeyNormalizer, NormalizerBuilder, NormalizerConfig};
pub use platform::{CleanupFn, Platform};
pub use store::{AssetStore, OrderedStore};

#[cfg(feature = "stats")]
pub use stats::CacheStats;
