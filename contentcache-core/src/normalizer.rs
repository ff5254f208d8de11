//! # Key Normalization
//!
//! Maps raw asset identifiers onto the canonical keys used by the asset store.
//!
//! A raw key goes through two steps:
//!
//! 1. **Separator normalization**: the key is split on every configured
//!    separator, empty segments are dropped and the rest are joined with the
//!    preferred separator. A leading preferred separator survives.
//! 2. **Bundle handling**: if the result ends with the bundle extension
//!    (ASCII case-insensitive) the extension is stripped. Otherwise the
//!    platform cleanup strategy is applied. Never both.
//!
//! # Examples
//!
//! ```rust
//! use contentcache_core::{KeyNormalizer, Platform};
//!
//! let normalizer = KeyNormalizer::for_platform(Platform::Unix);
//!
//! assert_eq!(normalizer.normalize_separators("a//b\\\\c"), "a/b/c");
//! assert_eq!(normalizer.normalize_separators("/a/b"), "/a/b");
//! assert_eq!(normalizer.normalize_key("Data\\Fonts.XNB"), "Data/Fonts");
//! ```

use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;

use crate::error::{CacheError, Result};
use crate::platform::{CleanupFn, Platform};

/// Separators recognised by the platform presets.
pub const DEFAULT_SEPARATORS: [char; 2] = ['/', '\\'];

/// File extension of compiled resource bundles.
pub const DEFAULT_BUNDLE_EXTENSION: &str = ".xnb";

static HOST_NORMALIZER: Lazy<KeyNormalizer> =
    Lazy::new(|| KeyNormalizer::for_platform(Platform::current()));

/// Validated, immutable normalizer configuration.
///
/// Built with [`NormalizerConfig::builder`] or taken from a platform preset
/// with [`NormalizerConfig::for_platform`]. The preferred separator is
/// always part of the separator set.
#[derive(Clone)]
pub struct NormalizerConfig {
    separators: Vec<char>,
    preferred_separator: char,
    bundle_extension: String,
    cleanup: CleanupFn,
}

impl NormalizerConfig {
    pub fn builder() -> NormalizerBuilder {
        NormalizerBuilder::default()
    }

    /// Returns the preset for a host platform: `/` and `\` as separators,
    /// the platform's preferred separator and cleanup, `.xnb` bundles.
    pub fn for_platform(platform: Platform) -> Self {
        let preferred_separator = platform.preferred_separator();
        let mut separators = DEFAULT_SEPARATORS.to_vec();
        if !separators.contains(&preferred_separator) {
            separators.push(preferred_separator);
        }

        Self {
            separators,
            preferred_separator,
            bundle_extension: DEFAULT_BUNDLE_EXTENSION.to_string(),
            cleanup: platform.cleanup(),
        }
    }

    pub fn separators(&self) -> &[char] {
        &self.separators
    }

    pub fn preferred_separator(&self) -> char {
        self.preferred_separator
    }

    pub fn bundle_extension(&self) -> &str {
        &self.bundle_extension
    }
}

impl fmt::Debug for NormalizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizerConfig")
            .field("separators", &self.separators)
            .field("preferred_separator", &self.preferred_separator)
            .field("bundle_extension", &self.bundle_extension)
            .finish_non_exhaustive()
    }
}

/// Builder for [`NormalizerConfig`].
///
/// Starts from the preset of [`Platform::current`].
///
/// # Examples
///
/// ```
/// use contentcache_core::{NormalizerConfig, Platform};
///
/// let config = NormalizerConfig::builder()
///     .platform(Platform::Unix)
///     .separators(['/', '\\', ':'])
///     .bundle_extension(".pak")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.preferred_separator(), '/');
/// assert_eq!(config.bundle_extension(), ".pak");
/// ```
pub struct NormalizerBuilder {
    separators: Vec<char>,
    preferred_separator: char,
    bundle_extension: String,
    cleanup: CleanupFn,
}

impl Default for NormalizerBuilder {
    fn default() -> Self {
        let platform = Platform::current();
        Self {
            separators: DEFAULT_SEPARATORS.to_vec(),
            preferred_separator: platform.preferred_separator(),
            bundle_extension: DEFAULT_BUNDLE_EXTENSION.to_string(),
            cleanup: platform.cleanup(),
        }
    }
}

impl NormalizerBuilder {
    /// Uses the preferred separator and cleanup strategy of `platform`.
    pub fn platform(mut self, platform: Platform) -> Self {
        self.preferred_separator = platform.preferred_separator();
        self.cleanup = platform.cleanup();
        self
    }

    /// Replaces the set of characters accepted as separators.
    pub fn separators(mut self, separators: impl IntoIterator<Item = char>) -> Self {
        self.separators = separators.into_iter().collect();
        self
    }

    pub fn preferred_separator(mut self, separator: char) -> Self {
        self.preferred_separator = separator;
        self
    }

    pub fn bundle_extension(mut self, extension: impl Into<String>) -> Self {
        self.bundle_extension = extension.into();
        self
    }

    /// Sets the platform cleanup applied to keys without a bundle extension.
    pub fn cleanup<F>(mut self, cleanup: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.cleanup = Arc::new(cleanup);
        self
    }

    pub fn cleanup_fn(mut self, cleanup: CleanupFn) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Validates the configuration.
    ///
    /// Fails when the separator set is empty, or when the bundle extension
    /// is empty or contains a separator.
    pub fn build(self) -> Result<NormalizerConfig> {
        if self.separators.is_empty() {
            return Err(CacheError::InvalidConfig(
                "separator set must not be empty".to_string(),
            ));
        }
        if self.bundle_extension.is_empty() {
            return Err(CacheError::InvalidConfig(
                "bundle extension must not be empty".to_string(),
            ));
        }

        let mut separators = Vec::with_capacity(self.separators.len() + 1);
        for separator in self
            .separators
            .into_iter()
            .chain(std::iter::once(self.preferred_separator))
        {
            if !separators.contains(&separator) {
                separators.push(separator);
            }
        }

        if self.bundle_extension.contains(separators.as_slice()) {
            return Err(CacheError::InvalidConfig(format!(
                "bundle extension '{}' contains a path separator",
                self.bundle_extension
            )));
        }

        Ok(NormalizerConfig {
            separators,
            preferred_separator: self.preferred_separator,
            bundle_extension: self.bundle_extension,
            cleanup: self.cleanup,
        })
    }
}

/// Canonicalizes raw asset keys.
///
/// Normalization is pure and never fails: every input, including the empty
/// string, maps to some key. Distinct raw keys that describe the same asset
/// collapse onto one canonical key.
#[derive(Clone, Debug)]
pub struct KeyNormalizer {
    config: NormalizerConfig,
}

impl KeyNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn for_platform(platform: Platform) -> Self {
        Self::new(NormalizerConfig::for_platform(platform))
    }

    /// Returns the shared normalizer for the platform this crate was built for.
    pub fn host() -> &'static KeyNormalizer {
        &HOST_NORMALIZER
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Collapses every run of separators into a single preferred separator.
    ///
    /// Leading and trailing separators are dropped, except that a leading
    /// preferred separator is kept as a root marker.
    pub fn normalize_separators(&self, path: &str) -> String {
        let preferred = self.config.preferred_separator;
        let mut normalized = String::with_capacity(path.len());
        if path.starts_with(preferred) {
            normalized.push(preferred);
        }

        for (i, segment) in self.split_segments(path, None).into_iter().enumerate() {
            if i > 0 {
                normalized.push(preferred);
            }
            normalized.push_str(segment);
        }

        normalized
    }

    /// Returns the canonical store key for a raw asset key.
    pub fn normalize_key(&self, key: &str) -> String {
        let key = self.normalize_separators(key);
        match self.strip_bundle_extension(&key) {
            Some(stem) => stem.to_string(),
            None => (self.config.cleanup)(&key),
        }
    }

    /// Splits a path on any configured separator, skipping empty segments.
    ///
    /// With `Some(limit)`, at most `limit` segments are returned and the last
    /// one holds the unsplit remainder of the path.
    ///
    /// ```
    /// use contentcache_core::{KeyNormalizer, Platform};
    ///
    /// let normalizer = KeyNormalizer::for_platform(Platform::Unix);
    /// assert_eq!(normalizer.split_segments("Mods//Pack\\assets/a.png", None), ["Mods", "Pack", "assets", "a.png"]);
    /// assert_eq!(normalizer.split_segments("Mods//Pack\\assets/a.png", Some(2)), ["Mods", "Pack\\assets/a.png"]);
    /// ```
    pub fn split_segments<'a>(&self, path: &'a str, limit: Option<usize>) -> Vec<&'a str> {
        let limit = match limit {
            Some(0) => return Vec::new(),
            Some(limit) => limit,
            None => usize::MAX,
        };

        let is_separator = |c: char| self.config.separators.contains(&c);
        let mut segments = Vec::new();
        let mut rest = path;
        loop {
            rest = rest.trim_start_matches(is_separator);
            if rest.is_empty() {
                break;
            }
            if segments.len() + 1 == limit {
                segments.push(rest);
                break;
            }
            match rest.find(is_separator) {
                Some(end) => {
                    segments.push(&rest[..end]);
                    rest = &rest[end..];
                }
                None => {
                    segments.push(rest);
                    break;
                }
            }
        }

        segments
    }

    /// Returns `key` without its trailing bundle extension, if it has one.
    fn strip_bundle_extension<'a>(&self, key: &'a str) -> Option<&'a str> {
        let extension = self.config.bundle_extension.as_str();
        let split = key.len().checked_sub(extension.len())?;
        if !key.is_char_boundary(split) {
            return None;
        }

        let (stem, suffix) = key.split_at(split);
        suffix.eq_ignore_ascii_case(extension).then_some(stem)
    }
}

impl Default for KeyNormalizer {
    fn default() -> Self {
        KeyNormalizer::host().clone()
    }
}
