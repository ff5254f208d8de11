use thiserror::Error;

use crate::entry::DisposeError;

/// Errors raised by the content cache.
///
/// Normalization never fails; absence is an error only for direct lookups.
/// `remove` and `remove_matching` report a missing key as a normal `false`
/// or as an omission from the removed list.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A direct lookup found no entry for the key.
    #[error("no cached asset for key '{key}'")]
    NotFound { key: String },

    /// A typed lookup found an entry holding a different type.
    #[error("cached asset '{key}' is a {actual}, not a {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// The value's own disposal routine failed. The entry is left in the store.
    #[error("failed to dispose cached asset '{key}': {source}")]
    Dispose {
        key: String,
        #[source]
        source: DisposeError,
    },

    /// The normalizer configuration was rejected at construction.
    #[error("invalid normalizer configuration: {0}")]
    InvalidConfig(String),
}

impl CacheError {
    /// Returns the cache key the error refers to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::NotFound { key } | Self::TypeMismatch { key, .. } | Self::Dispose { key, .. } => {
                Some(key)
            }
            Self::InvalidConfig(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
