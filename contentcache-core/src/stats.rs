use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing how a content cache has been used.
///
/// Lookups through `get`/`get_as` count as hits or misses. Removals count
/// every entry actually taken out of the store, whether through `remove` or
/// `remove_matching`; disposals count successful disposal calls.
///
/// Counters use relaxed atomics so a snapshot can be read from any thread.
///
/// # Examples
///
/// ```
/// use contentcache_core::CacheStats;
///
/// let stats = CacheStats::new();
/// stats.record_hit();
/// stats.record_hit();
/// stats.record_miss();
/// stats.record_removal();
///
/// assert_eq!(stats.lookups(), 3);
/// assert_eq!(stats.removals(), 1);
/// assert!((stats.hit_rate() - 0.6666).abs() < 0.001);
/// ```
#[derive(Debug)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    removals: AtomicU64,
    disposals: AtomicU64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            removals: AtomicU64::new(0),
            disposals: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_removal(&self) {
        self.removals.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_disposal(&self) {
        self.disposals.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn removals(&self) -> u64 {
        self.removals.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn disposals(&self) -> u64 {
        self.disposals.load(Ordering::Relaxed)
    }

    /// Total number of direct lookups (hits + misses).
    #[inline]
    pub fn lookups(&self) -> u64 {
        self.hits() + self.misses()
    }

    /// Fraction of lookups that found an entry, or 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.lookups();
        if total == 0 {
            0.0
        } else {
            self.hits() as f64 / total as f64
        }
    }

    /// Fraction of lookups that missed, or 0.0 before any lookup.
    pub fn miss_rate(&self) -> f64 {
        let total = self.lookups();
        if total == 0 {
            0.0
        } else {
            self.misses() as f64 / total as f64
        }
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.removals.store(0, Ordering::Relaxed);
        self.disposals.store(0, Ordering::Relaxed);
    }
}

impl Default for CacheStats {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CacheStats {
    fn clone(&self) -> Self {
        Self {
            hits: AtomicU64::new(self.hits()),
            misses: AtomicU64::new(self.misses()),
            removals: AtomicU64::new(self.removals()),
            disposals: AtomicU64::new(self.disposals()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats() {
        let stats = CacheStats::new();
        assert_eq!(stats.lookups(), 0);
        assert_eq!(stats.removals(), 0);
        assert_eq!(stats.disposals(), 0);
    }

    #[test]
    fn test_rates() {
        let stats = CacheStats::new();
        assert_eq!(stats.hit_rate(), 0.0);
        assert_eq!(stats.miss_rate(), 0.0);

        stats.record_hit();
        stats.record_miss();
        stats.record_miss();
        stats.record_miss();
        assert!((stats.hit_rate() - 0.25).abs() < f64::EPSILON);
        assert!((stats.miss_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset() {
        let stats = CacheStats::new();
        stats.record_hit();
        stats.record_removal();
        stats.record_disposal();

        stats.reset();
        assert_eq!(stats.hits(), 0);
        assert_eq!(stats.removals(), 0);
        assert_eq!(stats.disposals(), 0);
    }

    #[test]
    fn test_clone_is_independent() {
        let stats = CacheStats::new();
        stats.record_removal();

        let cloned = stats.clone();
        stats.record_removal();
        assert_eq!(stats.removals(), 2);
        assert_eq!(cloned.removals(), 1);
    }
}
