//! Expiring cache for point-of-interest search results.
//!
//! Entries are stamped when stored and count as misses once they are older
//! than the expiration window. Stale entries are not evicted; they stay in
//! the map until the next `store` for the same key replaces them.
//!
//! Timestamps come from `tokio::time::Instant`, so tests can pause and
//! advance the clock instead of sleeping.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

/// Default expiration window: 1 hour.
const DEFAULT_EXPIRATION: Duration = Duration::from_secs(60 * 60);

/// Configuration for the search cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a stored result stays valid.
    pub expiration: Duration,
}

impl CacheConfig {
    pub fn with_expiration(mut self, expiration: Duration) -> Self {
        self.expiration = expiration;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            expiration: DEFAULT_EXPIRATION,
        }
    }
}

struct CacheEntry<T> {
    value: T,
    stored_at: Instant,
}

/// Cache of search results keyed by a normalized query string.
///
/// All access goes through one `RwLock`, so concurrent lookups never see a
/// half-written entry.
pub struct ExpiringSearchCache<T> {
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
    expiration: Duration,
}

impl<T: Clone> ExpiringSearchCache<T> {
    /// Create an empty cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            expiration: config.expiration,
        }
    }

    /// Get the value for `key` if it was stored less than one expiration
    /// window ago.
    pub async fn lookup(&self, key: &str) -> Option<T> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        let age = Instant::now().saturating_duration_since(entry.stored_at);
        (age < self.expiration).then(|| entry.value.clone())
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub async fn store(&self, key: impl Into<String>, value: T) {
        let entry = CacheEntry {
            value,
            stored_at: Instant::now(),
        };
        self.entries.write().await.insert(key.into(), entry);
    }

    /// Number of stored entries, including expired ones.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// The configured expiration window.
    pub fn expiration(&self) -> Duration {
        self.expiration
    }
}
