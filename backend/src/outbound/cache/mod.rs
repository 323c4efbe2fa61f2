//! In-process page cache with time-based expiry.
//!
//! Entries live for a fixed TTL measured on an injected [`Clock`], so tests
//! can advance time deterministically. Every write sweeps expired entries,
//! and the map never holds more than `max_entries`: when full, the oldest
//! entry makes room for the new one.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{PageCache, PageCacheError, PageCacheKey};

/// Default lifetime of a cached page.
pub const DEFAULT_PAGE_TTL: Duration = Duration::from_secs(20);

/// Default bound on the number of cached pages.
pub const DEFAULT_MAX_ENTRIES: usize = 300;

struct Entry {
    body: String,
    stored_at: DateTime<Utc>,
}

/// [`PageCache`] adapter backed by a mutex-guarded map.
pub struct InMemoryPageCache {
    entries: Mutex<HashMap<PageCacheKey, Entry>>,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
    max_entries: usize,
}

impl InMemoryPageCache {
    /// Create an empty cache whose entries expire after `ttl`.
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }

    /// Bound the cache to `max_entries` pages (at least one).
    #[must_use]
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<PageCacheKey, Entry>>, PageCacheError> {
        self.entries
            .lock()
            .map_err(|_| PageCacheError::backend("page cache lock poisoned"))
    }

    fn is_live(&self, entry: &Entry, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.stored_at) < self.ttl
    }

    /// Drop expired entries, then the oldest ones until `incoming` fits.
    fn make_room(
        &self,
        entries: &mut HashMap<PageCacheKey, Entry>,
        incoming: &PageCacheKey,
        now: DateTime<Utc>,
    ) {
        let before = entries.len();
        entries.retain(|_, entry| self.is_live(entry, now));
        let expired = before - entries.len();
        if expired > 0 {
            debug!(expired, "page cache swept expired entries");
        }
        while entries.len() >= self.max_entries && !entries.contains_key(incoming) {
            let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(key, _)| key.clone())
            else {
                break;
            };
            debug!(key = %oldest, "page cache full, evicting oldest entry");
            entries.remove(&oldest);
        }
    }
}

#[async_trait]
impl PageCache for InMemoryPageCache {
    async fn get(&self, key: &PageCacheKey) -> Result<Option<String>, PageCacheError> {
        let now = self.clock.utc();
        let mut entries = self.lock()?;
        match entries.get(key).map(|entry| self.is_live(entry, now)) {
            Some(true) => Ok(entries.get(key).map(|entry| entry.body.clone())),
            Some(false) => {
                debug!(key = %key, "page cache entry expired");
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &PageCacheKey, body: String) -> Result<(), PageCacheError> {
        let stored_at = self.clock.utc();
        let mut entries = self.lock()?;
        self.make_room(&mut entries, key, stored_at);
        entries.insert(key.clone(), Entry { body, stored_at });
        Ok(())
    }

    async fn invalidate(&self, key: &PageCacheKey) -> Result<(), PageCacheError> {
        self.lock()?.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), PageCacheError> {
        self.lock()?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use rstest::{fixture, rstest};

    struct SteppingClock(Mutex<DateTime<Utc>>);

    impl SteppingClock {
        fn advance(&self, seconds: i64) {
            let mut now = self.0.lock().expect("clock lock");
            *now += TimeDelta::seconds(seconds);
        }
    }

    impl Clock for SteppingClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.0.lock().expect("clock lock")
        }
    }

    #[fixture]
    fn clock() -> Arc<SteppingClock> {
        let start = Utc
            .with_ymd_and_hms(2026, 5, 1, 8, 0, 0)
            .single()
            .expect("valid timestamp");
        Arc::new(SteppingClock(Mutex::new(start)))
    }

    fn key(query: &str) -> PageCacheKey {
        PageCacheKey::global_feed(query)
    }

    #[rstest]
    #[case(0, true)]
    #[case(19, true)]
    #[case(20, false)]
    #[case(45, false)]
    #[tokio::test]
    async fn entries_expire_after_the_ttl(
        clock: Arc<SteppingClock>,
        #[case] elapsed: i64,
        #[case] live: bool,
    ) {
        let cache = InMemoryPageCache::new(clock.clone(), DEFAULT_PAGE_TTL);
        cache.put(&key(""), "<ul/>".to_owned()).await.expect("put");

        clock.advance(elapsed);

        let hit = cache.get(&key("")).await.expect("get");
        assert_eq!(hit.is_some(), live);
    }

    #[rstest]
    #[tokio::test]
    async fn query_strings_cache_independently(clock: Arc<SteppingClock>) {
        let cache = InMemoryPageCache::new(clock, DEFAULT_PAGE_TTL);
        cache.put(&key("page=1"), "one".to_owned()).await.expect("put");
        cache.put(&key("page=2"), "two".to_owned()).await.expect("put");

        assert_eq!(cache.get(&key("page=1")).await.expect("get").as_deref(), Some("one"));
        assert_eq!(cache.get(&key("page=2")).await.expect("get").as_deref(), Some("two"));
    }

    #[rstest]
    #[tokio::test]
    async fn put_restarts_the_lifetime(clock: Arc<SteppingClock>) {
        let cache = InMemoryPageCache::new(clock.clone(), DEFAULT_PAGE_TTL);
        cache.put(&key(""), "old".to_owned()).await.expect("put");
        clock.advance(15);
        cache.put(&key(""), "new".to_owned()).await.expect("put");
        clock.advance(15);

        assert_eq!(cache.get(&key("")).await.expect("get").as_deref(), Some("new"));
    }

    fn stored(cache: &InMemoryPageCache) -> usize {
        cache.entries.lock().expect("cache lock").len()
    }

    #[rstest]
    #[tokio::test]
    async fn writes_sweep_expired_entries(clock: Arc<SteppingClock>) {
        let cache = InMemoryPageCache::new(clock.clone(), DEFAULT_PAGE_TTL);
        for n in 0..50 {
            cache
                .put(&key(&format!("junk={n}")), "stale".to_owned())
                .await
                .expect("put");
        }
        assert_eq!(stored(&cache), 50);

        clock.advance(20);
        cache.put(&key(""), "fresh".to_owned()).await.expect("put");

        assert_eq!(stored(&cache), 1);
        assert_eq!(cache.get(&key("")).await.expect("get").as_deref(), Some("fresh"));
    }

    #[rstest]
    #[tokio::test]
    async fn full_cache_evicts_the_oldest_entry(clock: Arc<SteppingClock>) {
        let cache = InMemoryPageCache::new(clock.clone(), DEFAULT_PAGE_TTL).with_max_entries(3);
        for query in ["a=1", "b=1", "c=1"] {
            cache.put(&key(query), query.to_owned()).await.expect("put");
            clock.advance(1);
        }

        cache.put(&key("d=1"), "d=1".to_owned()).await.expect("put");

        assert_eq!(stored(&cache), 3);
        assert!(cache.get(&key("a=1")).await.expect("get").is_none());
        for query in ["b=1", "c=1", "d=1"] {
            assert_eq!(
                cache.get(&key(query)).await.expect("get").as_deref(),
                Some(query)
            );
        }
    }

    #[rstest]
    #[tokio::test]
    async fn rewriting_a_key_in_a_full_cache_keeps_the_others(clock: Arc<SteppingClock>) {
        let cache = InMemoryPageCache::new(clock, DEFAULT_PAGE_TTL).with_max_entries(2);
        cache.put(&key("a=1"), "a".to_owned()).await.expect("put");
        cache.put(&key("b=1"), "b".to_owned()).await.expect("put");

        cache.put(&key("b=1"), "b2".to_owned()).await.expect("put");

        assert_eq!(cache.get(&key("a=1")).await.expect("get").as_deref(), Some("a"));
        assert_eq!(cache.get(&key("b=1")).await.expect("get").as_deref(), Some("b2"));
    }

    #[rstest]
    #[tokio::test]
    async fn invalidate_and_clear_drop_entries(clock: Arc<SteppingClock>) {
        let cache = InMemoryPageCache::new(clock, DEFAULT_PAGE_TTL);
        cache.put(&key("a=1"), "a".to_owned()).await.expect("put");
        cache.put(&key("b=1"), "b".to_owned()).await.expect("put");

        cache.invalidate(&key("a=1")).await.expect("invalidate");
        assert!(cache.get(&key("a=1")).await.expect("get").is_none());
        assert!(cache.get(&key("b=1")).await.expect("get").is_some());

        cache.clear().await.expect("clear");
        assert!(cache.get(&key("b=1")).await.expect("get").is_none());
    }
}
