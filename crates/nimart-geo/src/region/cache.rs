//! Read-through TTL cache over a [`RegionDataSource`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use super::source::RegionDataSource;
use crate::error::GeoError;
use crate::types::Region;

/// How long a fetched region list is served before it is re-fetched.
pub const DEFAULT_REGION_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Time source for cache expiry, swappable in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug)]
struct CachedRegions {
    regions: Arc<Vec<Region>>,
    fetched_at: Instant,
}

/// Caches the region list for `ttl`.
///
/// Concurrent callers that all see a stale entry each re-fetch; the source is
/// idempotent so the duplicate work is harmless and the last write wins.
#[derive(Debug)]
pub struct RegionCache<S, C = SystemClock> {
    source: S,
    clock: C,
    ttl: Duration,
    entry: RwLock<Option<CachedRegions>>,
}

impl<S: RegionDataSource> RegionCache<S, SystemClock> {
    #[must_use]
    pub fn new(source: S, ttl: Duration) -> Self {
        Self::with_clock(source, ttl, SystemClock)
    }
}

impl<S, C> RegionCache<S, C>
where
    S: RegionDataSource,
    C: Clock,
{
    #[must_use]
    pub fn with_clock(source: S, ttl: Duration, clock: C) -> Self {
        Self {
            source,
            clock,
            ttl,
            entry: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached regions, fetching first if the entry is missing or expired.
    ///
    /// # Errors
    ///
    /// Propagates the source's error when a fetch is needed and fails. A
    /// stale entry is left in place in that case.
    pub async fn get(&self) -> Result<Arc<Vec<Region>>, GeoError> {
        {
            let entry = self.entry.read().await;
            if let Some(cached) = entry.as_ref() {
                if self.clock.now().saturating_duration_since(cached.fetched_at) < self.ttl {
                    return Ok(Arc::clone(&cached.regions));
                }
            }
        }
        self.refresh().await
    }

    /// Fetch from the source unconditionally and replace the entry.
    ///
    /// # Errors
    ///
    /// Propagates the source's error; the previous entry is kept.
    pub async fn refresh(&self) -> Result<Arc<Vec<Region>>, GeoError> {
        let regions = Arc::new(self.source.fetch_regions().await?);
        tracing::debug!(
            source = self.source.name(),
            count = regions.len(),
            "region cache refreshed"
        );
        *self.entry.write().await = Some(CachedRegions {
            regions: Arc::clone(&regions),
            fetched_at: self.clock.now(),
        });
        Ok(regions)
    }

    /// Drop the cached entry so the next [`get`](Self::get) fetches.
    pub async fn invalidate(&self) {
        *self.entry.write().await = None;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::region::NIGERIAN_STATES;

    /// Clock that only moves when told to.
    pub(crate) struct FakeClock {
        now: Mutex<Instant>,
    }

    impl FakeClock {
        pub(crate) fn new() -> Self {
            Self {
                now: Mutex::new(Instant::now()),
            }
        }

        pub(crate) fn advance(&self, by: Duration) {
            let mut now = self.now.lock().expect("clock lock");
            *now += by;
        }
    }

    impl Clock for Arc<FakeClock> {
        fn now(&self) -> Instant {
            *self.now.lock().expect("clock lock")
        }
    }

    /// Counts fetches and can be switched into a failing mode.
    pub(crate) struct CountingSource {
        pub(crate) calls: AtomicU32,
        pub(crate) fail: AtomicBool,
    }

    impl CountingSource {
        pub(crate) fn new() -> Self {
            Self {
                calls: AtomicU32::new(0),
                fail: AtomicBool::new(false),
            }
        }
    }

    impl RegionDataSource for Arc<CountingSource> {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn fetch_regions(&self) -> Result<Vec<Region>, GeoError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                Err(GeoError::EmptyRegionList)
            } else {
                Ok(NIGERIAN_STATES.to_vec())
            }
        }
    }

    fn cache_with(
        ttl: Duration,
    ) -> (
        RegionCache<Arc<CountingSource>, Arc<FakeClock>>,
        Arc<CountingSource>,
        Arc<FakeClock>,
    ) {
        let source = Arc::new(CountingSource::new());
        let clock = Arc::new(FakeClock::new());
        let cache = RegionCache::with_clock(Arc::clone(&source), ttl, Arc::clone(&clock));
        (cache, source, clock)
    }

    #[tokio::test]
    async fn first_get_fetches_then_serves_from_cache() {
        let (cache, source, _clock) = cache_with(DEFAULT_REGION_CACHE_TTL);
        let first = cache.get().await.expect("first");
        let second = cache.get().await.expect("second");
        assert_eq!(first.len(), 37);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn entry_expires_after_ttl() {
        let (cache, source, clock) = cache_with(Duration::from_secs(300));
        cache.get().await.expect("first");

        clock.advance(Duration::from_secs(299));
        cache.get().await.expect("still fresh");
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        clock.advance(Duration::from_secs(1));
        cache.get().await.expect("expired");
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_stale_entry() {
        let (cache, source, clock) = cache_with(Duration::from_secs(60));
        let first = cache.get().await.expect("first");

        source.fail.store(true, Ordering::SeqCst);
        clock.advance(Duration::from_secs(61));
        assert!(cache.get().await.is_err());

        source.fail.store(false, Ordering::SeqCst);
        let entry = cache.entry.read().await;
        let stale = entry.as_ref().expect("stale entry kept");
        assert!(Arc::ptr_eq(&stale.regions, &first));
    }

    #[tokio::test]
    async fn refresh_and_invalidate_force_fetches() {
        let (cache, source, _clock) = cache_with(DEFAULT_REGION_CACHE_TTL);
        cache.get().await.expect("first");
        cache.refresh().await.expect("refresh");
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);

        cache.invalidate().await;
        cache.get().await.expect("after invalidate");
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }
}
