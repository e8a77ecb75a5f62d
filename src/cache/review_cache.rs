//! Single-slot, time-bounded cache of review data

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::data::ReviewRecord;
use crate::storage::KeyValueStore;

/// Storage key holding the cached review set
pub const REVIEW_CACHE_KEY: &str = "cached_reviews";

/// How long a cached review set stays valid
pub const REVIEW_CACHE_TTL_HOURS: i64 = 12;

/// Largest deviation from the 12 hour window still accepted on read
const WINDOW_SKEW_SECS: i64 = 1;

/// A review list together with its validity window
///
/// Serialized as `{"reviews": [...], "timestamp": ms, "expiration": ms}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedReviewSet {
    /// Reviews in server order
    pub reviews: Vec<ReviewRecord>,
    /// When the reviews were fetched and cached
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub stored_at: DateTime<Utc>,
    /// First instant at which the set is stale
    #[serde(rename = "expiration", with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
}

impl CachedReviewSet {
    fn new(reviews: Vec<ReviewRecord>, stored_at: DateTime<Utc>) -> Self {
        Self {
            reviews,
            stored_at,
            expires_at: stored_at + ttl(),
        }
    }

    /// Valid strictly before `expires_at`; the expiry instant itself is stale
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Writers that stamp both fields from separate clock reads can drift
    /// by a few milliseconds
    fn has_consistent_window(&self) -> bool {
        let skew = (self.expires_at - self.stored_at - ttl()).abs();
        skew <= Duration::seconds(WINDOW_SKEW_SECS)
    }
}

fn ttl() -> Duration {
    Duration::hours(REVIEW_CACHE_TTL_HOURS)
}

/// Detailed result of inspecting the cache slot
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    /// Nothing has been stored yet
    Missing,
    /// Something is stored but it is not a valid review set
    Corrupt,
    /// The stored set has expired
    Stale(CachedReviewSet),
    /// The stored set is still valid
    Fresh(CachedReviewSet),
}

/// Time-bounded review cache over an injected store and clock
#[derive(Debug, Clone)]
pub struct ReviewCache<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: KeyValueStore> ReviewCache<S> {
    /// Creates a cache that reads wall-clock time
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> ReviewCache<S, C> {
    /// Creates a cache with a custom time source
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// The time source expiry is judged against
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Inspects the slot and classifies what is there
    ///
    /// Corrupt entries are logged as warnings; expiry is routine and only
    /// logged at debug level.
    pub fn lookup(&self) -> CacheLookup {
        let Some(raw) = self.store.get_item(REVIEW_CACHE_KEY) else {
            debug!("review cache empty");
            return CacheLookup::Missing;
        };

        let entry = match serde_json::from_str::<CachedReviewSet>(&raw) {
            Ok(entry) if entry.has_consistent_window() => entry,
            Ok(entry) => {
                warn!(
                    stored_at = %entry.stored_at,
                    expires_at = %entry.expires_at,
                    "review cache entry has an inconsistent validity window, ignoring it"
                );
                return CacheLookup::Corrupt;
            }
            Err(err) => {
                warn!(error = %err, "review cache entry is unreadable, ignoring it");
                return CacheLookup::Corrupt;
            }
        };

        if entry.is_fresh_at(self.clock.now()) {
            CacheLookup::Fresh(entry)
        } else {
            debug!(expires_at = %entry.expires_at, "review cache entry expired");
            CacheLookup::Stale(entry)
        }
    }

    /// Returns the cached set only while it is still valid
    pub fn read(&self) -> Option<CachedReviewSet> {
        match self.lookup() {
            CacheLookup::Fresh(entry) => Some(entry),
            CacheLookup::Missing | CacheLookup::Corrupt | CacheLookup::Stale(_) => None,
        }
    }

    /// Replaces the slot with `reviews`, valid for the next twelve hours
    ///
    /// A store that refuses the write is logged and otherwise ignored.
    pub fn write(&self, reviews: Vec<ReviewRecord>) {
        let entry = CachedReviewSet::new(reviews, self.clock.now());
        let json = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "could not serialize reviews for caching");
                return;
            }
        };

        match self.store.set_item(REVIEW_CACHE_KEY, &json) {
            Ok(()) => debug!(
                count = entry.reviews.len(),
                expires_at = %entry.expires_at,
                "cached reviews"
            ),
            Err(err) => warn!(error = %err, "review cache write rejected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::data::{Author, CourseSummary};
    use crate::storage::MemoryStore;
    use chrono::TimeZone;

    fn review(text: &str, rating: f64) -> ReviewRecord {
        ReviewRecord {
            rating,
            review: text.to_string(),
            user: Some(Author {
                first_name: "Asha".to_string(),
                last_name: "Rao".to_string(),
                image: None,
            }),
            course: Some(CourseSummary {
                course_name: "Rust Basics".to_string(),
            }),
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 15, 8, 0, 0).unwrap()
    }

    fn create_test_cache() -> ReviewCache<MemoryStore, ManualClock> {
        ReviewCache::with_clock(MemoryStore::new(), ManualClock::new(t0()))
    }

    #[test]
    fn test_read_returns_none_when_nothing_cached() {
        let cache = create_test_cache();
        assert!(cache.read().is_none());
        assert_eq!(cache.lookup(), CacheLookup::Missing);
    }

    #[test]
    fn test_write_records_twelve_hour_window() {
        let cache = create_test_cache();

        cache.write(vec![review("great", 5.0)]);

        let entry = cache.read().expect("Fresh entry should be readable");
        assert_eq!(entry.stored_at, t0());
        assert_eq!(entry.expires_at, t0() + Duration::hours(12));
    }

    #[test]
    fn test_entry_valid_until_just_before_expiry() {
        let cache = create_test_cache();
        let reviews = vec![review("first", 4.0), review("second", 3.5)];

        cache.write(reviews.clone());
        cache.clock.set(t0() + Duration::hours(11) + Duration::minutes(59));

        let entry = cache.read().expect("Entry should still be valid");
        assert_eq!(entry.reviews, reviews);
    }

    #[test]
    fn test_entry_expires_exactly_at_twelve_hours() {
        let cache = create_test_cache();
        cache.write(vec![review("first", 4.0)]);

        cache.clock.set(t0() + Duration::hours(12));
        assert!(cache.read().is_none(), "Expiry instant must be treated as stale");
        assert!(matches!(cache.lookup(), CacheLookup::Stale(_)));

        cache.clock.set(t0() + Duration::days(3));
        assert!(cache.read().is_none());
    }

    #[test]
    fn test_write_replaces_previous_set_entirely() {
        let cache = create_test_cache();
        let a = vec![review("a1", 1.0), review("a2", 2.0)];
        let b = vec![review("b1", 5.0)];

        cache.write(a);
        cache.write(b.clone());

        assert_eq!(cache.read().unwrap().reviews, b);
    }

    #[test]
    fn test_rewrite_restarts_the_window() {
        let cache = create_test_cache();
        cache.write(vec![review("old", 2.0)]);

        cache.clock.advance(Duration::hours(13));
        assert!(cache.read().is_none());

        cache.write(vec![review("new", 4.0)]);
        let entry = cache.read().expect("Rewritten entry should be fresh");
        assert_eq!(entry.stored_at, t0() + Duration::hours(13));
        assert_eq!(entry.reviews[0].review, "new");
    }

    #[test]
    fn test_unparseable_value_is_a_miss() {
        let store = MemoryStore::new().with_item(REVIEW_CACHE_KEY, "{\"reviews\": [trunc");
        let cache = ReviewCache::with_clock(store, ManualClock::new(t0()));

        assert!(cache.read().is_none());
        assert_eq!(cache.lookup(), CacheLookup::Corrupt);
    }

    #[test]
    fn test_non_conforming_json_is_a_miss() {
        let store = MemoryStore::new().with_item(REVIEW_CACHE_KEY, r#"{"reviews": "nope"}"#);
        let cache = ReviewCache::with_clock(store, ManualClock::new(t0()));

        assert_eq!(cache.lookup(), CacheLookup::Corrupt);
    }

    #[test]
    fn test_entry_missing_expiration_is_a_miss() {
        let raw = format!(r#"{{"reviews": [], "timestamp": {}}}"#, t0().timestamp_millis());
        let store = MemoryStore::new().with_item(REVIEW_CACHE_KEY, &raw);
        let cache = ReviewCache::with_clock(store, ManualClock::new(t0()));

        assert_eq!(cache.lookup(), CacheLookup::Corrupt);
    }

    #[test]
    fn test_entry_with_tampered_window_is_a_miss() {
        let raw = format!(
            r#"{{"reviews": [], "timestamp": {}, "expiration": {}}}"#,
            t0().timestamp_millis(),
            (t0() + Duration::days(30)).timestamp_millis()
        );
        let store = MemoryStore::new().with_item(REVIEW_CACHE_KEY, &raw);
        let cache = ReviewCache::with_clock(store, ManualClock::new(t0()));

        assert_eq!(cache.lookup(), CacheLookup::Corrupt);
    }

    #[test]
    fn test_window_off_by_a_millisecond_is_still_valid() {
        let raw = format!(
            r#"{{"reviews": [{{"rating": 4, "review": "ok"}}], "timestamp": {}, "expiration": {}}}"#,
            t0().timestamp_millis(),
            (t0() + Duration::hours(12) + Duration::milliseconds(1)).timestamp_millis()
        );
        let store = MemoryStore::new().with_item(REVIEW_CACHE_KEY, &raw);
        let cache = ReviewCache::with_clock(store, ManualClock::new(t0() + Duration::hours(1)));

        assert!(matches!(cache.lookup(), CacheLookup::Fresh(_)));
        assert_eq!(cache.read().unwrap().reviews[0].review, "ok");
    }

    #[test]
    fn test_entry_with_null_rating_is_served() {
        let raw = format!(
            r#"{{"reviews": [{{"rating": null, "review": "ok"}}], "timestamp": {}, "expiration": {}}}"#,
            t0().timestamp_millis(),
            (t0() + Duration::hours(12)).timestamp_millis()
        );
        let store = MemoryStore::new().with_item(REVIEW_CACHE_KEY, &raw);
        let cache = ReviewCache::with_clock(store, ManualClock::new(t0() + Duration::hours(1)));

        let entry = cache.read().expect("Null rating should not corrupt the entry");
        assert_eq!(entry.reviews[0].rating, 0.0);
    }

    #[test]
    fn test_reads_entries_in_browser_storage_layout() {
        let raw = format!(
            r#"{{"reviews": [{{"rating": 5, "review": "Loved it"}}], "timestamp": {}, "expiration": {}}}"#,
            t0().timestamp_millis(),
            (t0() + Duration::hours(12)).timestamp_millis()
        );
        let store = MemoryStore::new().with_item(REVIEW_CACHE_KEY, &raw);
        let cache = ReviewCache::with_clock(store, ManualClock::new(t0() + Duration::hours(1)));

        let entry = cache.read().expect("Entry should parse");
        assert_eq!(entry.reviews.len(), 1);
        assert_eq!(entry.reviews[0].review, "Loved it");
    }

    #[test]
    fn test_consecutive_reads_are_equal() {
        let cache = create_test_cache();
        cache.write(vec![review("same", 3.0)]);

        assert_eq!(cache.read(), cache.read());

        cache.clock.advance(Duration::hours(12));
        assert_eq!(cache.read(), cache.read());
    }

    #[test]
    fn test_rejected_write_is_swallowed() {
        let cache = ReviewCache::with_clock(MemoryStore::read_only(), ManualClock::new(t0()));

        cache.write(vec![review("lost", 5.0)]);

        assert!(cache.read().is_none());
    }

    #[test]
    fn test_rejected_write_keeps_previous_entry() {
        let seeded = serde_json::to_string(&CachedReviewSet::new(vec![review("kept", 4.0)], t0()))
            .unwrap();
        let store = MemoryStore::read_only().with_item(REVIEW_CACHE_KEY, &seeded);
        let cache = ReviewCache::with_clock(store, ManualClock::new(t0()));

        cache.write(vec![review("dropped", 1.0)]);

        assert_eq!(cache.read().unwrap().reviews[0].review, "kept");
    }

    #[test]
    fn test_cache_over_file_store_survives_restart() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");
        let clock = ManualClock::new(t0());
        let reviews = vec![review("persisted", 4.5)];

        let first = ReviewCache::with_clock(
            crate::storage::FileStore::with_dir(temp_dir.path().to_path_buf()),
            &clock,
        );
        first.write(reviews.clone());

        let second = ReviewCache::with_clock(
            crate::storage::FileStore::with_dir(temp_dir.path().to_path_buf()),
            &clock,
        );
        assert_eq!(second.read().unwrap().reviews, reviews);
    }
}
