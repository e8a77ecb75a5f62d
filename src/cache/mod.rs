//! Review cache
//!
//! Keeps the most recently fetched list of reviews in persistent storage for
//! twelve hours so the carousel does not refetch on every start. The cache is
//! a single slot under a fixed key: every successful write replaces the
//! previous entry, and staleness is only detected when the entry is read.

mod review_cache;

pub use review_cache::{
    CacheLookup, CachedReviewSet, ReviewCache, REVIEW_CACHE_KEY, REVIEW_CACHE_TTL_HOURS,
};
