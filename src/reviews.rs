//! Review feed for the carousel
//!
//! Applies the caching policy: serve a fresh cached set when there is one,
//! otherwise fetch from the backend and cache the result. A failed fetch
//! shows an empty state rather than an error, and never touches the cache.

use tracing::{info, warn};

use crate::api::ApiClient;
use crate::cache::ReviewCache;
use crate::clock::Clock;
use crate::data::ReviewRecord;
use crate::storage::KeyValueStore;

/// Number of words shown from a review before it is cut off
pub const REVIEW_EXCERPT_WORDS: usize = 15;

/// Highest rating on the star scale
pub const MAX_RATING: f64 = 5.0;

/// Where a loaded review list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewSource {
    Cache,
    Network,
}

/// What the carousel should display
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewsView {
    Loaded {
        reviews: Vec<ReviewRecord>,
        source: ReviewSource,
    },
    /// No reviews could be shown: the fetch failed or returned none
    Empty,
}

impl ReviewsView {
    pub fn reviews(&self) -> &[ReviewRecord] {
        match self {
            ReviewsView::Loaded { reviews, .. } => reviews,
            ReviewsView::Empty => &[],
        }
    }
}

/// Loads reviews through the cache
#[derive(Debug, Clone)]
pub struct ReviewFeed<S, C> {
    cache: ReviewCache<S, C>,
}

impl<S: KeyValueStore, C: Clock> ReviewFeed<S, C> {
    pub fn new(cache: ReviewCache<S, C>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &ReviewCache<S, C> {
        &self.cache
    }

    /// Returns cached reviews if fresh, otherwise fetches and caches them
    pub async fn load(&self, api: &ApiClient) -> ReviewsView {
        if let Some(cached) = self.cache.read() {
            info!(count = cached.reviews.len(), "using cached reviews");
            return Self::view(cached.reviews, ReviewSource::Cache);
        }

        match api.fetch_reviews().await {
            Ok(reviews) => {
                info!(count = reviews.len(), "fetched reviews");
                self.cache.write(reviews.clone());
                Self::view(reviews, ReviewSource::Network)
            }
            Err(err) => {
                warn!(error = %err, "error fetching reviews");
                ReviewsView::Empty
            }
        }
    }

    fn view(reviews: Vec<ReviewRecord>, source: ReviewSource) -> ReviewsView {
        if reviews.is_empty() {
            ReviewsView::Empty
        } else {
            ReviewsView::Loaded { reviews, source }
        }
    }
}

impl ReviewRecord {
    /// Reviewer's "first last" name, empty when unknown
    pub fn author_name(&self) -> String {
        match &self.user {
            Some(user) => format!("{} {}", user.first_name, user.last_name)
                .trim()
                .to_string(),
            None => String::new(),
        }
    }

    /// Avatar URL, falling back to a generated initials image
    pub fn avatar_url(&self) -> String {
        if let Some(image) = self.user.as_ref().and_then(|u| u.image.as_deref()) {
            if !image.is_empty() {
                return image.to_string();
            }
        }
        let (first, last) = self
            .user
            .as_ref()
            .map(|u| (u.first_name.as_str(), u.last_name.as_str()))
            .unwrap_or_default();
        format!(
            "https://api.dicebear.com/5.x/initials/svg?seed={}%20{}",
            first, last
        )
    }

    pub fn course_name(&self) -> &str {
        self.course
            .as_ref()
            .map(|c| c.course_name.as_str())
            .unwrap_or_default()
    }

    /// Review text cut to `max_words` words, with " ..." when shortened
    pub fn excerpt(&self, max_words: usize) -> String {
        let words: Vec<&str> = self.review.split(' ').collect();
        if words.len() > max_words {
            format!("{} ...", words[..max_words].join(" "))
        } else {
            self.review.clone()
        }
    }

    /// Rating clamped onto the 0-5 star scale
    pub fn stars(&self) -> f64 {
        if self.rating.is_finite() {
            self.rating.clamp(0.0, MAX_RATING)
        } else {
            0.0
        }
    }

    /// Rating with one decimal, e.g. "4.5"; only the star bar is clamped
    pub fn rating_label(&self) -> String {
        if self.rating.is_finite() {
            format!("{:.1}", self.rating)
        } else {
            "0.0".to_string()
        }
    }
}
