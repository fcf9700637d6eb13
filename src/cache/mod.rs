//! Generated detail pages with stale-while-revalidate
//!
//! The first request for a slug starts a background fetch and sees
//! [`Resolution::Pending`]. Once resolved, an entry is served as-is for the
//! revalidation window; after that the next request still gets the cached
//! state while a single background refetch replaces it.
//!
//! Both caches here are bounded; the least recently used entry is dropped
//! once a cache is full.

mod pages;

pub use pages::PageCache;

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::cms::DocumentStore;
use crate::content::PostDetail;
use crate::detail::{fetch_post, Resolution};

/// Default freshness window of a generated page
pub const DEFAULT_REVALIDATE: Duration = Duration::from_secs(30 * 60);

/// Default number of slugs kept
pub const DEFAULT_CAPACITY: usize = 1000;

/// Cached state of one slug
#[derive(Debug, Clone)]
struct CacheEntry {
    state: Resolution<Arc<PostDetail>>,
    /// When `state` was last fetched; `None` while still pending
    fetched_at: Option<Instant>,
    /// A fetch for this slug is in flight
    refreshing: bool,
}

impl CacheEntry {
    fn pending() -> Self {
        Self {
            state: Resolution::Pending,
            fetched_at: None,
            refreshing: true,
        }
    }

    fn fetched(state: Resolution<Arc<PostDetail>>) -> Self {
        Self {
            state,
            fetched_at: Some(Instant::now()),
            refreshing: false,
        }
    }

    fn is_stale(&self, now: Instant, revalidate: Duration) -> bool {
        match self.fetched_at {
            Some(at) => now.saturating_duration_since(at) >= revalidate,
            None => false,
        }
    }
}

/// Result of a cache lookup
#[derive(Debug)]
pub struct Lookup {
    /// What to render now
    pub state: Resolution<Arc<PostDetail>>,
    /// Background fetch started by this lookup, if any
    pub refresh: Option<JoinHandle<()>>,
}

/// Shared cache of resolved post pages
#[derive(Clone)]
pub struct DetailCache {
    store: Arc<dyn DocumentStore>,
    entries: Arc<Mutex<LruCache<String, CacheEntry>>>,
    revalidate: Duration,
}

impl DetailCache {
    pub fn new(store: Arc<dyn DocumentStore>, revalidate: Duration) -> Self {
        Self::with_capacity(store, revalidate, DEFAULT_CAPACITY)
    }

    /// A cache holding at most `capacity` slugs (at least one)
    pub fn with_capacity(store: Arc<dyn DocumentStore>, revalidate: Duration, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            store,
            entries: Arc::new(Mutex::new(LruCache::new(capacity))),
            revalidate,
        }
    }

    pub fn revalidate(&self) -> Duration {
        self.revalidate
    }

    /// Look up a slug, starting a background fetch when it is unknown or stale
    ///
    /// Slugs are trimmed, so `"abc "` and `"abc"` share one entry.
    pub async fn lookup(&self, slug: &str) -> Lookup {
        let slug = slug.trim();
        let now = Instant::now();
        let mut entries = self.entries.lock().await;

        match entries.get_mut(slug) {
            Some(entry) => {
                let refresh = if !entry.refreshing && entry.is_stale(now, self.revalidate) {
                    tracing::debug!("Revalidating {}", slug);
                    entry.refreshing = true;
                    Some(self.spawn_fetch(slug))
                } else {
                    None
                };
                Lookup {
                    state: entry.state.clone(),
                    refresh,
                }
            }
            None => {
                tracing::debug!("Resolving {} in the background", slug);
                entries.put(slug.to_string(), CacheEntry::pending());
                Lookup {
                    state: Resolution::Pending,
                    refresh: Some(self.spawn_fetch(slug)),
                }
            }
        }
    }

    /// Fetch a slug now and store the result, bypassing the freshness check
    pub async fn prerender(&self, slug: &str) -> crate::cms::Result<Resolution<Arc<PostDetail>>> {
        let slug = slug.trim();
        let state = fetch_post(self.store.as_ref(), slug).await?.map(Arc::new);
        self.entries
            .lock()
            .await
            .put(slug.to_string(), CacheEntry::fetched(state.clone()));
        Ok(state)
    }

    /// Current state of a slug without triggering any fetch
    pub async fn peek(&self, slug: &str) -> Option<Resolution<Arc<PostDetail>>> {
        self.entries
            .lock()
            .await
            .peek(slug.trim())
            .map(|e| e.state.clone())
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    pub async fn capacity(&self) -> usize {
        self.entries.lock().await.cap().get()
    }

    fn spawn_fetch(&self, slug: &str) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let entries = Arc::clone(&self.entries);
        let slug = slug.to_string();

        tokio::spawn(async move {
            let result = fetch_post(store.as_ref(), &slug).await;
            let mut entries = entries.lock().await;

            match result {
                Ok(state) => {
                    entries.put(slug, CacheEntry::fetched(state.map(Arc::new)));
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch post {}: {}", slug, e);
                    let pending = entries.peek(&slug).map(|entry| entry.state.is_pending());
                    match pending {
                        // nothing to keep serving; the next request retries
                        Some(true) => {
                            entries.pop(&slug);
                        }
                        Some(false) => {
                            if let Some(entry) = entries.peek_mut(&slug) {
                                entry.refreshing = false;
                            }
                        }
                        None => {}
                    }
                }
            }
        })
    }
}
