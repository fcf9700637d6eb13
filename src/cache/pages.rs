//! Continuation pages shared between listing views

use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::cms::{Document, DocumentStore, Query, Result, SearchResponse};

/// A document store that remembers `next_page` responses by URL
///
/// Searches and uid lookups go straight to the inner store. Failed page
/// fetches are not remembered.
pub struct PageCache {
    inner: Arc<dyn DocumentStore>,
    pages: Mutex<LruCache<String, (Instant, SearchResponse)>>,
    ttl: Duration,
}

impl PageCache {
    pub fn new(inner: Arc<dyn DocumentStore>, ttl: Duration, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            pages: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub async fn len(&self) -> usize {
        self.pages.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.pages.lock().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for PageCache {
    async fn query(&self, query: &Query) -> Result<SearchResponse> {
        self.inner.query(query).await
    }

    async fn fetch_page(&self, url: &str) -> Result<SearchResponse> {
        if let Some((fetched_at, page)) = self.pages.lock().await.get(url) {
            if fetched_at.elapsed() < self.ttl {
                tracing::debug!("Serving cached listing page");
                return Ok(page.clone());
            }
        }

        let page = self.inner.fetch_page(url).await?;
        self.pages
            .lock()
            .await
            .put(url.to_string(), (Instant::now(), page.clone()));
        Ok(page)
    }

    async fn get_by_uid(&self, document_type: &str, uid: &str) -> Result<Option<Document>> {
        self.inner.get_by_uid(document_type, uid).await
    }
}
