//! Incremental "load more" pagination over continuation URLs

use std::collections::HashSet;
use thiserror::Error;

use super::check_page_size;
use crate::cms::{self, DocumentStore};
use crate::content::{PostPage, PostSummary};

#[derive(Debug, Error)]
pub enum PaginationError {
    /// The last page has already been loaded
    #[error("no further pages to load")]
    Exhausted,
    #[error(transparent)]
    Fetch(#[from] cms::Error),
}

/// Accumulated listing state of one listing view
///
/// Posts are only ever appended, in the order received, and each uid
/// appears once. Once the continuation URL is gone it never comes back for
/// this instance.
///
/// `load_more` borrows the paginator mutably for as long as its request is
/// in flight, so a second load cannot start before the first one resolves.
/// Dropping that future mid-request leaves the state untouched.
#[derive(Debug, Clone)]
pub struct Paginator {
    posts: Vec<PostSummary>,
    next_page: Option<String>,
    page_size: usize,
    pages_loaded: usize,
    visited: HashSet<String>,
    uids: HashSet<String>,
}

impl Paginator {
    /// Start from the first listing page
    pub fn new(initial: PostPage, page_size: usize) -> Self {
        let mut uids = HashSet::new();
        let posts = initial
            .results
            .into_iter()
            .filter(|post| uids.insert(post.uid.clone()))
            .collect();

        Self {
            posts,
            next_page: initial.next_page,
            page_size,
            pages_loaded: 1,
            visited: HashSet::new(),
            uids,
        }
    }

    pub fn posts(&self) -> &[PostSummary] {
        &self.posts
    }

    pub fn into_posts(self) -> Vec<PostSummary> {
        self.posts
    }

    /// Continuation URL of the next page, if any
    pub fn next_page(&self) -> Option<&str> {
        self.next_page.as_deref()
    }

    /// Whether the "load more" control should be offered
    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }

    /// Number of pages accumulated so far, the first one included
    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }

    /// Fetch the next page and append it
    ///
    /// Returns the number of posts appended; posts already held (a listing
    /// that shifted between requests) are skipped. On any error the state is
    /// left exactly as it was.
    pub async fn load_more(&mut self, store: &dyn DocumentStore) -> Result<usize, PaginationError> {
        let url = self.next_page.clone().ok_or(PaginationError::Exhausted)?;

        let response = store.fetch_page(&url).await?;
        let page = PostPage::from(response);
        check_page_size(&page, self.page_size)?;

        self.visited.insert(url);
        let before = self.posts.len();
        for post in page.results {
            if self.uids.insert(post.uid.clone()) {
                self.posts.push(post);
            } else {
                tracing::debug!("Skipping repeated post {}", post.uid);
            }
        }
        let added = self.posts.len() - before;
        self.next_page = page.next_page.filter(|next| {
            let unseen = !self.visited.contains(next);
            if !unseen {
                tracing::warn!("Continuation URL repeats an earlier page, stopping pagination");
            }
            unseen
        });
        self.pages_loaded += 1;

        tracing::debug!(
            "Loaded page {}: +{} posts, {} total",
            self.pages_loaded,
            added,
            self.posts.len()
        );
        Ok(added)
    }
}
