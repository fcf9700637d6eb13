//! Post detail lookup by slug

use crate::cms::{self, DocumentStore};
use crate::content::PostDetail;
use crate::listing::POST_TYPE;

/// Outcome of resolving a slug
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    /// The document is still being fetched
    Pending,
    Resolved(T),
    /// The store has no document with this slug
    NotFound,
}

impl<T> Resolution<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolution<U> {
        match self {
            Self::Pending => Resolution::Pending,
            Self::Resolved(value) => Resolution::Resolved(f(value)),
            Self::NotFound => Resolution::NotFound,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn resolved(&self) -> Option<&T> {
        match self {
            Self::Resolved(value) => Some(value),
            _ => None,
        }
    }
}

/// Fetch the full post with the given slug
///
/// An empty slug or an unknown one resolves to [`Resolution::NotFound`]
/// without being treated as an error. Store failures propagate.
pub async fn fetch_post(store: &dyn DocumentStore, slug: &str) -> cms::Result<Resolution<PostDetail>> {
    let slug = slug.trim();
    if slug.is_empty() {
        return Ok(Resolution::NotFound);
    }

    match store.get_by_uid(POST_TYPE, slug).await? {
        Some(doc) => Ok(Resolution::Resolved(PostDetail::try_from(doc)?)),
        None => {
            tracing::debug!("No post with slug {}", slug);
            Ok(Resolution::NotFound)
        }
    }
}
