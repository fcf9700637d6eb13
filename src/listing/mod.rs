//! Post listing: the first page fetch and incremental pagination

mod pagination;

pub use pagination::{PaginationError, Paginator};

use crate::cms::{self, DocumentStore, Predicate, Query};
use crate::content::PostPage;

/// Document type holding blog posts
pub const POST_TYPE: &str = "posts";

/// Fields requested for listing entries
pub const LISTING_FIELDS: [&str; 4] = ["posts.title", "posts.subtitle", "posts.author", "posts.slug"];

/// Default number of posts per listing page
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// The search behind the first listing page
pub fn listing_query(page_size: usize) -> Query {
    Query {
        predicates: vec![Predicate::at("document.type", POST_TYPE)],
        fetch: LISTING_FIELDS.iter().map(|f| f.to_string()).collect(),
        page_size,
    }
}

/// Fetch the first page of published posts
///
/// The store's ordering is kept as-is. Failures propagate; there is no retry.
pub async fn fetch_listing(store: &dyn DocumentStore, page_size: usize) -> cms::Result<PostPage> {
    let response = store.query(&listing_query(page_size)).await?;
    let page = PostPage::from(response);
    check_page_size(&page, page_size)?;

    tracing::debug!(
        "Fetched listing: {} posts, more={}",
        page.results.len(),
        page.next_page.is_some()
    );
    Ok(page)
}

pub(crate) fn check_page_size(page: &PostPage, page_size: usize) -> cms::Result<()> {
    if page.results.len() > page_size {
        return Err(cms::Error::Malformed(format!(
            "page holds {} posts, more than the page size of {}",
            page.results.len(),
            page_size
        )));
    }
    Ok(())
}
