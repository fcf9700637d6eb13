//! List posts

use anyhow::{Context, Result};

use crate::cms::DocumentStore;
use crate::helpers::Helpers;
use crate::listing::{fetch_listing, Paginator};
use crate::Spacetraveling;

/// Print the listing with `pages` accumulated pages
pub async fn run(app: &Spacetraveling, pages: usize) -> Result<()> {
    let store = app.store()?;
    let paginator = collect(store.as_ref(), app.config.page_size, pages).await?;
    let helpers = Helpers::new(&app.config);

    println!("Posts ({}):", paginator.posts().len());
    for post in paginator.posts() {
        println!(
            "  {} - {} [{}]",
            helpers.date(post.first_publication_date.as_ref()),
            post.title,
            post.uid
        );
    }
    if paginator.has_more() {
        println!(
            "More posts available, run with --pages {}",
            paginator.pages_loaded() + 1
        );
    }

    Ok(())
}

/// Fetch the first page and load more until `pages` pages are accumulated
/// or the listing runs out
pub async fn collect(store: &dyn DocumentStore, page_size: usize, pages: usize) -> Result<Paginator> {
    let first = fetch_listing(store, page_size)
        .await
        .context("failed to fetch the post listing")?;
    let mut paginator = Paginator::new(first, page_size);

    while paginator.pages_loaded() < pages && paginator.has_more() {
        paginator
            .load_more(store)
            .await
            .with_context(|| format!("failed to load page {}", paginator.pages_loaded() + 1))?;
    }

    Ok(paginator)
}
