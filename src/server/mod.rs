//! HTTP server for the listing and post pages

use anyhow::{Context as _, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::cache::{DetailCache, PageCache};
use crate::cms::DocumentStore;
use crate::config::SiteConfig;
use crate::content::PostPage;
use crate::detail::Resolution;
use crate::listing::{fetch_listing, Paginator};
use crate::templates::TemplateRenderer;
use crate::Spacetraveling;

/// Server state
pub struct ServerState {
    /// Store behind listing views, remembering continuation pages
    pages: PageCache,
    /// First listing page, fetched once at startup
    listing: PostPage,
    details: DetailCache,
    renderer: TemplateRenderer,
    page_size: usize,
    max_pages: usize,
}

impl ServerState {
    /// Fetch the first listing page and resolve the first posts ahead of time
    ///
    /// Fails when the listing cannot be fetched; a post that fails to
    /// resolve here is simply resolved on its first request instead.
    pub async fn new(config: &SiteConfig, store: Arc<dyn DocumentStore>) -> Result<Self> {
        let listing = fetch_listing(store.as_ref(), config.page_size)
            .await
            .context("failed to fetch the post listing")?;
        tracing::info!("Fetched {} posts for the listing", listing.results.len());

        let details = DetailCache::with_capacity(
            Arc::clone(&store),
            config.revalidate_after(),
            config.cache_capacity,
        );
        for post in listing.results.iter().take(config.prerender) {
            match details.prerender(&post.uid).await {
                Ok(_) => tracing::debug!("Prerendered post {}", post.uid),
                Err(e) => tracing::warn!("Failed to prerender post {}: {}", post.uid, e),
            }
        }

        Ok(Self {
            pages: PageCache::new(store, config.revalidate_after(), config.max_pages),
            listing,
            details,
            renderer: TemplateRenderer::new(config)?,
            page_size: config.page_size,
            max_pages: config.max_pages,
        })
    }

    pub fn details(&self) -> &DetailCache {
        &self.details
    }
}

/// Build the application router
pub fn router(state: Arc<ServerState>, static_dir: Option<PathBuf>) -> Router {
    let mut app = Router::new()
        .route("/", get(listing_handler))
        .route("/post/:slug", get(post_handler));

    if let Some(dir) = static_dir {
        app = app.nest_service("/static", ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Start the server
pub async fn start(app: &Spacetraveling, ip: &str, port: u16) -> Result<()> {
    let store = app.store()?;
    let state = Arc::new(ServerState::new(&app.config, store).await?);

    let static_dir = app.static_dir.is_dir().then(|| app.static_dir.clone());
    let router = router(state, static_dir);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

#[derive(Debug, Deserialize)]
struct ListingParams {
    /// Number of accumulated pages to show
    pages: Option<usize>,
}

/// Listing view
///
/// Each request owns a fresh paginator seeded with the startup listing and
/// replays "load more" until it holds the requested number of pages.
/// Continuation pages come from the shared page cache while fresh.
async fn listing_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<ListingParams>,
) -> Response {
    let wanted = params.pages.unwrap_or(1).clamp(1, state.max_pages);
    let mut paginator = Paginator::new(state.listing.clone(), state.page_size);

    while paginator.pages_loaded() < wanted && paginator.has_more() {
        if let Err(e) = paginator.load_more(&state.pages).await {
            tracing::warn!(
                "Failed to load listing page {}: {}",
                paginator.pages_loaded() + 1,
                e
            );
            break;
        }
    }

    let offer_more = paginator.has_more() && paginator.pages_loaded() < state.max_pages;
    render(
        state
            .renderer
            .render_listing(paginator.posts(), offer_more, paginator.pages_loaded()),
        StatusCode::OK,
    )
}

/// Post view
async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    let lookup = state.details.lookup(&slug).await;

    match lookup.state {
        Resolution::Resolved(post) => render(state.renderer.render_post(&post), StatusCode::OK),
        Resolution::Pending => render(state.renderer.render_loading(), StatusCode::OK),
        Resolution::NotFound => render(state.renderer.render_not_found(), StatusCode::NOT_FOUND),
    }
}

fn render(result: Result<String>, status: StatusCode) -> Response {
    match result {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Template error: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}
