//! Built-in page templates using the Tera template engine
//!
//! Templates are embedded in the binary.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{as_html, PostDetail, PostSummary};
use crate::helpers::{listing_url, meta_generator, post_url, Helpers};
use crate::i18n::UiStrings;

/// Seconds between reloads of a page still waiting for its post
pub const PENDING_REFRESH_SECS: u32 = 1;

/// Template renderer with the embedded templates loaded
pub struct TemplateRenderer {
    tera: Tera,
    site: SiteData,
    helpers: Helpers,
}

impl TemplateRenderer {
    /// Create a new renderer for a site
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("spacetraveling/layout.html")),
            ("index.html", include_str!("spacetraveling/index.html")),
            ("post.html", include_str!("spacetraveling/post.html")),
            ("status.html", include_str!("spacetraveling/status.html")),
        ])?;

        Ok(Self {
            tera,
            site: SiteData {
                title: config.title.clone(),
                language: config.language.clone(),
                strings: UiStrings::for_language(&config.language),
                generator: meta_generator(),
            },
            helpers: Helpers::new(config),
        })
    }

    pub fn strings(&self) -> &'static UiStrings {
        self.site.strings
    }

    /// Render the listing
    ///
    /// The "load more" link is only rendered while a continuation exists;
    /// it asks for one more accumulated page than `pages_loaded`.
    pub fn render_listing(
        &self,
        posts: &[PostSummary],
        has_more: bool,
        pages_loaded: usize,
    ) -> Result<String> {
        let listing = ListingData {
            posts: posts.iter().map(|p| self.post_item(p)).collect(),
            load_more_href: has_more.then(|| listing_url(pages_loaded + 1)),
        };

        let mut context = self.base_context();
        context.insert("listing", &listing);
        Ok(self.tera.render("index.html", &context)?)
    }

    /// Render a post page
    pub fn render_post(&self, post: &PostDetail) -> Result<String> {
        let data = PostData {
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            banner_url: post.banner_url.clone(),
            author: post.author.clone(),
            date: self.helpers.date(post.first_publication_date.as_ref()),
            datetime: self.helpers.datetime(post.first_publication_date.as_ref()),
            reading_time: post.reading_time(),
            blocks: post
                .content
                .iter()
                .map(|block| BlockData {
                    heading: block.heading.clone(),
                    html: as_html(&block.body),
                })
                .collect(),
        };

        let mut context = self.base_context();
        context.insert("post", &data);
        Ok(self.tera.render("post.html", &context)?)
    }

    /// Placeholder shown while a post is being resolved
    pub fn render_loading(&self) -> Result<String> {
        self.render_status(self.site.strings.loading, Some(PENDING_REFRESH_SECS))
    }

    pub fn render_not_found(&self) -> Result<String> {
        self.render_status(self.site.strings.not_found, None)
    }

    fn render_status(&self, message: &str, refresh: Option<u32>) -> Result<String> {
        let mut context = self.base_context();
        context.insert("message", message);
        context.insert("refresh", &refresh);
        Ok(self.tera.render("status.html", &context)?)
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site);
        context
    }

    fn post_item(&self, post: &PostSummary) -> PostItem {
        PostItem {
            href: post_url(&post.uid),
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            author: post.author.clone(),
            date: self.helpers.date(post.first_publication_date.as_ref()),
            datetime: self.helpers.datetime(post.first_publication_date.as_ref()),
        }
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub language: String,
    pub strings: &'static UiStrings,
    pub generator: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingData {
    pub posts: Vec<PostItem>,
    pub load_more_href: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostItem {
    pub href: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: String,
    pub datetime: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub subtitle: String,
    pub banner_url: String,
    pub author: String,
    pub date: String,
    pub datetime: String,
    pub reading_time: usize,
    pub blocks: Vec<BlockData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockData {
    pub heading: String,
    pub html: String,
}
