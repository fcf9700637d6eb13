//! Site configuration (_config.yml)

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Largest page size the document API accepts
pub const MAX_PAGE_SIZE: usize = 100;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub language: String,

    // Date format (date-fns style tokens)
    pub date_format: String,

    // Document API
    pub api_endpoint: String,
    pub access_token: Option<String>,
    /// Request timeout in seconds; the HTTP client default applies when unset
    pub request_timeout: Option<u64>,

    // Listing
    pub page_size: usize,
    /// Upper bound on pages replayed for a single listing view
    pub max_pages: usize,

    // Post pages
    /// Seconds a generated post page stays fresh
    pub revalidate: u64,
    /// Number of posts resolved ahead of the first request
    pub prerender: usize,
    /// Most post pages kept in memory
    pub cache_capacity: usize,

    // Assets
    pub static_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "spacetraveling".to_string(),
            language: "pt-BR".to_string(),

            date_format: "dd MMM yyyy".to_string(),

            api_endpoint: "https://spacetraveling.cdn.prismic.io/api/v2".to_string(),
            access_token: None,
            request_timeout: None,

            page_size: 20,
            max_pages: 50,

            revalidate: 60 * 30,
            prerender: 1,
            cache_capacity: 1000,

            static_dir: "static".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse {:?}", path))?;
        Ok(config)
    }

    /// Apply `PRISMIC_API_ENDPOINT` / `PRISMIC_ACCESS_TOKEN` from the environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var("PRISMIC_API_ENDPOINT").ok(),
            std::env::var("PRISMIC_ACCESS_TOKEN").ok(),
        );
    }

    /// Replace the API settings with any non-empty overrides
    pub fn apply_overrides(&mut self, endpoint: Option<String>, access_token: Option<String>) {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            tracing::debug!("API endpoint overridden from environment");
            self.api_endpoint = endpoint;
        }
        if let Some(token) = access_token.filter(|t| !t.trim().is_empty()) {
            self.access_token = Some(token);
        }
    }

    /// Reject configurations the rest of the crate cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.api_endpoint.trim().is_empty() {
            bail!("api_endpoint must be non-empty");
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            bail!("page_size must be between 1 and {}", MAX_PAGE_SIZE);
        }
        if self.max_pages == 0 {
            bail!("max_pages must be > 0");
        }
        if self.cache_capacity == 0 {
            bail!("cache_capacity must be > 0");
        }
        Ok(())
    }

    pub fn revalidate_after(&self) -> Duration {
        Duration::from_secs(self.revalidate)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout.map(Duration::from_secs)
    }
}
