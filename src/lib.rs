//! spacetraveling: a small blog front-end over a headless content API
//!
//! Posts are read from a Prismic-style document-query service. The crate
//! serves a paginated listing and per-post pages with an estimated reading
//! time, and offers the same views in the terminal.

pub mod cache;
pub mod cms;
pub mod commands;
pub mod config;
pub mod content;
pub mod detail;
pub mod helpers;
pub mod i18n;
pub mod listing;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use cms::{DocumentStore, PrismicClient};

/// The blog application
#[derive(Debug, Clone)]
pub struct Spacetraveling {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Static assets directory
    pub static_dir: std::path::PathBuf,
}

impl Spacetraveling {
    /// Create a new instance from a directory
    ///
    /// Reads `_config.yml` when present, then applies environment overrides.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();
        config.validate()?;

        let static_dir = base_dir.join(&config.static_dir);

        Ok(Self {
            config,
            base_dir,
            static_dir,
        })
    }

    /// HTTP client for the configured document API
    pub fn store(&self) -> Result<Arc<dyn DocumentStore>> {
        let client = PrismicClient::new(
            &self.config.api_endpoint,
            self.config.access_token.clone(),
            self.config.request_timeout(),
        )?;
        Ok(Arc::new(client))
    }
}
