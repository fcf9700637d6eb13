//! Helper functions shared by page rendering and the terminal views

mod date;
mod html;
mod url;

use chrono::{DateTime, FixedOffset, Locale};

pub use date::*;
pub use html::*;
pub use url::*;

use crate::config::SiteConfig;

/// Configured formatting helpers
#[derive(Debug, Clone)]
pub struct Helpers {
    date_format: String,
    locale: Locale,
}

impl Helpers {
    /// Create a new helpers instance
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            date_format: config.date_format.clone(),
            locale: locale_for(&config.language),
        }
    }

    /// Display form of a publication date, lower-cased; empty when unpublished
    pub fn date(&self, date: Option<&DateTime<FixedOffset>>) -> String {
        date.map(|d| format_date(d, &self.date_format, self.locale).to_lowercase())
            .unwrap_or_default()
    }

    /// `datetime` attribute value for a publication date
    pub fn datetime(&self, date: Option<&DateTime<FixedOffset>>) -> String {
        date.map(date_xml).unwrap_or_default()
    }
}
