//! Document-query service access
//!
//! The blog reads everything from a headless content API. [`DocumentStore`]
//! is the seam the rest of the crate talks to; [`PrismicClient`] is the HTTP
//! implementation.

mod client;
mod error;
pub mod model;

use async_trait::async_trait;
use std::fmt;

pub use client::PrismicClient;
pub use error::{Error, Result};
pub use model::{Document, SearchResponse};

/// A search predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `path` equals `value`
    At { path: String, value: String },
}

impl Predicate {
    pub fn at(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self::At {
            path: path.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At { path, value } => {
                let value = value.replace('\\', "\\\\").replace('"', "\\\"");
                write!(f, "[at({}, \"{}\")]", path, value)
            }
        }
    }
}

/// A document search: predicates, an optional field selection and a page size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub predicates: Vec<Predicate>,
    pub fetch: Vec<String>,
    pub page_size: usize,
}

impl Query {
    /// Render the predicates as the `q` parameter
    pub fn q(&self) -> String {
        let inner: String = self.predicates.iter().map(|p| p.to_string()).collect();
        format!("[{}]", inner)
    }
}

/// Read access to the document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Run a search and return the first page of results
    async fn query(&self, query: &Query) -> Result<SearchResponse>;

    /// Fetch the literal continuation URL handed out as `next_page`
    async fn fetch_page(&self, url: &str) -> Result<SearchResponse>;

    /// Fetch the single document of `document_type` whose uid is `uid`
    async fn get_by_uid(&self, document_type: &str, uid: &str) -> Result<Option<Document>>;
}
