#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use spacetraveling::cms::{self, Document, DocumentStore, Query, SearchResponse};

/// In-memory document store that records every request
#[derive(Clone, Default)]
pub struct FakeStore {
    listing: Arc<Mutex<Option<Value>>>,
    pages: Arc<Mutex<HashMap<String, Value>>>,
    documents: Arc<Mutex<HashMap<String, Value>>>,
    failing: Arc<Mutex<bool>>,
    queries: Arc<Mutex<Vec<Query>>>,
    page_requests: Arc<Mutex<Vec<String>>>,
    uid_requests: Arc<Mutex<Vec<String>>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(self, body: Value) -> Self {
        *self.listing.lock().unwrap() = Some(body);
        self
    }

    pub fn with_page(self, url: &str, body: Value) -> Self {
        self.pages.lock().unwrap().insert(url.to_string(), body);
        self
    }

    pub fn with_document(self, uid: &str, body: Value) -> Self {
        self.set_document(uid, body);
        self
    }

    pub fn set_document(&self, uid: &str, body: Value) {
        self.documents.lock().unwrap().insert(uid.to_string(), body);
    }

    /// Make every request fail until switched back
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn queries(&self) -> Vec<Query> {
        self.queries.lock().unwrap().clone()
    }

    pub fn page_requests(&self) -> Vec<String> {
        self.page_requests.lock().unwrap().clone()
    }

    pub fn uid_requests(&self) -> Vec<String> {
        self.uid_requests.lock().unwrap().clone()
    }

    fn check_failing(&self) -> cms::Result<()> {
        if *self.failing.lock().unwrap() {
            return Err(cms::Error::Status {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: "unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FakeStore {
    async fn query(&self, query: &Query) -> cms::Result<SearchResponse> {
        self.queries.lock().unwrap().push(query.clone());
        self.check_failing()?;
        let body = self.listing.lock().unwrap().clone();
        match body {
            Some(body) => Ok(serde_json::from_value(body)?),
            None => Ok(SearchResponse::default()),
        }
    }

    async fn fetch_page(&self, url: &str) -> cms::Result<SearchResponse> {
        self.page_requests.lock().unwrap().push(url.to_string());
        self.check_failing()?;
        let body = self.pages.lock().unwrap().get(url).cloned();
        match body {
            Some(body) => Ok(serde_json::from_value(body)?),
            None => Err(cms::Error::Status {
                status: reqwest::StatusCode::NOT_FOUND,
                body: format!("no page at {}", url),
            }),
        }
    }

    async fn get_by_uid(&self, document_type: &str, uid: &str) -> cms::Result<Option<Document>> {
        assert_eq!(document_type, "posts");
        self.uid_requests.lock().unwrap().push(uid.to_string());
        self.check_failing()?;
        let body = self.documents.lock().unwrap().get(uid).cloned();
        match body {
            Some(body) => Ok(Some(serde_json::from_value(body)?)),
            None => Ok(None),
        }
    }
}

/// A listing entry as returned with the listing field selection
pub fn summary_doc(uid: &str) -> Value {
    json!({
        "id": format!("id-{}", uid),
        "uid": uid,
        "type": "posts",
        "first_publication_date": "2021-03-15T19:25:28+0000",
        "data": {
            "title": format!("Post {}", uid),
            "subtitle": "Pensando em sincronização",
            "author": "Joseph Oliveira"
        }
    })
}

/// A page envelope holding the given uids
pub fn page(next_page: Option<&str>, uids: &[String]) -> Value {
    json!({
        "page": 1,
        "results_per_page": 20,
        "next_page": next_page,
        "results": uids.iter().map(|uid| summary_doc(uid)).collect::<Vec<_>>()
    })
}

/// `p{from}` through `p{to}`
pub fn uids(from: usize, to: usize) -> Vec<String> {
    (from..=to).map(|i| format!("p{}", i)).collect()
}

/// A full post whose single content block holds `words` words
pub fn detail_doc(uid: &str, title: &str, words: usize) -> Value {
    json!({
        "id": format!("id-{}", uid),
        "uid": uid,
        "type": "posts",
        "first_publication_date": "2021-03-25T19:25:28+0000",
        "data": {
            "title": title,
            "subtitle": "Tudo sobre como criar a sua primeira aplicação",
            "author": "Danilo Vieira",
            "banner": {"url": "https://images.prismic.io/spacetraveling/banner.png"},
            "content": [{
                "heading": "H",
                "body": [{"type": "paragraph", "text": "word ".repeat(words), "spans": []}]
            }]
        }
    })
}
