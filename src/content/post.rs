//! Post models

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::reading_time::reading_time;
use super::richtext::RichTextBlock;
use crate::cms::{self, Document, SearchResponse};

/// A post as shown in the listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    /// Unique slug
    pub uid: String,

    /// First publication date, absent for never-published documents
    pub first_publication_date: Option<DateTime<FixedOffset>>,

    pub title: String,
    pub subtitle: String,
    pub author: String,
}

/// One page of the listing plus the continuation URL of the next one
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostPage {
    /// Continuation URL; `None` once the last page has been reached
    pub next_page: Option<String>,

    /// Posts in the order the store returned them
    pub results: Vec<PostSummary>,
}

/// A full post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetail {
    pub uid: String,
    pub first_publication_date: Option<DateTime<FixedOffset>>,
    pub title: String,
    pub subtitle: String,
    pub banner_url: String,
    pub author: String,
    pub content: Vec<ContentBlock>,
}

/// A titled section of a post body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentBlock {
    pub heading: String,
    pub body: Vec<RichTextBlock>,
}

impl PostDetail {
    /// Estimated minutes to read the body
    pub fn reading_time(&self) -> usize {
        reading_time(&self.content)
    }
}

fn require_uid(doc: &Document) -> cms::Result<String> {
    match doc.uid.as_deref().map(str::trim) {
        Some(uid) if !uid.is_empty() => Ok(uid.to_string()),
        _ => Err(cms::Error::Malformed(format!("document {} has no uid", doc.id))),
    }
}

impl TryFrom<Document> for PostSummary {
    type Error = cms::Error;

    fn try_from(doc: Document) -> cms::Result<Self> {
        let uid = require_uid(&doc)?;
        Ok(Self {
            uid,
            first_publication_date: doc.first_publication_date,
            title: doc.data.title,
            subtitle: doc.data.subtitle,
            author: doc.data.author,
        })
    }
}

impl TryFrom<Document> for PostDetail {
    type Error = cms::Error;

    fn try_from(doc: Document) -> cms::Result<Self> {
        let uid = require_uid(&doc)?;
        let data = doc.data;
        Ok(Self {
            uid,
            first_publication_date: doc.first_publication_date,
            title: data.title,
            subtitle: data.subtitle,
            banner_url: data.banner.and_then(|b| b.url).unwrap_or_default(),
            author: data.author,
            content: data
                .content
                .into_iter()
                .map(|group| ContentBlock {
                    heading: group.heading.unwrap_or_default(),
                    body: group.body,
                })
                .collect(),
        })
    }
}

impl From<SearchResponse> for PostPage {
    /// Map a search envelope to a listing page
    ///
    /// Documents without a uid cannot be linked to and are left out.
    fn from(response: SearchResponse) -> Self {
        let results = response
            .results
            .into_iter()
            .filter_map(|doc| match PostSummary::try_from(doc) {
                Ok(post) => Some(post),
                Err(e) => {
                    tracing::warn!("Skipping listing entry: {}", e);
                    None
                }
            })
            .collect();

        Self {
            next_page: response.next_page.filter(|url| !url.trim().is_empty()),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: serde_json::Value) -> Document {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_page_from_response() {
        let response: SearchResponse = serde_json::from_value(json!({
            "next_page": "https://blog.cdn.prismic.io/api/v2/documents/search?page=2",
            "results": [
                {"uid": "a", "data": {"title": "A", "subtitle": "sa", "author": "x"}},
                {"id": "orphan", "data": {"title": "No uid"}},
                {"uid": "b", "data": {"title": "B", "subtitle": "sb", "author": "y"}}
            ]
        }))
        .unwrap();

        let page = PostPage::from(response);
        assert_eq!(
            page.next_page.as_deref(),
            Some("https://blog.cdn.prismic.io/api/v2/documents/search?page=2")
        );
        let uids: Vec<_> = page.results.iter().map(|p| p.uid.as_str()).collect();
        assert_eq!(uids, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_next_page_is_none() {
        let response = SearchResponse {
            next_page: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(PostPage::from(response).next_page, None);
    }

    #[test]
    fn test_detail_from_document() {
        let doc = document(json!({
            "id": "YF1",
            "uid": "abc",
            "type": "posts",
            "first_publication_date": "2021-03-25T19:25:28+0000",
            "data": {
                "title": "Criando um app CRA do zero",
                "subtitle": "Tudo sobre como criar a sua primeira aplicação",
                "author": "Danilo Vieira",
                "banner": {"url": "https://images.prismic.io/banner.png"},
                "content": [
                    {"heading": "H", "body": [{"type": "paragraph", "text": "word ".repeat(250), "spans": []}]},
                    {"heading": null, "body": []}
                ]
            }
        }));

        let post = PostDetail::try_from(doc).unwrap();
        assert_eq!(post.uid, "abc");
        assert_eq!(post.banner_url, "https://images.prismic.io/banner.png");
        assert_eq!(post.content.len(), 2);
        assert_eq!(post.content[1].heading, "");
        assert_eq!(post.reading_time(), 2);
    }

    #[test]
    fn test_detail_requires_uid() {
        let doc = document(json!({"id": "YF1", "uid": " ", "data": {}}));
        assert!(PostDetail::try_from(doc).is_err());
    }

    #[test]
    fn test_missing_banner() {
        let doc = document(json!({"uid": "abc", "data": {"banner": {}}}));
        assert_eq!(PostDetail::try_from(doc).unwrap().banner_url, "");
    }
}
