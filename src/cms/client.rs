//! HTTP client for a Prismic-style document-query API

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

use super::model::{ApiInfo, Document, SearchResponse};
use super::{DocumentStore, Error, Predicate, Query, Result};

const USER_AGENT: &str = concat!("spacetraveling/", env!("CARGO_PKG_VERSION"));

/// Client for the document-query API
///
/// Every search first resolves the master ref from the API entry point so
/// that published changes are picked up without restarting.
#[derive(Clone)]
pub struct PrismicClient {
    http: Client,
    endpoint: Url,
    access_token: Option<String>,
}

impl fmt::Debug for PrismicClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrismicClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl PrismicClient {
    /// Create a client for the API entry point `endpoint`
    /// (e.g. `https://my-repo.cdn.prismic.io/api/v2`)
    pub fn new(endpoint: &str, access_token: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let endpoint = parse_url(endpoint)?;

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            endpoint,
            access_token: access_token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Build the search URL for `query` against content ref `reference`
    pub fn search_url(&self, reference: &str, query: &Query) -> Result<Url> {
        let base = format!(
            "{}/documents/search",
            self.endpoint.as_str().trim_end_matches('/')
        );
        let mut url = parse_url(&base)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("ref", reference);
            pairs.append_pair("q", &query.q());
            if !query.fetch.is_empty() {
                pairs.append_pair("fetch", &query.fetch.join(","));
            }
            pairs.append_pair("pageSize", &query.page_size.to_string());
            if let Some(token) = &self.access_token {
                pairs.append_pair("access_token", token);
            }
        }
        Ok(url)
    }

    fn api_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        if let Some(token) = &self.access_token {
            url.query_pairs_mut().append_pair("access_token", token);
        }
        url
    }

    /// Resolve the ref of the currently published content
    pub async fn master_ref(&self) -> Result<String> {
        let info: ApiInfo = self.get_json(self.api_url()).await?;
        info.master_ref()
            .map(str::to_string)
            .ok_or(Error::NoMasterRef)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        // the query string may carry the access token, keep it out of logs
        let path = url.path().to_string();
        debug!(host = url.host_str().unwrap_or(""), %path, "GET");

        let res = self.http.get(url).send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(%status, %path, "document api error: {}", body);
            return Err(Error::Status { status, body });
        }

        let body = res.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl DocumentStore for PrismicClient {
    async fn query(&self, query: &Query) -> Result<SearchResponse> {
        let reference = self.master_ref().await?;
        let url = self.search_url(&reference, query)?;
        self.get_json(url).await
    }

    async fn fetch_page(&self, url: &str) -> Result<SearchResponse> {
        self.get_json(parse_url(url)?).await
    }

    async fn get_by_uid(&self, document_type: &str, uid: &str) -> Result<Option<Document>> {
        let query = Query {
            predicates: vec![Predicate::at(format!("my.{}.uid", document_type), uid)],
            fetch: Vec::new(),
            page_size: 1,
        };
        let response = self.query(&query).await?;
        Ok(response.results.into_iter().next())
    }
}

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| Error::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn listing_query() -> Query {
        Query {
            predicates: vec![Predicate::at("document.type", "posts")],
            fetch: vec!["posts.title".to_string(), "posts.author".to_string()],
            page_size: 20,
        }
    }

    #[test]
    fn test_search_url() {
        let client = PrismicClient::new("https://blog.cdn.prismic.io/api/v2", None, None).unwrap();
        let url = client.search_url("YF1", &listing_query()).unwrap();

        assert_eq!(url.path(), "/api/v2/documents/search");
        let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs["ref"], "YF1");
        assert_eq!(pairs["q"], r#"[[at(document.type, "posts")]]"#);
        assert_eq!(pairs["fetch"], "posts.title,posts.author");
        assert_eq!(pairs["pageSize"], "20");
        assert!(!pairs.contains_key("access_token"));
    }

    #[test]
    fn test_search_url_with_token_and_trailing_slash() {
        let client = PrismicClient::new(
            "https://blog.cdn.prismic.io/api/v2/",
            Some("secret".to_string()),
            None,
        )
        .unwrap();
        let url = client.search_url("YF1", &listing_query()).unwrap();

        assert_eq!(url.path(), "/api/v2/documents/search");
        let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs["access_token"], "secret");
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let client =
            PrismicClient::new("https://blog.cdn.prismic.io/api/v2", Some("  ".to_string()), None)
                .unwrap();
        assert_eq!(client.api_url().query(), None);
    }

    #[test]
    fn test_invalid_endpoint() {
        let err = PrismicClient::new("not a url", None, None).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }

    #[test]
    fn test_debug_hides_token() {
        let client = PrismicClient::new(
            "https://blog.cdn.prismic.io/api/v2",
            Some("secret".to_string()),
            None,
        )
        .unwrap();
        assert!(!format!("{:?}", client).contains("secret"));
    }
}
