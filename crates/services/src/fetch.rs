//! Resource requests and the `Fetcher` seam shared by the loader and the offline worker.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use storage::repository::CachedResponse;

use crate::error::TransportError;

/// A GET request for a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    url: Url,
}

impl ResourceRequest {
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    /// Resolve `path` against `base` (e.g. `data/quizzes.json` under the app root).
    ///
    /// # Errors
    ///
    /// Returns `TransportError::InvalidUrl` if the result is not a valid URL.
    pub fn resolve(base: &Url, path: &str) -> Result<Self, TransportError> {
        base.join(path)
            .map(Self::new)
            .map_err(|source| TransportError::InvalidUrl {
                raw: path.to_string(),
                source,
            })
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Mirrors the browser's response types that matter for caching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Same origin as the app.
    Basic,
    /// Cross-origin.
    Cors,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResponse {
    pub url: Url,
    pub status: u16,
    pub kind: ResponseKind,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchedResponse {
    /// Status in the 2xx range.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Only complete same-origin responses are worth caching.
    #[must_use]
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.kind == ResponseKind::Basic
    }

    #[must_use]
    pub fn to_cached(&self, cached_at: DateTime<Utc>) -> CachedResponse {
        CachedResponse {
            url: self.url.to_string(),
            status: self.status,
            content_type: self.content_type.clone(),
            body: self.body.clone(),
            cached_at,
        }
    }

    /// # Errors
    ///
    /// Returns `TransportError::InvalidUrl` if the stored URL no longer parses.
    pub fn from_cached(cached: CachedResponse) -> Result<Self, TransportError> {
        let url = Url::parse(&cached.url).map_err(|source| TransportError::InvalidUrl {
            raw: cached.url.clone(),
            source,
        })?;
        Ok(Self {
            url,
            status: cached.status,
            kind: ResponseKind::Basic,
            content_type: cached.content_type,
            body: cached.body,
        })
    }
}

/// Anything that can turn a request into a response.
///
/// Non-2xx statuses are responses, not errors; only failures to obtain a
/// response at all are `TransportError`s.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// # Errors
    ///
    /// Returns `TransportError` when no response could be obtained.
    async fn fetch(&self, request: &ResourceRequest) -> Result<FetchedResponse, TransportError>;
}

/// Network fetcher scoped to the app origin.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    scope: Url,
}

impl HttpFetcher {
    #[must_use]
    pub fn new(scope: Url) -> Self {
        Self {
            client: Client::new(),
            scope,
        }
    }

    fn kind_for(&self, url: &Url) -> ResponseKind {
        if url.origin() == self.scope.origin() {
            ResponseKind::Basic
        } else {
            ResponseKind::Cors
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &ResourceRequest) -> Result<FetchedResponse, TransportError> {
        let response = self.client.get(request.url().clone()).send().await?;
        let url = response.url().clone();
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await?.to_vec();

        Ok(FetchedResponse {
            kind: self.kind_for(&url),
            url,
            status,
            content_type,
            body,
        })
    }
}
