//! Search layer: backend query, hit normalization, and full-page retrieval.
//!
//! `SearchClient` turns a free-text query into [`SearchHit`]s. The backend
//! sits behind the [`SearchBackend`] trait; per-hit page fetches are
//! isolated so one dead link never sinks the batch, and every hit keeps the
//! backend snippet as a fallback body.

pub mod duckduckgo;
mod html;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::SearchHit;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub use duckduckgo::{DuckDuckGoBackend, RawHit, SearchBackend};
pub use html::html_to_text;

/// Issues queries against a search backend and enriches hits with page text.
pub struct SearchClient {
    backend: Arc<dyn SearchBackend>,
    fetcher: Client,
    config: SearchConfig,
}

impl SearchClient {
    /// Create a client with the default DuckDuckGo backend.
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        let backend = Arc::new(DuckDuckGoBackend::new(&config)?);
        Self::with_backend(backend, config)
    }

    /// Create a client with an explicit backend (stubs, alternate engines).
    pub fn with_backend(
        backend: Arc<dyn SearchBackend>,
        config: SearchConfig,
    ) -> Result<Self, SearchError> {
        let fetcher = Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| SearchError::ClientSetup {
                message: e.to_string(),
            })?;
        Ok(Self {
            backend,
            fetcher,
            config,
        })
    }

    /// Run a query and return normalized hits, newest-ranked first.
    ///
    /// Backend failures and zero-hit responses both yield an empty Vec so
    /// callers can fall through to their next query phrasing. Hits without
    /// a parseable http(s) link are discarded.
    pub async fn search(&self, query: &str, max_results: usize) -> Vec<SearchHit> {
        if query.trim().is_empty() {
            warn!("empty search query ignored");
            return Vec::new();
        }
        let max_results = max_results.max(1);

        let raw = match self.backend.query(query, max_results).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(query = %query, error = %e, "search backend unavailable");
                return Vec::new();
            }
        };

        let usable: Vec<RawHit> = raw
            .into_iter()
            .filter(|h| has_resolvable_link(&h.url))
            .take(max_results)
            .collect();

        if usable.is_empty() {
            debug!(query = %query, "no usable hits");
            return Vec::new();
        }

        // Order-preserving bounded concurrency keeps hits[0] as the top
        // backend hit, which callers cite as the source.
        let concurrency = self.config.fetch_concurrency.max(1);
        stream::iter(usable)
            .map(|hit| async move {
                let body = self.resolve_body(&hit).await;
                SearchHit {
                    title: hit.title,
                    body,
                    link: hit.url,
                }
            })
            .buffered(concurrency)
            .collect()
            .await
    }

    /// Full page text when retrieval succeeds, backend snippet otherwise.
    async fn resolve_body(&self, hit: &RawHit) -> String {
        if !self.config.fetch_pages {
            return hit.snippet.clone();
        }
        match self.fetch_page_text(&hit.url).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => {
                debug!(url = %hit.url, "page yielded no text, using snippet");
                hit.snippet.clone()
            }
            Err(e) => {
                debug!(url = %hit.url, error = %e, "page fetch failed, using snippet");
                hit.snippet.clone()
            }
        }
    }

    /// Fetch a hit URL and extract its main text, truncated to the
    /// configured cap.
    async fn fetch_page_text(&self, url: &str) -> Result<String, SearchError> {
        let response =
            self.fetcher
                .get(url)
                .send()
                .await
                .map_err(|e| SearchError::PageFetch {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::PageFetch {
                url: url.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::PageFetch {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let text = if content_type.contains("text/html") || content_type.contains("xhtml") {
            html_to_text(&body)
        } else {
            body
        };

        Ok(truncate_chars(&text, self.config.max_page_chars))
    }
}

/// A hit is only usable with an absolute http(s) link.
fn has_resolvable_link(link: &str) -> bool {
    match Url::parse(link) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Truncate at a char boundary without splitting a code point.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}
