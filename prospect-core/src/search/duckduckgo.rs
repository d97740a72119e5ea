//! DuckDuckGo search backend.
//!
//! Uses the instant-answer API (no key required). The response mixes three
//! result shapes — an abstract, related topics, and a plain results array —
//! which are normalized here into uniform [`RawHit`]s.

use crate::config::SearchConfig;
use crate::error::SearchError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// One raw entry from a search backend, before page retrieval.
#[derive(Debug, Clone, PartialEq)]
pub struct RawHit {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

/// A search backend: free-text query in, zero or more raw hits out.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn query(&self, query: &str, max_results: usize) -> Result<Vec<RawHit>, SearchError>;
}

/// DuckDuckGo instant-answer backend.
pub struct DuckDuckGoBackend {
    client: Client,
}

impl DuckDuckGoBackend {
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SearchError::ClientSetup {
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Flatten the heterogeneous instant-answer body into raw hits.
    fn normalize(body: &Value, max_results: usize) -> Vec<RawHit> {
        let mut hits = Vec::new();

        // Main abstract, when present
        if let Some(text) = body.get("AbstractText").and_then(|v| v.as_str()) {
            if !text.is_empty() {
                hits.push(RawHit {
                    title: body
                        .get("Heading")
                        .and_then(|v| v.as_str())
                        .filter(|s| !s.is_empty())
                        .unwrap_or("Abstract")
                        .to_string(),
                    snippet: text.to_string(),
                    url: body
                        .get("AbstractURL")
                        .and_then(|v| v.as_str())
                        .unwrap_or("")
                        .to_string(),
                });
            }
        }

        // Related topics; category entries nest one level deeper
        if let Some(topics) = body.get("RelatedTopics").and_then(|v| v.as_array()) {
            for topic in topics {
                if hits.len() >= max_results {
                    break;
                }
                if let Some(nested) = topic.get("Topics").and_then(|v| v.as_array()) {
                    for sub in nested {
                        if hits.len() >= max_results {
                            break;
                        }
                        Self::push_topic(sub, &mut hits);
                    }
                } else {
                    Self::push_topic(topic, &mut hits);
                }
            }
        }

        // Plain results array
        if let Some(results) = body.get("Results").and_then(|v| v.as_array()) {
            for result in results {
                if hits.len() >= max_results {
                    break;
                }
                Self::push_topic(result, &mut hits);
            }
        }

        hits.truncate(max_results);
        hits
    }

    fn push_topic(entry: &Value, hits: &mut Vec<RawHit>) {
        let Some(text) = entry.get("Text").and_then(|v| v.as_str()) else {
            return;
        };
        if text.is_empty() {
            return;
        }
        let url = entry
            .get("FirstURL")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();
        // Topic text reads "Title - description"; use the lead as the title
        let title = text.split(" - ").next().unwrap_or(text).to_string();
        hits.push(RawHit {
            title,
            snippet: text.to_string(),
            url,
        });
    }
}

#[async_trait]
impl SearchBackend for DuckDuckGoBackend {
    async fn query(&self, query: &str, max_results: usize) -> Result<Vec<RawHit>, SearchError> {
        let url = format!(
            "https://api.duckduckgo.com/?q={}&format=json&no_html=1&skip_disambig=1",
            urlencoding::encode(query)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SearchError::Backend {
                message: format!("Search request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Backend {
                message: format!("HTTP {}", status),
            });
        }

        let body: Value = response.json().await.map_err(|e| SearchError::Backend {
            message: format!("Failed to parse search response: {}", e),
        })?;

        let hits = Self::normalize(&body, max_results);
        debug!(query = %query, hits = hits.len(), "search backend returned");
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_abstract() {
        let body = json!({
            "Heading": "Acme Corp",
            "AbstractText": "Acme Corp makes widgets.",
            "AbstractURL": "https://en.wikipedia.org/wiki/Acme",
            "RelatedTopics": [],
            "Results": []
        });
        let hits = DuckDuckGoBackend::normalize(&body, 5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Acme Corp");
        assert_eq!(hits[0].snippet, "Acme Corp makes widgets.");
        assert_eq!(hits[0].url, "https://en.wikipedia.org/wiki/Acme");
    }

    #[test]
    fn test_normalize_related_topics_and_results() {
        let body = json!({
            "AbstractText": "",
            "RelatedTopics": [
                { "Text": "Acme - a widget maker", "FirstURL": "https://a.example" },
                { "Topics": [
                    { "Text": "Acme Europe - the EU arm", "FirstURL": "https://b.example" }
                ]}
            ],
            "Results": [
                { "Text": "Official site", "FirstURL": "https://acme.example" }
            ]
        });
        let hits = DuckDuckGoBackend::normalize(&body, 5);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].title, "Acme");
        assert_eq!(hits[1].url, "https://b.example");
        assert_eq!(hits[2].snippet, "Official site");
    }

    #[test]
    fn test_normalize_respects_max_results() {
        let body = json!({
            "RelatedTopics": [
                { "Text": "one", "FirstURL": "https://1.example" },
                { "Text": "two", "FirstURL": "https://2.example" },
                { "Text": "three", "FirstURL": "https://3.example" }
            ]
        });
        let hits = DuckDuckGoBackend::normalize(&body, 2);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_normalize_empty_body() {
        let hits = DuckDuckGoBackend::normalize(&json!({}), 5);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_entries_without_text_skipped() {
        let body = json!({
            "RelatedTopics": [
                { "FirstURL": "https://no-text.example" },
                { "Text": "", "FirstURL": "https://empty.example" },
                { "Text": "kept", "FirstURL": "https://kept.example" }
            ]
        });
        let hits = DuckDuckGoBackend::normalize(&body, 5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].url, "https://kept.example");
    }
}
