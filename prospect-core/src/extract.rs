//! Facet extraction via the LLM provider.
//!
//! Given page text and a facet, asks the provider for a JSON object
//! `{ "data": ..., "confidence": ... }` and validates it structurally.
//! Every failure mode degrades to a zero-confidence sentinel: one facet's
//! bad response must never abort a company's research.

use crate::config::LlmConfig;
use crate::llm::{with_retry, LlmProvider};
use crate::types::{CompletionRequest, Facet, Message};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Sentinel data for a failed extraction.
pub const ANALYSIS_FAILED: &str = "Analysis failed";

/// A distilled answer with the provider's self-reported confidence, already
/// clamped to [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub data: String,
    pub confidence: f64,
}

impl Extraction {
    /// The degrade-not-fail sentinel.
    pub fn failed() -> Self {
        Self {
            data: ANALYSIS_FAILED.to_string(),
            confidence: 0.0,
        }
    }
}

/// Distills facet answers out of search result text.
pub struct FacetExtractor {
    provider: Arc<dyn LlmProvider>,
    config: LlmConfig,
}

impl FacetExtractor {
    pub fn new(provider: Arc<dyn LlmProvider>, config: LlmConfig) -> Self {
        Self { provider, config }
    }

    /// Ask the provider for this facet's answer. Never fails; malformed or
    /// unreachable-provider outcomes come back as [`Extraction::failed`].
    pub async fn analyze(&self, content: &str, company: &str, facet: Facet) -> Extraction {
        let request = CompletionRequest {
            messages: vec![
                Message::system(
                    "You are a research assistant that extracts company facts from web \
                     search text. Reply with a single JSON object and nothing else.",
                ),
                Message::user(build_instruction(company, facet, content)),
            ],
            temperature: self.config.temperature,
            max_tokens: Some(self.config.max_tokens),
            require_json: true,
            model: None,
        };

        let response = with_retry(&self.config.retry, || {
            self.provider.complete(request.clone())
        })
        .await;

        let text = match response {
            Ok(resp) => resp.text,
            Err(e) => {
                warn!(%facet, company = %company, error = %e, "extraction call failed");
                return Extraction::failed();
            }
        };

        match parse_extraction(&text) {
            Some(extraction) => extraction,
            None => {
                warn!(%facet, company = %company, "malformed extraction response");
                debug!(response = %text, "unparsable extraction body");
                Extraction::failed()
            }
        }
    }
}

fn build_instruction(company: &str, facet: Facet, content: &str) -> String {
    format!(
        "From the search result text below, extract {}.\n\
         Respond with a JSON object with exactly two keys:\n\
         \"data\": a short human-readable answer string, and\n\
         \"confidence\": a number between 0 and 1 for how well the text supports the answer.\n\
         If the text contains nothing relevant, use an empty string and a confidence of 0.\n\n\
         Search result text:\n{}",
        facet.extraction_ask(company),
        content
    )
}

/// Validate the structural contract of the provider's reply.
///
/// The reply must be a JSON object carrying both `data` (string) and
/// `confidence` keys. A confidence that is not numeric and not a numeric
/// string counts as 0.0; any value is clamped to [0, 1].
fn parse_extraction(text: &str) -> Option<Extraction> {
    let body = strip_code_fence(text);
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    let data = object.get("data")?.as_str()?.to_string();
    let confidence = coerce_confidence(object.get("confidence")?);

    Some(Extraction { data, confidence })
}

/// Numbers pass through, numeric strings parse, everything else is 0.0.
/// Always clamped; NaN collapses to 0.0.
fn coerce_confidence(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if raw.is_nan() {
        0.0
    } else {
        raw.clamp(0.0, 1.0)
    }
}

/// Models sometimes wrap JSON in markdown fences even in JSON mode when
/// requests pass through a proxy. Tolerate that.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.trim().strip_suffix("```").unwrap_or(inner).trim()
}
