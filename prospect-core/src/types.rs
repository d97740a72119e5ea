//! Core data types: research facets, search hits, facet results, and the
//! slim message/request types used by the LLM provider layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Research domain types
// ---------------------------------------------------------------------------

/// One of the three researched attributes of a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Profile,
    Sector,
    Objectives,
}

impl Facet {
    /// All facets, in the fixed research order.
    pub const ALL: [Facet; 3] = [Facet::Profile, Facet::Sector, Facet::Objectives];

    /// Lowercase label used in sentinel messages and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Facet::Profile => "profile",
            Facet::Sector => "sector",
            Facet::Objectives => "2025 objectives",
        }
    }

    /// Ordered query templates tried for this facet. `{name}` is replaced
    /// with the company name.
    pub fn query_templates(&self) -> &'static [&'static str] {
        match self {
            Facet::Profile => &["{name}", "{name} Wikipedia", "{name} company", "{name} about"],
            Facet::Sector => &[
                "{name} industry sector",
                "{name} business sector",
                "{name} what industry",
                "{name} company market",
            ],
            Facet::Objectives => &[
                "{name} 2025 objectives",
                "{name} 2025 goals",
                "{name} future plans 2025",
                "{name} 2025 strategy",
            ],
        }
    }

    /// What the extractor is asked to pull out of the page text.
    pub fn extraction_ask(&self, company: &str) -> String {
        match self {
            Facet::Profile => format!(
                "a concise 2-3 sentence profile of what {company} is and what it does"
            ),
            Facet::Sector => format!(
                "the industry sector {company} operates in, as one short phrase"
            ),
            Facet::Objectives => format!(
                "{company}'s stated objectives, goals, or plans for 2025"
            ),
        }
    }

    /// Sentinel message for a facet with no accepted result.
    pub fn not_found_message(&self) -> String {
        format!("No reliable {} information found", self.label())
    }
}

impl std::fmt::Display for Facet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Facet::Profile => write!(f, "Profile"),
            Facet::Sector => write!(f, "Sector"),
            Facet::Objectives => write!(f, "2025 Objectives"),
        }
    }
}

/// One normalized entry from a search query.
///
/// `body` is either extracted page text or the backend snippet. Ephemeral;
/// lives only within one query's result batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub body: String,
    pub link: String,
}

/// Internal outcome of researching one facet.
///
/// Kept structurally distinct from the consumer-facing [`FacetResult`] so
/// "not found" never masquerades as data.
#[derive(Debug, Clone, PartialEq)]
pub enum FacetOutcome {
    Found {
        data: String,
        source: String,
        confidence: f64,
    },
    NotFound,
}

impl FacetOutcome {
    /// Render the consumer-facing result. `NotFound` becomes the facet's
    /// sentinel message with no source and confidence 0.0.
    pub fn into_result(self, facet: Facet) -> FacetResult {
        match self {
            FacetOutcome::Found {
                data,
                source,
                confidence,
            } => FacetResult {
                data,
                source: Some(source),
                confidence,
            },
            FacetOutcome::NotFound => FacetResult {
                data: facet.not_found_message(),
                source: None,
                confidence: 0.0,
            },
        }
    }
}

/// One facet's distilled answer with citation and confidence.
///
/// Invariant: `confidence` is always within [0.0, 1.0].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetResult {
    pub data: String,
    /// Source URL, or `None` when no reliable result was found.
    pub source: Option<String>,
    pub confidence: f64,
}

impl FacetResult {
    /// Source link for display/export; "N/A" when absent.
    pub fn source_display(&self) -> &str {
        self.source.as_deref().unwrap_or("N/A")
    }

    /// Confidence as a whole percentage, e.g. "90%".
    pub fn confidence_percent(&self) -> String {
        format!("{:.0}%", self.confidence * 100.0)
    }
}

/// The combined research outcome for one company. Immutable once returned
/// by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyResult {
    pub company: String,
    pub profile: FacetResult,
    pub sector: FacetResult,
    pub objectives: FacetResult,
    pub researched_at: DateTime<Utc>,
}

impl CompanyResult {
    pub fn facet(&self, facet: Facet) -> &FacetResult {
        match facet {
            Facet::Profile => &self.profile,
            Facet::Sector => &self.sector,
            Facet::Objectives => &self.objectives,
        }
    }
}

// ---------------------------------------------------------------------------
// LLM provider types
// ---------------------------------------------------------------------------

/// Message role in a chat completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
        }
    }
}

/// A request to the LLM for completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: Option<usize>,
    /// Require a machine-parsable JSON object reply from the provider.
    pub require_json: bool,
    /// Model override; falls back to the provider's configured model.
    pub model: Option<String>,
}

impl Default for CompletionRequest {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            temperature: 0.2,
            max_tokens: None,
            require_json: false,
            model: None,
        }
    }
}

/// Token usage reported by the provider.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
}

impl TokenUsage {
    pub fn total(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}

/// A completed (non-streaming) LLM response.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub text: String,
    pub usage: TokenUsage,
    pub model: String,
    pub finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facet_order_and_labels() {
        assert_eq!(
            Facet::ALL,
            [Facet::Profile, Facet::Sector, Facet::Objectives]
        );
        assert_eq!(Facet::Profile.label(), "profile");
        assert_eq!(Facet::Objectives.label(), "2025 objectives");
    }

    #[test]
    fn test_profile_templates_in_fixed_order() {
        assert_eq!(
            Facet::Profile.query_templates(),
            &["{name}", "{name} Wikipedia", "{name} company", "{name} about"]
        );
    }

    #[test]
    fn test_every_facet_has_four_templates() {
        for facet in Facet::ALL {
            assert_eq!(facet.query_templates().len(), 4, "{facet}");
        }
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            Facet::Sector.not_found_message(),
            "No reliable sector information found"
        );
    }

    #[test]
    fn test_outcome_found_into_result() {
        let outcome = FacetOutcome::Found {
            data: "Makes widgets".into(),
            source: "http://x.com".into(),
            confidence: 0.9,
        };
        let result = outcome.into_result(Facet::Profile);
        assert_eq!(result.data, "Makes widgets");
        assert_eq!(result.source_display(), "http://x.com");
        assert_eq!(result.confidence, 0.9);
    }

    #[test]
    fn test_outcome_not_found_into_result() {
        let result = FacetOutcome::NotFound.into_result(Facet::Objectives);
        assert_eq!(
            result.data,
            "No reliable 2025 objectives information found"
        );
        assert_eq!(result.source_display(), "N/A");
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_confidence_percent_rendering() {
        let result = FacetResult {
            data: "x".into(),
            source: None,
            confidence: 0.85,
        };
        assert_eq!(result.confidence_percent(), "85%");
    }

    #[test]
    fn test_message_constructors() {
        let msg = Message::system("be helpful");
        assert_eq!(msg.role, Role::System);
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }
}
