//! Configuration system for prospect.
//!
//! Uses `figment` for layered configuration: defaults -> user config ->
//! workspace config -> environment -> explicit overrides. Configuration is
//! loaded from `~/.config/prospect/config.toml` and/or
//! `.prospect/config.toml` in the workspace directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProspectConfig {
    pub llm: LlmConfig,
    pub search: SearchConfig,
    pub research: ResearchConfig,
}

/// Configuration for the LLM provider used by the facet extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name; anything OpenAI-compatible (openai, azure, ollama,
    /// vllm, lmstudio).
    pub provider: String,
    /// Model identifier.
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// API base URL; defaults to the OpenAI endpoint when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Maximum tokens per extraction reply.
    pub max_tokens: usize,
    /// Sampling temperature for extraction calls.
    pub temperature: f32,
    /// Retry policy for transient provider errors.
    pub retry: RetryConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: None,
            max_tokens: 512,
            temperature: 0.2,
            retry: RetryConfig::default(),
        }
    }
}

/// Retry policy with exponential backoff for transient provider errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 1000,
            max_backoff_ms: 30_000,
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

/// Configuration for the search client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum hits requested per query.
    pub max_results: usize,
    /// Whether to fetch full page text for each hit (snippet fallback
    /// applies either way).
    pub fetch_pages: bool,
    /// Timeout for a single page fetch, in seconds.
    pub fetch_timeout_secs: u64,
    /// Page fetches in flight at once within one query's hit list.
    pub fetch_concurrency: usize,
    /// Cap on extracted page text per hit, in characters.
    pub max_page_chars: usize,
    /// User-Agent header for outbound requests.
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 5,
            fetch_pages: true,
            fetch_timeout_secs: 15,
            fetch_concurrency: 3,
            max_page_chars: 5000,
            user_agent: "prospect/0.1".to_string(),
        }
    }
}

/// Configuration for the research pipeline policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Minimum extraction confidence to accept a facet result.
    pub confidence_threshold: f64,
    /// Fixed delay between successive search queries, in seconds.
    pub search_delay_secs: u64,
    /// How many top hit bodies are joined into the extraction context.
    pub hits_per_extraction: usize,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.3,
            search_delay_secs: 2,
            hits_per_extraction: 3,
        }
    }
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `PROSPECT_`)
/// 3. Workspace-local config (`.prospect/config.toml`)
/// 4. User config (`~/.config/prospect/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&ProspectConfig>,
) -> crate::error::Result<ProspectConfig> {
    let mut figment = Figment::from(Serialized::defaults(ProspectConfig::default()));

    // User-level config
    if let Some(config_dir) = directories::ProjectDirs::from("dev", "prospect", "prospect") {
        let user_config = config_dir.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    // Workspace-level config
    if let Some(ws) = workspace {
        let ws_config = ws.join(".prospect").join("config.toml");
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // Environment variables (PROSPECT_LLM__MODEL, PROSPECT_RESEARCH__CONFIDENCE_THRESHOLD, ...)
    figment = figment.merge(Env::prefixed("PROSPECT_").split("__"));

    // Explicit overrides
    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    let mut config: ProspectConfig = figment.extract().map_err(Box::new)?;

    // The threshold is a policy knob, not a free-form float.
    config.research.confidence_threshold = config.research.confidence_threshold.clamp(0.0, 1.0);
    if config.search.max_results == 0 {
        config.search.max_results = SearchConfig::default().max_results;
    }
    if config.research.hits_per_extraction == 0 {
        config.research.hits_per_extraction = ResearchConfig::default().hits_per_extraction;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProspectConfig::default();
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.search.max_results, 5);
        assert!((config.research.confidence_threshold - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.research.search_delay_secs, 2);
        assert_eq!(config.research.hits_per_extraction, 3);
    }

    #[test]
    fn test_load_with_defaults_only() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(dir.path()), None).unwrap();
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.search.fetch_concurrency, 3);
    }

    #[test]
    fn test_workspace_config_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(".prospect");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("config.toml"),
            "[research]\nconfidence_threshold = 0.5\nsearch_delay_secs = 0\n",
        )
        .unwrap();

        let config = load_config(Some(dir.path()), None).unwrap();
        assert!((config.research.confidence_threshold - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.research.search_delay_secs, 0);
        // Untouched sections keep defaults
        assert_eq!(config.llm.provider, "openai");
    }

    #[test]
    fn test_explicit_overrides_win() {
        let dir = tempfile::tempdir().unwrap();
        let mut overrides = ProspectConfig::default();
        overrides.llm.model = "qwen2.5:14b".to_string();
        let config = load_config(Some(dir.path()), Some(&overrides)).unwrap();
        assert_eq!(config.llm.model, "qwen2.5:14b");
    }

    #[test]
    fn test_threshold_clamped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(".prospect");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("config.toml"),
            "[research]\nconfidence_threshold = 1.7\n",
        )
        .unwrap();

        let config = load_config(Some(dir.path()), None).unwrap();
        assert!((config.research.confidence_threshold - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_malformed_config_surfaces_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(".prospect");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("config.toml"),
            "[research]\nconfidence_threshold = \"not a number\"\n",
        )
        .unwrap();

        let err = load_config(Some(dir.path()), None).unwrap_err();
        assert!(matches!(err, crate::error::ProspectError::Config(_)));
    }

    #[test]
    fn test_zero_max_results_reset_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(".prospect");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(config_dir.join("config.toml"), "[search]\nmax_results = 0\n").unwrap();

        let config = load_config(Some(dir.path()), None).unwrap();
        assert_eq!(config.search.max_results, 5);
    }
}
