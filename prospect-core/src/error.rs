//! Error types for the prospect core library.
//!
//! Uses `thiserror` for public API error types. Most pipeline failures are
//! absorbed into sentinel values close to where they occur (empty hit lists,
//! zero-confidence extractions); only malformed top-level input and setup
//! problems surface as errors.

/// Top-level error type for the prospect core library.
#[derive(Debug, thiserror::Error)]
pub enum ProspectError {
    #[error("company name must be a non-empty string")]
    InvalidCompanyName,

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("search error: {0}")]
    Search(#[from] SearchError),

    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

/// Errors from LLM provider interactions.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API request failed: {message}")]
    ApiRequest { message: String },

    #[error("API response parse error: {message}")]
    ResponseParse { message: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Provider connection failed: {message}")]
    Connection { message: String },
}

/// Errors from the search backend and page retrieval.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search backend request failed: {message}")]
    Backend { message: String },

    #[error("page fetch failed for {url}: {message}")]
    PageFetch { url: String, message: String },

    #[error("HTTP client setup failed: {message}")]
    ClientSetup { message: String },
}

/// A type alias for results using the top-level `ProspectError`.
pub type Result<T> = std::result::Result<T, ProspectError>;
