//! Prospect core — company research pipeline.
//!
//! Researches a company across three facets (profile, sector, 2025
//! objectives) by issuing web searches, extracting page text, and asking an
//! LLM to distill each facet into a short answer with a confidence score
//! and a source citation. Failures degrade to sentinel values; only invalid
//! input is fatal.

pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
pub mod rate_limit;
pub mod research;
pub mod search;
pub mod types;

pub use config::{load_config, ProspectConfig};
pub use error::{ProspectError, Result};
pub use research::{BatchProgress, BatchRow, ResearchCallback, ResearchOrchestrator};
pub use types::{CompanyResult, Facet, FacetResult, SearchHit};
