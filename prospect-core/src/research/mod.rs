//! Research orchestration: one company at a time, three facets in fixed
//! order, with pacing between network calls and best-effort sentinel
//! results for everything that fails below the input-validation line.

pub mod report;
pub mod searcher;

use crate::config::ProspectConfig;
use crate::error::{ProspectError, Result};
use crate::extract::FacetExtractor;
use crate::llm::{create_provider, LlmProvider};
use crate::rate_limit::Pacer;
use crate::search::SearchClient;
use crate::types::{CompanyResult, Facet, FacetResult};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

pub use report::{to_csv, BatchRow, CSV_HEADER};
pub use searcher::FacetSearcher;

/// Observer for per-facet progress during a single company's research.
pub trait ResearchCallback: Send + Sync {
    fn on_facet_start(&self, _facet: Facet) {}
    fn on_facet_complete(&self, _facet: Facet, _result: &FacetResult) {}
}

/// Observer for batch progress; called once per company.
pub trait BatchProgress: Send + Sync {
    fn on_company_start(&self, _index: usize, _total: usize, _company: &str) {}
    fn on_company_complete(&self, _index: usize, _total: usize, _row: &BatchRow) {}
}

struct NoopCallback;
impl ResearchCallback for NoopCallback {}

/// Sequences facet research for companies. The unit invoked once per
/// company by both the single and batch flows.
pub struct ResearchOrchestrator {
    searcher: FacetSearcher,
    pacer: Pacer,
}

impl ResearchOrchestrator {
    /// Build the full pipeline from configuration: DuckDuckGo search
    /// backend plus the configured LLM provider.
    pub fn new(config: &ProspectConfig) -> Result<Self> {
        let search = Arc::new(SearchClient::new(config.search.clone())?);
        let provider = create_provider(&config.llm)?;
        Ok(Self::with_components(search, provider, config))
    }

    /// Build the pipeline around injected collaborators (tests, alternate
    /// backends).
    pub fn with_components(
        search: Arc<SearchClient>,
        provider: Arc<dyn LlmProvider>,
        config: &ProspectConfig,
    ) -> Self {
        let pacer = Pacer::from_secs(config.research.search_delay_secs);
        let extractor = Arc::new(FacetExtractor::new(provider, config.llm.clone()));
        let searcher = FacetSearcher::new(
            search,
            extractor,
            pacer.clone(),
            config.research.confidence_threshold,
            config.search.max_results,
            config.research.hits_per_extraction,
        );
        Self { searcher, pacer }
    }

    /// Research one company across all three facets.
    ///
    /// Fails only on an empty (post-trim) company name, before any network
    /// call. Every lower-level failure is already absorbed into sentinel
    /// facet results, so a validated call always succeeds.
    pub async fn research_company(&self, company_name: &str) -> Result<CompanyResult> {
        self.research_company_with(company_name, &NoopCallback).await
    }

    /// Like [`research_company`](Self::research_company), reporting facet
    /// progress through the callback.
    pub async fn research_company_with(
        &self,
        company_name: &str,
        callback: &dyn ResearchCallback,
    ) -> Result<CompanyResult> {
        let company = company_name.trim();
        if company.is_empty() {
            return Err(ProspectError::InvalidCompanyName);
        }

        info!(company = %company, "starting research");

        let profile = self.run_facet(company, Facet::Profile, callback).await;
        self.pacer.wait().await;
        let sector = self.run_facet(company, Facet::Sector, callback).await;
        self.pacer.wait().await;
        let objectives = self.run_facet(company, Facet::Objectives, callback).await;

        Ok(CompanyResult {
            company: company.to_string(),
            profile,
            sector,
            objectives,
            researched_at: Utc::now(),
        })
    }

    async fn run_facet(
        &self,
        company: &str,
        facet: Facet,
        callback: &dyn ResearchCallback,
    ) -> FacetResult {
        callback.on_facet_start(facet);
        let result = self
            .searcher
            .search_facet(company, facet)
            .await
            .into_result(facet);
        callback.on_facet_complete(facet, &result);
        result
    }

    /// Research a list of companies strictly one at a time, in input order.
    ///
    /// A company's fatal error (invalid input) becomes that row's error
    /// field; the batch always runs to completion.
    pub async fn research_batch(
        &self,
        companies: &[String],
        progress: Option<&dyn BatchProgress>,
    ) -> Vec<BatchRow> {
        let total = companies.len();
        let mut rows = Vec::with_capacity(total);

        for (index, company) in companies.iter().enumerate() {
            if let Some(p) = progress {
                p.on_company_start(index, total, company);
            }

            let outcome = self
                .research_company(company)
                .await
                .map_err(|e| e.to_string());
            let row = BatchRow {
                company: company.clone(),
                outcome,
            };

            if let Some(p) = progress {
                p.on_company_complete(index, total, &row);
            }
            rows.push(row);
        }

        rows
    }
}
