//! Per-facet search: ordered query-template fallback with a confidence gate.

use crate::extract::FacetExtractor;
use crate::rate_limit::Pacer;
use crate::search::SearchClient;
use crate::types::{Facet, FacetOutcome};
use std::sync::Arc;
use tracing::{debug, info};

/// Drives one facet's query variants until a result clears the confidence
/// threshold, else reports `NotFound`.
pub struct FacetSearcher {
    search: Arc<SearchClient>,
    extractor: Arc<FacetExtractor>,
    pacer: Pacer,
    confidence_threshold: f64,
    max_results: usize,
    hits_per_extraction: usize,
}

impl FacetSearcher {
    pub fn new(
        search: Arc<SearchClient>,
        extractor: Arc<FacetExtractor>,
        pacer: Pacer,
        confidence_threshold: f64,
        max_results: usize,
        hits_per_extraction: usize,
    ) -> Self {
        Self {
            search,
            extractor,
            pacer,
            confidence_threshold,
            max_results,
            hits_per_extraction,
        }
    }

    /// Try each query template in order; accept the first extraction whose
    /// confidence clears the threshold. First-acceptable, not best-of-all.
    pub async fn search_facet(&self, company: &str, facet: Facet) -> FacetOutcome {
        for (attempt, template) in facet.query_templates().iter().enumerate() {
            if attempt > 0 {
                self.pacer.wait().await;
            }

            let query = template.replace("{name}", company);
            debug!(%facet, query = %query, attempt, "trying query template");

            let hits = self.search.search(&query, self.max_results).await;
            if hits.is_empty() {
                continue;
            }

            let content: String = hits
                .iter()
                .take(self.hits_per_extraction)
                .map(|h| h.body.as_str())
                .collect::<Vec<_>>()
                .join("\n");

            let extraction = self.extractor.analyze(&content, company, facet).await;
            if extraction.confidence >= self.confidence_threshold {
                info!(
                    %facet,
                    company = %company,
                    confidence = extraction.confidence,
                    source = %hits[0].link,
                    "facet accepted"
                );
                return FacetOutcome::Found {
                    data: extraction.data,
                    source: hits[0].link.clone(),
                    confidence: extraction.confidence,
                };
            }
            debug!(
                %facet,
                confidence = extraction.confidence,
                threshold = self.confidence_threshold,
                "extraction below threshold"
            );
        }

        info!(%facet, company = %company, "no template produced an accepted result");
        FacetOutcome::NotFound
    }
}
