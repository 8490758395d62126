//! The end-to-end pipeline: extraction, attribution, clustering,
//! verification.
//!
//! `process` is total: malformed or citation-free input yields an empty
//! result, never an error. It holds no state between calls, so the same
//! text and config produce the same output wherever it runs, inline or
//! from a queued worker.

use citation_engine::CitationEngine;
use citation_types::{PipelineResult, PipelineSummary, ProcessingConfig};
use tracing::{debug, info, instrument};

use crate::verifier::Verifier;

/// One pipeline instance, reusable across documents.
///
/// `new` builds an offline pipeline with no verification sources;
/// `standard` wires up CourtListener and the web reference chain.
#[derive(Default)]
pub struct CitationPipeline {
    engine: CitationEngine,
    verifier: Verifier,
}

impl CitationPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        Self::new().with_verifier(Verifier::standard())
    }

    pub fn with_verifier(mut self, verifier: Verifier) -> Self {
        self.verifier = verifier;
        self
    }

    /// Run every enabled stage over `text` and return the full result.
    #[instrument(skip(self, text, config), fields(chars = text.len()))]
    pub async fn process(&self, text: &str, config: &ProcessingConfig) -> PipelineResult {
        let (citations, clusters) = self.engine.analyze(text, config);
        info!(
            citations = citations.len(),
            clusters = clusters.len(),
            "document analysis complete"
        );
        if config.debug_mode {
            for citation in &citations {
                debug!(
                    text = %citation.normalized_text,
                    offset = citation.start_offset,
                    name = citation.extracted_case_name.as_deref().unwrap_or("-"),
                    year = citation.extracted_date.as_deref().unwrap_or("-"),
                    cluster = ?citation.cluster_id,
                    "extracted citation"
                );
            }
        }

        let mut result = PipelineResult {
            citations,
            clusters,
            summary: PipelineSummary::default(),
        };

        if !config.enable_verification {
            debug!("verification disabled by config");
        } else if result.clusters.is_empty() {
            debug!("verification skipped, nothing to verify");
        } else if !self.verifier.has_sources() {
            debug!("verification skipped, no sources configured");
        } else {
            self.verifier.verify_all(&mut result, config).await;
            let verified = result
                .citations
                .iter()
                .filter(|c| c.canonical_name.is_some())
                .count();
            info!(
                verified,
                total = result.citations.len(),
                "verification complete"
            );
        }

        result.summary = PipelineSummary::from_parts(&result.citations, &result.clusters);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_empty_input_yields_empty_result() {
        let pipeline = CitationPipeline::new();
        let result = pipeline.process("", &ProcessingConfig::default()).await;
        assert_eq!(result.citations.len(), 0);
        assert_eq!(result.clusters.len(), 0);
        assert_eq!(result.summary.citation_count, 0);
    }

    #[tokio::test]
    async fn test_prose_without_citations_yields_empty_result() {
        let pipeline = CitationPipeline::new();
        let result = pipeline
            .process(
                "The parties stipulated to the facts and waived oral argument.",
                &ProcessingConfig::default(),
            )
            .await;
        assert_eq!(result.citations.len(), 0);
        assert_eq!(result.clusters.len(), 0);
    }

    #[tokio::test]
    async fn test_offline_pipeline_extracts_and_clusters() {
        let pipeline = CitationPipeline::new();
        let text = "State v. Johnson, 159 Wn.2d 700, 153 P.3d 846 (2007).";
        let result = pipeline.process(text, &ProcessingConfig::default()).await;

        assert_eq!(result.citations.len(), 2);
        assert_eq!(result.clusters.len(), 1);
        assert_eq!(result.summary.citation_count, 2);
        assert_eq!(result.summary.cluster_count, 1);
        assert_eq!(result.summary.unverified, 2, "no sources means nothing verifies");
    }
}
