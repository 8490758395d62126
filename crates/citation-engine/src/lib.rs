pub mod attribution;
pub mod cluster;
pub mod extractor;
pub mod patterns;
pub mod reporters;

pub use attribution::{attribute_citation, Attribution, NamePattern};
pub use cluster::cluster_citations;
pub use extractor::extract_citations;

use citation_types::{Citation, Cluster, ProcessingConfig};

/// CitationEngine entry point: the synchronous stages, extraction through
/// clustering. Verification lives upstream and needs none of this state.
pub struct CitationEngine;

impl CitationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run extraction, attribution, and clustering over raw text, honoring
    /// the config toggles for each stage.
    pub fn analyze(&self, text: &str, config: &ProcessingConfig) -> (Vec<Citation>, Vec<Cluster>) {
        let mut citations = extractor::extract_citations(text, config);

        if config.extract_case_names || config.extract_dates {
            for citation in citations.iter_mut() {
                let attr = attribution::attribute_citation(text, citation);
                if config.extract_case_names {
                    citation.extracted_case_name = attr.case_name;
                }
                if config.extract_dates {
                    citation.extracted_date = attr.year;
                }
            }
        }

        let clusters = if config.enable_clustering {
            cluster::cluster_citations(&mut citations, config)
        } else {
            Vec::new()
        };

        (citations, clusters)
    }
}

impl Default for CitationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_engine_analyzes_single_citation() {
        let engine = CitationEngine::new();
        let text = "Brown v. Board of Education, 347 U.S. 483 (1954), ended de jure segregation.";
        let (citations, clusters) = engine.analyze(text, &ProcessingConfig::default());

        assert_eq!(citations.len(), 1);
        assert_eq!(
            citations[0].extracted_case_name.as_deref(),
            Some("Brown v. Board of Education")
        );
        assert_eq!(citations[0].extracted_date.as_deref(), Some("1954"));
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].members, vec![0]);
    }

    #[test]
    fn test_engine_clusters_parallel_citations() {
        let engine = CitationEngine::new();
        let text = "State v. Johnson, 159 Wn.2d 700, 153 P.3d 846 (2007).";
        let (citations, clusters) = engine.analyze(text, &ProcessingConfig::default());

        assert_eq!(citations.len(), 2);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].representative_name.as_deref(), Some("State v. Johnson"));
        assert_eq!(citations[0].cluster_id, citations[1].cluster_id);
    }

    #[test]
    fn test_clustering_can_be_disabled() {
        let engine = CitationEngine::new();
        let mut config = ProcessingConfig::default();
        config.enable_clustering = false;

        let text = "State v. Johnson, 159 Wn.2d 700, 153 P.3d 846 (2007).";
        let (citations, clusters) = engine.analyze(text, &config);

        assert!(clusters.is_empty());
        assert!(citations.iter().all(|c| c.cluster_id.is_none()));
        assert_eq!(citations.len(), 2, "extraction still runs");
    }

    #[test]
    fn test_name_extraction_can_be_disabled() {
        let engine = CitationEngine::new();
        let mut config = ProcessingConfig::default();
        config.extract_case_names = false;

        let text = "State v. Johnson, 159 Wn.2d 700, 153 P.3d 846 (2007).";
        let (citations, clusters) = engine.analyze(text, &config);

        assert!(citations.iter().all(|c| c.extracted_case_name.is_none()));
        assert_eq!(
            clusters.len(),
            1,
            "parallel grouping still clusters nameless citations"
        );
        assert_eq!(clusters[0].representative_name, None);
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let engine = CitationEngine::new();
        let text = "See Miranda v. Arizona, 384 U.S. 436, 86 S. Ct. 1602 (1966); \
                    Mathews v. Eldridge, 424 U.S. 319 (1976).";
        let config = ProcessingConfig::default();

        let first = engine.analyze(text, &config);
        let second = engine.analyze(text, &config);
        assert_eq!(first, second);
    }
}
