/// How a citation span was recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Matched by a reporter-specific pattern from the registry table.
    #[default]
    Pattern,
    /// Matched by the general volume/reporter/page grammar scan.
    Grammar,
}

/// Verification provenance for a citation.
///
/// `TrueByParallel` marks members that inherited canonical data from a
/// directly verified member of the same cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Unverified,
    Verified,
    TrueByParallel,
}

/// One recognized citation occurrence in the source text.
///
/// Fields split into two strictly separated halves: `extracted_*` comes only
/// from the document, `canonical_*` only from external authorities. Neither
/// half is ever written from the other, even when they disagree.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Citation {
    pub raw_text: String,
    pub normalized_text: String, // canonical reporter spelling, collapsed whitespace
    pub start_offset: usize,     // character offset in the source text
    pub end_offset: usize,
    pub extraction_method: ExtractionMethod,

    /// Canonical reporter series, e.g. "Wash. 2d" for a "Wn.2d" match.
    pub reporter: Option<String>,
    pub volume: Option<u32>,
    pub page: Option<u32>,
    pub pinpoint: Option<u32>, // trailing pinpoint page, e.g. the 716 in "700, 716"

    /// Citations found in one citation-bearing clause share a group id.
    pub parallel_group: Option<u32>,

    // Read from the document.
    pub extracted_case_name: Option<String>,
    pub extracted_date: Option<String>, // 4-digit year

    // Confirmed by an external authority.
    pub canonical_name: Option<String>,
    pub canonical_date: Option<String>, // 4-digit year
    pub canonical_url: Option<String>,
    pub verified: VerificationStatus,
    pub verification_source: Option<String>,
    pub confidence: f64,

    /// Weak back-reference into `PipelineResult.clusters`, not ownership.
    pub cluster_id: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    Contamination,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClusterWarning {
    pub kind: WarningKind,
    pub message: String,
}

/// The set of citations believed to denote one case.
///
/// `members` holds indices into `PipelineResult.citations` in document order.
/// `representative_*` comes from extraction and is never overwritten by
/// verification; the aggregate `canonical_*` fields are set once any member
/// is verified.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Cluster {
    pub id: u32,
    pub members: Vec<usize>,
    pub representative_name: Option<String>,
    pub representative_date: Option<String>,
    pub canonical_name: Option<String>,
    pub canonical_date: Option<String>,
    pub canonical_url: Option<String>,
    pub verification_source: Option<String>,
    pub warnings: Vec<ClusterWarning>,
}

/// One authority's answer for a citation string.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VerificationCandidate {
    pub case_name: String,
    pub date: Option<String>, // 4-digit year
    pub url: Option<String>,
    pub source_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct PipelineSummary {
    pub citation_count: usize,
    pub cluster_count: usize,
    pub verified: usize,
    pub true_by_parallel: usize,
    pub unverified: usize,
}

impl PipelineSummary {
    pub fn from_parts(citations: &[Citation], clusters: &[Cluster]) -> Self {
        let mut summary = PipelineSummary {
            citation_count: citations.len(),
            cluster_count: clusters.len(),
            ..Default::default()
        };
        for citation in citations {
            match citation.verified {
                VerificationStatus::Verified => summary.verified += 1,
                VerificationStatus::TrueByParallel => summary.true_by_parallel += 1,
                VerificationStatus::Unverified => summary.unverified += 1,
            }
        }
        summary
    }
}

/// Output of one `process` call. Created fresh per call, no state survives it.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct PipelineResult {
    pub citations: Vec<Citation>,
    pub clusters: Vec<Cluster>,
    pub summary: PipelineSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&VerificationStatus::TrueByParallel).unwrap();
        assert_eq!(json, "\"true_by_parallel\"");
        let json = serde_json::to_string(&VerificationStatus::Unverified).unwrap();
        assert_eq!(json, "\"unverified\"");
    }

    #[test]
    fn test_summary_counts_statuses() {
        let mut verified = Citation::default();
        verified.verified = VerificationStatus::Verified;
        let mut inherited = Citation::default();
        inherited.verified = VerificationStatus::TrueByParallel;
        let plain = Citation::default();

        let summary = PipelineSummary::from_parts(&[verified, inherited, plain], &[]);
        assert_eq!(summary.citation_count, 3);
        assert_eq!(summary.verified, 1);
        assert_eq!(summary.true_by_parallel, 1);
        assert_eq!(summary.unverified, 1);
    }

    #[test]
    fn test_citation_round_trips_through_json() {
        let citation = Citation {
            raw_text: "159 Wn.2d 700".to_string(),
            normalized_text: "159 Wash. 2d 700".to_string(),
            start_offset: 10,
            end_offset: 23,
            reporter: Some("Wash. 2d".to_string()),
            volume: Some(159),
            page: Some(700),
            extracted_case_name: Some("State v. Johnson".to_string()),
            extracted_date: Some("2007".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&citation).unwrap();
        let back: Citation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, citation);
    }
}
