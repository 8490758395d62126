//! Cluster verification.
//!
//! One lookup per cluster: the most complete member's citation goes to the
//! primary authority, then down the secondary chain until something
//! accepts. The accepted identity propagates to the cluster's other members
//! as true-by-parallel. A member that already carries a conflicting verified
//! identity is never overwritten; the cluster gets a contamination warning
//! and its aggregate reports whichever identity has the higher confidence.
//!
//! Lookups for different clusters run concurrently, but results are applied
//! in cluster order so output never depends on network timing.

use std::sync::Arc;
use std::time::Duration;

use citation_types::normalize::{name_similarity, normalize_case_name};
use citation_types::{
    Citation, Cluster, ClusterWarning, PipelineResult, ProcessingConfig, VerificationCandidate,
    VerificationStatus, WarningKind,
};
use futures::stream::{self, StreamExt};
use tracing::{debug, instrument, warn};

use crate::sources::{CitationSource, CourtListenerSource, SourceError, WebReferenceSource};

/// Confidence when the primary authority returns exactly one candidate.
const PRIMARY_CONFIDENCE: f64 = 1.0;

/// Confidence for a validated secondary-source hit.
const SECONDARY_CONFIDENCE: f64 = 0.85;

/// Confidence when ambiguity could not be resolved and the first candidate
/// was taken anyway.
const AMBIGUOUS_CONFIDENCE: f64 = 0.5;

/// Deadlines and concurrency for a verification run.
#[derive(Debug, Clone)]
pub struct VerifierOptions {
    /// Per-source deadline when the source declares none of its own.
    pub source_timeout: Duration,
    /// How many secondary sources to query concurrently. 1 keeps the chain
    /// strictly sequential.
    pub secondary_fanout: usize,
    /// How many clusters may be in flight at once.
    pub max_parallel_clusters: usize,
}

impl Default for VerifierOptions {
    fn default() -> Self {
        Self {
            source_timeout: Duration::from_secs(10),
            secondary_fanout: 1,
            max_parallel_clusters: 4,
        }
    }
}

/// Composite verifier over a primary authority and an ordered secondary
/// chain.
#[derive(Default)]
pub struct Verifier {
    primary: Option<Arc<dyn CitationSource>>,
    secondaries: Vec<Arc<dyn CitationSource>>,
    options: VerifierOptions,
}

/// An accepted resolution for one cluster, not yet written back.
struct Accepted {
    /// The member whose citation was looked up; it gets direct verification,
    /// everyone else inherits.
    member: usize,
    candidate: VerificationCandidate,
    confidence: f64,
}

impl Verifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard setup: CourtListener first, then the web reference
    /// chain.
    pub fn standard() -> Self {
        let mut verifier = Self::new().with_primary(Arc::new(CourtListenerSource::new()));
        for source in WebReferenceSource::default_chain() {
            verifier = verifier.add_secondary(source);
        }
        verifier
    }

    pub fn with_primary(mut self, source: Arc<dyn CitationSource>) -> Self {
        self.primary = Some(source);
        self
    }

    pub fn add_secondary(mut self, source: Arc<dyn CitationSource>) -> Self {
        self.secondaries.push(source);
        self
    }

    pub fn with_options(mut self, options: VerifierOptions) -> Self {
        self.options = options;
        self
    }

    pub fn has_sources(&self) -> bool {
        self.primary.is_some() || !self.secondaries.is_empty()
    }

    /// Verify every cluster in `result`, updating member citations and
    /// cluster aggregates in place.
    pub async fn verify_all(&self, result: &mut PipelineResult, config: &ProcessingConfig) {
        if !self.has_sources() || result.clusters.is_empty() {
            return;
        }

        let mut resolutions = {
            let citations: &[Citation] = &result.citations;
            let lookups: Vec<_> = result
                .clusters
                .iter()
                .enumerate()
                .map(|(index, cluster)| {
                    async move { (index, self.resolve_cluster(cluster, citations, config).await) }
                })
                .collect();
            let mut buffered =
                stream::iter(lookups).buffer_unordered(self.options.max_parallel_clusters);

            let mut collected = Vec::with_capacity(result.clusters.len());
            while let Some(item) = buffered.next().await {
                collected.push(item);
            }
            collected
        };

        // Apply in cluster order regardless of completion order.
        resolutions.sort_by_key(|(index, _)| *index);
        for (index, accepted) in resolutions {
            if let Some(accepted) = accepted {
                apply_resolution(&mut result.clusters[index], &mut result.citations, accepted);
            }
        }
    }

    #[instrument(skip(self, cluster, citations, config), fields(cluster = cluster.id))]
    async fn resolve_cluster(
        &self,
        cluster: &Cluster,
        citations: &[Citation],
        config: &ProcessingConfig,
    ) -> Option<Accepted> {
        let member = most_complete_member(cluster, citations)?;
        let citation_text = citations[member].normalized_text.as_str();

        if let Some(primary) = &self.primary {
            match self.attempt(primary.as_ref(), citation_text).await {
                Ok(candidates) if !candidates.is_empty() => {
                    let (candidate, confidence) = disambiguate(cluster, candidates, config)?;
                    return Some(Accepted {
                        member,
                        candidate,
                        confidence,
                    });
                }
                Ok(_) => debug!(
                    source = primary.source_id(),
                    citation = citation_text,
                    "no match from primary source"
                ),
                Err(error) => warn!(
                    source = primary.source_id(),
                    citation = citation_text,
                    %error,
                    "primary source failed"
                ),
            }
        }

        let (candidate, confidence) = self.try_secondaries(citation_text).await?;
        Some(Accepted {
            member,
            candidate,
            confidence,
        })
    }

    /// Walk the secondary chain in priority order, `secondary_fanout` at a
    /// time. Within a concurrent batch, priority order still decides which
    /// answer wins, so acceptance does not depend on timing.
    async fn try_secondaries(&self, citation_text: &str) -> Option<(VerificationCandidate, f64)> {
        let fanout = self.options.secondary_fanout.max(1);
        for batch in self.secondaries.chunks(fanout) {
            let results = futures::future::join_all(
                batch
                    .iter()
                    .map(|source| self.attempt_arc(source, citation_text)),
            )
            .await;

            for (source, result) in batch.iter().zip(results) {
                match result {
                    Ok(candidates) => {
                        if let Some(candidate) = candidates.into_iter().next() {
                            return Some((candidate, SECONDARY_CONFIDENCE));
                        }
                        debug!(
                            source = source.source_id(),
                            citation = citation_text,
                            "no match from secondary source"
                        );
                    }
                    Err(error) => debug!(
                        source = source.source_id(),
                        citation = citation_text,
                        %error,
                        "secondary source failed"
                    ),
                }
            }
        }
        None
    }

    async fn attempt_arc(
        &self,
        source: &Arc<dyn CitationSource>,
        citation: &str,
    ) -> Result<Vec<VerificationCandidate>, SourceError> {
        self.attempt(source.as_ref(), citation).await
    }

    /// One lookup under a deadline. A slow source is indistinguishable from
    /// a failed one.
    async fn attempt(
        &self,
        source: &dyn CitationSource,
        citation: &str,
    ) -> Result<Vec<VerificationCandidate>, SourceError> {
        let deadline = source.timeout().unwrap_or(self.options.source_timeout);
        match tokio::time::timeout(deadline, source.lookup(citation)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout(source.source_id().to_string(), deadline)),
        }
    }
}

/// The member whose citation gets looked up: most extracted evidence first,
/// ties broken toward the longer citation text, then document order.
fn most_complete_member(cluster: &Cluster, citations: &[Citation]) -> Option<usize> {
    cluster
        .members
        .iter()
        .copied()
        .filter(|&m| m < citations.len())
        .max_by(|&a, &b| {
            completeness(&citations[a])
                .cmp(&completeness(&citations[b]))
                .then(
                    citations[a]
                        .normalized_text
                        .len()
                        .cmp(&citations[b].normalized_text.len()),
                )
                .then(b.cmp(&a))
        })
}

fn completeness(citation: &Citation) -> u32 {
    let mut score = 0;
    if citation.extracted_case_name.is_some() {
        score += 2;
    }
    if citation.extracted_date.is_some() {
        score += 1;
    }
    score
}

/// Pick one candidate out of several. Token-set similarity against the
/// cluster's own representative name decides; with no representative or no
/// close match, the first candidate is taken at low confidence so the
/// outcome stays deterministic.
fn disambiguate(
    cluster: &Cluster,
    mut candidates: Vec<VerificationCandidate>,
    config: &ProcessingConfig,
) -> Option<(VerificationCandidate, f64)> {
    if candidates.len() == 1 {
        return candidates
            .into_iter()
            .next()
            .map(|candidate| (candidate, PRIMARY_CONFIDENCE));
    }

    if let Some(representative) = cluster.representative_name.as_deref() {
        let best = candidates
            .iter()
            .enumerate()
            .map(|(i, c)| (i, name_similarity(representative, &c.case_name)))
            .max_by(|a, b| {
                a.1.partial_cmp(&b.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(b.0.cmp(&a.0))
            });
        if let Some((index, score)) = best {
            if score >= config.name_similarity_threshold {
                return Some((candidates.swap_remove(index), score));
            }
        }
        debug!(
            representative = representative,
            candidates = candidates.len(),
            "no candidate met the similarity threshold"
        );
    }

    candidates
        .into_iter()
        .next()
        .map(|candidate| (candidate, AMBIGUOUS_CONFIDENCE))
}

/// Write one accepted identity into the cluster and its members. Members
/// that already carry canonical data are left untouched; a conflicting
/// identity among them raises a contamination warning.
fn apply_resolution(cluster: &mut Cluster, citations: &mut [Citation], accepted: Accepted) {
    let Accepted {
        member,
        candidate,
        confidence,
    } = accepted;

    // Conflicting identities already on the books, before anything is
    // written. The strongest one competes with the new resolution for the
    // cluster aggregate.
    let mut conflict: Option<(f64, VerificationCandidate)> = None;
    for &m in &cluster.members {
        let Some(citation) = citations.get(m) else {
            continue;
        };
        let Some(existing) = &citation.canonical_name else {
            continue;
        };
        if normalize_case_name(existing) == normalize_case_name(&candidate.case_name) {
            continue;
        }

        cluster.warnings.push(ClusterWarning {
            kind: WarningKind::Contamination,
            message: format!(
                "member \"{}\" already verified as \"{}\", cluster resolved to \"{}\"",
                citation.normalized_text, existing, candidate.case_name
            ),
        });
        if conflict
            .as_ref()
            .map_or(true, |(held, _)| citation.confidence > *held)
        {
            conflict = Some((
                citation.confidence,
                VerificationCandidate {
                    case_name: existing.clone(),
                    date: citation.canonical_date.clone(),
                    url: citation.canonical_url.clone(),
                    source_id: citation.verification_source.clone().unwrap_or_default(),
                },
            ));
        }
    }

    for &m in &cluster.members {
        let Some(citation) = citations.get_mut(m) else {
            continue;
        };
        if citation.canonical_name.is_some() {
            continue;
        }
        citation.canonical_name = Some(candidate.case_name.clone());
        citation.canonical_date = candidate.date.clone();
        citation.canonical_url = candidate.url.clone();
        citation.verification_source = Some(candidate.source_id.clone());
        citation.confidence = confidence;
        citation.verified = if m == member {
            VerificationStatus::Verified
        } else {
            VerificationStatus::TrueByParallel
        };
    }

    let (aggregate, aggregate_source) = match &conflict {
        Some((held, kept)) if *held > confidence => (kept.clone(), kept.source_id.clone()),
        _ => (candidate.clone(), candidate.source_id.clone()),
    };
    cluster.canonical_name = Some(aggregate.case_name);
    cluster.canonical_date = aggregate.date;
    cluster.canonical_url = aggregate.url;
    cluster.verification_source = Some(aggregate_source);
}
