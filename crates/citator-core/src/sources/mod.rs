//! External citation authorities.
//!
//! Each source answers one question: which case does this citation string
//! denote? Sources never talk to each other; the verifier decides ordering,
//! deadlines, and what to do with the candidates.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use citation_types::VerificationCandidate;
use thiserror::Error;

pub mod court_listener;
pub mod landmark;
pub mod web;

pub use court_listener::CourtListenerSource;
pub use landmark::LandmarkSource;
pub use web::WebReferenceSource;

/// Source lookup failures. All recoverable: the verifier logs and moves on
/// to the next source in the chain.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response from {0}: {1}")]
    BadResponse(String, String),

    #[error("Page does not reference the citation: {0}")]
    Mismatch(String),

    #[error("{0} timed out after {1:?}")]
    Timeout(String, Duration),
}

/// One external authority that can resolve citation strings.
#[async_trait]
pub trait CitationSource: Send + Sync {
    /// Stable identifier recorded in `verification_source`.
    fn source_id(&self) -> &str;

    /// Per-source deadline. The verifier's default applies when `None`.
    fn timeout(&self) -> Option<Duration> {
        None
    }

    /// Resolve one citation string. An empty vector is a clean miss, not an
    /// error.
    async fn lookup(&self, citation: &str) -> Result<Vec<VerificationCandidate>, SourceError>;
}

/// Fixed-answer source for tests: resolves from a map, optionally after a
/// delay, optionally failing outright.
#[derive(Default)]
pub struct StaticSource {
    id: String,
    answers: HashMap<String, Vec<VerificationCandidate>>,
    delay: Option<Duration>,
    fail: bool,
}

impl StaticSource {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Add candidates for a citation string.
    pub fn with_answer(mut self, citation: &str, candidates: Vec<VerificationCandidate>) -> Self {
        self.answers.insert(citation.to_string(), candidates);
        self
    }

    /// Delay every lookup, for timeout tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make every lookup fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl CitationSource for StaticSource {
    fn source_id(&self) -> &str {
        &self.id
    }

    async fn lookup(&self, citation: &str) -> Result<Vec<VerificationCandidate>, SourceError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(SourceError::BadResponse(self.id.clone(), "forced failure".to_string()));
        }
        Ok(self.answers.get(citation).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_source_answers_and_misses() {
        let source = StaticSource::new("static").with_answer(
            "347 U.S. 483",
            vec![VerificationCandidate {
                case_name: "Brown v. Board of Education".to_string(),
                date: Some("1954".to_string()),
                url: None,
                source_id: "static".to_string(),
            }],
        );

        let hit = source.lookup("347 U.S. 483").await.unwrap();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].case_name, "Brown v. Board of Education");

        let miss = source.lookup("1 F.3d 1").await.unwrap();
        assert!(miss.is_empty());
    }

    #[tokio::test]
    async fn test_failing_source_reports_error() {
        let source = StaticSource::new("broken").failing();
        assert!(source.lookup("347 U.S. 483").await.is_err());
    }
}
