//! CourtListener citation lookup.
//!
//! The Free Law Project's citation-lookup endpoint takes raw citation text
//! and returns the opinion clusters it resolves to. Free to use; an API
//! token raises the rate limit.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use citation_types::normalize::collapse_whitespace;
use citation_types::VerificationCandidate;
use serde::Deserialize;

use super::{CitationSource, SourceError};

const DEFAULT_BASE_URL: &str = "https://www.courtlistener.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct CourtListenerSource {
    base_url: String,
    api_token: Option<String>,
    client: reqwest::Client,
}

/// One lookup result per citation found in the posted text. The endpoint
/// echoes which citation each entry answers; entries answering anything but
/// the queried citation are dropped.
#[derive(Debug, Deserialize)]
struct LookupMatch {
    citation: String,
    #[serde(default)]
    clusters: Vec<OpinionCluster>,
}

#[derive(Debug, Deserialize)]
struct OpinionCluster {
    #[serde(default)]
    case_name: Option<String>,
    #[serde(default)]
    date_filed: Option<String>,
    #[serde(default)]
    absolute_url: Option<String>,
}

impl CourtListenerSource {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            client: reqwest::Client::new(),
        }
    }

    /// Authenticate with an API token for the higher rate limit.
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Point at a different host, for tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for CourtListenerSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CitationSource for CourtListenerSource {
    fn source_id(&self) -> &str {
        "courtlistener"
    }

    fn timeout(&self) -> Option<Duration> {
        Some(DEFAULT_TIMEOUT)
    }

    async fn lookup(&self, citation: &str) -> Result<Vec<VerificationCandidate>, SourceError> {
        let url = format!("{}/api/rest/v4/citation-lookup/", self.base_url);
        let mut request = self.client.post(&url).form(&[("text", citation)]);
        if let Some(token) = &self.api_token {
            request = request.header("Authorization", format!("Token {}", token));
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(SourceError::BadResponse(
                self.source_id().to_string(),
                format!("HTTP {}", response.status()),
            ));
        }

        let matches: Vec<LookupMatch> = response.json().await?;
        Ok(candidates_from_matches(matches, citation, &self.base_url, self.source_id()))
    }
}

fn candidates_from_matches(
    matches: Vec<LookupMatch>,
    queried: &str,
    base_url: &str,
    source_id: &str,
) -> Vec<VerificationCandidate> {
    let queried = collapse_whitespace(queried);
    let mut candidates = Vec::new();
    for m in matches {
        if collapse_whitespace(&m.citation) != queried {
            continue;
        }
        for cluster in m.clusters {
            let Some(case_name) = cluster.case_name else {
                continue;
            };
            candidates.push(VerificationCandidate {
                case_name,
                date: cluster.date_filed.as_deref().and_then(filing_year),
                url: cluster
                    .absolute_url
                    .map(|path| format!("{}{}", base_url, path)),
                source_id: source_id.to_string(),
            });
        }
    }
    candidates
}

/// CourtListener reports full filing dates; clustering only compares years.
fn filing_year(date: &str) -> Option<String> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%Y").to_string())
}
