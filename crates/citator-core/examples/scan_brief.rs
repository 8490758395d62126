//! Scan a brief for case citations and verify them against the built-in
//! landmark table, entirely offline.
//!
//! Usage: cargo run -p citator-core --example scan_brief -- [brief.txt]

use std::env;
use std::fs;
use std::sync::Arc;

use anyhow::Result;
use citator_core::sources::LandmarkSource;
use citator_core::{CitationPipeline, ProcessingConfig, VerificationStatus, Verifier};

const SAMPLE: &str = "\
The constitutionality of the ordinance is controlled by Brown v. Board of \
Education, 347 U.S. 483 (1954). Custodial statements are governed by Miranda \
v. Arizona, 384 U.S. 436, 86 S. Ct. 1602 (1966); accord Roe v. Wade, 410 U.S. \
113 (1973). Washington follows the same rule. State v. Johnson, 159 Wn.2d 700, \
153 P.3d 846 (2007).";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let text = match env::args().nth(1) {
        Some(path) => fs::read_to_string(&path)?,
        None => SAMPLE.to_string(),
    };

    let pipeline = CitationPipeline::new()
        .with_verifier(Verifier::new().with_primary(Arc::new(LandmarkSource::new())));
    let result = pipeline.process(&text, &ProcessingConfig::default()).await;

    println!(
        "{} citations in {} clusters\n",
        result.summary.citation_count, result.summary.cluster_count
    );

    for cluster in &result.clusters {
        let name = cluster
            .canonical_name
            .as_deref()
            .or(cluster.representative_name.as_deref())
            .unwrap_or("(unknown case)");
        let date = cluster
            .canonical_date
            .as_deref()
            .or(cluster.representative_date.as_deref())
            .unwrap_or("n.d.");
        println!("Cluster {}: {} ({})", cluster.id, name, date);

        for &member in &cluster.members {
            let citation = &result.citations[member];
            let status = match citation.verified {
                VerificationStatus::Verified => "verified",
                VerificationStatus::TrueByParallel => "true by parallel",
                VerificationStatus::Unverified => "unverified",
            };
            println!("  {:<24} [{}]", citation.normalized_text, status);
        }
        if let Some(url) = &cluster.canonical_url {
            println!("  -> {}", url);
        }
        println!();
    }

    println!(
        "verified: {}  true-by-parallel: {}  unverified: {}",
        result.summary.verified, result.summary.true_by_parallel, result.summary.unverified
    );
    Ok(())
}
