//! Citator Core - Citation verification pipeline over the extraction engine
//!
//! This crate provides:
//! - The end-to-end `CitationPipeline` (extract, attribute, cluster, verify)
//! - The `CitationSource` trait and its implementations (CourtListener,
//!   web reference sites, the offline landmark table)
//! - The composite `Verifier` that resolves clusters against those sources

pub mod pipeline;
pub mod sources;
pub mod verifier;

// Re-export commonly used types
pub use pipeline::CitationPipeline;
pub use sources::{CitationSource, CourtListenerSource, LandmarkSource, SourceError, WebReferenceSource};
pub use verifier::{Verifier, VerifierOptions};

pub use citation_engine::CitationEngine;
pub use citation_types::{
    Citation, Cluster, PipelineResult, PipelineSummary, ProcessingConfig, VerificationCandidate,
    VerificationStatus,
};
