pub mod config;
pub mod normalize;
pub mod types;

pub use config::ProcessingConfig;
pub use types::{
    Citation, Cluster, ClusterWarning, ExtractionMethod, PipelineResult, PipelineSummary,
    VerificationCandidate, VerificationStatus, WarningKind,
};
