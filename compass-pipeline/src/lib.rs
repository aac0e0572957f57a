pub mod analysis;
pub mod candidate_pipeline;
pub mod components;
pub mod error;
pub mod filter;
pub mod hydrator;
pub mod observation_loader;
pub mod pipelines;
pub mod pivoter;
pub mod projector;
pub mod query_hydrator;
pub mod scorer;
pub mod selector;
pub mod side_effect;
pub mod source;
pub mod types;
pub mod util;

pub use analysis::{run_analysis, AnalysisOutcome};
pub use error::{AnalysisError, AnalysisResult, DataQualityWarning};
pub use projector::{ProjectedComparison, ProjectedRow};
