//! GRXML Core: stage contract, pipeline runner and compile options
//!
//! Grammar preparation is a chain of deterministic stages. Each stage
//! consumes an artifact and produces the next one; the runner fingerprints
//! the artifact between stages so a run can be audited afterwards.

pub mod stage;
pub mod runner;
pub mod data_model;
pub mod error;
pub mod context;

pub use stage::Stage;
pub use runner::PipelineRunner;
pub use data_model::{PipelineReport, StageProof};
pub use context::{CompileOptions, ExecutionContext};
pub use error::PipelineError;

/// Engine version recorded in pipeline reports.
pub const GRXML_VERSION: &str = env!("CARGO_PKG_VERSION");
