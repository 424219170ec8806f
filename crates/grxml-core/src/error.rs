//! Pipeline error model
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("CONFIG/{0}")]
    Config(String),

    #[error("FINGERPRINT/{0}")]
    Fingerprint(String),
}
