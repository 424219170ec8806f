//! Data Model: StageProof, PipelineReport
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What one stage did to the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageProof {
    pub id: String,
    pub in_hash: String,
    pub out_hash: String,
    pub deterministic: bool,
    pub latency_ms: u64,
}

impl StageProof {
    /// True when the stage left the artifact unchanged.
    pub fn is_noop(&self) -> bool {
        self.in_hash == self.out_hash
    }
}

/// Record of a full pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub engine: String,
    pub pipeline_id: String,
    pub trace_id: String,
    pub ts: DateTime<Utc>,
    pub stages: Vec<StageProof>,
}

impl PipelineReport {
    /// Hash of the final artifact, if any stage ran.
    pub fn output_hash(&self) -> Option<&str> {
        self.stages.last().map(|s| s.out_hash.as_str())
    }
}
