//! Pipeline Runner: chains stages and records a proof for each one
use crate::context::ExecutionContext;
use crate::data_model::{PipelineReport, StageProof};
use crate::error::PipelineError;
use crate::stage::Stage;
use serde::Serialize;
use std::time::Instant;

pub struct PipelineRunner<T, E> {
    stages: Vec<Box<dyn Stage<T, Error = E>>>,
    pipeline_id: String,
}

impl<T, E> PipelineRunner<T, E>
where
    T: Serialize,
    E: From<PipelineError>,
{
    pub fn new(stages: Vec<Box<dyn Stage<T, Error = E>>>) -> Self {
        let pipeline_id = stages
            .iter()
            .map(|s| s.id().split('.').next().unwrap_or("?"))
            .collect::<Vec<_>>()
            .join("→");

        Self { stages, pipeline_id }
    }

    /// Run every stage in order. The first failing stage aborts the run.
    pub fn run(&self, input: T, ctx: &ExecutionContext) -> Result<(T, PipelineReport), E> {
        let span = tracing::info_span!(
            "pipeline",
            pipeline = %self.pipeline_id,
            trace_id = %ctx.trace_id
        );
        let _guard = span.enter();

        let mut current = input;
        let mut proofs = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let start = Instant::now();
            let in_hash = fingerprint(&current)?;

            current = stage.run(current, ctx)?;

            let out_hash = fingerprint(&current)?;
            let latency_ms = start.elapsed().as_millis() as u64;

            tracing::debug!(
                stage = stage.id(),
                latency_ms,
                changed = in_hash != out_hash,
                "stage complete"
            );

            proofs.push(StageProof {
                id: stage.id().to_string(),
                in_hash,
                out_hash,
                deterministic: stage.deterministic(),
                latency_ms,
            });
        }

        let report = PipelineReport {
            engine: format!("grxml@{}", crate::GRXML_VERSION),
            pipeline_id: self.pipeline_id.clone(),
            trace_id: ctx.trace_id.clone(),
            ts: chrono::Utc::now(),
            stages: proofs,
        };

        Ok((current, report))
    }

    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// blake3 hash of the artifact's JSON encoding.
pub fn fingerprint<T: Serialize>(artifact: &T) -> Result<String, PipelineError> {
    let bytes = serde_json::to_vec(artifact)
        .map_err(|e| PipelineError::Fingerprint(e.to_string()))?;
    Ok(format!("blake3:{}", blake3::hash(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    type WordStage = Box<dyn Stage<Vec<String>, Error = PipelineError>>;

    fn runner(stages: Vec<WordStage>) -> PipelineRunner<Vec<String>, PipelineError> {
        PipelineRunner::new(stages)
    }

    struct Upper;

    impl Stage<Vec<String>> for Upper {
        type Error = PipelineError;

        fn id(&self) -> &'static str {
            "upper.words.v1"
        }

        fn run(&self, input: Vec<String>, _ctx: &ExecutionContext) -> Result<Vec<String>, PipelineError> {
            Ok(input.into_iter().map(|w| w.to_uppercase()).collect())
        }
    }

    struct Reject;

    impl Stage<Vec<String>> for Reject {
        type Error = PipelineError;

        fn id(&self) -> &'static str {
            "reject.all.v1"
        }

        fn run(&self, _input: Vec<String>, _ctx: &ExecutionContext) -> Result<Vec<String>, PipelineError> {
            Err(PipelineError::Config("rejected".to_string()))
        }
    }

    #[test]
    fn test_pipeline_id() {
        let runner = runner(vec![Box::new(Upper), Box::new(Upper)]);
        assert_eq!(runner.pipeline_id(), "upper→upper");
        assert_eq!(runner.len(), 2);
    }

    #[test]
    fn test_run_records_proofs() {
        let runner = runner(vec![Box::new(Upper), Box::new(Upper)]);
        let ctx = ExecutionContext::new();
        let (out, report) = runner.run(vec!["a".to_string()], &ctx).unwrap();

        assert_eq!(out, vec!["A".to_string()]);
        assert_eq!(report.stages.len(), 2);
        assert!(!report.stages[0].is_noop());
        // Second pass has nothing left to change.
        assert!(report.stages[1].is_noop());
        assert_eq!(report.trace_id, ctx.trace_id);
        assert!(report.output_hash().unwrap().starts_with("blake3:"));
    }

    #[test]
    fn test_failing_stage_aborts() {
        let runner = runner(vec![Box::new(Reject), Box::new(Upper)]);
        let err = runner.run(vec![], &ExecutionContext::new()).unwrap_err();
        assert_eq!(err, PipelineError::Config("rejected".to_string()));
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = fingerprint(&vec!["x"]).unwrap();
        let b = fingerprint(&vec!["x"]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, fingerprint(&vec!["y"]).unwrap());
    }
}
