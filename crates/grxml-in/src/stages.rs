//! Grammar preparation passes as pipeline stages.
use crate::error::GrammarError;
use crate::grammar::Grammar;
use grxml_core::{ExecutionContext, PipelineRunner, Stage};

/// Inline rule references and drop non-root rules.
pub struct InlineStage;

impl Stage<Grammar> for InlineStage {
    type Error = GrammarError;

    fn id(&self) -> &'static str {
        "inline.rules.v1"
    }

    fn run(&self, mut grammar: Grammar, _ctx: &ExecutionContext) -> Result<Grammar, GrammarError> {
        grammar.inline_in_place()?;
        Ok(grammar)
    }
}

pub struct NormalizeStage;

impl Stage<Grammar> for NormalizeStage {
    type Error = GrammarError;

    fn id(&self) -> &'static str {
        "normalize.whitespace.v1"
    }

    fn run(&self, mut grammar: Grammar, _ctx: &ExecutionContext) -> Result<Grammar, GrammarError> {
        grammar.normalize_whitespace();
        Ok(grammar)
    }
}

pub struct TokenizeStage;

impl Stage<Grammar> for TokenizeStage {
    type Error = GrammarError;

    fn id(&self) -> &'static str {
        "tokenize.text.v1"
    }

    fn run(&self, mut grammar: Grammar, _ctx: &ExecutionContext) -> Result<Grammar, GrammarError> {
        grammar.tokenize();
        Ok(grammar)
    }
}

/// inline → normalize → tokenize
pub fn standard_pipeline() -> PipelineRunner<Grammar, GrammarError> {
    PipelineRunner::new(vec![
        Box::new(InlineStage),
        Box::new(NormalizeStage),
        Box::new(TokenizeStage),
    ])
}
