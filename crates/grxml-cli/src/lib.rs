//! GRXML command-line front end.
pub mod cli;

use anyhow::{Context, Result};
use cli::{Args, Command};
use grxml_core::{CompileOptions, ExecutionContext};
use grxml_in::{Grammar, MatchResult};
use serde_json::json;
use std::io::Write;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (`EnvFilter` syntax).
pub const LOG_ENV: &str = "GRXML_LOG";

/// Install the stderr log subscriber. Defaults to `warn`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Config file first, then flags.
pub fn compile_options(args: &Args) -> Result<CompileOptions> {
    let options = match &args.config {
        Some(path) => CompileOptions::load(path)?,
        None => CompileOptions::default(),
    };
    if args.case_insensitive {
        return Ok(options.case_insensitive(true));
    }
    Ok(options)
}

fn load(path: &std::path::Path) -> Result<Grammar> {
    let xml = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let grammar = grxml_in::parse(&xml)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(grammar.assert_has_matching_root_rule()?)
}

fn prepare(args: &Args, ctx: &ExecutionContext) -> Result<Grammar> {
    let path = args.command.path();
    let mut grammar = load(path)?;
    let report = grammar
        .prepare(ctx)
        .with_context(|| format!("failed to prepare {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        pipeline = %report.pipeline_id,
        output = report.output_hash().unwrap_or("-"),
        "grammar prepared"
    );
    Ok(grammar)
}

/// Execute one command, writing its output to `out`.
pub fn run(args: &Args, out: &mut impl Write) -> Result<()> {
    let ctx = ExecutionContext::new().with_options(compile_options(args)?);
    let grammar = prepare(args, &ctx)?;
    let compiled = grammar.compile(&ctx.options)?;

    match &args.command {
        Command::Check { path } => {
            writeln!(
                out,
                "ok: {} (mode {}, root {})",
                path.display(),
                grammar.mode().map(|m| m.as_str()).unwrap_or("unset"),
                grammar.root().unwrap_or("-"),
            )?;
        }
        Command::Inline { .. } => writeln!(out, "{}", grammar.to_xml())?,
        Command::Regexp { .. } => writeln!(out, "{}", compiled.pattern())?,
        Command::Match { utterances, .. } => {
            for utterance in utterances {
                let line = match compiled.match_utterance(utterance) {
                    MatchResult::Match(m) => json!({
                        "matched": true,
                        "mode": m.mode,
                        "confidence": m.confidence,
                        "utterance": m.utterance,
                        "interpretation": m.interpretation,
                    }),
                    MatchResult::NoMatch(_) => json!({
                        "matched": false,
                        "utterance": utterance,
                    }),
                };
                writeln!(out, "{}", line)?;
            }
        }
    }
    Ok(())
}
