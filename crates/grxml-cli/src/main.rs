//! Binary entrypoint for the grxml CLI.
use clap::Parser;
use grxml_cli::{cli::Args, init_tracing, run};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    run(&args, &mut std::io::stdout().lock())
}
