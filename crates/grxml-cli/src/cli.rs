use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "grxml", version, about = "Compile SRGS/GRXML grammars and match utterances")]
pub struct Args {
    /// YAML file with compile options
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Match tokens regardless of letter case (overrides the config file)
    #[arg(short = 'i', long, global = true)]
    pub case_insensitive: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a grammar: root rule, references and pattern
    Check {
        /// Grammar file
        path: PathBuf,
    },
    /// Print the prepared (inlined, normalized, tokenized) grammar as XML
    Inline {
        path: PathBuf,
    },
    /// Print the compiled pattern
    Regexp {
        path: PathBuf,
    },
    /// Match utterances, printing one JSON result per line
    Match {
        path: PathBuf,
        /// Utterances to match
        #[arg(required = true)]
        utterances: Vec<String>,
    },
}

impl Command {
    pub fn path(&self) -> &PathBuf {
        match self {
            Command::Check { path }
            | Command::Inline { path }
            | Command::Regexp { path }
            | Command::Match { path, .. } => path,
        }
    }
}
