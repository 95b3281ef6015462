//! Command-line definition for the `stepform` binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Drive a multi-step form definition from the terminal.
#[derive(Debug, Parser)]
#[command(name = "stepform", version, about)]
pub struct Cli {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR); RUST_LOG also applies
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load a form definition and list its steps and fields
    Check {
        /// Path to the form definition (YAML)
        form: PathBuf,
    },

    /// Walk through the form, prompting for each field
    Run {
        /// Path to the form definition (YAML)
        form: PathBuf,

        /// Answer file (YAML map of field id to value); runs without prompting
        #[arg(short, long)]
        answers: Option<PathBuf>,

        /// Print the submission as JSON instead of sending it
        #[arg(long)]
        dry_run: bool,

        /// Base URL for relative form actions
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
    },
}
