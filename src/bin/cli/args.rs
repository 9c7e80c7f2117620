//! CLI Argument Structures and Configuration
//!
//! This module contains all CLI argument definitions, command structures,
//! and configuration enums used by the clarify CLI binary.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use clarify_rs::core::config::NamingStyle;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Behavior-preserving identifier renaming for generated Java tests
#[derive(Parser)]
#[command(name = "clarify")]
#[command(version = VERSION)]
#[command(about = "Clarify - descriptive names for generated Java tests")]
#[command(long_about = "
Rename uninformative identifiers in generated unit tests (EvoSuite, Randoop)
and verify that every rewrite is structurally identical to its original.

Common Usage:

  # Rename every test under a directory
  clarify run src/test/java --out renamed

  # Snake-case names, skipping the compile-and-run check
  clarify run CalcTest.java --out renamed --naming-style snake-case --no-verify

  # Score renamed files against hand-named references
  clarify eval --oracle reference/ --prediction renamed/

Exit codes: 0 all files renamed, 1 some file failed, 2 internal resolver error.
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rename identifiers in Java test files
    Run(RunArgs),

    /// Compare predicted files with reference files
    Eval(EvalArgs),

    /// Print default configuration in YAML format
    #[command(name = "print-default-config")]
    PrintDefaultConfig,

    /// Validate a clarify configuration file
    #[command(name = "validate-config")]
    ValidateConfig(ValidateConfigArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Java files or directories to process
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output directory for rewritten files and rename reports
    #[arg(short, long)]
    pub out: PathBuf,

    /// Skip execution-based verification
    #[arg(long)]
    pub no_verify: bool,

    /// Casing of generated names
    #[arg(long, value_enum)]
    pub naming_style: Option<NamingStyleArg>,

    /// Configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of files processed concurrently
    #[arg(long)]
    pub workers: Option<usize>,

    /// Overwrite existing output files
    #[arg(long)]
    pub force: bool,

    /// Suppress progress and summary output
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct EvalArgs {
    /// Reference file or directory
    #[arg(long)]
    pub oracle: PathBuf,

    /// Predicted file or directory
    #[arg(long)]
    pub prediction: PathBuf,

    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ValidateConfigArgs {
    /// Configuration file to validate
    pub config: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamingStyleArg {
    CamelCase,
    SnakeCase,
}

impl From<NamingStyleArg> for NamingStyle {
    fn from(style: NamingStyleArg) -> Self {
        match style {
            NamingStyleArg::CamelCase => NamingStyle::CamelCase,
            NamingStyleArg::SnakeCase => NamingStyle::SnakeCase,
        }
    }
}
