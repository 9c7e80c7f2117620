//! Command Execution Logic
//!
//! This module contains the command implementations: renaming runs,
//! evaluation and configuration management.

use std::path::Path;
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use clarify_rs::core::pipeline::ProgressCallback;
use clarify_rs::eval::evaluate_paths;
use clarify_rs::{ClarifyConfig, ClarifyEngine, RunOptions};

use crate::cli::args::*;
use crate::cli::output::*;

/// All files renamed
pub const EXIT_OK: i32 = 0;
/// At least one file failed or was not processed
pub const EXIT_FILE_FAILED: i32 = 1;
/// The resolver broke its own guarantees
pub const EXIT_INTERNAL: i32 = 2;

/// Load configuration from a file, or the defaults
pub fn load_configuration(path: Option<&Path>) -> anyhow::Result<ClarifyConfig> {
    let config = match path {
        Some(path) => ClarifyConfig::from_yaml_file(path)?,
        None => ClarifyConfig::default(),
    };
    Ok(config)
}

/// Main run command implementation; returns the process exit code
pub async fn run_command(args: RunArgs) -> anyhow::Result<i32> {
    let mut config = load_configuration(args.config.as_deref())?;
    if args.no_verify {
        config.verify_execution = false;
    }
    if let Some(style) = args.naming_style {
        config.naming_style = style.into();
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }

    if !args.quiet {
        print_header();
        display_config_summary(&config);
    }

    let engine = ClarifyEngine::new(config)?;
    let file_count = engine.discover(&args.inputs)?.len();

    let progress_bar = if args.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(file_count as u64);
        bar.set_style(ProgressStyle::with_template(
            "🔤 {msg} [{bar:40.bright_blue/blue}] {pos}/{len} {elapsed_precise}",
        )?);
        bar.set_message("Renaming");
        bar
    };
    let bar = progress_bar.clone();
    let progress: ProgressCallback = Arc::new(move |_path: &Path, _ok: bool| bar.inc(1));

    let options = RunOptions {
        out_dir: args.out.clone(),
        force: args.force,
        progress: Some(progress),
    };
    let summary = engine.run(&args.inputs, options).await?;
    progress_bar.finish_and_clear();

    print_failures(&summary.batch);
    if !args.quiet {
        print_run_summary(&summary.batch);
        println!(
            "   {} {}",
            "output:".bold(),
            args.out.display().to_string().cyan()
        );
    }

    let code = if let Some(fatal) = summary.batch.fatal_error() {
        eprintln!("{} {}", "❌ Internal resolver error, run halted:".red().bold(), fatal);
        EXIT_INTERNAL
    } else if summary.batch.all_succeeded() {
        EXIT_OK
    } else {
        EXIT_FILE_FAILED
    };
    Ok(code)
}

/// Evaluate predictions against reference files
pub async fn eval_command(args: EvalArgs) -> anyhow::Result<()> {
    let config = load_configuration(args.config.as_deref())?;
    let dialect = config.dialect.clone();
    let (oracle, prediction) = (args.oracle.clone(), args.prediction.clone());

    let report =
        tokio::task::spawn_blocking(move || evaluate_paths(&oracle, &prediction, &dialect)).await??;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_eval_report(&report);
    }
    Ok(())
}

/// Print default configuration in YAML format
pub async fn print_default_config() -> anyhow::Result<()> {
    println!("{}", "# Default clarify configuration".dimmed());
    println!("{}", "# Save this to a file and customize as needed".dimmed());
    println!("{}", "# Usage: clarify run --config your-config.yml <paths> --out <dir>".dimmed());
    println!();

    let config = ClarifyConfig::default();
    let yaml_output = serde_yaml::to_string(&config)?;
    println!("{}", yaml_output);

    Ok(())
}

/// Validate a configuration file; returns the process exit code
pub async fn validate_config(args: ValidateConfigArgs) -> anyhow::Result<i32> {
    println!(
        "{} {}",
        "🔍 Validating configuration:".bright_blue().bold(),
        args.config.display().to_string().cyan()
    );
    println!();

    let result = load_configuration(Some(&args.config))
        .and_then(|config| config.validate().map(|()| config).map_err(Into::into));

    match result {
        Ok(config) => {
            println!("{}", "✅ Configuration file is valid!".bright_green().bold());
            println!();
            display_config_summary(&config);
            Ok(EXIT_OK)
        }
        Err(e) => {
            eprintln!("{} {}", "❌ Configuration validation failed:".red(), e);
            println!();
            println!("{}", "💡 Tip: Use 'clarify print-default-config' to see valid format".dimmed());
            Ok(EXIT_FILE_FAILED)
        }
    }
}
