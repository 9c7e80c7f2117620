//! Console output for run and eval results.

use owo_colors::OwoColorize;

use clarify_rs::core::pipeline::{BatchSummary, VerificationStatus};
use clarify_rs::eval::EvalReport;
use clarify_rs::ClarifyConfig;

pub fn print_header() {
    println!("{}", "🔤 Clarify - descriptive names for generated tests".bright_blue().bold());
    println!();
}

pub fn display_config_summary(config: &ClarifyConfig) {
    println!("{}", "⚙️  Configuration:".bright_blue().bold());
    println!("   naming style:          {:?}", config.naming_style);
    println!("   suffix bound:          {}", config.suffix_bound);
    println!("   fallback retries:      {}", config.max_fallback_retries);
    println!("   workers:               {}", config.workers);
    println!(
        "   execution verification: {}",
        if config.verify_execution {
            "enabled".green().to_string()
        } else {
            "disabled".dimmed().to_string()
        }
    );
    println!();
}

/// Per-file diagnostics go to stderr
pub fn print_failures(summary: &BatchSummary) {
    for outcome in &summary.outcomes {
        if let Err(e) = &outcome.result {
            eprintln!(
                "{} {} [{}] {}",
                "✗".red(),
                outcome.path.display(),
                e.category().yellow(),
                e
            );
        }
    }
    for path in &summary.skipped {
        eprintln!("{} {} [{}]", "-".dimmed(), path.display(), "not processed".yellow());
    }
}

pub fn print_run_summary(summary: &BatchSummary) {
    let renames: usize = summary
        .outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().ok())
        .map(|r| r.plan.len())
        .sum();
    let unverified = summary
        .outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().ok())
        .filter(|r| r.status == VerificationStatus::Unverified)
        .count();

    println!();
    println!("{}", "📊 Summary".bright_blue().bold());
    println!("   files renamed:  {}", summary.succeeded().to_string().green());
    println!("   identifiers:    {}", renames);
    if summary.failed() > 0 {
        println!("   files failed:   {}", summary.failed().to_string().red());
    }
    if unverified > 0 {
        println!("   unverified:     {}", unverified.to_string().yellow());
    }
    if !summary.skipped.is_empty() {
        println!("   not processed:  {}", summary.skipped.len().to_string().yellow());
    }
}

pub fn print_eval_report(report: &EvalReport) {
    println!(
        "{:<40} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "file".bold(),
        "CER",
        "edits",
        "ordered",
        "prec",
        "recall",
        "F1"
    );
    for pair in &report.pairs {
        let m = &pair.metrics;
        println!(
            "{:<40} {:>8.2} {:>8.0} {:>8.3} {:>8.3} {:>8.3} {:>8.3}",
            pair.name, m.cer, m.edit_distance, m.correct_ordered, m.precision, m.recall, m.f1
        );
    }
    let avg = &report.average;
    println!(
        "{:<40} {:>8.2} {:>8.1} {:>8.3} {:>8.3} {:>8.3} {:>8.3}",
        format!("average ({} pairs)", avg.pairs).bright_blue(),
        avg.cer,
        avg.edit_distance,
        avg.correct_ordered,
        avg.precision,
        avg.recall,
        avg.f1
    );
    println!("{} {:.3}s", "total time:".dimmed(), avg.execution_time_secs);
}
