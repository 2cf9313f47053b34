//! History command - stored runs and trend for an API identity

use crate::cli::Cli;
use crate::commands::helpers;
use specgrade_core::error::Result;
use specgrade_core::format::OutputFormat;
use specgrade_core::history;

pub fn execute(cli: &Cli, api_id: &str, limit: usize, since: Option<&str>) -> Result<()> {
    let db = helpers::open_database(cli)?;
    let summary = history::summarize(&db, api_id, limit, since)?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Human => {
            if summary.rows.is_empty() {
                println!("No runs recorded for '{}'", api_id);
                return Ok(());
            }
            println!(
                "{}: {} run(s), trend {} (slope {:+.2} points/run)",
                summary.api_id, summary.runs, summary.trend, summary.slope
            );
            for row in &summary.rows {
                println!(
                    "  {}  {:>3}/100 {}  auto_fail={} findings={}",
                    row.graded_at,
                    row.total_score,
                    row.letter_grade,
                    row.auto_fail,
                    row.findings_count
                );
            }
            if !summary.top_violations.is_empty() {
                println!("Top recurring violations:");
                for violation in &summary.top_violations {
                    println!("  {:>4}x {}", violation.count, violation.rule_id);
                }
            }
        }
        OutputFormat::Records => {
            println!(
                "H specgrade=1 records=1 mode=history api={} runs={} trend={}",
                summary.api_id, summary.runs, summary.trend
            );
            for row in &summary.rows {
                println!(
                    "R {} {} {} {} {}",
                    row.run_id, row.graded_at, row.total_score, row.letter_grade, row.auto_fail
                );
            }
            for violation in &summary.top_violations {
                println!("V {} {}", violation.rule_id, violation.count);
            }
        }
    }

    Ok(())
}
