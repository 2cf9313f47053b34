//! Compare command - grade two contract versions and diff the results

use std::path::Path;

use crate::cli::Cli;
use specgrade_core::compare;
use specgrade_core::error::Result;
use specgrade_core::format::{escape_quotes, OutputFormat};
use specgrade_core::pipeline::{self, ContractSource, GradeOptions};

pub fn execute(
    cli: &Cli,
    baseline: &Path,
    candidate: &Path,
    template: Option<&Path>,
    domain: &str,
) -> Result<()> {
    let opts = GradeOptions {
        domain: domain.to_string(),
        template: pipeline::resolve_template(template)?,
        progress: None,
        cancel: None,
    };

    let baseline_contract =
        pipeline::load_contract(&ContractSource::Path(baseline.to_path_buf()), &opts)?;
    let candidate_contract =
        pipeline::load_contract(&ContractSource::Path(candidate.to_path_buf()), &opts)?;

    let baseline_output = pipeline::grade_contract(&baseline_contract, &opts)?;
    let candidate_output = pipeline::grade_contract(&candidate_contract, &opts)?;

    let comparison = compare::compare(&baseline_output.grade, &candidate_output.grade);

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&comparison)?),
        OutputFormat::Human => {
            println!(
                "Baseline {} -> candidate {} ({:+})",
                comparison.baseline_total, comparison.candidate_total, comparison.total_delta
            );
            for delta in &comparison.deltas {
                println!(
                    "  {:<12} {:>5.1} -> {:<5.1} ({:+.1}, {:+.1}%)",
                    delta.category,
                    delta.baseline_earned,
                    delta.candidate_earned,
                    delta.delta,
                    delta.percent_change
                );
            }
            for insight in &comparison.insights {
                println!("  * {}", insight);
            }
        }
        OutputFormat::Records => {
            println!(
                "H specgrade=1 records=1 mode=compare baseline={} candidate={} delta={:+}",
                comparison.baseline_total, comparison.candidate_total, comparison.total_delta
            );
            for delta in &comparison.deltas {
                println!(
                    "D {} {:+.1} {:+.1}%",
                    delta.category, delta.delta, delta.percent_change
                );
            }
            for insight in &comparison.insights {
                println!("I \"{}\"", escape_quotes(insight));
            }
        }
    }

    Ok(())
}
