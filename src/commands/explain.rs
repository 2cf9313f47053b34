//! Explain command - catalog entry for one rule id

use crate::cli::Cli;
use specgrade_core::error::{GradeError, Result};
use specgrade_core::format::{escape_quotes, OutputFormat};
use specgrade_core::rules::catalog;

pub fn execute(cli: &Cli, rule_id: &str) -> Result<()> {
    let entry = catalog::lookup(&rule_id.to_uppercase()).ok_or_else(|| GradeError::UnknownRule {
        rule_id: rule_id.to_string(),
    })?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(entry)?),
        OutputFormat::Human => {
            println!("{} ({})", entry.rule_id, entry.category);
            println!("  Requirement: {}", entry.requirement);
            println!("  Why: {}", entry.rationale);
            println!("  Fix: {}", entry.fix);
        }
        OutputFormat::Records => {
            println!(
                "E {} {} \"{}\" \"{}\"",
                entry.rule_id,
                entry.category,
                escape_quotes(entry.requirement),
                escape_quotes(entry.fix)
            );
        }
    }

    Ok(())
}
