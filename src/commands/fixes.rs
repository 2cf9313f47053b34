//! Fixes command - remediation suggestions for every finding

use serde::Serialize;

use crate::cli::{Cli, GradeArgs};
use crate::commands::helpers;
use specgrade_core::error::Result;
use specgrade_core::format::{escape_quotes, OutputFormat};
use specgrade_core::pipeline::{self, GradeOptions};
use specgrade_core::rules::catalog;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FixSuggestion {
    rule_id: String,
    json_path: String,
    message: String,
    fix: String,
}

pub fn execute(cli: &Cli, args: &GradeArgs) -> Result<()> {
    let source = helpers::resolve_source(args)?;
    let opts = GradeOptions {
        domain: args.domain.clone(),
        template: helpers::resolve_template(args)?,
        progress: None,
        cancel: None,
    };

    let contract = pipeline::load_contract(&source, &opts)?;
    let output = pipeline::grade_contract(&contract, &opts)?;

    let suggestions: Vec<FixSuggestion> = output
        .findings
        .iter()
        .map(|finding| FixSuggestion {
            rule_id: finding.rule_id.clone(),
            json_path: finding.json_path.clone(),
            message: finding.message.clone(),
            fix: catalog::lookup(&finding.rule_id)
                .map(|e| e.fix.to_string())
                .unwrap_or_else(|| "No recorded fix for this rule".to_string()),
        })
        .collect();

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&suggestions)?),
        OutputFormat::Human => {
            if suggestions.is_empty() {
                println!("Nothing to fix: no findings.");
                return Ok(());
            }
            println!("{} suggestion(s):", suggestions.len());
            for s in &suggestions {
                println!("  [{}] {}", s.rule_id, s.json_path);
                println!("    {}", s.message);
                println!("    fix: {}", s.fix);
            }
        }
        OutputFormat::Records => {
            println!(
                "H specgrade=1 records=1 mode=fixes api={} count={}",
                output.api_id,
                suggestions.len()
            );
            for s in &suggestions {
                println!(
                    "X {} {} \"{}\"",
                    s.rule_id,
                    s.json_path,
                    escape_quotes(&s.fix)
                );
            }
        }
    }

    Ok(())
}
