//! Checkpoints command - list every scoring checkpoint

use serde::Serialize;

use crate::cli::Cli;
use specgrade_core::error::Result;
use specgrade_core::format::{escape_quotes, OutputFormat};
use specgrade_core::rules::Registry;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckpointRow {
    id: &'static str,
    category: &'static str,
    weight: f64,
    description: &'static str,
}

pub fn execute(cli: &Cli) -> Result<()> {
    let registry = Registry::standard();
    let rows: Vec<CheckpointRow> = registry
        .checkpoint_specs()
        .into_iter()
        .map(|cp| CheckpointRow {
            id: cp.id,
            category: cp.category,
            weight: cp.max_points,
            description: cp.description,
        })
        .collect();

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Human => {
            println!("{} checkpoints:", rows.len());
            for row in &rows {
                println!(
                    "  {:<16} {:<12} {:>5.1}  {}",
                    row.id, row.category, row.weight, row.description
                );
            }
        }
        OutputFormat::Records => {
            println!("H specgrade=1 records=1 mode=checkpoints count={}", rows.len());
            for row in &rows {
                println!(
                    "C {} {} {} \"{}\"",
                    row.id,
                    row.category,
                    row.weight,
                    escape_quotes(row.description)
                );
            }
        }
    }

    Ok(())
}
