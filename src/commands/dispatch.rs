//! Command dispatch for specgrade

use std::time::Instant;

use crate::cli::{Cli, Commands};
use crate::commands;
use specgrade_core::error::{GradeError, Result};

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let result = match &cli.command {
        None => handle_no_command(),

        Some(Commands::Version) => commands::version::execute(cli),

        Some(Commands::Checkpoints) => commands::checkpoints::execute(cli),

        Some(Commands::Grade(args)) => commands::grade::execute(cli, args, false),

        Some(Commands::Record(args)) => commands::grade::execute(cli, args, true),

        Some(Commands::Compare {
            baseline,
            candidate,
            template,
            domain,
        }) => commands::compare::execute(cli, baseline, candidate, template.as_deref(), domain),

        Some(Commands::History {
            api_id,
            limit,
            since,
        }) => commands::history::execute(cli, api_id, *limit, since.as_deref()),

        Some(Commands::Explain { rule_id }) => commands::explain::execute(cli, rule_id),

        Some(Commands::Fixes(args)) => commands::fixes::execute(cli, args),
    };

    tracing::debug!(elapsed = ?start.elapsed(), "dispatch_complete");
    result
}

fn handle_no_command() -> Result<()> {
    Err(GradeError::UsageError(
        "no command given (try: specgrade grade <contract>)".to_string(),
    ))
}
