//! Shared helpers for command implementations

use std::io::Read;
use std::path::PathBuf;

use crate::cli::{Cli, GradeArgs};
use specgrade_core::db::Database;
use specgrade_core::error::{GradeError, Result};
use specgrade_core::pipeline::{self, CancelToken, ContractSource, Stage};
use specgrade_core::template::TemplateConfig;

/// Default database filename in the working directory
const DEFAULT_DB_FILE: &str = "specgrade.db";

/// Resolve the contract source from grade arguments
pub fn resolve_source(args: &GradeArgs) -> Result<ContractSource> {
    if args.inline {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        return Ok(ContractSource::Inline(content));
    }
    if let Some(url) = &args.url {
        return Ok(ContractSource::Url(url.clone()));
    }
    match &args.path {
        Some(path) => Ok(ContractSource::Path(path.clone())),
        None => Err(GradeError::UsageError(
            "a contract path, --url, or --inline is required".to_string(),
        )),
    }
}

/// Resolve the template from grade arguments
pub fn resolve_template(args: &GradeArgs) -> Result<TemplateConfig> {
    pipeline::resolve_template(args.template.as_deref())
}

/// Open the run store at the configured location
pub fn open_database(cli: &Cli) -> Result<Database> {
    let path = cli
        .db
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE));
    Database::open(&path)
}

/// Wire Ctrl-C to a fresh cancellation token
///
/// Returns the token even when the handler cannot be installed (a second
/// installation in the same process fails, e.g. in tests).
pub fn cancel_token() -> CancelToken {
    let token = CancelToken::new();
    let handle = token.clone();
    if let Err(e) = ctrlc::set_handler(move || handle.cancel()) {
        tracing::debug!(error = %e, "ctrlc handler not installed");
    }
    token
}

/// Progress reporter for --verbose runs: stage lines on stderr
pub fn verbose_progress() -> impl Fn(Stage, u8, &str) {
    |stage: Stage, percent: u8, note: &str| {
        eprintln!("[{:>9}] {:>3}% {}", stage.to_string(), percent, note);
    }
}
