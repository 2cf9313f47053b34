//! Single upstream fetch for URL-sourced contracts
//!
//! The fetch happens once, before any rule runs. Failures surface as a
//! descriptive error carrying the HTTP status.

use std::time::Duration;

use crate::error::{GradeError, Result};

/// HTTP request timeout for fetching contracts
const FETCH_TIMEOUT_SECS: u64 = 15;

/// Fetch contract text from a URL
pub fn fetch_contract(url: &str) -> Result<String> {
    let agent = ureq::AgentBuilder::new()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .user_agent(concat!("specgrade/", env!("CARGO_PKG_VERSION")))
        .build();

    match agent.get(url).call() {
        Ok(response) => response.into_string().map_err(|e| GradeError::Fetch {
            url: url.to_string(),
            reason: format!("failed to read response body: {}", e),
        }),
        Err(ureq::Error::Status(code, _)) => Err(GradeError::Fetch {
            url: url.to_string(),
            reason: format!("HTTP {}", code),
        }),
        Err(ureq::Error::Transport(e)) => Err(GradeError::Fetch {
            url: url.to_string(),
            reason: format!("transport error: {}", e),
        }),
    }
}
