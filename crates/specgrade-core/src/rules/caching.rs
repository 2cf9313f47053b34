//! Cacheability checks for read endpoints
//!
//! Baseline: no GET operations means full marks.

use crate::contract::{Contract, Operation};
use crate::rules::{CheckpointScore, CheckpointSpec, Finding, Rule, RuleOutcome, Severity};

const CATEGORY: &str = "caching";

const CHECKPOINTS: [CheckpointSpec; 2] = [
    CheckpointSpec {
        id: "CACHE-ETAG",
        category: CATEGORY,
        max_points: 5.0,
        description: "GET success responses declare an ETag header",
    },
    CheckpointSpec {
        id: "CACHE-CONTROL",
        category: CATEGORY,
        max_points: 5.0,
        description: "GET success responses declare Cache-Control",
    },
];

pub struct CachingRule;

impl Rule for CachingRule {
    fn category(&self) -> &'static str {
        CATEGORY
    }

    fn checkpoints(&self) -> &'static [CheckpointSpec] {
        &CHECKPOINTS
    }

    fn check(&self, contract: &Contract) -> RuleOutcome {
        let mut outcome = RuleOutcome::default();
        let gets: Vec<Operation<'_>> = contract
            .operations()
            .into_iter()
            .filter(|o| o.method == "get")
            .collect();

        if gets.is_empty() {
            for spec in &CHECKPOINTS {
                outcome.checkpoints.push(CheckpointScore::full(spec));
            }
            return outcome;
        }

        let mut etag_count = 0usize;
        let mut control_count = 0usize;

        for op in &gets {
            if has_header(op, "etag") {
                etag_count += 1;
            } else {
                outcome.findings.push(Finding::new(
                    "CACHE-ETAG",
                    Severity::Warn,
                    op.json_path(),
                    format!("GET {} success response has no ETag header", op.path),
                    CATEGORY,
                ));
            }

            if has_header(op, "cache-control") {
                control_count += 1;
            } else {
                outcome.findings.push(Finding::new(
                    "CACHE-CONTROL",
                    Severity::Info,
                    op.json_path(),
                    format!("GET {} success response has no Cache-Control header", op.path),
                    CATEGORY,
                ));
            }
        }

        let total = gets.len() as f64;
        outcome.checkpoints.push(CheckpointScore::scored(
            &CHECKPOINTS[0],
            CHECKPOINTS[0].max_points * etag_count as f64 / total,
        ));
        outcome.checkpoints.push(CheckpointScore::scored(
            &CHECKPOINTS[1],
            CHECKPOINTS[1].max_points * control_count as f64 / total,
        ));

        outcome
    }
}

/// Whether any 2xx response declares the given header (case-insensitive)
fn has_header(op: &Operation<'_>, header: &str) -> bool {
    op.responses()
        .iter()
        .filter(|(code, _)| code.starts_with('2'))
        .any(|(code, _)| {
            op.response_headers(code)
                .iter()
                .any(|h| h.eq_ignore_ascii_case(header))
        })
}
