//! Response envelope checks
//!
//! List responses wrap their payload in a `data` envelope with `meta`
//! alongside, and the contract declares a reusable error shape. Baseline:
//! no list endpoints scores the envelope checkpoints full; a contract with
//! no schemas at all still gets the error-shape finding.

use serde_json::Value;

use crate::contract::{Contract, Operation};
use crate::rules::{CheckpointScore, CheckpointSpec, Finding, Rule, RuleOutcome, Severity};

const CATEGORY: &str = "envelope";

const CHECKPOINTS: [CheckpointSpec; 3] = [
    CheckpointSpec {
        id: "ENV-DATA",
        category: CATEGORY,
        max_points: 6.0,
        description: "List responses wrap payloads in a data envelope",
    },
    CheckpointSpec {
        id: "ENV-ERROR",
        category: CATEGORY,
        max_points: 6.0,
        description: "A reusable error schema is declared",
    },
    CheckpointSpec {
        id: "ENV-META",
        category: CATEGORY,
        max_points: 3.0,
        description: "List envelopes carry meta/pagination information",
    },
];

/// Schema names accepted as the declared error shape
const ERROR_SCHEMA_NAMES: [&str; 4] = ["error", "errors", "problem", "problemdetails"];

pub struct EnvelopeRule;

impl Rule for EnvelopeRule {
    fn category(&self) -> &'static str {
        CATEGORY
    }

    fn checkpoints(&self) -> &'static [CheckpointSpec] {
        &CHECKPOINTS
    }

    fn check(&self, contract: &Contract) -> RuleOutcome {
        let mut outcome = RuleOutcome::default();
        let lists: Vec<Operation<'_>> = contract
            .operations()
            .into_iter()
            .filter(Operation::is_list_endpoint)
            .collect();

        let mut data_count = 0usize;
        let mut meta_count = 0usize;

        for op in &lists {
            let props = success_schema_properties(op);
            if props.iter().any(|p| p == "data") {
                data_count += 1;
            } else {
                outcome.findings.push(Finding::new(
                    "ENV-DATA",
                    Severity::Warn,
                    op.json_path(),
                    format!("List response of {} has no top-level 'data' envelope", op.path),
                    CATEGORY,
                ));
            }
            if props.iter().any(|p| p == "meta" || p == "pagination") {
                meta_count += 1;
            } else {
                outcome.findings.push(Finding::new(
                    "ENV-META",
                    Severity::Info,
                    op.json_path(),
                    format!("List response of {} carries no meta/pagination block", op.path),
                    CATEGORY,
                ));
            }
        }

        if lists.is_empty() {
            outcome.checkpoints.push(CheckpointScore::full(&CHECKPOINTS[0]));
            outcome.checkpoints.push(CheckpointScore::full(&CHECKPOINTS[2]));
        } else {
            let total = lists.len() as f64;
            outcome.checkpoints.push(CheckpointScore::scored(
                &CHECKPOINTS[0],
                CHECKPOINTS[0].max_points * data_count as f64 / total,
            ));
            outcome.checkpoints.push(CheckpointScore::scored(
                &CHECKPOINTS[2],
                CHECKPOINTS[2].max_points * meta_count as f64 / total,
            ));
        }

        // Error shape applies whenever the contract declares operations
        if contract.operations().is_empty() {
            outcome.checkpoints.push(CheckpointScore::full(&CHECKPOINTS[1]));
        } else if has_error_schema(contract) {
            outcome.checkpoints.push(CheckpointScore::full(&CHECKPOINTS[1]));
        } else {
            outcome.findings.push(Finding::new(
                "ENV-ERROR",
                Severity::Warn,
                "components.schemas",
                "No reusable error schema (Error/Problem) is declared",
                CATEGORY,
            ));
            outcome
                .checkpoints
                .push(CheckpointScore::scored(&CHECKPOINTS[1], 0.0));
        }

        outcome
    }
}

/// Property names of the inline JSON success-response schema, if any
fn success_schema_properties(op: &Operation<'_>) -> Vec<String> {
    op.responses()
        .iter()
        .filter(|(code, _)| code.starts_with('2'))
        .filter_map(|(_, response)| {
            response
                .get("content")
                .and_then(|c| c.get("application/json"))
                .and_then(|m| m.get("schema"))
                .and_then(|s| s.get("properties"))
                .and_then(Value::as_object)
        })
        .flat_map(|props| props.keys().cloned())
        .collect()
}

fn has_error_schema(contract: &Contract) -> bool {
    contract
        .schemas()
        .any(|(name, _)| ERROR_SCHEMA_NAMES.contains(&name.to_lowercase().as_str()))
}
