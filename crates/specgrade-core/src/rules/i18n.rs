//! Internationalization checks
//!
//! Baseline: a document without operations scores full marks.

use serde_json::Value;

use crate::contract::Contract;
use crate::rules::{CheckpointScore, CheckpointSpec, Finding, Rule, RuleOutcome, Severity};

const CATEGORY: &str = "i18n";

const CHECKPOINTS: [CheckpointSpec; 2] = [
    CheckpointSpec {
        id: "I18N-ACCEPT-LANG",
        category: CATEGORY,
        max_points: 5.0,
        description: "Operations accept an Accept-Language header",
    },
    CheckpointSpec {
        id: "I18N-DATETIME",
        category: CATEGORY,
        max_points: 5.0,
        description: "Temporal fields declare format: date-time",
    },
];

pub struct I18nRule;

impl Rule for I18nRule {
    fn category(&self) -> &'static str {
        CATEGORY
    }

    fn checkpoints(&self) -> &'static [CheckpointSpec] {
        &CHECKPOINTS
    }

    fn check(&self, contract: &Contract) -> RuleOutcome {
        let mut outcome = RuleOutcome::default();
        let ops = contract.operations();

        if ops.is_empty() {
            for spec in &CHECKPOINTS {
                outcome.checkpoints.push(CheckpointScore::full(spec));
            }
            return outcome;
        }

        let accepts_language = ops.iter().any(|op| {
            op.parameters().into_iter().any(|p| {
                p.get("in").and_then(Value::as_str) == Some("header")
                    && p.get("name")
                        .and_then(Value::as_str)
                        .is_some_and(|n| n.eq_ignore_ascii_case("accept-language"))
            })
        });

        if accepts_language {
            outcome.checkpoints.push(CheckpointScore::full(&CHECKPOINTS[0]));
        } else {
            outcome.findings.push(Finding::new(
                "I18N-ACCEPT-LANG",
                Severity::Warn,
                "paths",
                "No operation accepts an Accept-Language header",
                CATEGORY,
            ));
            outcome
                .checkpoints
                .push(CheckpointScore::scored(&CHECKPOINTS[0], 0.0));
        }

        let (total, typed) = datetime_fields(contract, &mut outcome);
        if total == 0 {
            outcome.checkpoints.push(CheckpointScore::full(&CHECKPOINTS[1]));
        } else {
            outcome.checkpoints.push(CheckpointScore::scored(
                &CHECKPOINTS[1],
                CHECKPOINTS[1].max_points * typed as f64 / total as f64,
            ));
        }

        outcome
    }
}

/// Schema property names that imply a point in time
fn is_temporal_name(name: &str) -> bool {
    let lowered = name.to_lowercase();
    lowered.ends_with("_at")
        || lowered.ends_with("date")
        || lowered.ends_with("time")
        || lowered.ends_with("timestamp")
}

/// Count temporal-looking string properties and how many declare date-time
fn datetime_fields(contract: &Contract, outcome: &mut RuleOutcome) -> (usize, usize) {
    let mut total = 0usize;
    let mut typed = 0usize;

    for (schema_name, schema) in contract.schemas() {
        let Some(props) = schema.get("properties").and_then(Value::as_object) else {
            continue;
        };
        for (prop, node) in props {
            if !is_temporal_name(prop) {
                continue;
            }
            if node.get("type").and_then(Value::as_str) != Some("string") {
                continue;
            }
            total += 1;
            if node.get("format").and_then(Value::as_str) == Some("date-time") {
                typed += 1;
            } else {
                outcome.findings.push(Finding::new(
                    "I18N-DATETIME",
                    Severity::Info,
                    format!("components.schemas.{}.properties.{}", schema_name, prop),
                    format!(
                        "Temporal field '{}' in schema '{}' lacks format: date-time",
                        prop, schema_name
                    ),
                    CATEGORY,
                ));
            }
        }
    }

    (total, typed)
}
