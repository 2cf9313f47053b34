//! Long-running operation checks
//!
//! Operations that return 202 Accepted must hand back a way to track the
//! work. Baseline: no 202 responses means full marks.

use serde_json::Value;

use crate::contract::{Contract, Operation};
use crate::rules::{CheckpointScore, CheckpointSpec, Finding, Rule, RuleOutcome, Severity};

const CATEGORY: &str = "async";

const CHECKPOINTS: [CheckpointSpec; 2] = [
    CheckpointSpec {
        id: "ASYNC-LOCATION",
        category: CATEGORY,
        max_points: 5.0,
        description: "202 responses declare a Location or Operation-Location header",
    },
    CheckpointSpec {
        id: "ASYNC-STATUS",
        category: CATEGORY,
        max_points: 5.0,
        description: "A status resource exists for tracking long-running work",
    },
];

/// Path markers that identify a status-tracking resource
const STATUS_RESOURCES: [&str; 4] = ["/operations", "/jobs", "/tasks", "/statuses"];

pub struct AsyncRule;

impl Rule for AsyncRule {
    fn category(&self) -> &'static str {
        CATEGORY
    }

    fn checkpoints(&self) -> &'static [CheckpointSpec] {
        &CHECKPOINTS
    }

    fn check(&self, contract: &Contract) -> RuleOutcome {
        let mut outcome = RuleOutcome::default();
        let ops = contract.operations();
        let accepted: Vec<&Operation<'_>> = ops
            .iter()
            .filter(|o| o.responses().iter().any(|(code, _)| *code == "202"))
            .collect();

        if accepted.is_empty() {
            for spec in &CHECKPOINTS {
                outcome.checkpoints.push(CheckpointScore::full(spec));
            }
            return outcome;
        }

        let mut located = 0usize;
        for op in &accepted {
            if declares_tracking_header(op) {
                located += 1;
            } else {
                outcome.findings.push(Finding::new(
                    "ASYNC-LOCATION",
                    Severity::Warn,
                    op.json_path(),
                    format!(
                        "202 response of {} {} has no Location/Operation-Location header",
                        op.method.to_uppercase(),
                        op.path
                    ),
                    CATEGORY,
                ));
            }
        }
        outcome.checkpoints.push(CheckpointScore::scored(
            &CHECKPOINTS[0],
            CHECKPOINTS[0].max_points * located as f64 / accepted.len() as f64,
        ));

        let has_status_resource = contract
            .paths()
            .any(|(path, _)| STATUS_RESOURCES.iter().any(|m| path.contains(m)));
        if has_status_resource {
            outcome.checkpoints.push(CheckpointScore::full(&CHECKPOINTS[1]));
        } else {
            outcome.findings.push(Finding::new(
                "ASYNC-STATUS",
                Severity::Warn,
                "paths",
                "202 responses exist but no operations/jobs status resource is declared",
                CATEGORY,
            ));
            outcome
                .checkpoints
                .push(CheckpointScore::scored(&CHECKPOINTS[1], 0.0));
        }

        outcome
    }
}

fn declares_tracking_header(op: &Operation<'_>) -> bool {
    op.response_headers("202").iter().any(|h| {
        h.eq_ignore_ascii_case("location") || h.eq_ignore_ascii_case("operation-location")
    }) || op
        .node
        .get("responses")
        .and_then(|r| r.get("202"))
        .and_then(|r| r.get("content"))
        .and_then(|c| c.get("application/json"))
        .and_then(|m| m.get("schema"))
        .and_then(|s| s.get("properties"))
        .and_then(Value::as_object)
        .is_some_and(|props| props.contains_key("status"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_async_operations_baseline() {
        let c = Contract::from_value(serde_json::json!({
            "paths": {
                "/api/v2/orders": {"get": {"responses": {"200": {"description": "OK"}}}}
            }
        }));
        let outcome = AsyncRule.check(&c);
        assert_eq!(outcome.contribution().0, 10.0);
        assert!(outcome.findings.is_empty());
    }

    #[test]
    fn test_tracked_async_operation_scores_full() {
        let c = Contract::from_value(serde_json::json!({
            "paths": {
                "/api/v2/exports": {
                    "post": {
                        "responses": {
                            "202": {
                                "description": "Accepted",
                                "headers": {"Location": {"schema": {"type": "string"}}}
                            }
                        }
                    }
                },
                "/api/v2/jobs/{id}": {
                    "get": {"responses": {"200": {"description": "OK"}}}
                }
            }
        }));
        let outcome = AsyncRule.check(&c);
        assert_eq!(outcome.contribution().0, 10.0);
    }

    #[test]
    fn test_untracked_async_operation_flagged() {
        let c = Contract::from_value(serde_json::json!({
            "paths": {
                "/api/v2/exports": {
                    "post": {"responses": {"202": {"description": "Accepted"}}}
                }
            }
        }));
        let outcome = AsyncRule.check(&c);
        assert_eq!(outcome.contribution().0, 0.0);
        assert!(outcome.findings.iter().any(|f| f.rule_id == "ASYNC-LOCATION"));
        assert!(outcome.findings.iter().any(|f| f.rule_id == "ASYNC-STATUS"));
    }

    #[test]
    fn test_status_body_counts_as_tracking() {
        let c = Contract::from_value(serde_json::json!({
            "paths": {
                "/api/v2/exports": {
                    "post": {
                        "responses": {
                            "202": {
                                "description": "Accepted",
                                "content": {
                                    "application/json": {
                                        "schema": {"type": "object", "properties": {"status": {}}}
                                    }
                                }
                            }
                        }
                    }
                },
                "/api/v2/operations/{id}": {
                    "get": {"responses": {"200": {"description": "OK"}}}
                }
            }
        }));
        let outcome = AsyncRule.check(&c);
        assert_eq!(outcome.contribution().0, 10.0);
    }
}
