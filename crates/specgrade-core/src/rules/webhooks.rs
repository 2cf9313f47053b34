//! Webhook declaration checks
//!
//! Webhooks are optional; an API that declares none scores full marks.
//! Declared webhooks must be POST deliveries and should describe a
//! signature header for verification.

use serde_json::Value;

use crate::contract::Contract;
use crate::rules::{CheckpointScore, CheckpointSpec, Finding, Rule, RuleOutcome, Severity};

const CATEGORY: &str = "webhooks";

const CHECKPOINTS: [CheckpointSpec; 2] = [
    CheckpointSpec {
        id: "WH-DELIVERY",
        category: CATEGORY,
        max_points: 5.0,
        description: "Declared webhooks deliver via POST",
    },
    CheckpointSpec {
        id: "WH-SIGNATURE",
        category: CATEGORY,
        max_points: 5.0,
        description: "Webhook deliveries document a signature header",
    },
];

pub struct WebhooksRule;

impl Rule for WebhooksRule {
    fn category(&self) -> &'static str {
        CATEGORY
    }

    fn checkpoints(&self) -> &'static [CheckpointSpec] {
        &CHECKPOINTS
    }

    fn check(&self, contract: &Contract) -> RuleOutcome {
        let mut outcome = RuleOutcome::default();
        let hooks: Vec<(&str, &Value)> = contract.webhooks().collect();

        if hooks.is_empty() {
            for spec in &CHECKPOINTS {
                outcome.checkpoints.push(CheckpointScore::full(spec));
            }
            return outcome;
        }

        let mut post_count = 0usize;
        let mut signed_count = 0usize;

        for (name, item) in &hooks {
            let post = item.get("post").filter(|n| n.is_object());
            match post {
                Some(op) => {
                    post_count += 1;
                    if documents_signature(op) {
                        signed_count += 1;
                    } else {
                        outcome.findings.push(Finding::new(
                            "WH-SIGNATURE",
                            Severity::Warn,
                            format!("webhooks.{}", name),
                            format!("Webhook '{}' does not document a signature header", name),
                            CATEGORY,
                        ));
                    }
                }
                None => {
                    outcome.findings.push(Finding::new(
                        "WH-DELIVERY",
                        Severity::Warn,
                        format!("webhooks.{}", name),
                        format!("Webhook '{}' declares no POST delivery operation", name),
                        CATEGORY,
                    ));
                }
            }
        }

        let total = hooks.len() as f64;
        outcome.checkpoints.push(CheckpointScore::scored(
            &CHECKPOINTS[0],
            CHECKPOINTS[0].max_points * post_count as f64 / total,
        ));
        outcome.checkpoints.push(CheckpointScore::scored(
            &CHECKPOINTS[1],
            CHECKPOINTS[1].max_points * signed_count as f64 / total,
        ));

        outcome
    }
}

/// A header parameter whose name mentions a signature
fn documents_signature(op: &Value) -> bool {
    op.get("parameters")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .any(|p| {
            p.get("in").and_then(Value::as_str) == Some("header")
                && p.get("name")
                    .and_then(Value::as_str)
                    .is_some_and(|n| n.to_lowercase().contains("signature"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_webhooks_baseline_is_full_score() {
        let c = Contract::parse("openapi: 3.1.0\n").unwrap();
        let outcome = WebhooksRule.check(&c);
        assert_eq!(outcome.contribution().0, 10.0);
        assert!(outcome.findings.is_empty());
    }

    #[test]
    fn test_signed_post_webhook_scores_full() {
        let c = Contract::from_value(serde_json::json!({
            "webhooks": {
                "order.shipped": {
                    "post": {
                        "parameters": [
                            {"name": "X-Webhook-Signature", "in": "header", "schema": {"type": "string"}}
                        ],
                        "responses": {"200": {"description": "OK"}}
                    }
                }
            }
        }));
        let outcome = WebhooksRule.check(&c);
        assert_eq!(outcome.contribution().0, 10.0);
    }

    #[test]
    fn test_webhook_without_post_flagged() {
        let c = Contract::from_value(serde_json::json!({
            "webhooks": {
                "order.shipped": {"get": {"responses": {"200": {"description": "OK"}}}}
            }
        }));
        let outcome = WebhooksRule.check(&c);
        assert_eq!(outcome.contribution().0, 0.0);
        assert!(outcome.findings.iter().any(|f| f.rule_id == "WH-DELIVERY"));
    }

    #[test]
    fn test_unsigned_webhook_partial_credit() {
        let c = Contract::from_value(serde_json::json!({
            "webhooks": {
                "order.shipped": {
                    "post": {"responses": {"200": {"description": "OK"}}}
                }
            }
        }));
        let outcome = WebhooksRule.check(&c);
        assert_eq!(outcome.contribution().0, 5.0);
        assert!(outcome.findings.iter().any(|f| f.rule_id == "WH-SIGNATURE"));
    }
}
