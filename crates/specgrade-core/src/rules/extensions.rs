//! Vendor extension hygiene checks
//!
//! Baseline: a document using no extensions and no unknown root keys scores
//! full marks.

use crate::contract::Contract;
use crate::rules::{CheckpointScore, CheckpointSpec, Finding, Rule, RuleOutcome, Severity};

const CATEGORY: &str = "extensions";

const CHECKPOINTS: [CheckpointSpec; 2] = [
    CheckpointSpec {
        id: "EXT-PREFIX",
        category: CATEGORY,
        max_points: 5.0,
        description: "Non-standard root keys carry the x- prefix",
    },
    CheckpointSpec {
        id: "EXT-NAMESPACE",
        category: CATEGORY,
        max_points: 5.0,
        description: "Vendor extensions are namespaced (x-vendor-name)",
    },
];

/// Root keys defined by the OpenAPI object model
const STANDARD_ROOT_KEYS: [&str; 11] = [
    "openapi",
    "info",
    "jsonSchemaDialect",
    "servers",
    "paths",
    "webhooks",
    "components",
    "security",
    "tags",
    "externalDocs",
    "swagger",
];

pub struct ExtensionsRule;

impl Rule for ExtensionsRule {
    fn category(&self) -> &'static str {
        CATEGORY
    }

    fn checkpoints(&self) -> &'static [CheckpointSpec] {
        &CHECKPOINTS
    }

    fn check(&self, contract: &Contract) -> RuleOutcome {
        let mut outcome = RuleOutcome::default();

        let mut prefix_ok = true;
        if let Some(map) = contract.root().as_object() {
            for key in map.keys() {
                if !STANDARD_ROOT_KEYS.contains(&key.as_str()) && !key.starts_with("x-") {
                    prefix_ok = false;
                    outcome.findings.push(Finding::new(
                        "EXT-PREFIX",
                        Severity::Warn,
                        key.clone(),
                        format!("Root key '{}' is neither standard nor x- prefixed", key),
                        CATEGORY,
                    ));
                }
            }
        }

        let extensions = contract.vendor_extensions();
        let mut namespaced_ok = true;
        for ext in &extensions {
            // x-vendor-name has at least two segments after the prefix
            let segments = ext.trim_start_matches("x-").split('-').count();
            if segments < 2 {
                namespaced_ok = false;
                outcome.findings.push(Finding::new(
                    "EXT-NAMESPACE",
                    Severity::Info,
                    (*ext).to_string(),
                    format!("Extension '{}' is not vendor-namespaced (expected x-vendor-name)", ext),
                    CATEGORY,
                ));
            }
        }

        outcome.checkpoints.push(score_binary(&CHECKPOINTS[0], prefix_ok));
        outcome
            .checkpoints
            .push(score_binary(&CHECKPOINTS[1], namespaced_ok));
        outcome
    }
}

fn score_binary(spec: &CheckpointSpec, ok: bool) -> CheckpointScore {
    if ok {
        CheckpointScore::full(spec)
    } else {
        CheckpointScore::scored(spec, 0.0)
    }
}
