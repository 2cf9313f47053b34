//! Rule contract and registry
//!
//! Every check implements [`Rule`]: consume a parsed contract, return
//! findings plus per-checkpoint score contributions and optional auto-fail
//! reasons. Rules never fail - missing or malformed structure yields each
//! rule's documented baseline, not an error.

pub mod async_ops;
pub mod caching;
pub mod catalog;
pub mod envelope;
pub mod extensions;
pub mod http;
pub mod i18n;
pub mod naming;
pub mod pagination;
pub mod webhooks;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::contract::Contract;

/// Severity of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational observation
    Info,
    /// Should be fixed, does not gate
    Warn,
    /// Violation of a hard requirement
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warn => write!(f, "warn"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single rule violation or observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Checkpoint identifier that produced this finding (e.g. `PAG-OFFSET`)
    pub rule_id: String,
    pub severity: Severity,
    /// Dotted locator into the document (e.g. `paths./users.get`)
    pub json_path: String,
    pub message: String,
    pub category: String,
}

impl Finding {
    pub fn new(
        rule_id: &str,
        severity: Severity,
        json_path: impl Into<String>,
        message: impl Into<String>,
        category: &str,
    ) -> Self {
        Finding {
            rule_id: rule_id.to_string(),
            severity,
            json_path: json_path.into(),
            message: message.into(),
            category: category.to_string(),
        }
    }
}

/// Static descriptor for one named scoring unit within a rule
#[derive(Debug, Clone, Copy)]
pub struct CheckpointSpec {
    /// Stable identifier, also used as the finding rule id
    pub id: &'static str,
    pub category: &'static str,
    pub max_points: f64,
    pub description: &'static str,
}

/// Scored result for one checkpoint in one grading run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointScore {
    pub checkpoint_id: String,
    pub category: String,
    pub max_points: f64,
    pub scored_points: f64,
}

impl CheckpointScore {
    /// Score a checkpoint, clamping into `[0, max_points]`
    pub fn scored(spec: &CheckpointSpec, points: f64) -> Self {
        CheckpointScore {
            checkpoint_id: spec.id.to_string(),
            category: spec.category.to_string(),
            max_points: spec.max_points,
            scored_points: points.clamp(0.0, spec.max_points),
        }
    }

    /// Full marks for a checkpoint (the usual "structure absent" baseline)
    pub fn full(spec: &CheckpointSpec) -> Self {
        Self::scored(spec, spec.max_points)
    }
}

/// Everything one rule reports for one grading run
#[derive(Debug, Clone, Default)]
pub struct RuleOutcome {
    pub findings: Vec<Finding>,
    pub checkpoints: Vec<CheckpointScore>,
    pub auto_fail_reasons: Vec<String>,
}

impl RuleOutcome {
    /// Raw category contribution: (earned, max) before domain weighting
    pub fn contribution(&self) -> (f64, f64) {
        self.checkpoints
            .iter()
            .fold((0.0, 0.0), |(add, max), cp| {
                (add + cp.scored_points, max + cp.max_points)
            })
    }
}

/// The uniform contract every check implements
pub trait Rule: Send + Sync {
    /// Category this rule scores (one rule per category in the standard set)
    fn category(&self) -> &'static str;

    /// The named scoring units this rule grades
    fn checkpoints(&self) -> &'static [CheckpointSpec];

    /// Run the check. Must not fail: absent or malformed structure yields
    /// the rule's documented baseline.
    fn check(&self, contract: &Contract) -> RuleOutcome;
}

/// The ordered set of registered rules
pub struct Registry {
    rules: Vec<Box<dyn Rule>>,
}

impl Registry {
    /// The standard ruleset, grouped by category
    pub fn standard() -> Self {
        Registry {
            rules: vec![
                Box::new(naming::NamingRule),
                Box::new(pagination::PaginationRule),
                Box::new(http::HttpRule),
                Box::new(caching::CachingRule),
                Box::new(envelope::EnvelopeRule),
                Box::new(i18n::I18nRule),
                Box::new(async_ops::AsyncRule),
                Box::new(webhooks::WebhooksRule),
                Box::new(extensions::ExtensionsRule),
            ],
        }
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// All checkpoint descriptors in registry order
    pub fn checkpoint_specs(&self) -> Vec<&'static CheckpointSpec> {
        self.rules
            .iter()
            .flat_map(|r| r.checkpoints().iter())
            .collect()
    }

    /// Invoke every registered rule exactly once
    pub fn run(&self, contract: &Contract) -> Vec<RuleOutcome> {
        self.rules
            .iter()
            .map(|rule| {
                let outcome = rule.check(contract);
                tracing::debug!(
                    category = rule.category(),
                    findings = outcome.findings.len(),
                    "rule_checked"
                );
                outcome
            })
            .collect()
    }
}
