//! Naming and namespace checks
//!
//! Baseline: a document without a `paths` object scores full marks here -
//! there is nothing named wrongly in an empty surface.

use regex::Regex;
use std::sync::OnceLock;

use crate::contract::Contract;
use crate::rules::{CheckpointScore, CheckpointSpec, Finding, Rule, RuleOutcome, Severity};

/// Required path namespace for all operations
pub const REQUIRED_NAMESPACE: &str = "/api/v2";

/// Auto-fail reason emitted when any path escapes the namespace
pub const MISSING_NAMESPACE_REASON: &str = "Missing /api/v2 namespace on one or more paths";

const CATEGORY: &str = "naming";

const CHECKPOINTS: [CheckpointSpec; 3] = [
    CheckpointSpec {
        id: "NAM-NS",
        category: CATEGORY,
        max_points: 4.0,
        description: "All paths live under the /api/v2 namespace",
    },
    CheckpointSpec {
        id: "NAM-CASE",
        category: CATEGORY,
        max_points: 3.0,
        description: "Path segments are lowercase kebab-case",
    },
    CheckpointSpec {
        id: "NAM-PLURAL",
        category: CATEGORY,
        max_points: 3.0,
        description: "Collection resources use plural nouns",
    },
];

/// Final path segments that read as actions or singletons, not collections
const PLURAL_EXEMPT: [&str; 12] = [
    "search", "status", "health", "me", "login", "logout", "refresh", "batch", "bulk", "ping",
    "info", "metadata",
];

fn segment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("valid segment regex"))
}

pub struct NamingRule;

impl Rule for NamingRule {
    fn category(&self) -> &'static str {
        CATEGORY
    }

    fn checkpoints(&self) -> &'static [CheckpointSpec] {
        &CHECKPOINTS
    }

    fn check(&self, contract: &Contract) -> RuleOutcome {
        let mut outcome = RuleOutcome::default();
        let paths: Vec<&str> = contract.paths().map(|(p, _)| p).collect();

        if paths.is_empty() {
            for spec in &CHECKPOINTS {
                outcome.checkpoints.push(CheckpointScore::full(spec));
            }
            return outcome;
        }

        let mut namespace_ok = true;
        let mut case_ok = true;
        let mut plural_ok = true;

        for path in &paths {
            if !in_namespace(path) {
                namespace_ok = false;
                outcome.findings.push(Finding::new(
                    "NAM-NS",
                    Severity::Error,
                    format!("paths.{}", path),
                    format!("Path '{}' is outside the {} namespace", path, REQUIRED_NAMESPACE),
                    CATEGORY,
                ));
            }

            for segment in resource_segments(path) {
                if !segment_re().is_match(segment) {
                    case_ok = false;
                    outcome.findings.push(Finding::new(
                        "NAM-CASE",
                        Severity::Warn,
                        format!("paths.{}", path),
                        format!("Segment '{}' is not lowercase kebab-case", segment),
                        CATEGORY,
                    ));
                }
            }

            if let Some(resource) = collection_segment(path) {
                if !is_plural(resource) {
                    plural_ok = false;
                    outcome.findings.push(Finding::new(
                        "NAM-PLURAL",
                        Severity::Warn,
                        format!("paths.{}", path),
                        format!("Collection resource '{}' is not a plural noun", resource),
                        CATEGORY,
                    ));
                }
            }
        }

        outcome.checkpoints.push(binary(&CHECKPOINTS[0], namespace_ok));
        outcome.checkpoints.push(binary(&CHECKPOINTS[1], case_ok));
        outcome.checkpoints.push(binary(&CHECKPOINTS[2], plural_ok));

        if !namespace_ok {
            outcome
                .auto_fail_reasons
                .push(MISSING_NAMESPACE_REASON.to_string());
        }

        outcome
    }
}

fn binary(spec: &CheckpointSpec, ok: bool) -> CheckpointScore {
    if ok {
        CheckpointScore::full(spec)
    } else {
        CheckpointScore::scored(spec, 0.0)
    }
}

fn in_namespace(path: &str) -> bool {
    path == REQUIRED_NAMESPACE || path.starts_with(&format!("{}/", REQUIRED_NAMESPACE))
}

/// Path segments excluding the namespace prefix and path parameters
fn resource_segments(path: &str) -> impl Iterator<Item = &str> {
    path.strip_prefix(REQUIRED_NAMESPACE)
        .unwrap_or(path)
        .split('/')
        .filter(|s| !s.is_empty() && !s.starts_with('{'))
}

/// The trailing resource segment when the path addresses a collection
fn collection_segment(path: &str) -> Option<&str> {
    let last = path.trim_end_matches('/').rsplit('/').next()?;
    if last.is_empty() || last.starts_with('{') {
        return None;
    }
    // Namespace segments are structural, not resources
    if last == "api" || version_segment(last) {
        return None;
    }
    Some(last)
}

fn version_segment(segment: &str) -> bool {
    segment.len() >= 2
        && segment.starts_with('v')
        && segment[1..].chars().all(|c| c.is_ascii_digit())
}

fn is_plural(resource: &str) -> bool {
    let last_word = resource.rsplit('-').next().unwrap_or(resource);
    last_word.ends_with('s') || PLURAL_EXEMPT.contains(&last_word)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grade(paths: &[&str]) -> RuleOutcome {
        let mut doc = serde_json::json!({"openapi": "3.0.3", "paths": {}});
        for p in paths {
            doc["paths"][p] = serde_json::json!({"get": {"responses": {"200": {"description": "OK"}}}});
        }
        NamingRule.check(&Contract::from_value(doc))
    }

    fn earned(outcome: &RuleOutcome) -> f64 {
        outcome.contribution().0
    }

    #[test]
    fn test_paths_outside_namespace_score_six_of_ten() {
        let outcome = grade(&["/users", "/products"]);
        assert_eq!(earned(&outcome), 6.0);
        assert_eq!(outcome.auto_fail_reasons, vec![MISSING_NAMESPACE_REASON]);
        assert_eq!(
            outcome
                .findings
                .iter()
                .filter(|f| f.rule_id == "NAM-NS" && f.severity == Severity::Error)
                .count(),
            2
        );
    }

    #[test]
    fn test_namespaced_paths_score_full() {
        let outcome = grade(&["/api/v2/users", "/api/v2/users/{id}", "/api/v2/products"]);
        assert_eq!(earned(&outcome), 10.0);
        assert!(outcome.findings.is_empty());
        assert!(outcome.auto_fail_reasons.is_empty());
    }

    #[test]
    fn test_missing_paths_baseline_is_full_score() {
        let contract = Contract::parse("openapi: 3.0.0\n").unwrap();
        let outcome = NamingRule.check(&contract);
        assert_eq!(earned(&outcome), 10.0);
        assert!(outcome.findings.is_empty());
    }

    #[test]
    fn test_case_violations() {
        let outcome = grade(&["/api/v2/UserAccounts", "/api/v2/user_files"]);
        assert!(outcome.findings.iter().any(|f| f.rule_id == "NAM-CASE"));
        // Namespace intact, case and plural lost
        assert!(earned(&outcome) < 10.0);
    }

    #[test]
    fn test_plural_exemptions() {
        let outcome = grade(&["/api/v2/users/{id}/status", "/api/v2/search"]);
        assert!(!outcome.findings.iter().any(|f| f.rule_id == "NAM-PLURAL"));
    }

    #[test]
    fn test_singular_collection_flagged() {
        let outcome = grade(&["/api/v2/order"]);
        assert!(outcome.findings.iter().any(|f| f.rule_id == "NAM-PLURAL"));
        assert_eq!(earned(&outcome), 7.0);
    }

    #[test]
    fn test_item_paths_do_not_trigger_plural_check() {
        let outcome = grade(&["/api/v2/orders/{orderId}"]);
        assert!(!outcome.findings.iter().any(|f| f.rule_id == "NAM-PLURAL"));
    }
}
