//! Pagination checks for collection endpoints
//!
//! Cursor pagination is the hard requirement; offset/page parameters on a
//! list endpoint are an auto-fail violation. Baseline: no list endpoints
//! means full marks.

use serde_json::Value;

use crate::contract::{Contract, Operation};
use crate::rules::{CheckpointScore, CheckpointSpec, Finding, Rule, RuleOutcome, Severity};

const CATEGORY: &str = "pagination";

const CHECKPOINTS: [CheckpointSpec; 3] = [
    CheckpointSpec {
        id: "PAG-OFFSET",
        category: CATEGORY,
        max_points: 4.0,
        description: "List endpoints do not expose offset/page parameters",
    },
    CheckpointSpec {
        id: "PAG-CURSOR",
        category: CATEGORY,
        max_points: 3.0,
        description: "List endpoints accept a cursor parameter",
    },
    CheckpointSpec {
        id: "PAG-LIMIT",
        category: CATEGORY,
        max_points: 3.0,
        description: "List endpoints accept a bounded limit parameter",
    },
];

/// Query parameter names that signal offset-based pagination
const OFFSET_PARAMS: [&str; 3] = ["offset", "page", "page_number"];

/// Query parameter names accepted as a cursor
const CURSOR_PARAMS: [&str; 3] = ["cursor", "after", "page_token"];

/// Query parameter names accepted as a page-size limit
const LIMIT_PARAMS: [&str; 3] = ["limit", "page_size", "per_page"];

pub struct PaginationRule;

impl Rule for PaginationRule {
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

        if lists.is_empty() {
            for spec in &CHECKPOINTS {
                outcome.checkpoints.push(CheckpointScore::full(spec));
            }
            return outcome;
        }

        let mut offset_free = true;
        let mut cursor_count = 0usize;
        let mut limit_count = 0usize;

        for op in &lists {
            let names = op.query_parameter_names();

            for offender in names.iter().filter(|n| is_offset_param(n)) {
                offset_free = false;
                outcome.findings.push(Finding::new(
                    "PAG-OFFSET",
                    Severity::Error,
                    op.json_path(),
                    format!(
                        "List endpoint '{}' exposes offset/page parameter '{}'",
                        op.path, offender
                    ),
                    CATEGORY,
                ));
                outcome.auto_fail_reasons.push(format!(
                    "Offset/page pagination on list endpoint {} (parameter '{}')",
                    op.path, offender
                ));
            }

            if names.iter().any(|n| matches_any(n, &CURSOR_PARAMS)) {
                cursor_count += 1;
            } else {
                outcome.findings.push(Finding::new(
                    "PAG-CURSOR",
                    Severity::Warn,
                    op.json_path(),
                    format!("List endpoint '{}' has no cursor parameter", op.path),
                    CATEGORY,
                ));
            }

            if has_bounded_limit(op) {
                limit_count += 1;
            } else {
                outcome.findings.push(Finding::new(
                    "PAG-LIMIT",
                    Severity::Info,
                    op.json_path(),
                    format!(
                        "List endpoint '{}' has no limit parameter with a declared maximum",
                        op.path
                    ),
                    CATEGORY,
                ));
            }
        }

        let total = lists.len() as f64;
        outcome.checkpoints.push(if offset_free {
            CheckpointScore::full(&CHECKPOINTS[0])
        } else {
            CheckpointScore::scored(&CHECKPOINTS[0], 0.0)
        });
        outcome.checkpoints.push(CheckpointScore::scored(
            &CHECKPOINTS[1],
            CHECKPOINTS[1].max_points * cursor_count as f64 / total,
        ));
        outcome.checkpoints.push(CheckpointScore::scored(
            &CHECKPOINTS[2],
            CHECKPOINTS[2].max_points * limit_count as f64 / total,
        ));

        outcome
    }
}

fn is_offset_param(name: &str) -> bool {
    matches_any(name, &OFFSET_PARAMS)
}

fn matches_any(name: &str, set: &[&str]) -> bool {
    let lowered = name.to_lowercase().replace('-', "_");
    set.contains(&lowered.as_str())
}

/// A limit-style parameter whose schema declares a maximum
fn has_bounded_limit(op: &Operation<'_>) -> bool {
    op.parameters().into_iter().any(|p| {
        let name = p.get("name").and_then(Value::as_str).unwrap_or_default();
        if p.get("in").and_then(Value::as_str) != Some("query") || !matches_any(name, &LIMIT_PARAMS)
        {
            return false;
        }
        p.get("schema")
            .and_then(|s| s.get("maximum"))
            .is_some_and(Value::is_number)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract(params: serde_json::Value) -> Contract {
        Contract::from_value(serde_json::json!({
            "openapi": "3.0.3",
            "paths": {
                "/api/v2/orders": {
                    "get": {
                        "parameters": params,
                        "responses": {"200": {"description": "OK"}}
                    }
                }
            }
        }))
    }

    #[test]
    fn test_offset_param_is_an_auto_fail_error() {
        let c = contract(serde_json::json!([
            {"name": "offset", "in": "query", "schema": {"type": "integer"}},
            {"name": "page", "in": "query", "schema": {"type": "integer"}}
        ]));
        let outcome = PaginationRule.check(&c);

        let offsets: Vec<_> = outcome
            .findings
            .iter()
            .filter(|f| f.rule_id == "PAG-OFFSET")
            .collect();
        assert_eq!(offsets.len(), 2);
        assert!(offsets.iter().all(|f| f.severity == Severity::Error));
        assert!(outcome
            .auto_fail_reasons
            .iter()
            .any(|r| r.contains("Offset/page pagination")));
    }

    #[test]
    fn test_cursor_and_bounded_limit_score_full() {
        let c = contract(serde_json::json!([
            {"name": "cursor", "in": "query", "schema": {"type": "string"}},
            {"name": "limit", "in": "query", "schema": {"type": "integer", "maximum": 100}}
        ]));
        let outcome = PaginationRule.check(&c);
        assert_eq!(outcome.contribution().0, 10.0);
        assert!(outcome.auto_fail_reasons.is_empty());
    }

    #[test]
    fn test_unbounded_limit_loses_points() {
        let c = contract(serde_json::json!([
            {"name": "cursor", "in": "query", "schema": {"type": "string"}},
            {"name": "limit", "in": "query", "schema": {"type": "integer"}}
        ]));
        let outcome = PaginationRule.check(&c);
        assert_eq!(outcome.contribution().0, 7.0);
        assert!(outcome.findings.iter().any(|f| f.rule_id == "PAG-LIMIT"));
    }

    #[test]
    fn test_no_list_endpoints_baseline_is_full_score() {
        let c = Contract::from_value(serde_json::json!({
            "openapi": "3.0.3",
            "paths": {
                "/api/v2/orders/{id}": {
                    "get": {"responses": {"200": {"description": "OK"}}}
                }
            }
        }));
        let outcome = PaginationRule.check(&c);
        assert_eq!(outcome.contribution().0, 10.0);
        assert!(outcome.findings.is_empty());
    }

    #[test]
    fn test_missing_paths_baseline_is_full_score() {
        let c = Contract::parse("openapi: 3.0.0\n").unwrap();
        let outcome = PaginationRule.check(&c);
        assert_eq!(outcome.contribution().0, 10.0);
    }
}
