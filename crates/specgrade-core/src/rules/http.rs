//! HTTP semantics checks
//!
//! Paths name resources, not actions; responses declare their status
//! surface. Baseline: no operations means full marks.

use crate::contract::{Contract, Operation};
use crate::rules::{CheckpointScore, CheckpointSpec, Finding, Rule, RuleOutcome, Severity};

const CATEGORY: &str = "http";

const CHECKPOINTS: [CheckpointSpec; 3] = [
    CheckpointSpec {
        id: "HTTP-VERBS",
        category: CATEGORY,
        max_points: 6.0,
        description: "Path segments name resources, not actions",
    },
    CheckpointSpec {
        id: "HTTP-STATUS",
        category: CATEGORY,
        max_points: 6.0,
        description: "Every operation declares a success response",
    },
    CheckpointSpec {
        id: "HTTP-DELETE",
        category: CATEGORY,
        max_points: 3.0,
        description: "DELETE operations declare 204 No Content",
    },
];

/// Verb prefixes that betray RPC-style paths
const VERB_PREFIXES: [&str; 8] = [
    "get", "create", "update", "delete", "list", "fetch", "set", "do",
];

pub struct HttpRule;

impl Rule for HttpRule {
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

        let verbs_ok = check_verb_paths(contract, &mut outcome);
        let status_ratio = check_success_responses(&ops, &mut outcome);
        let delete_ratio = check_delete_semantics(&ops, &mut outcome);

        outcome.checkpoints.push(if verbs_ok {
            CheckpointScore::full(&CHECKPOINTS[0])
        } else {
            CheckpointScore::scored(&CHECKPOINTS[0], 0.0)
        });
        outcome.checkpoints.push(CheckpointScore::scored(
            &CHECKPOINTS[1],
            CHECKPOINTS[1].max_points * status_ratio,
        ));
        outcome.checkpoints.push(CheckpointScore::scored(
            &CHECKPOINTS[2],
            CHECKPOINTS[2].max_points * delete_ratio,
        ));

        outcome
    }
}

fn check_verb_paths(contract: &Contract, outcome: &mut RuleOutcome) -> bool {
    let mut ok = true;
    for (path, _) in contract.paths() {
        for segment in path.split('/').filter(|s| !s.is_empty() && !s.starts_with('{')) {
            if segment_is_verb(segment) {
                ok = false;
                outcome.findings.push(Finding::new(
                    "HTTP-VERBS",
                    Severity::Error,
                    format!("paths.{}", path),
                    format!("Segment '{}' encodes an action; use HTTP methods instead", segment),
                    CATEGORY,
                ));
            }
        }
    }
    ok
}

/// A segment reads as a verb when it is one outright (`delete`) or a verb
/// prefix followed by a word boundary (`get-users`, `createOrder`). Plain
/// resources that merely start with a verb (`settings`, `lists`) pass.
fn segment_is_verb(segment: &str) -> bool {
    let lowered = segment.to_lowercase();
    VERB_PREFIXES.iter().any(|verb| {
        if !lowered.starts_with(verb) {
            return false;
        }
        if lowered.len() == verb.len() {
            return true;
        }
        let rest = &segment[verb.len()..];
        rest.starts_with(['-', '_']) || rest.chars().next().is_some_and(char::is_uppercase)
    })
}

fn check_success_responses(ops: &[Operation<'_>], outcome: &mut RuleOutcome) -> f64 {
    let mut ok = 0usize;
    for op in ops {
        let has_success = op
            .responses()
            .iter()
            .any(|(code, _)| code.starts_with('2'));
        if has_success {
            ok += 1;
        } else {
            outcome.findings.push(Finding::new(
                "HTTP-STATUS",
                Severity::Warn,
                op.json_path(),
                format!("{} {} declares no 2xx response", op.method.to_uppercase(), op.path),
                CATEGORY,
            ));
        }
    }
    ok as f64 / ops.len() as f64
}

fn check_delete_semantics(ops: &[Operation<'_>], outcome: &mut RuleOutcome) -> f64 {
    let deletes: Vec<&Operation<'_>> = ops.iter().filter(|o| o.method == "delete").collect();
    if deletes.is_empty() {
        return 1.0;
    }

    let mut ok = 0usize;
    for op in &deletes {
        if op.responses().iter().any(|(code, _)| *code == "204") {
            ok += 1;
        } else {
            outcome.findings.push(Finding::new(
                "HTTP-DELETE",
                Severity::Info,
                op.json_path(),
                format!("DELETE {} does not declare 204 No Content", op.path),
                CATEGORY,
            ));
        }
    }
    ok as f64 / deletes.len() as f64
}
