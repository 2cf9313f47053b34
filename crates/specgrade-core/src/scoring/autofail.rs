//! Auto-fail evaluation
//!
//! Auto-fail is a gate, not a score modifier: a contract can score high and
//! still fail if a mandatory requirement is violated.

use crate::compliance;
use crate::rules::{Finding, Severity};

/// The gate verdict for one grading run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoFailVerdict {
    pub triggered: bool,
    pub reasons: Vec<String>,
    pub critical_issues: usize,
}

/// Evaluate the auto-fail gate over findings and rule-supplied reasons
///
/// A violation gates the run when its rule is auto-fail tagged (globally or
/// in the domain's mandatory set), or when an error-severity finding lands
/// on a mandatory requirement. Reasons are deduplicated in first-seen order.
pub fn evaluate(findings: &[Finding], rule_reasons: &[String], domain: &str) -> AutoFailVerdict {
    let mandatory = compliance::for_domain(domain).mandatory;
    let mut reasons: Vec<String> = Vec::new();

    for reason in rule_reasons {
        push_unique(&mut reasons, reason.clone());
    }

    for finding in findings {
        // Globally gated rules speak for themselves through rule-supplied
        // reasons; fall back to the finding message if a caller omitted them.
        if compliance::AUTO_FAIL_RULES.contains(&finding.rule_id.as_str()) {
            if rule_reasons.is_empty() {
                push_unique(&mut reasons, finding.message.clone());
            }
            continue;
        }

        let mandatory_entry = mandatory.iter().find(|c| c.rule_id == finding.rule_id);
        let triggers =
            mandatory_entry.is_some_and(|c| c.auto_fail || finding.severity == Severity::Error);

        if triggers {
            let reason = mandatory_entry
                .map(|c| c.requirement.to_string())
                .unwrap_or_else(|| finding.message.clone());
            push_unique(&mut reasons, reason);
        }
    }

    let critical_issues = findings
        .iter()
        .filter(|f| f.severity == Severity::Error && compliance::gates_run(domain, &f.rule_id))
        .count();

    AutoFailVerdict {
        triggered: !reasons.is_empty(),
        reasons,
        critical_issues,
    }
}

fn push_unique(reasons: &mut Vec<String>, reason: String) {
    if !reasons.contains(&reason) {
        reasons.push(reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Finding;

    fn finding(rule_id: &str, severity: Severity) -> Finding {
        Finding::new(rule_id, severity, "paths", "violation", "naming")
    }

    #[test]
    fn test_clean_run_does_not_trigger() {
        let verdict = evaluate(&[], &[], "general");
        assert!(!verdict.triggered);
        assert!(verdict.reasons.is_empty());
        assert_eq!(verdict.critical_issues, 0);
    }

    #[test]
    fn test_triggered_implies_reasons() {
        let findings = vec![finding("NAM-NS", Severity::Error)];
        let verdict = evaluate(&findings, &[], "general");
        assert!(verdict.triggered);
        assert!(!verdict.reasons.is_empty());
        assert_eq!(verdict.critical_issues, 1);
    }

    #[test]
    fn test_rule_supplied_reasons_deduplicated() {
        let reasons = vec!["same reason".to_string(), "same reason".to_string()];
        let verdict = evaluate(&[], &reasons, "general");
        assert_eq!(verdict.reasons, vec!["same reason"]);
    }

    #[test]
    fn test_warn_finding_on_non_mandatory_rule_does_not_gate() {
        let findings = vec![finding("CACHE-ETAG", Severity::Warn)];
        let verdict = evaluate(&findings, &[], "general");
        assert!(!verdict.triggered);
    }

    #[test]
    fn test_domain_mandatory_rule_gates_even_on_warn() {
        // finance marks ENV-ERROR mandatory with auto_fail
        let findings = vec![finding("ENV-ERROR", Severity::Warn)];
        let general = evaluate(&findings, &[], "general");
        assert!(!general.triggered);

        let finance = evaluate(&findings, &[], "finance");
        assert!(finance.triggered);
        assert!(finance
            .reasons
            .iter()
            .any(|r| r.contains("machine-readable error schema")));
    }

    #[test]
    fn test_mandatory_error_without_auto_fail_flag_gates() {
        // finance PAG-LIMIT is mandatory, auto_fail=false: error severity gates
        let warn = evaluate(&[finding("PAG-LIMIT", Severity::Warn)], &[], "finance");
        assert!(!warn.triggered);

        let error = evaluate(&[finding("PAG-LIMIT", Severity::Error)], &[], "finance");
        assert!(error.triggered);
    }

    #[test]
    fn test_critical_issue_count_only_counts_errors() {
        let findings = vec![
            finding("NAM-NS", Severity::Error),
            finding("NAM-NS", Severity::Error),
            finding("PAG-OFFSET", Severity::Error),
            finding("NAM-CASE", Severity::Warn),
        ];
        let verdict = evaluate(&findings, &[], "general");
        assert_eq!(verdict.critical_issues, 3);
    }
}
