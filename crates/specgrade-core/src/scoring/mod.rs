//! Scoring aggregation
//!
//! Sums weighted checkpoint contributions into category scores, clamps,
//! and derives the composite total and letter grade. Given identical rule
//! outcomes and weights this is a pure function - no randomness, no clock.

pub mod autofail;
pub mod weights;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::rules::{CheckpointScore, Finding, RuleOutcome};
use crate::template::TemplateConfig;

/// Score for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub category: String,
    pub earned: f64,
    pub max: f64,
    /// `earned / max`, 0.0 when max is 0
    pub percentage: f64,
}

/// The graded result for one contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeResult {
    pub total: u8,
    pub letter: String,
    pub compliance_pct: f64,
    pub auto_fail_triggered: bool,
    pub critical_issues: usize,
    pub per_category: BTreeMap<String, CategoryScore>,
    pub auto_fail_reasons: Vec<String>,
}

/// Aggregated rule outcomes before the auto-fail verdict is attached
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub findings: Vec<Finding>,
    pub checkpoints: Vec<CheckpointScore>,
    pub per_category: BTreeMap<String, CategoryScore>,
    pub auto_fail_reasons: Vec<String>,
    pub total: u8,
    pub letter: &'static str,
}

/// Letter grade thresholds, total-driven and fixed
pub fn letter_grade(total: u8) -> &'static str {
    match total {
        97..=100 => "A+",
        93..=96 => "A",
        90..=92 => "A-",
        87..=89 => "B+",
        83..=86 => "B",
        80..=82 => "B-",
        77..=79 => "C+",
        73..=76 => "C",
        70..=72 => "C-",
        60..=69 => "D",
        _ => "F",
    }
}

/// Rank of a letter grade, higher is better (for monotonicity checks)
pub fn letter_rank(letter: &str) -> u8 {
    match letter {
        "A+" => 10,
        "A" => 9,
        "A-" => 8,
        "B+" => 7,
        "B" => 6,
        "B-" => 5,
        "C+" => 4,
        "C" => 3,
        "C-" => 2,
        "D" => 1,
        _ => 0,
    }
}

/// Aggregate rule outcomes into category scores and a composite total
pub fn aggregate(outcomes: &[RuleOutcome], domain: &str, template: &TemplateConfig) -> Aggregation {
    let mut findings = Vec::new();
    let mut checkpoints = Vec::new();
    let mut auto_fail_reasons = Vec::new();
    let mut raw: BTreeMap<String, (f64, f64)> = BTreeMap::new();

    for outcome in outcomes {
        findings.extend(outcome.findings.iter().cloned());
        auto_fail_reasons.extend(outcome.auto_fail_reasons.iter().cloned());
        for cp in &outcome.checkpoints {
            let weight = weights::resolve_weight(domain, &cp.checkpoint_id);
            let entry = raw.entry(cp.category.clone()).or_insert((0.0, 0.0));
            entry.0 += cp.scored_points * weight;
            entry.1 += cp.max_points;
            checkpoints.push(cp.clone());
        }
    }

    let mut per_category = BTreeMap::new();
    let mut sum = 0.0;
    for (category, (weighted, intrinsic_max)) in raw {
        let max = template.category_max(&category).unwrap_or(intrinsic_max);
        let earned = weighted.clamp(0.0, max);
        let percentage = if max > 0.0 { earned / max } else { 0.0 };
        sum += earned;
        per_category.insert(
            category.clone(),
            CategoryScore {
                category,
                earned,
                max,
                percentage,
            },
        );
    }

    let total = sum.round().clamp(0.0, 100.0) as u8;

    Aggregation {
        findings,
        checkpoints,
        per_category,
        auto_fail_reasons,
        total,
        letter: letter_grade(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{CheckpointSpec, Severity};

    fn outcome(category: &'static str, id: &'static str, scored: f64, max: f64) -> RuleOutcome {
        let spec = CheckpointSpec {
            id,
            category,
            max_points: max,
            description: "test",
        };
        RuleOutcome {
            findings: vec![],
            checkpoints: vec![CheckpointScore::scored(&spec, scored)],
            auto_fail_reasons: vec![],
        }
    }

    #[test]
    fn test_aggregate_sums_and_clamps() {
        let outcomes = vec![
            outcome("naming", "NAM-NS", 4.0, 4.0),
            outcome("naming", "NAM-CASE", 3.0, 3.0),
            outcome("pagination", "PAG-CURSOR", 1.5, 3.0),
        ];
        let agg = aggregate(&outcomes, "general", &TemplateConfig::default());

        let naming = &agg.per_category["naming"];
        assert_eq!(naming.earned, 7.0);
        assert_eq!(naming.max, 10.0);
        assert!((naming.percentage - 0.7).abs() < f64::EPSILON);

        // 7 + 1.5 rounds to 8
        assert_eq!(agg.total, 8);
        assert_eq!(agg.letter, "F");
    }

    #[test]
    fn test_weighted_earned_never_exceeds_category_max() {
        // finance weights PAG-* at 1.2; full marks must still clamp at max
        let outcomes = vec![
            outcome("pagination", "PAG-OFFSET", 4.0, 4.0),
            outcome("pagination", "PAG-CURSOR", 3.0, 3.0),
            outcome("pagination", "PAG-LIMIT", 3.0, 3.0),
        ];
        let agg = aggregate(&outcomes, "finance", &TemplateConfig::default());
        let pagination = &agg.per_category["pagination"];
        assert_eq!(pagination.earned, 10.0);
        assert_eq!(pagination.max, 10.0);
    }

    #[test]
    fn test_letter_thresholds() {
        assert_eq!(letter_grade(100), "A+");
        assert_eq!(letter_grade(97), "A+");
        assert_eq!(letter_grade(96), "A");
        assert_eq!(letter_grade(90), "A-");
        assert_eq!(letter_grade(89), "B+");
        assert_eq!(letter_grade(80), "B-");
        assert_eq!(letter_grade(79), "C+");
        assert_eq!(letter_grade(70), "C-");
        assert_eq!(letter_grade(69), "D");
        assert_eq!(letter_grade(60), "D");
        assert_eq!(letter_grade(59), "F");
        assert_eq!(letter_grade(0), "F");
    }

    #[test]
    fn test_letter_monotonicity() {
        for t in 0..100u8 {
            assert!(
                letter_rank(letter_grade(t)) <= letter_rank(letter_grade(t + 1)),
                "letter rank decreased between {} and {}",
                t,
                t + 1
            );
        }
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let outcomes = vec![
            outcome("naming", "NAM-NS", 2.0, 4.0),
            outcome("caching", "CACHE-ETAG", 5.0, 5.0),
        ];
        let a = aggregate(&outcomes, "general", &TemplateConfig::default());
        let b = aggregate(&outcomes, "general", &TemplateConfig::default());
        assert_eq!(a.total, b.total);
        assert_eq!(a.per_category, b.per_category);
    }

    #[test]
    fn test_findings_and_reasons_carried_through() {
        let mut o = outcome("naming", "NAM-NS", 0.0, 4.0);
        o.findings.push(Finding::new(
            "NAM-NS",
            Severity::Error,
            "paths./users",
            "outside namespace",
            "naming",
        ));
        o.auto_fail_reasons.push("reason".to_string());
        let agg = aggregate(&[o], "general", &TemplateConfig::default());
        assert_eq!(agg.findings.len(), 1);
        assert_eq!(agg.auto_fail_reasons, vec!["reason"]);
    }
}
