//! Comparison of two graded results
//!
//! Computes per-category deltas between a baseline and a candidate run plus
//! free-text insights. Percent change divides the delta by the BASELINE
//! category's max points: the max is stable across runs of the same
//! template, which keeps percent figures comparable over time and avoids
//! blow-ups when the baseline earned little.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::scoring::GradeResult;

/// Score movement for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDelta {
    pub category: String,
    pub baseline_earned: f64,
    pub candidate_earned: f64,
    /// `candidate_earned - baseline_earned`
    pub delta: f64,
    /// `delta / baseline max * 100`, 0 when the max is 0
    pub percent_change: f64,
}

/// Result of comparing two graded runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub baseline_total: u8,
    pub candidate_total: u8,
    pub total_delta: i16,
    pub deltas: Vec<CategoryDelta>,
    pub insights: Vec<String>,
}

/// Compare a candidate result against a baseline
pub fn compare(baseline: &GradeResult, candidate: &GradeResult) -> Comparison {
    let categories: BTreeSet<&String> = baseline
        .per_category
        .keys()
        .chain(candidate.per_category.keys())
        .collect();

    let mut deltas = Vec::new();
    for category in categories {
        let base = baseline.per_category.get(category);
        let cand = candidate.per_category.get(category);

        let baseline_earned = base.map(|c| c.earned).unwrap_or(0.0);
        let candidate_earned = cand.map(|c| c.earned).unwrap_or(0.0);
        let delta = candidate_earned - baseline_earned;

        // Baseline max anchors the percentage; fall back to the candidate's
        // when the category is new in this run.
        let max = base.map(|c| c.max).or(cand.map(|c| c.max)).unwrap_or(0.0);
        let percent_change = if max > 0.0 { delta / max * 100.0 } else { 0.0 };

        deltas.push(CategoryDelta {
            category: category.clone(),
            baseline_earned,
            candidate_earned,
            delta,
            percent_change,
        });
    }

    let total_delta = candidate.total as i16 - baseline.total as i16;
    let insights = build_insights(baseline, candidate, &deltas);

    Comparison {
        baseline_total: baseline.total,
        candidate_total: candidate.total,
        total_delta,
        deltas,
        insights,
    }
}

fn build_insights(
    baseline: &GradeResult,
    candidate: &GradeResult,
    deltas: &[CategoryDelta],
) -> Vec<String> {
    let mut insights = Vec::new();

    match candidate.total.cmp(&baseline.total) {
        std::cmp::Ordering::Greater => insights.push(format!(
            "Total improved from {} ({}) to {} ({})",
            baseline.total, baseline.letter, candidate.total, candidate.letter
        )),
        std::cmp::Ordering::Less => insights.push(format!(
            "Total regressed from {} ({}) to {} ({})",
            baseline.total, baseline.letter, candidate.total, candidate.letter
        )),
        std::cmp::Ordering::Equal => {
            insights.push(format!("Total unchanged at {} ({})", candidate.total, candidate.letter))
        }
    }

    for delta in deltas {
        if delta.delta > 0.0 {
            insights.push(format!(
                "Category {} gained {:.1} points ({:+.1}%)",
                delta.category, delta.delta, delta.percent_change
            ));
        } else if delta.delta < 0.0 {
            insights.push(format!(
                "Category {} regressed by {:.1} points ({:+.1}%)",
                delta.category,
                delta.delta.abs(),
                delta.percent_change
            ));
        }
    }

    match (baseline.auto_fail_triggered, candidate.auto_fail_triggered) {
        (false, true) => insights.push("Candidate newly triggers auto-fail".to_string()),
        (true, false) => insights.push("Candidate clears the previous auto-fail".to_string()),
        _ => {}
    }

    insights
}
