//! History analysis over stored runs
//!
//! Read-only consumer of the run store: derives a trend classification from
//! the score slope over the retrieved window plus the most recurrent
//! violations. Performs no writes.

use serde::{Deserialize, Serialize};

use crate::db::{Database, RunRecord};
use crate::error::Result;

/// Trend slope magnitude (points per run) below which the API is stable
const STABLE_SLOPE: f64 = 0.5;

/// Trend direction over a history window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Degrading,
    Stable,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Improving => write!(f, "improving"),
            Trend::Degrading => write!(f, "degrading"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

/// Recurrence count for one violation rule id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationCount {
    pub rule_id: String,
    pub count: u32,
}

/// Derived history for one API identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub api_id: String,
    pub runs: usize,
    pub trend: Trend,
    /// Score slope in points per run, oldest to newest
    pub slope: f64,
    pub top_violations: Vec<ViolationCount>,
    pub rows: Vec<RunRecord>,
}

/// Retrieve prior runs and derive trend plus recurring violations
pub fn summarize(
    db: &Database,
    api_id: &str,
    limit: usize,
    since: Option<&str>,
) -> Result<HistorySummary> {
    let rows = db.get_history(api_id, limit, since)?;
    let run_ids: Vec<String> = rows.iter().map(|r| r.run_id.clone()).collect();
    let counts = db.violation_counts(&run_ids)?;

    let slope = score_slope(&rows);
    Ok(HistorySummary {
        api_id: api_id.to_string(),
        runs: rows.len(),
        trend: classify(slope),
        slope,
        top_violations: rank_violations(counts),
        rows,
    })
}

/// Least-squares slope of total score over the window
///
/// Rows arrive most-recent-first; the slope is computed oldest to newest so
/// a positive value means the API is improving.
pub fn score_slope(rows: &[RunRecord]) -> f64 {
    let n = rows.len();
    if n < 2 {
        return 0.0;
    }

    let totals: Vec<f64> = rows.iter().rev().map(|r| r.total_score as f64).collect();
    let mean_x = (n - 1) as f64 / 2.0;
    let mean_y = totals.iter().sum::<f64>() / n as f64;

    let mut num = 0.0;
    let mut den = 0.0;
    for (i, y) in totals.iter().enumerate() {
        let dx = i as f64 - mean_x;
        num += dx * (y - mean_y);
        den += dx * dx;
    }

    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

pub fn classify(slope: f64) -> Trend {
    if slope.abs() < STABLE_SLOPE {
        Trend::Stable
    } else if slope > 0.0 {
        Trend::Improving
    } else {
        Trend::Degrading
    }
}

/// Sort by descending count, ties broken by lexical rule id
fn rank_violations(counts: Vec<(String, u32)>) -> Vec<ViolationCount> {
    let mut ranked: Vec<ViolationCount> = counts
        .into_iter()
        .map(|(rule_id, count)| ViolationCount { rule_id, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then(a.rule_id.cmp(&b.rule_id)));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Finding, Severity};

    fn record(run_id: &str, graded_at: &str, total: u8) -> RunRecord {
        RunRecord {
            run_id: run_id.to_string(),
            api_id: "api".to_string(),
            graded_at: graded_at.to_string(),
            total_score: total,
            letter_grade: "B".to_string(),
            compliance_pct: total as f64 / 100.0,
            auto_fail: false,
            critical_issues: 0,
            findings_count: 0,
            template_version: "2.4.0".to_string(),
        }
    }

    #[test]
    fn test_slope_of_improving_series() {
        // Most-recent-first input, totals 60 -> 70 -> 80 oldest to newest
        let rows = vec![
            record("r3", "2026-03-01T00:00:00Z", 80),
            record("r2", "2026-02-01T00:00:00Z", 70),
            record("r1", "2026-01-01T00:00:00Z", 60),
        ];
        let slope = score_slope(&rows);
        assert!((slope - 10.0).abs() < f64::EPSILON);
        assert_eq!(classify(slope), Trend::Improving);
    }

    #[test]
    fn test_slope_of_degrading_series() {
        let rows = vec![
            record("r3", "2026-03-01T00:00:00Z", 50),
            record("r2", "2026-02-01T00:00:00Z", 70),
            record("r1", "2026-01-01T00:00:00Z", 90),
        ];
        assert_eq!(classify(score_slope(&rows)), Trend::Degrading);
    }

    #[test]
    fn test_flat_and_short_series_are_stable() {
        let flat = vec![
            record("r2", "2026-02-01T00:00:00Z", 75),
            record("r1", "2026-01-01T00:00:00Z", 75),
        ];
        assert_eq!(classify(score_slope(&flat)), Trend::Stable);

        let single = vec![record("r1", "2026-01-01T00:00:00Z", 75)];
        assert_eq!(classify(score_slope(&single)), Trend::Stable);
        assert_eq!(classify(score_slope(&[])), Trend::Stable);
    }

    #[test]
    fn test_violation_ranking_ties_break_lexically() {
        let ranked = rank_violations(vec![
            ("PAG-CURSOR".to_string(), 2),
            ("CACHE-ETAG".to_string(), 2),
            ("NAM-NS".to_string(), 5),
        ]);
        let ids: Vec<&str> = ranked.iter().map(|v| v.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["NAM-NS", "CACHE-ETAG", "PAG-CURSOR"]);
    }

    #[test]
    fn test_summarize_end_to_end() {
        let db = Database::open_in_memory().unwrap();
        let finding = Finding::new("NAM-NS", Severity::Error, "paths./users", "oops", "naming");
        for (run_id, graded_at, total) in [
            ("r1", "2026-01-01T00:00:00Z", 60u8),
            ("r2", "2026-02-01T00:00:00Z", 72),
            ("r3", "2026-03-01T00:00:00Z", 84),
        ] {
            db.insert_run(&record(run_id, graded_at, total), std::slice::from_ref(&finding))
                .unwrap();
        }

        let summary = summarize(&db, "api", 20, None).unwrap();
        assert_eq!(summary.runs, 3);
        assert_eq!(summary.trend, Trend::Improving);
        assert_eq!(summary.top_violations[0].rule_id, "NAM-NS");
        assert_eq!(summary.top_violations[0].count, 3);
    }
}
