//! SQLite run store
//!
//! The store owns two tables: `run` (one immutable row per grading
//! invocation) and `finding` (denormalized findings per run). All writes
//! happen in a single transaction per run; the grading core never updates
//! or deletes rows.

mod schema;

use std::path::Path;

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::error::{GradeError, Result};
use crate::rules::Finding;

pub use schema::create_schema;

/// One persisted grading invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    pub run_id: String,
    pub api_id: String,
    pub graded_at: String,
    pub total_score: u8,
    pub letter_grade: String,
    pub compliance_pct: f64,
    pub auto_fail: bool,
    pub critical_issues: usize,
    pub findings_count: usize,
    pub template_version: String,
}

/// SQLite database holding run history
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| GradeError::Store {
            reason: format!("failed to open database at {}: {}", path.display(), e),
        })?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| GradeError::Store {
                reason: format!("failed to enable WAL mode: {}", e),
            })?;

        create_schema(&conn).map_err(|e| GradeError::Store {
            reason: format!("failed to create database schema: {}", e),
        })?;

        Ok(Database { conn })
    }

    /// In-memory database, used by tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| GradeError::Store {
            reason: format!("failed to open in-memory database: {}", e),
        })?;
        create_schema(&conn).map_err(|e| GradeError::Store {
            reason: format!("failed to create database schema: {}", e),
        })?;
        Ok(Database { conn })
    }

    /// Insert one run and its findings in a single transaction
    pub fn insert_run(&self, record: &RunRecord, findings: &[Finding]) -> Result<()> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| GradeError::Store {
                reason: format!("failed to start transaction: {}", e),
            })?;

        tx.execute(
            "INSERT INTO run (run_id, api_id, graded_at, total_score, letter_grade,
                              compliance_pct, auto_fail, critical_issues, findings_count,
                              template_version)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                record.run_id,
                record.api_id,
                record.graded_at,
                record.total_score,
                record.letter_grade,
                record.compliance_pct,
                record.auto_fail,
                record.critical_issues as i64,
                record.findings_count as i64,
                record.template_version,
            ],
        )?;

        for finding in findings {
            tx.execute(
                "INSERT INTO finding (run_id, rule_id, severity, json_path, message, category)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.run_id,
                    finding.rule_id,
                    finding.severity.to_string(),
                    finding.json_path,
                    finding.message,
                    finding.category,
                ],
            )?;
        }

        tx.commit().map_err(|e| GradeError::Store {
            reason: format!("failed to commit run {}: {}", record.run_id, e),
        })?;

        Ok(())
    }

    /// Prior runs for an API identity, most recent first
    pub fn get_history(
        &self,
        api_id: &str,
        limit: usize,
        since: Option<&str>,
    ) -> Result<Vec<RunRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT run_id, api_id, graded_at, total_score, letter_grade, compliance_pct,
                    auto_fail, critical_issues, findings_count, template_version
             FROM run
             WHERE api_id = ?1 AND (?2 IS NULL OR graded_at >= ?2)
             ORDER BY graded_at DESC
             LIMIT ?3",
        )?;

        let rows = stmt.query_map(params![api_id, since, limit as i64], |row| {
            Ok(RunRecord {
                run_id: row.get(0)?,
                api_id: row.get(1)?,
                graded_at: row.get(2)?,
                total_score: row.get::<_, i64>(3)? as u8,
                letter_grade: row.get(4)?,
                compliance_pct: row.get(5)?,
                auto_fail: row.get(6)?,
                critical_issues: row.get::<_, i64>(7)? as usize,
                findings_count: row.get::<_, i64>(8)? as usize,
                template_version: row.get(9)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Finding counts grouped by rule id across the given runs
    pub fn violation_counts(&self, run_ids: &[String]) -> Result<Vec<(String, u32)>> {
        let mut counts = Vec::new();
        if run_ids.is_empty() {
            return Ok(counts);
        }

        let placeholders = vec!["?"; run_ids.len()].join(", ");
        let sql = format!(
            "SELECT rule_id, COUNT(*) FROM finding WHERE run_id IN ({}) GROUP BY rule_id",
            placeholders
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(run_ids.iter()), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?))
        })?;

        for row in rows {
            counts.push(row?);
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Severity;

    fn record(run_id: &str, api_id: &str, graded_at: &str, total: u8) -> RunRecord {
        RunRecord {
            run_id: run_id.to_string(),
            api_id: api_id.to_string(),
            graded_at: graded_at.to_string(),
            total_score: total,
            letter_grade: "B".to_string(),
            compliance_pct: total as f64 / 100.0,
            auto_fail: false,
            critical_issues: 0,
            findings_count: 1,
            template_version: "2.4.0".to_string(),
        }
    }

    fn sample_finding() -> Finding {
        Finding::new(
            "CACHE-ETAG",
            Severity::Warn,
            "paths./api/v2/orders.get",
            "no etag",
            "caching",
        )
    }

    #[test]
    fn test_insert_and_history_roundtrip() {
        let db = Database::open_in_memory().unwrap();
        db.insert_run(
            &record("r1", "orders-api", "2026-01-01T00:00:00Z", 70),
            &[sample_finding()],
        )
        .unwrap();
        db.insert_run(
            &record("r2", "orders-api", "2026-02-01T00:00:00Z", 85),
            &[],
        )
        .unwrap();
        db.insert_run(&record("r3", "other-api", "2026-02-02T00:00:00Z", 50), &[])
            .unwrap();

        let history = db.get_history("orders-api", 20, None).unwrap();
        assert_eq!(history.len(), 2);
        // Most recent first
        assert_eq!(history[0].run_id, "r2");
        assert_eq!(history[1].run_id, "r1");
    }

    #[test]
    fn test_history_since_and_limit() {
        let db = Database::open_in_memory().unwrap();
        for (i, month) in ["01", "02", "03"].iter().enumerate() {
            db.insert_run(
                &record(
                    &format!("r{}", i),
                    "api",
                    &format!("2026-{}-01T00:00:00Z", month),
                    70,
                ),
                &[],
            )
            .unwrap();
        }

        let since = db
            .get_history("api", 20, Some("2026-02-01T00:00:00Z"))
            .unwrap();
        assert_eq!(since.len(), 2);

        let limited = db.get_history("api", 1, None).unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].run_id, "r2");
    }

    #[test]
    fn test_duplicate_run_id_is_a_store_error() {
        let db = Database::open_in_memory().unwrap();
        let rec = record("r1", "api", "2026-01-01T00:00:00Z", 70);
        db.insert_run(&rec, &[]).unwrap();
        let err = db.insert_run(&rec, &[]).unwrap_err();
        assert!(matches!(err, GradeError::Store { .. }));
    }

    #[test]
    fn test_violation_counts_grouped() {
        let db = Database::open_in_memory().unwrap();
        db.insert_run(
            &record("r1", "api", "2026-01-01T00:00:00Z", 70),
            &[sample_finding(), sample_finding()],
        )
        .unwrap();
        db.insert_run(
            &record("r2", "api", "2026-01-02T00:00:00Z", 75),
            &[sample_finding()],
        )
        .unwrap();

        let counts = db
            .violation_counts(&["r1".to_string(), "r2".to_string()])
            .unwrap();
        assert_eq!(counts, vec![("CACHE-ETAG".to_string(), 3)]);

        assert!(db.violation_counts(&[]).unwrap().is_empty());
    }
}
