//! SQLite schema for the run store

use rusqlite::{Connection, Result};

const SCHEMA_SQL: &str = r#"
-- One immutable row per grading invocation
CREATE TABLE IF NOT EXISTS run (
    run_id TEXT PRIMARY KEY,
    api_id TEXT NOT NULL,
    graded_at TEXT NOT NULL,
    total_score INTEGER NOT NULL,
    letter_grade TEXT NOT NULL,
    compliance_pct REAL NOT NULL,
    auto_fail INTEGER NOT NULL,
    critical_issues INTEGER NOT NULL,
    findings_count INTEGER NOT NULL,
    template_version TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_run_api ON run(api_id, graded_at);

-- Denormalized findings per run
CREATE TABLE IF NOT EXISTS finding (
    run_id TEXT NOT NULL REFERENCES run(run_id) ON DELETE CASCADE,
    rule_id TEXT NOT NULL,
    severity TEXT NOT NULL,
    json_path TEXT NOT NULL,
    message TEXT NOT NULL,
    category TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_finding_run ON finding(run_id);
CREATE INDEX IF NOT EXISTS idx_finding_rule ON finding(rule_id);
"#;

pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
