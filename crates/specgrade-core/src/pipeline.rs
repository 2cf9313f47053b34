//! Grading pipeline orchestration
//!
//! Stages: load/fetch -> rule run -> aggregate -> auto-fail -> identity ->
//! optional persist. Progress reporting is a side-channel callback invoked
//! at stage boundaries and never alters control flow. A caller-supplied
//! cancellation token is checked at the same boundaries; cancellation
//! discards partial results and nothing is persisted.

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::contract::{fetch_contract, Contract};
use crate::db::{Database, RunRecord};
use crate::error::{GradeError, Result};
use crate::identity::Metadata;
use crate::rules::{CheckpointScore, Finding, Registry};
use crate::scoring::{self, autofail, GradeResult};
use crate::template::TemplateConfig;

/// Pipeline stage names reported through the progress callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Rules,
    Aggregate,
    Persist,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Fetch => write!(f, "fetch"),
            Stage::Rules => write!(f, "rules"),
            Stage::Aggregate => write!(f, "aggregate"),
            Stage::Persist => write!(f, "persist"),
        }
    }
}

/// Progress side-channel: stage, percent complete, note
pub type ProgressFn<'a> = dyn Fn(Stage, u8, &str) + 'a;

/// Cancellation token shared between the caller and the pipeline
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Where the contract text comes from
#[derive(Debug, Clone)]
pub enum ContractSource {
    Path(std::path::PathBuf),
    Inline(String),
    Url(String),
}

/// Options for one grading invocation
pub struct GradeOptions<'a> {
    pub domain: String,
    pub template: TemplateConfig,
    pub progress: Option<&'a ProgressFn<'a>>,
    pub cancel: Option<&'a CancelToken>,
}

impl Default for GradeOptions<'_> {
    fn default() -> Self {
        GradeOptions {
            domain: "general".to_string(),
            template: TemplateConfig::default(),
            progress: None,
            cancel: None,
        }
    }
}

impl GradeOptions<'_> {
    fn report(&self, stage: Stage, percent: u8, note: &str) {
        if let Some(progress) = self.progress {
            progress(stage, percent, note);
        }
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(GradeError::Cancelled);
        }
        Ok(())
    }
}

/// The complete output of one grading invocation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeOutput {
    pub api_id: String,
    pub grade: GradeResult,
    pub findings: Vec<Finding>,
    pub checkpoints: Vec<CheckpointScore>,
    pub metadata: Metadata,
}

/// Load contract text from its source
pub fn load_contract(source: &ContractSource, opts: &GradeOptions<'_>) -> Result<Contract> {
    opts.check_cancelled()?;
    opts.report(Stage::Fetch, 0, "loading contract");

    let content = match source {
        ContractSource::Path(path) => {
            if !path.exists() {
                return Err(GradeError::ContractNotFound { path: path.clone() });
            }
            std::fs::read_to_string(path)?
        }
        ContractSource::Inline(content) => content.clone(),
        ContractSource::Url(url) => fetch_contract(url)?,
    };

    let contract = Contract::parse(&content)?;
    opts.report(Stage::Fetch, 100, "contract loaded");
    Ok(contract)
}

/// Grade a parsed contract
pub fn grade_contract(contract: &Contract, opts: &GradeOptions<'_>) -> Result<GradeOutput> {
    let registry = Registry::standard();

    opts.check_cancelled()?;
    opts.report(Stage::Rules, 0, "running rules");
    let outcomes = registry.run(contract);
    opts.report(Stage::Rules, 100, "rules complete");

    opts.check_cancelled()?;
    opts.report(Stage::Aggregate, 0, "aggregating scores");
    let aggregation = scoring::aggregate(&outcomes, &opts.domain, &opts.template);
    let verdict = autofail::evaluate(
        &aggregation.findings,
        &aggregation.auto_fail_reasons,
        &opts.domain,
    );

    let grade = GradeResult {
        total: aggregation.total,
        letter: aggregation.letter.to_string(),
        compliance_pct: aggregation.total as f64 / 100.0,
        auto_fail_triggered: verdict.triggered,
        critical_issues: verdict.critical_issues,
        per_category: aggregation.per_category,
        auto_fail_reasons: verdict.reasons,
    };

    let metadata = Metadata::collect(contract, &opts.template, &registry);
    opts.report(Stage::Aggregate, 100, "scores aggregated");

    tracing::info!(
        api_id = %contract.api_id(),
        total = grade.total,
        letter = %grade.letter,
        auto_fail = grade.auto_fail_triggered,
        "graded"
    );

    Ok(GradeOutput {
        api_id: contract.api_id(),
        grade,
        findings: aggregation.findings,
        checkpoints: aggregation.checkpoints,
        metadata,
    })
}

/// Grade a contract and persist the run, returning the run id
pub fn grade_and_record(
    contract: &Contract,
    opts: &GradeOptions<'_>,
    db: &Database,
) -> Result<(GradeOutput, String)> {
    let output = grade_contract(contract, opts)?;

    // A cancellation seen before the write discards the whole run
    opts.check_cancelled()?;
    opts.report(Stage::Persist, 0, "persisting run");

    let run_id = ulid::Ulid::new().to_string().to_lowercase();
    let record = RunRecord {
        run_id: run_id.clone(),
        api_id: output.api_id.clone(),
        graded_at: output.metadata.graded_at.clone(),
        total_score: output.grade.total,
        letter_grade: output.grade.letter.clone(),
        compliance_pct: output.grade.compliance_pct,
        auto_fail: output.grade.auto_fail_triggered,
        critical_issues: output.grade.critical_issues,
        findings_count: output.findings.len(),
        template_version: output.metadata.template_version.clone(),
    };
    db.insert_run(&record, &output.findings)?;
    opts.report(Stage::Persist, 100, "run persisted");

    Ok((output, run_id))
}

/// Resolve the template: explicit path or the built-in default
pub fn resolve_template(template_path: Option<&Path>) -> Result<TemplateConfig> {
    match template_path {
        Some(path) => TemplateConfig::load(path),
        None => Ok(TemplateConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn namespaced_contract() -> Contract {
        Contract::parse(
            r#"
openapi: 3.0.3
info:
  title: Orders API
  version: 1.0.0
paths:
  /api/v2/orders:
    get:
      parameters:
        - name: cursor
          in: query
          schema: { type: string }
        - name: limit
          in: query
          schema: { type: integer, maximum: 100 }
      responses:
        "200":
          description: OK
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_grading_is_idempotent() {
        let contract = namespaced_contract();
        let opts = GradeOptions::default();
        let a = grade_contract(&contract, &opts).unwrap();
        let b = grade_contract(&contract, &opts).unwrap();

        assert_eq!(a.grade.total, b.grade.total);
        assert_eq!(a.metadata.spec_hash, b.metadata.spec_hash);
        assert_eq!(a.metadata.ruleset_hash, b.metadata.ruleset_hash);
        assert_eq!(a.grade.per_category, b.grade.per_category);
    }

    #[test]
    fn test_bounds_hold() {
        let contract = Contract::parse("openapi: 3.0.0\n").unwrap();
        let output = grade_contract(&contract, &GradeOptions::default()).unwrap();
        assert!(output.grade.total <= 100);
        for score in output.grade.per_category.values() {
            assert!(score.earned >= 0.0 && score.earned <= score.max);
        }
    }

    #[test]
    fn test_auto_fail_implication_both_ways() {
        let opts = GradeOptions::default();

        let clean = grade_contract(&namespaced_contract(), &opts).unwrap();
        assert!(!clean.grade.auto_fail_triggered);
        assert!(clean.grade.auto_fail_reasons.is_empty());

        let dirty = Contract::from_value(serde_json::json!({
            "openapi": "3.0.3",
            "info": {"title": "Legacy", "version": "1"},
            "paths": {"/users": {"get": {"responses": {"200": {"description": "OK"}}}}}
        }));
        let failed = grade_contract(&dirty, &opts).unwrap();
        assert!(failed.grade.auto_fail_triggered);
        assert!(!failed.grade.auto_fail_reasons.is_empty());
    }

    #[test]
    fn test_progress_callback_observes_stages() {
        let stages: RefCell<Vec<(Stage, u8)>> = RefCell::new(Vec::new());
        let progress = |stage: Stage, pct: u8, _note: &str| {
            stages.borrow_mut().push((stage, pct));
        };
        let opts = GradeOptions {
            progress: Some(&progress),
            ..GradeOptions::default()
        };

        grade_contract(&namespaced_contract(), &opts).unwrap();
        let seen = stages.borrow();
        assert!(seen.contains(&(Stage::Rules, 0)));
        assert!(seen.contains(&(Stage::Aggregate, 100)));
    }

    #[test]
    fn test_cancellation_discards_run_and_skips_persist() {
        let token = CancelToken::new();
        token.cancel();
        let opts = GradeOptions {
            cancel: Some(&token),
            ..GradeOptions::default()
        };

        let err = grade_contract(&namespaced_contract(), &opts).unwrap_err();
        assert!(matches!(err, GradeError::Cancelled));

        let db = Database::open_in_memory().unwrap();
        let err = grade_and_record(&namespaced_contract(), &opts, &db).unwrap_err();
        assert!(matches!(err, GradeError::Cancelled));
        assert!(db.get_history("orders-api", 20, None).unwrap().is_empty());
    }

    #[test]
    fn test_grade_and_record_persists_one_row() {
        let db = Database::open_in_memory().unwrap();
        let contract = namespaced_contract();
        let (output, run_id) =
            grade_and_record(&contract, &GradeOptions::default(), &db).unwrap();

        let history = db.get_history("orders-api", 20, None).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].run_id, run_id);
        assert_eq!(history[0].total_score, output.grade.total);
        assert_eq!(history[0].findings_count, output.findings.len());
    }

    #[test]
    fn test_load_contract_missing_path() {
        let source = ContractSource::Path("/no/such/contract.yaml".into());
        let err = load_contract(&source, &GradeOptions::default()).unwrap_err();
        assert!(matches!(err, GradeError::ContractNotFound { .. }));
    }

    #[test]
    fn test_load_contract_inline() {
        let source = ContractSource::Inline("openapi: 3.0.0\n".to_string());
        let contract = load_contract(&source, &GradeOptions::default()).unwrap();
        assert_eq!(contract.openapi_version(), Some("3.0.0"));
    }
}
