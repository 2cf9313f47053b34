//! Grade and record commands

use crate::cli::{Cli, GradeArgs};
use crate::commands::helpers;
use specgrade_core::error::Result;
use specgrade_core::format::{escape_quotes, OutputFormat};
use specgrade_core::pipeline::{self, GradeOptions, GradeOutput, ProgressFn};
use specgrade_core::rules::Severity;

pub fn execute(cli: &Cli, args: &GradeArgs, record: bool) -> Result<()> {
    let source = helpers::resolve_source(args)?;
    let template = helpers::resolve_template(args)?;
    let token = helpers::cancel_token();
    let progress = helpers::verbose_progress();
    let progress_ref: Option<&ProgressFn<'_>> = if cli.verbose { Some(&progress) } else { None };

    let opts = GradeOptions {
        domain: args.domain.clone(),
        template,
        progress: progress_ref,
        cancel: Some(&token),
    };

    let contract = pipeline::load_contract(&source, &opts)?;

    if record {
        let db = helpers::open_database(cli)?;
        let (output, run_id) = pipeline::grade_and_record(&contract, &opts, &db)?;
        print_output(cli, &output, Some(&run_id))
    } else {
        let output = pipeline::grade_contract(&contract, &opts)?;
        print_output(cli, &output, None)
    }
}

fn print_output(cli: &Cli, output: &GradeOutput, run_id: Option<&str>) -> Result<()> {
    match cli.format {
        OutputFormat::Json => print_json(output, run_id),
        OutputFormat::Human => {
            print_human(cli, output, run_id);
            Ok(())
        }
        OutputFormat::Records => {
            print_records(output, run_id);
            Ok(())
        }
    }
}

fn print_json(output: &GradeOutput, run_id: Option<&str>) -> Result<()> {
    let mut value = serde_json::to_value(output)?;
    if let (Some(run_id), Some(obj)) = (run_id, value.as_object_mut()) {
        obj.insert("runId".to_string(), serde_json::json!(run_id));
    }
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_human(cli: &Cli, output: &GradeOutput, run_id: Option<&str>) {
    let grade = &output.grade;
    println!(
        "{}: {}/100 ({})",
        output.api_id, grade.total, grade.letter
    );

    for score in grade.per_category.values() {
        println!(
            "  {:<12} {:>5.1}/{:<5.1} ({:.0}%)",
            score.category,
            score.earned,
            score.max,
            score.percentage * 100.0
        );
    }

    if output.findings.is_empty() {
        if !cli.quiet {
            println!("No findings.");
        }
    } else {
        let errors = count_severity(output, Severity::Error);
        let warns = count_severity(output, Severity::Warn);
        println!(
            "Findings: {} ({} error(s), {} warning(s))",
            output.findings.len(),
            errors,
            warns
        );
        for finding in &output.findings {
            println!(
                "  {:<5} [{}] {} - {}",
                finding.severity.to_string().to_uppercase(),
                finding.rule_id,
                finding.json_path,
                finding.message
            );
        }
    }

    if grade.auto_fail_triggered {
        println!("Auto-fail: TRIGGERED");
        for reason in &grade.auto_fail_reasons {
            println!("  - {}", reason);
        }
    }

    if let Some(run_id) = run_id {
        println!("Run recorded: {}", run_id);
    }
}

fn print_records(output: &GradeOutput, run_id: Option<&str>) {
    let grade = &output.grade;
    let run_part = run_id
        .map(|id| format!(" run={}", id))
        .unwrap_or_default();
    println!(
        "H specgrade=1 records=1 mode=grade api={} total={} letter={} auto_fail={} findings={}{}",
        output.api_id,
        grade.total,
        grade.letter,
        grade.auto_fail_triggered,
        output.findings.len(),
        run_part
    );

    for score in grade.per_category.values() {
        println!(
            "S {} {:.1} {:.1}",
            score.category, score.earned, score.max
        );
    }

    for finding in &output.findings {
        println!(
            "F {} {} {} \"{}\"",
            finding.severity,
            finding.rule_id,
            finding.json_path,
            escape_quotes(&finding.message)
        );
    }

    for reason in &grade.auto_fail_reasons {
        println!("A \"{}\"", escape_quotes(reason));
    }
}

fn count_severity(output: &GradeOutput, severity: Severity) -> usize {
    output
        .findings
        .iter()
        .filter(|f| f.severity == severity)
        .count()
}
