use crate::infra::{engine_settings, render_json};
use clap::Args;
use grade_advisor::error::AppError;
use grade_advisor::workflows::transcript::report::views::TranscriptReportSummary;
use grade_advisor::workflows::transcript::{
    Element, Module, SessionOutcome, Transcript, TranscriptImporter,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct TranscriptReportArgs {
    /// CSV export with Name, Type, session grade/result and Semester columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// Report averages only, without remediation planning
    #[arg(long)]
    pub(crate) disable_engine: bool,
    /// Include every module with its elements in the output
    #[arg(long)]
    pub(crate) list_modules: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum TranscriptSource {
    CsvImport,
    Sample,
}

#[derive(Debug, Serialize)]
pub(crate) struct TranscriptReportOutput {
    pub(crate) source: TranscriptSource,
    #[serde(skip_serializing_if = "is_zero")]
    pub(crate) skipped_rows: usize,
    #[serde(flatten)]
    pub(crate) summary: TranscriptReportSummary,
}

fn is_zero(value: &usize) -> bool {
    *value == 0
}

pub(crate) fn run_transcript_report(args: TranscriptReportArgs) -> Result<(), AppError> {
    let TranscriptReportArgs {
        csv,
        json,
        disable_engine,
        list_modules,
    } = args;

    let settings = engine_settings(disable_engine)?;
    let imported = TranscriptImporter::from_path(&csv)?;
    let engine = settings.engine();
    let mut summary = imported.transcript.report(engine.as_ref()).summary();
    if !list_modules {
        summary.modules.clear();
    }

    let output = TranscriptReportOutput {
        source: TranscriptSource::CsvImport,
        skipped_rows: imported.orphan_elements + imported.ignored_rows,
        summary,
    };
    if json {
        println!("{}", render_json(&output)?);
    } else {
        render_transcript_report(&output);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let settings = engine_settings(false)?;
    let engine = settings.engine();
    let summary = sample_transcript().report(engine.as_ref()).summary();

    let output = TranscriptReportOutput {
        source: TranscriptSource::Sample,
        skipped_rows: 0,
        summary,
    };
    if args.json {
        println!("{}", render_json(&output)?);
    } else {
        println!("Grade advisor demo");
        render_transcript_report(&output);
    }
    Ok(())
}

pub(crate) fn sample_transcript() -> Transcript {
    use SessionOutcome::{Deferred, Failed, MakeupRequired, Passed, Pending};

    Transcript::new(vec![
        Module::new("Linear Algebra", 14.0, Passed, 0.0, Pending)
            .with_semester("Semester 1")
            .with_element(Element::new("Final exam", 15.0, 0.0))
            .with_element(Element::new("Coursework", 13.0, 0.0)),
        Module::new("Classical Mechanics", 8.0, Failed, 0.0, Pending)
            .with_semester("Semester 1")
            .with_element(Element::new("Final exam", 10.0, 0.0))
            .with_element(Element::new("Lab work", 6.0, 0.0)),
        Module::new("Calculus", 9.0, MakeupRequired, 12.5, Passed)
            .with_semester("Semester 1")
            .with_element(Element::new("Final exam", 8.0, 13.0))
            .with_element(Element::new("Project", 11.0, 11.0)),
        Module::new("Thermodynamics", 8.2, Failed, 0.0, Pending)
            .with_semester("Semester 2")
            .with_element(Element::new("Final exam", 10.0, 0.0))
            .with_element(Element::new("Lab work", 4.0, 0.0)),
        Module::new("Electronics", 7.0, Deferred, 9.0, Failed)
            .with_semester("Semester 2")
            .with_element(Element::new("Lectures", 16.0, 16.0))
            .with_element(Element::new("Tutorials", 10.0, 5.0)),
        Module::new("Programming", 12.0, Passed, 0.0, Pending).with_semester("Semester 2"),
        Module::new("Signals", 9.5, Failed, 0.0, Pending)
            .with_semester("Semester 2")
            .with_element(Element::new("Exam", 9.0, 0.0))
            .with_element(Element::new("Homework", 12.0, 0.0))
            .with_element(Element::new("Lab", 8.0, 0.0)),
    ])
}

pub(crate) fn render_transcript_report(output: &TranscriptReportOutput) {
    let summary = &output.summary;

    match output.source {
        TranscriptSource::CsvImport => println!("Data source: CSV transcript export"),
        TranscriptSource::Sample => println!("Data source: built-in sample transcript"),
    }
    if output.skipped_rows > 0 {
        println!("Skipped rows: {}", output.skipped_rows);
    }

    println!(
        "\nGeneral average: {:.2} / 20 ({})",
        summary.general_average, summary.status_label
    );
    println!(
        "Modules: {} total, {} passed, {} failed (up to {} failures tolerated)",
        summary.total_modules,
        summary.passed_modules,
        summary.failed_modules,
        summary.failure_allowance
    );
    println!(
        "Session averages: first sitting {:.2} | after makeups {:.2}",
        summary.session_averages.session1, summary.session_averages.session2
    );

    if !summary.semester_averages.is_empty() {
        println!("\nSemester averages");
        for entry in &summary.semester_averages {
            println!(
                "- {}: {:.2} ({} modules)",
                entry.semester_label, entry.average, entry.modules
            );
        }
    }

    if !summary.engine_enabled {
        println!("\nRemediation engine disabled");
    } else if summary.remediations.is_empty() {
        println!("\nNo failing modules need remediation");
    } else {
        println!("\nRemediation guidance");
        for remediation in &summary.remediations {
            println!(
                "- {}: {:.2} -> needs {:.1} points ({}; {})",
                remediation.module,
                remediation.final_grade,
                remediation.points_needed,
                remediation.basis_label,
                remediation.weight_confidence_label
            );
            if !remediation.reachable {
                println!(
                    "  Pass mark out of reach, best achievable grade {:.2}",
                    remediation.max_achievable
                );
            }
            for element in &remediation.elements {
                if element.points_to_add > 0.0 {
                    println!(
                        "    - {} ({}%): {:.2} +{:.1} -> {:.2}",
                        element.name,
                        element.weight_pct,
                        element.resolved_grade,
                        element.points_to_add,
                        element.projected_grade
                    );
                } else {
                    println!(
                        "    - {} ({}%): {:.2} unchanged",
                        element.name, element.weight_pct, element.resolved_grade
                    );
                }
            }
        }
    }

    if !summary.modules.is_empty() {
        println!("\nModules");
        for module in &summary.modules {
            println!(
                "- {} [{}]: {:.2} ({} / {})",
                module.name,
                module.semester.as_deref().unwrap_or("no semester"),
                module.final_grade,
                module.session1_outcome,
                module.session2_outcome
            );
            for element in &module.elements {
                println!(
                    "    - {}: {:.2} ({}%)",
                    element.name, element.resolved_grade, element.weight_pct
                );
            }
        }
    }
}
