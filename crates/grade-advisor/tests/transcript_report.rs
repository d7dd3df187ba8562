use grade_advisor::workflows::remediation::{PlanBasis, RemediationEngine, StrategyKind};
use grade_advisor::workflows::transcript::{
    AdmissionStatus, TranscriptImportError, TranscriptImporter, WeightEstimate,
};

fn imported_fixture() -> grade_advisor::workflows::transcript::ImportedTranscript {
    let data = include_bytes!("fixtures/transcript.csv");
    TranscriptImporter::from_reader(&data[..]).expect("fixture imports")
}

#[test]
fn importer_builds_modules_with_semesters_and_elements() {
    let imported = imported_fixture();
    let modules = imported.transcript.modules();

    assert_eq!(modules.len(), 7);
    assert_eq!(imported.orphan_elements, 0);
    assert_eq!(imported.ignored_rows, 0);

    let names: Vec<&str> = modules.iter().map(|module| module.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Analyse 1",
            "Mécanique du point",
            "Algèbre 1",
            "Thermodynamique",
            "Programmation",
            "Électronique",
            "Chimie",
        ]
    );
    assert_eq!(modules[0].semester.as_deref(), Some("Semestre 1"));
    assert_eq!(modules[3].semester.as_deref(), Some("Semestre 2"));
    assert_eq!(modules[3].final_grade, 8.2);
    assert_eq!(modules[5].final_grade, 9.0);
    assert!(!modules[5].passed);
    assert!(modules[4].elements.is_empty());
}

#[test]
fn report_matches_registrar_rules() {
    let imported = imported_fixture();
    let engine = RemediationEngine::default();
    let report = imported.transcript.report(Some(&engine));
    let summary = report.summary();

    assert_eq!(summary.total_modules, 7);
    assert_eq!(summary.passed_modules, 4);
    assert_eq!(summary.failed_modules, 3);
    assert_eq!(summary.failure_allowance, 1);
    assert_eq!(summary.general_average, 11.24);
    assert_eq!(summary.status, AdmissionStatus::Deferred);

    assert_eq!(summary.semester_averages.len(), 2);
    assert_eq!(summary.semester_averages[0].average, 11.5);
    assert_eq!(summary.semester_averages[0].modules, 3);
    assert_eq!(summary.semester_averages[1].average, 11.05);
}

#[test]
fn every_failing_module_gets_guidance_that_passes() {
    let imported = imported_fixture();
    let engine = RemediationEngine::default();
    let report = imported.transcript.report(Some(&engine));

    assert_eq!(report.remediations().len(), 3);
    for module in report.modules.iter().filter(|module| !module.passed) {
        let after: f64 = module
            .elements
            .iter()
            .map(|element| element.contribution_after)
            .sum();
        assert!(after >= 12.0 - 0.01, "{} reaches only {after}", module.name);
    }

    let mechanics = report
        .remediation_for("Mécanique du point")
        .expect("mechanics planned");
    assert_eq!(
        mechanics.outcome.basis,
        PlanBasis::Strategy(StrategyKind::Balanced)
    );

    let thermo = report
        .remediation_for("Thermodynamique")
        .expect("thermodynamics planned");
    assert_eq!(thermo.weight_estimate, WeightEstimate::Solved);
    assert!((thermo.outcome.plan.points_for(0) - 5.0).abs() < 1e-9);
    assert!((thermo.outcome.plan.points_for(1) - 1.0).abs() < 1e-9);

    let electronics = report
        .remediation_for("Électronique")
        .expect("electronics planned");
    assert_eq!(electronics.outcome.plan.points_for(0), 0.0);
    assert!((electronics.outcome.plan.points_for(1) - 33.0 / 7.0).abs() < 1e-9);
}

#[test]
fn makeup_modules_weight_their_second_session_elements() {
    let imported = imported_fixture();
    let report = imported
        .transcript
        .report(Some(&RemediationEngine::default()));

    let algebra = &report.modules[2];
    assert_eq!(algebra.elements[0].resolved_grade, 13.0);
    assert!((algebra.elements[0].normalized_weight - 0.75).abs() < 1e-9);
    assert!(report.remediation_for("Algèbre 1").is_none());
}

#[test]
fn missing_export_surfaces_an_io_error() {
    match TranscriptImporter::from_path("./fixtures/missing.csv") {
        Err(TranscriptImportError::Io(_)) => {}
        other => panic!("expected io error, got {other:?}"),
    }
}
