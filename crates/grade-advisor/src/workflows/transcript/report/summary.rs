use super::aggregate::{
    general_average, semester_averages, session_averages, AdmissionStatus, SemesterAverage,
    SessionAverages,
};
use super::views::{
    round2, round_up_tenth, weight_percent, ElementGuidanceView, ElementView, ModuleView,
    RemediationView, SemesterAverageEntry, SessionAveragesView, TranscriptReportSummary,
};
use crate::workflows::remediation::{ModuleRemediation, RemediationEngine};
use crate::workflows::transcript::domain::{Element, Module};

#[derive(Debug, Clone)]
pub struct TranscriptReport {
    /// Report copies of the modules, carrying inferred weights and planned points.
    pub modules: Vec<Module>,
    pub general_average: f64,
    pub semester_averages: Vec<SemesterAverage>,
    pub session_averages: SessionAverages,
    pub total_modules: usize,
    pub passed_modules: usize,
    pub failed_modules: usize,
    pub failure_allowance: usize,
    pub status: AdmissionStatus,
    pub engine_enabled: bool,
    remediations: Vec<RemediatedModule>,
}

#[derive(Debug, Clone)]
struct RemediatedModule {
    module_index: usize,
    remediation: ModuleRemediation,
}

impl TranscriptReport {
    pub(crate) fn build(mut modules: Vec<Module>, engine: Option<&RemediationEngine>) -> Self {
        let policy = engine
            .map(|engine| engine.policy().clone())
            .unwrap_or_default();

        let mut remediations = Vec::new();
        if let Some(engine) = engine {
            for (module_index, module) in modules.iter_mut().enumerate() {
                if let Some(remediation) = engine.remediate(module) {
                    remediations.push(RemediatedModule {
                        module_index,
                        remediation,
                    });
                }
            }
        }

        let total_modules = modules.len();
        let passed_modules = modules.iter().filter(|module| module.passed).count();
        let failed_modules = total_modules - passed_modules;
        let general_average = general_average(&modules);
        let status = policy.admission_status(general_average, total_modules, failed_modules);

        tracing::debug!(
            modules = total_modules,
            failed = failed_modules,
            remediated = remediations.len(),
            status = status.label(),
            "transcript report built"
        );

        Self {
            semester_averages: semester_averages(&modules),
            session_averages: session_averages(&modules),
            failure_allowance: policy.failure_allowance(total_modules),
            modules,
            general_average,
            total_modules,
            passed_modules,
            failed_modules,
            status,
            engine_enabled: engine.is_some(),
            remediations,
        }
    }

    pub fn remediations(&self) -> Vec<&ModuleRemediation> {
        self.remediations
            .iter()
            .map(|entry| &entry.remediation)
            .collect()
    }

    pub fn remediation_for(&self, module_name: &str) -> Option<&ModuleRemediation> {
        self.remediations
            .iter()
            .map(|entry| &entry.remediation)
            .find(|remediation| remediation.module == module_name)
    }

    pub fn summary(&self) -> TranscriptReportSummary {
        let semester_averages = self
            .semester_averages
            .iter()
            .map(SemesterAverage::to_view)
            .collect();

        let remediations = self
            .remediations
            .iter()
            .filter_map(|entry| {
                self.modules
                    .get(entry.module_index)
                    .map(|module| remediation_view(module, &entry.remediation))
            })
            .collect();

        let modules = self.modules.iter().map(Module::to_view).collect();

        TranscriptReportSummary {
            engine_enabled: self.engine_enabled,
            general_average: round2(self.general_average),
            status: self.status,
            status_label: self.status.label(),
            total_modules: self.total_modules,
            passed_modules: self.passed_modules,
            failed_modules: self.failed_modules,
            failure_allowance: self.failure_allowance,
            session_averages: SessionAveragesView {
                session1: round2(self.session_averages.session1),
                session2: round2(self.session_averages.session2),
            },
            semester_averages,
            remediations,
            modules,
        }
    }
}

impl SemesterAverage {
    pub fn to_view(&self) -> SemesterAverageEntry {
        SemesterAverageEntry {
            semester: self.semester.clone(),
            semester_label: self
                .semester
                .clone()
                .unwrap_or_else(|| "Unassigned".to_string()),
            average: round2(self.average),
            modules: self.modules,
        }
    }
}

impl Module {
    pub fn to_view(&self) -> ModuleView {
        ModuleView {
            name: self.name.clone(),
            semester: self.semester.clone(),
            session1_grade: round2(self.session1_grade),
            session1_outcome: self.session1_outcome.label().to_string(),
            session2_grade: round2(self.session2_grade),
            session2_outcome: self.session2_outcome.label().to_string(),
            final_grade: round2(self.final_grade),
            passed: self.passed,
            elements: self.elements.iter().map(Element::to_view).collect(),
        }
    }
}

impl Element {
    pub fn to_view(&self) -> ElementView {
        ElementView {
            name: self.name.clone(),
            session1_grade: round2(self.session1_grade),
            session2_grade: round2(self.session2_grade),
            resolved_grade: round2(self.resolved_grade),
            weight_pct: weight_percent(self.normalized_weight),
            contribution_before: round2(self.contribution_before),
            contribution_after: round2(self.contribution_after),
            points_to_add: round_up_tenth(self.points_to_add),
        }
    }
}

fn remediation_view(module: &Module, remediation: &ModuleRemediation) -> RemediationView {
    let outcome = &remediation.outcome;
    let elements = module
        .elements
        .iter()
        .map(|element| ElementGuidanceView {
            name: element.name.clone(),
            resolved_grade: round2(element.resolved_grade),
            weight_pct: weight_percent(element.normalized_weight),
            points_to_add: round_up_tenth(element.points_to_add),
            projected_grade: round2(element.projected_grade()),
            module_impact: round2(element.module_impact()),
        })
        .collect();

    RemediationView {
        module: remediation.module.clone(),
        final_grade: round2(remediation.final_grade),
        points_needed: round_up_tenth(remediation.points_needed),
        target_grade: round2(outcome.target_grade),
        max_achievable: round2(outcome.max_achievable),
        reachable: outcome.reachable,
        basis: outcome.basis,
        basis_label: outcome.basis.label(),
        total_points: round_up_tenth(outcome.plan.total_points),
        weight_estimate: remediation.weight_estimate,
        weight_estimate_label: remediation.weight_estimate.label(),
        weight_confidence: remediation.weight_confidence,
        weight_confidence_label: remediation.weight_confidence.label(),
        elements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::remediation::{PlanBasis, StrategyKind};
    use crate::workflows::transcript::domain::SessionOutcome;

    fn sample_modules() -> Vec<Module> {
        vec![
            Module::new(
                "Algebra",
                14.0,
                SessionOutcome::Passed,
                0.0,
                SessionOutcome::Pending,
            )
            .with_semester("S1")
            .with_element(Element::new("Exam", 15.0, 0.0))
            .with_element(Element::new("Quiz", 13.0, 0.0)),
            Module::new(
                "Mechanics",
                8.0,
                SessionOutcome::Failed,
                0.0,
                SessionOutcome::Pending,
            )
            .with_semester("S1")
            .with_element(Element::new("Exam", 10.0, 0.0))
            .with_element(Element::new("Lab", 6.0, 0.0)),
            Module::new(
                "Programming",
                9.0,
                SessionOutcome::MakeupRequired,
                12.5,
                SessionOutcome::Passed,
            )
            .with_semester("S2"),
        ]
    }

    #[test]
    fn report_aggregates_every_module() {
        let report = TranscriptReport::build(sample_modules(), Some(&RemediationEngine::default()));

        assert_eq!(report.total_modules, 3);
        assert_eq!(report.passed_modules, 2);
        assert_eq!(report.failed_modules, 1);
        assert_eq!(report.failure_allowance, 0);
        assert!((report.general_average - 11.5).abs() < 1e-9);
        assert_eq!(report.status, AdmissionStatus::Deferred);
        assert!(report.engine_enabled);
    }

    #[test]
    fn summary_rounds_for_display() {
        let report = TranscriptReport::build(sample_modules(), Some(&RemediationEngine::default()));
        let summary = report.summary();

        assert_eq!(summary.general_average, 11.5);
        assert_eq!(summary.status_label, "Deferred");
        assert_eq!(summary.session_averages.session1, 10.33);
        assert_eq!(summary.session_averages.session2, 11.5);
        assert_eq!(summary.semester_averages.len(), 2);
        assert_eq!(summary.semester_averages[0].semester_label, "S1");
        assert_eq!(summary.semester_averages[0].average, 11.0);
        assert_eq!(summary.semester_averages[1].average, 12.5);

        assert_eq!(summary.remediations.len(), 1);
        let remediation = &summary.remediations[0];
        assert_eq!(remediation.module, "Mechanics");
        assert_eq!(remediation.points_needed, 4.0);
        assert_eq!(remediation.basis, PlanBasis::Strategy(StrategyKind::Balanced));
        assert_eq!(remediation.elements[0].weight_pct, 50);
        assert_eq!(remediation.elements[0].points_to_add, 4.0);
        assert_eq!(remediation.elements[1].projected_grade, 10.0);
        assert_eq!(remediation.elements[1].module_impact, 2.0);
    }

    #[test]
    fn passing_modules_still_expose_inferred_weights() {
        let report = TranscriptReport::build(sample_modules(), Some(&RemediationEngine::default()));
        let algebra = &report.summary().modules[0];

        assert_eq!(algebra.elements[0].weight_pct, 50);
        assert_eq!(algebra.elements[0].contribution_before, 7.5);
        assert_eq!(algebra.elements[0].points_to_add, 0.0);
        assert!(report.remediation_for("Algebra").is_none());
        assert!(report.remediation_for("Mechanics").is_some());
    }

    #[test]
    fn disabled_engine_skips_inference_and_planning() {
        let report = TranscriptReport::build(sample_modules(), None);
        let summary = report.summary();

        assert!(!summary.engine_enabled);
        assert!(summary.remediations.is_empty());
        assert_eq!(summary.modules[1].elements[0].weight_pct, 0);
        assert_eq!(summary.general_average, 11.5);
    }

    #[test]
    fn empty_transcript_reports_zero_averages() {
        let summary = TranscriptReport::build(Vec::new(), None).summary();

        assert_eq!(summary.general_average, 0.0);
        assert_eq!(summary.total_modules, 0);
        assert_eq!(summary.status, AdmissionStatus::Deferred);
        assert!(summary.semester_averages.is_empty());
    }
}
