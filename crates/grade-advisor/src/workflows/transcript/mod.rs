//! Transcript snapshot, aggregates and report views.

pub mod domain;
pub mod import;
pub mod policy;
pub mod report;
pub mod router;

pub use domain::{
    parse_grade, Element, ElementRecord, Module, ModuleRecord, SessionOutcome, WeightConfidence,
    WeightEstimate,
};
pub use import::{ImportedTranscript, TranscriptImportError, TranscriptImporter};
pub use policy::GradingPolicy;
pub use report::{AdmissionStatus, TranscriptReport};
pub use router::transcript_router;

use crate::workflows::remediation::RemediationEngine;

/// Ordered modules of one student transcript.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    modules: Vec<Module>,
}

impl Transcript {
    pub fn new(modules: Vec<Module>) -> Self {
        Self { modules }
    }

    pub fn from_records(records: Vec<ModuleRecord>) -> Self {
        Self::new(records.into_iter().map(Module::from_record).collect())
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn into_modules(self) -> Vec<Module> {
        self.modules
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn extend(&mut self, modules: impl IntoIterator<Item = Module>) {
        self.modules.extend(modules);
    }

    /// Builds averages and status, and remediation guidance when an engine is supplied.
    ///
    /// The source modules are left untouched; derived element fields live on the
    /// report's own copies.
    pub fn report(&self, engine: Option<&RemediationEngine>) -> TranscriptReport {
        TranscriptReport::build(self.modules.clone(), engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_records_resolves_final_grades() {
        let transcript = Transcript::from_records(vec![
            ModuleRecord {
                name: "Analysis".to_string(),
                session1_grade: 9.0,
                session1_outcome: "Rattrapage".to_string(),
                session2_grade: 12.5,
                session2_outcome: "Validé".to_string(),
                ..ModuleRecord::default()
            },
            ModuleRecord {
                name: "Chemistry".to_string(),
                session1_grade: 13.0,
                session1_outcome: "Validé".to_string(),
                ..ModuleRecord::default()
            },
        ]);

        let modules = transcript.modules();
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].final_grade, 12.5);
        assert!(modules[0].passed);
        assert_eq!(modules[1].final_grade, 13.0);
    }

    #[test]
    fn report_does_not_mutate_the_snapshot() {
        let transcript = Transcript::new(vec![Module::new(
            "Statics",
            8.0,
            SessionOutcome::Failed,
            0.0,
            SessionOutcome::Pending,
        )
        .with_element(Element::new("Exam", 10.0, 0.0))
        .with_element(Element::new("Lab", 6.0, 0.0))]);

        let before = transcript.clone();
        let report = transcript.report(Some(&RemediationEngine::default()));

        assert_eq!(transcript, before);
        assert_eq!(report.remediations().len(), 1);
        assert!(report.modules[0].elements[0].points_to_add > 0.0);
    }
}
