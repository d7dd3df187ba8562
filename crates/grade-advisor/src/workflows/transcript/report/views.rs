use super::aggregate::AdmissionStatus;
use crate::workflows::remediation::PlanBasis;
use crate::workflows::transcript::domain::{WeightConfidence, WeightEstimate};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptReportSummary {
    pub engine_enabled: bool,
    pub general_average: f64,
    pub status: AdmissionStatus,
    pub status_label: &'static str,
    pub total_modules: usize,
    pub passed_modules: usize,
    pub failed_modules: usize,
    /// Failed modules tolerated before the transcript is deferred.
    pub failure_allowance: usize,
    pub session_averages: SessionAveragesView,
    pub semester_averages: Vec<SemesterAverageEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remediations: Vec<RemediationView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<ModuleView>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SessionAveragesView {
    pub session1: f64,
    pub session2: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SemesterAverageEntry {
    pub semester: Option<String>,
    pub semester_label: String,
    pub average: f64,
    pub modules: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleView {
    pub name: String,
    pub semester: Option<String>,
    pub session1_grade: f64,
    pub session1_outcome: String,
    pub session2_grade: f64,
    pub session2_outcome: String,
    pub final_grade: f64,
    pub passed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<ElementView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ElementView {
    pub name: String,
    pub session1_grade: f64,
    pub session2_grade: f64,
    pub resolved_grade: f64,
    pub weight_pct: u32,
    pub contribution_before: f64,
    pub contribution_after: f64,
    pub points_to_add: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemediationView {
    pub module: String,
    pub final_grade: f64,
    pub points_needed: f64,
    pub target_grade: f64,
    pub max_achievable: f64,
    pub reachable: bool,
    pub basis: PlanBasis,
    pub basis_label: &'static str,
    pub total_points: f64,
    pub weight_estimate: WeightEstimate,
    pub weight_estimate_label: &'static str,
    pub weight_confidence: WeightConfidence,
    pub weight_confidence_label: &'static str,
    pub elements: Vec<ElementGuidanceView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ElementGuidanceView {
    pub name: String,
    pub resolved_grade: f64,
    pub weight_pct: u32,
    pub points_to_add: f64,
    pub projected_grade: f64,
    pub module_impact: f64,
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounds up to the next tenth so displayed guidance never undershoots.
pub(crate) fn round_up_tenth(value: f64) -> f64 {
    if value <= 0.0 {
        return 0.0;
    }
    ((value * 10.0) - 1e-6).ceil() / 10.0
}

pub(crate) fn weight_percent(weight: f64) -> u32 {
    (weight.clamp(0.0, 1.0) * 100.0).round() as u32
}
