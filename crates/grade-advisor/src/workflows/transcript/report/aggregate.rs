use super::super::domain::{Module, SessionOutcome};
use super::super::policy::GradingPolicy;
use serde::Serialize;

/// Transcript-level verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionStatus {
    Admitted,
    Deferred,
}

impl AdmissionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admitted => "Admitted",
            Self::Deferred => "Deferred",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SemesterAverage {
    pub semester: Option<String>,
    pub average: f64,
    pub modules: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SessionAverages {
    pub session1: f64,
    pub session2: f64,
}

/// Picks the counted grade and pass flag from the pair of session outcomes.
pub fn resolve_final_grade(module: &Module) -> (f64, bool) {
    use SessionOutcome::*;

    match (&module.session1_outcome, &module.session2_outcome) {
        (Passed, _) => (module.session1_grade, true),
        (MakeupRequired, Passed) => (module.session2_grade, true),
        (MakeupRequired, Failed) => (module.session2_grade, false),
        (Deferred, Admitted) => (module.session2_grade, true),
        (Deferred, outcome) if !outcome.is_pending() => (module.session2_grade, false),
        (outcome, _) => (module.session1_grade, *outcome == Passed),
    }
}

/// Mean final grade over every module, failed ones included.
pub fn general_average(modules: &[Module]) -> f64 {
    mean(modules.iter().map(|module| module.final_grade))
}

pub fn semester_averages(modules: &[Module]) -> Vec<SemesterAverage> {
    let mut groups: Vec<(Option<String>, f64, usize)> = Vec::new();

    for module in modules {
        match groups
            .iter_mut()
            .find(|(semester, _, _)| *semester == module.semester)
        {
            Some((_, sum, count)) => {
                *sum += module.final_grade;
                *count += 1;
            }
            None => groups.push((module.semester.clone(), module.final_grade, 1)),
        }
    }

    groups
        .into_iter()
        .map(|(semester, sum, count)| SemesterAverage {
            semester,
            average: sum / count as f64,
            modules: count,
        })
        .collect()
}

/// Session-one mean, and session-two mean falling back to session one where absent.
pub fn session_averages(modules: &[Module]) -> SessionAverages {
    SessionAverages {
        session1: mean(modules.iter().map(|module| module.session1_grade)),
        session2: mean(modules.iter().map(|module| {
            if module.session2_grade > 0.0 {
                module.session2_grade
            } else {
                module.session1_grade
            }
        })),
    }
}

pub fn status(average: f64, total_modules: usize, failed_modules: usize) -> AdmissionStatus {
    GradingPolicy::standard().admission_status(average, total_modules, failed_modules)
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
