use crate::workflows::transcript::domain::{Module, WeightEstimate};
use crate::workflows::transcript::policy::GradingPolicy;

/// Plausible weight profiles for three-element modules: near-equal, then
/// leaning on each position in turn.
const THREE_ELEMENT_PROFILES: [[f64; 3]; 7] = [
    [0.34, 0.33, 0.33],
    [0.4, 0.3, 0.3],
    [0.5, 0.3, 0.2],
    [0.3, 0.4, 0.3],
    [0.3, 0.5, 0.2],
    [0.3, 0.3, 0.4],
    [0.2, 0.3, 0.5],
];

/// Two element grades closer than this cannot be told apart by the solve.
const MIN_GRADE_SPREAD: f64 = 0.01;

/// Derives normalized element weights from the module grade.
///
/// Writes `resolved_grade`, `raw_weight`, `normalized_weight` and
/// `contribution_before` on every element and resets any earlier plan. Never
/// fails: when no profile explains the module grade the weights stay equal.
pub fn infer_weights(module: &mut Module, policy: &GradingPolicy) {
    if module.elements.is_empty() {
        module.weight_estimate = WeightEstimate::Uniform;
        return;
    }

    let use_second_session = module.session1_outcome.awaits_second_session();
    for element in &mut module.elements {
        element.resolved_grade = if use_second_session && element.session2_grade > 0.0 {
            element.session2_grade
        } else {
            element.session1_grade
        };
    }

    let count = module.elements.len();
    let equal = 1.0 / count as f64;
    let grades: Vec<f64> = module
        .elements
        .iter()
        .map(|element| element.resolved_grade)
        .collect();
    let target = module.final_grade;

    let mut weights = vec![equal; count];
    let mut estimate = WeightEstimate::Uniform;

    if target > 0.0 {
        match grades.as_slice() {
            [first, second] => {
                if let Some(w1) = solve_pair(*first, *second, target) {
                    weights = vec![w1, 1.0 - w1];
                    estimate = WeightEstimate::Solved;
                }
            }
            [_, _, _] => {
                if let Some(profile) = match_profile(&grades, target, policy.fit_tolerance) {
                    weights = profile.to_vec();
                    estimate = WeightEstimate::Matched;
                }
            }
            _ => {}
        }
    }

    if estimate != WeightEstimate::Uniform
        && (weighted(&grades, &weights) - target).abs() > policy.fit_tolerance
    {
        tracing::debug!(
            module = %module.name,
            "inferred weights miss the module grade, reverting to equal weights"
        );
        weights = vec![equal; count];
        estimate = WeightEstimate::Uniform;
    }

    let total: f64 = weights.iter().sum();
    for (element, raw) in module.elements.iter_mut().zip(&weights) {
        element.raw_weight = *raw;
        element.normalized_weight = if total > 0.0 { raw / total } else { equal };
        element.contribution_before = element.normalized_weight * element.resolved_grade;
        element.contribution_after = element.contribution_before;
        element.points_to_add = 0.0;
    }
    module.weight_estimate = estimate;

    tracing::debug!(
        module = %module.name,
        elements = count,
        estimate = estimate.label(),
        "element weights inferred"
    );
}

/// Solves `w·a + (1 − w)·b = target`, keeping only `w` in `[0, 1]`.
fn solve_pair(a: f64, b: f64, target: f64) -> Option<f64> {
    if (a - b).abs() <= MIN_GRADE_SPREAD {
        return None;
    }
    let w = (target - b) / (a - b);
    (0.0..=1.0).contains(&w).then_some(w)
}

fn match_profile(grades: &[f64], target: f64, tolerance: f64) -> Option<[f64; 3]> {
    let mut best: Option<([f64; 3], f64)> = None;
    for profile in THREE_ELEMENT_PROFILES {
        let error = (weighted(grades, &profile) - target).abs();
        match best {
            Some((_, best_error)) if error >= best_error => {}
            _ => best = Some((profile, error)),
        }
    }
    best.filter(|(_, error)| *error < tolerance)
        .map(|(profile, _)| profile)
}

fn weighted(grades: &[f64], weights: &[f64]) -> f64 {
    grades.iter().zip(weights).map(|(g, w)| g * w).sum()
}
