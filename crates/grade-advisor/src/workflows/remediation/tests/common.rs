use crate::workflows::remediation::{AllocationPlan, GradingPolicy, RemediationEngine};
use crate::workflows::transcript::domain::{Element, Module, SessionOutcome};

pub(super) fn engine() -> RemediationEngine {
    RemediationEngine::new(GradingPolicy::standard())
}

/// Session-one failure whose counted grade is `final_grade`.
pub(super) fn failing_module(final_grade: f64, grades: &[f64]) -> Module {
    grades.iter().enumerate().fold(
        Module::new(
            "Signals and Systems",
            final_grade,
            SessionOutcome::Failed,
            0.0,
            SessionOutcome::Pending,
        ),
        |module, (index, grade)| {
            module.with_element(Element::new(format!("Element {}", index + 1), *grade, 0.0))
        },
    )
}

pub(super) fn inferred(module: Module) -> Module {
    let mut module = module;
    engine().infer(&mut module);
    module
}

pub(super) fn weights(module: &Module) -> Vec<f64> {
    module
        .elements
        .iter()
        .map(|element| element.normalized_weight)
        .collect()
}

pub(super) fn grade_after(module: &Module, plan: &AllocationPlan) -> f64 {
    module
        .elements
        .iter()
        .enumerate()
        .map(|(index, element)| {
            element.normalized_weight * (element.resolved_grade + plan.points_for(index))
        })
        .sum()
}

pub(super) fn assert_within_ceilings(module: &Module, plan: &AllocationPlan, policy: &GradingPolicy) {
    for (index, element) in module.elements.iter().enumerate() {
        let points = plan.points_for(index);
        assert!(points >= 0.0, "negative points for {}", element.name);
        if element.resolved_grade >= policy.pass_threshold {
            assert_eq!(points, 0.0, "{} is already adequate", element.name);
        } else {
            assert!(
                points <= policy.max_increment(element.resolved_grade) + 1e-9,
                "{} received {points} points past its ceiling",
                element.name
            );
        }
    }
}
