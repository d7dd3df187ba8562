//! Weight inference and minimal-effort point allocation for failing modules.
//!
//! `infer_weights` recovers a plausible weighting of a module's elements from
//! its recorded grade. The planner then runs every [`StrategyKind`] against
//! that weighting and the selector keeps the near-cheapest plan with the best
//! balance score.

mod inference;
mod plan;
mod search;
mod selector;
mod strategies;

#[cfg(test)]
mod tests;

pub use crate::workflows::transcript::policy::GradingPolicy;
pub use inference::infer_weights;
pub use plan::{AllocationPlan, PlanBasis, PlanningOutcome};
pub use strategies::StrategyKind;

use crate::workflows::transcript::domain::{Module, WeightConfidence, WeightEstimate};
use plan::PlanningContext;
use selector::CandidatePlan;
use serde::Serialize;

/// Stateless engine applying a [`GradingPolicy`] to one module at a time.
#[derive(Debug, Clone, Default)]
pub struct RemediationEngine {
    policy: GradingPolicy,
}

impl RemediationEngine {
    pub fn new(policy: GradingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &GradingPolicy {
        &self.policy
    }

    pub fn infer(&self, module: &mut Module) {
        infer_weights(module, &self.policy);
    }

    /// Computes the allocation for a module whose weights are already inferred.
    pub fn plan(&self, module: &Module) -> PlanningOutcome {
        let context = PlanningContext::new(module, &self.policy);
        let elements = module.elements.len();

        let (plan, basis) = if elements == 0 {
            (AllocationPlan::empty(0), PlanBasis::NoElements)
        } else if context.eligible.is_empty() {
            (AllocationPlan::empty(elements), PlanBasis::NothingEligible)
        } else if !context.reachable {
            tracing::warn!(
                module = %module.name,
                max_achievable = context.max_achievable,
                threshold = self.policy.pass_threshold,
                "pass threshold out of reach, saturating every element"
            );
            (
                AllocationPlan::from_points(context.saturated_points()),
                PlanBasis::Saturated,
            )
        } else {
            let candidates = StrategyKind::ordered()
                .into_iter()
                .map(|kind| CandidatePlan {
                    kind,
                    plan: kind.allocate(&context),
                })
                .collect();
            let chosen = selector::select(candidates, &context);
            (chosen.plan, PlanBasis::Strategy(chosen.kind))
        };

        tracing::debug!(
            module = %module.name,
            basis = basis.label(),
            total_points = plan.total_points,
            target = context.target_grade,
            "allocation planned"
        );

        PlanningOutcome {
            plan,
            basis,
            base_grade: context.base_grade,
            target_grade: context.target_grade,
            required_improvement: context.required,
            max_achievable: context.max_achievable,
            reachable: context.reachable,
        }
    }

    /// Infers weights and, for a failing module, plans and records the points to add.
    ///
    /// Returns `None` when the module already passes.
    pub fn remediate(&self, module: &mut Module) -> Option<ModuleRemediation> {
        self.infer(module);
        if !module.needs_remediation(self.policy.pass_threshold) {
            return None;
        }

        let outcome = self.plan(module);
        for (index, element) in module.elements.iter_mut().enumerate() {
            element.points_to_add = outcome.plan.points_for(index);
            element.contribution_after =
                element.normalized_weight * (element.resolved_grade + element.points_to_add);
        }

        Some(ModuleRemediation {
            module: module.name.clone(),
            final_grade: module.final_grade,
            points_needed: self.policy.pass_threshold - module.final_grade,
            weight_estimate: module.weight_estimate,
            weight_confidence: module.weight_confidence(),
            outcome,
        })
    }
}

/// Planning result for one failing module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleRemediation {
    pub module: String,
    pub final_grade: f64,
    /// Gap between the recorded module grade and the pass threshold.
    pub points_needed: f64,
    pub weight_estimate: WeightEstimate,
    pub weight_confidence: WeightConfidence,
    pub outcome: PlanningOutcome,
}
