use super::strategies::StrategyKind;
use crate::workflows::transcript::domain::Module;
use crate::workflows::transcript::policy::GradingPolicy;
use serde::Serialize;

pub(crate) const EPSILON: f64 = 1e-9;

/// Points to add per element, indexed by the element's position in its module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationPlan {
    pub per_element_points: Vec<f64>,
    pub total_points: f64,
}

impl AllocationPlan {
    pub fn empty(elements: usize) -> Self {
        Self {
            per_element_points: vec![0.0; elements],
            total_points: 0.0,
        }
    }

    pub(crate) fn from_points(points: Vec<f64>) -> Self {
        let total_points = points.iter().sum();
        Self {
            per_element_points: points,
            total_points,
        }
    }

    pub fn points_for(&self, index: usize) -> f64 {
        self.per_element_points.get(index).copied().unwrap_or(0.0)
    }

    pub fn touched(&self) -> impl Iterator<Item = usize> + '_ {
        self.per_element_points
            .iter()
            .enumerate()
            .filter(|(_, points)| **points > EPSILON)
            .map(|(index, _)| index)
    }

    /// Weighted module grade gained by applying the plan.
    pub fn improvement(&self, weights: &[f64]) -> f64 {
        self.per_element_points
            .iter()
            .zip(weights)
            .map(|(points, weight)| points * weight)
            .sum()
    }
}

/// Why the planner produced the plan it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "strategy", rename_all = "snake_case")]
pub enum PlanBasis {
    NoElements,
    NothingEligible,
    Strategy(StrategyKind),
    Saturated,
}

impl PlanBasis {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoElements => "No element breakdown",
            Self::NothingEligible => "All elements already adequate",
            Self::Strategy(kind) => kind.label(),
            Self::Saturated => "Every element at its ceiling",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanningOutcome {
    pub plan: AllocationPlan,
    pub basis: PlanBasis,
    /// Weighted grade of the resolved element grades before any points.
    pub base_grade: f64,
    pub target_grade: f64,
    pub required_improvement: f64,
    pub max_achievable: f64,
    pub reachable: bool,
}

/// Snapshot of one module's elements as the strategies see it.
pub(crate) struct PlanningContext<'a> {
    pub(crate) policy: &'a GradingPolicy,
    pub(crate) grades: Vec<f64>,
    pub(crate) weights: Vec<f64>,
    /// Elements below the pass threshold, in module order.
    pub(crate) eligible: Vec<usize>,
    pub(crate) ceilings: Vec<f64>,
    pub(crate) base_grade: f64,
    pub(crate) max_achievable: f64,
    pub(crate) target_grade: f64,
    pub(crate) required: f64,
    pub(crate) reachable: bool,
}

impl<'a> PlanningContext<'a> {
    pub(crate) fn new(module: &Module, policy: &'a GradingPolicy) -> Self {
        let grades: Vec<f64> = module
            .elements
            .iter()
            .map(|element| element.resolved_grade)
            .collect();
        let weights: Vec<f64> = module
            .elements
            .iter()
            .map(|element| element.normalized_weight)
            .collect();
        let eligible: Vec<usize> = grades
            .iter()
            .enumerate()
            .filter(|(_, grade)| **grade < policy.pass_threshold)
            .map(|(index, _)| index)
            .collect();
        let ceilings: Vec<f64> = grades
            .iter()
            .enumerate()
            .map(|(index, grade)| {
                if eligible.contains(&index) {
                    policy.max_increment(*grade)
                } else {
                    0.0
                }
            })
            .collect();

        let base_grade: f64 = grades.iter().zip(&weights).map(|(g, w)| g * w).sum();
        let max_achievable = base_grade
            + ceilings
                .iter()
                .zip(&weights)
                .map(|(ceiling, weight)| ceiling * weight)
                .sum::<f64>();
        let reachable = max_achievable + EPSILON >= policy.pass_threshold;
        let target_grade = if reachable {
            policy.pass_threshold
        } else {
            max_achievable
        };

        Self {
            policy,
            grades,
            weights,
            eligible,
            ceilings,
            base_grade,
            max_achievable,
            target_grade,
            required: target_grade - base_grade,
            reachable,
        }
    }

    /// Starting allocation: every eligible element below the floor lifted to it,
    /// never past its ceiling.
    pub(crate) fn floor_points(&self) -> Vec<f64> {
        let mut points = vec![0.0; self.grades.len()];
        for &index in &self.eligible {
            points[index] = self
                .policy
                .floor_deficit(self.grades[index])
                .min(self.ceilings[index]);
        }
        points
    }

    pub(crate) fn remaining_after(&self, points: &[f64]) -> f64 {
        self.required
            - points
                .iter()
                .zip(&self.weights)
                .map(|(points, weight)| points * weight)
                .sum::<f64>()
    }

    pub(crate) fn room(&self, points: &[f64], index: usize) -> f64 {
        (self.ceilings[index] - points[index]).max(0.0)
    }

    /// Eligible elements whose weight can move the module grade.
    pub(crate) fn contributors(&self) -> Vec<usize> {
        self.eligible
            .iter()
            .copied()
            .filter(|&index| self.weights[index] > EPSILON)
            .collect()
    }

    /// `max / min` weight ratio of the contributors when it counts as uneven.
    pub(crate) fn disparity(&self) -> Option<f64> {
        let contributors = self.contributors();
        if contributors.len() < 2 {
            return None;
        }

        let (min, max) = contributors.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), &index| (min.min(self.weights[index]), max.max(self.weights[index])),
        );
        let ratio = max / min;
        (ratio > self.policy.disparity_ratio && max > self.policy.dominant_weight).then_some(ratio)
    }

    pub(crate) fn saturated_points(&self) -> Vec<f64> {
        self.ceilings.clone()
    }

    /// Spends the outstanding need on `order`, filling each element before moving on.
    pub(crate) fn fill_in_order(&self, points: &mut [f64], order: &[usize]) {
        let mut remaining = self.remaining_after(points);
        for &index in order {
            if remaining <= EPSILON {
                break;
            }
            let weight = self.weights[index];
            if weight <= EPSILON {
                continue;
            }
            let add = (remaining / weight).min(self.room(points, index));
            if add <= 0.0 {
                continue;
            }
            points[index] += add;
            remaining -= add * weight;
        }
    }
}
