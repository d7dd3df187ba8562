use super::plan::{AllocationPlan, PlanningContext, EPSILON};
use super::search;
use serde::{Deserialize, Serialize};

/// Competing ways of spreading the points a failing module needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    LowScoreFirst,
    HighWeightFirst,
    MinTotalPoints,
    Balanced,
}

impl StrategyKind {
    /// Generation order; the selector breaks ties in favour of earlier entries.
    pub const fn ordered() -> [Self; 4] {
        [
            Self::LowScoreFirst,
            Self::HighWeightFirst,
            Self::MinTotalPoints,
            Self::Balanced,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::LowScoreFirst => "Lowest grades first",
            Self::HighWeightFirst => "Heaviest weights first",
            Self::MinTotalPoints => "Fewest total points",
            Self::Balanced => "Balanced spread",
        }
    }

    pub(crate) fn allocate(self, context: &PlanningContext<'_>) -> AllocationPlan {
        let points = match self {
            Self::LowScoreFirst => low_score_first(context),
            Self::HighWeightFirst => high_weight_first(context),
            Self::MinTotalPoints => min_total_points(context),
            Self::Balanced => balanced(context),
        };
        AllocationPlan::from_points(points)
    }
}

fn low_score_first(context: &PlanningContext<'_>) -> Vec<f64> {
    let mut points = context.floor_points();
    let mut order = context.eligible.clone();
    order.sort_by(|&a, &b| {
        let grade_a = context.grades[a] + points[a];
        let grade_b = context.grades[b] + points[b];
        grade_a
            .total_cmp(&grade_b)
            .then_with(|| context.weights[b].total_cmp(&context.weights[a]))
    });
    context.fill_in_order(&mut points, &order);
    points
}

fn high_weight_first(context: &PlanningContext<'_>) -> Vec<f64> {
    let mut points = context.floor_points();
    let order = by_weight_descending(context, context.eligible.clone());
    context.fill_in_order(&mut points, &order);
    points
}

fn min_total_points(context: &PlanningContext<'_>) -> Vec<f64> {
    let mut points = context.floor_points();
    let remaining = context.remaining_after(&points);
    let candidates = context.contributors();
    if remaining <= EPSILON || candidates.is_empty() {
        return points;
    }

    if candidates.len() <= 2 {
        let mut order = candidates;
        order.sort_by(|&a, &b| {
            efficiency(context.weights[b]).total_cmp(&efficiency(context.weights[a]))
        });
        context.fill_in_order(&mut points, &order);
        return points;
    }

    if candidates.len() > context.policy.search_element_cap {
        tracing::debug!(
            candidates = candidates.len(),
            "too many elements for grid search, filling by weight"
        );
        let order = by_weight_descending(context, candidates);
        context.fill_in_order(&mut points, &order);
        return points;
    }

    let weights: Vec<f64> = candidates.iter().map(|&index| context.weights[index]).collect();
    let rooms: Vec<f64> = candidates
        .iter()
        .map(|&index| context.room(&points, index))
        .collect();

    match search::cheapest_combination(&weights, &rooms, remaining, context.policy.search_steps) {
        Some(extra) => {
            for (slot, &index) in candidates.iter().enumerate() {
                points[index] += extra[slot];
            }
        }
        None => {
            let order = by_weight_descending(context, candidates);
            context.fill_in_order(&mut points, &order);
        }
    }
    points
}

fn balanced(context: &PlanningContext<'_>) -> Vec<f64> {
    let mut points = context.floor_points();
    let candidates = context.contributors();
    if context.remaining_after(&points) <= EPSILON || candidates.is_empty() {
        return points;
    }

    // Inverse-square bias pushes points toward the lighter elements.
    let bias: Vec<f64> = if context.disparity().is_some() {
        candidates
            .iter()
            .map(|&index| 1.0 / context.weights[index].powi(2))
            .collect()
    } else {
        vec![1.0; candidates.len()]
    };

    spread(context, &mut points, &candidates, &bias);

    // Corrective passes when elements hit their ceiling before the target is met.
    for _ in 0..candidates.len() {
        if context.remaining_after(&points) <= EPSILON {
            break;
        }
        let open: Vec<usize> = (0..candidates.len())
            .filter(|&slot| context.room(&points, candidates[slot]) > EPSILON)
            .collect();
        if open.is_empty() {
            break;
        }
        let open_candidates: Vec<usize> = open.iter().map(|&slot| candidates[slot]).collect();
        let open_bias: Vec<f64> = open.iter().map(|&slot| bias[slot]).collect();
        spread(context, &mut points, &open_candidates, &open_bias);
    }

    if context.remaining_after(&points) > EPSILON {
        let order = by_weight_descending(context, candidates);
        context.fill_in_order(&mut points, &order);
    }
    points
}

/// Hands out the outstanding need in proportion to `bias`, clipped to each element's room.
fn spread(context: &PlanningContext<'_>, points: &mut [f64], candidates: &[usize], bias: &[f64]) {
    let remaining = context.remaining_after(points);
    let leverage: f64 = candidates
        .iter()
        .zip(bias)
        .map(|(&index, factor)| context.weights[index] * factor)
        .sum();
    if remaining <= EPSILON || leverage <= EPSILON {
        return;
    }

    let scale = remaining / leverage;
    for (&index, factor) in candidates.iter().zip(bias) {
        let add = (scale * factor).min(context.room(points, index));
        points[index] += add;
    }
}

fn by_weight_descending(context: &PlanningContext<'_>, mut order: Vec<usize>) -> Vec<usize> {
    order.sort_by(|&a, &b| context.weights[b].total_cmp(&context.weights[a]));
    order
}

/// Module-grade leverage of one element relative to the rest.
fn efficiency(weight: f64) -> f64 {
    if weight >= 1.0 {
        f64::INFINITY
    } else {
        weight / (1.0 - weight)
    }
}
