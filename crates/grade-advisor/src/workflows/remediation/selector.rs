use super::plan::{AllocationPlan, PlanningContext, EPSILON};
use super::strategies::StrategyKind;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CandidatePlan {
    pub(crate) kind: StrategyKind,
    pub(crate) plan: AllocationPlan,
}

/// Picks the best-balanced plan among those that reach the target with near-minimal effort.
///
/// Falls back to the first candidate when none reaches the target.
pub(crate) fn select(candidates: Vec<CandidatePlan>, context: &PlanningContext<'_>) -> CandidatePlan {
    let tolerance = context.policy.reach_tolerance;
    let qualifying: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, candidate)| {
            candidate.plan.improvement(&context.weights) >= context.required - tolerance
        })
        .map(|(index, _)| index)
        .collect();

    let chosen = if qualifying.is_empty() {
        tracing::debug!("no strategy reaches the target, keeping the first candidate");
        0
    } else {
        let cheapest = qualifying
            .iter()
            .map(|&index| round_to_half(candidates[index].plan.total_points))
            .fold(f64::INFINITY, f64::min);

        let mut best: Option<(usize, f64)> = None;
        for &index in &qualifying {
            let rounded = round_to_half(candidates[index].plan.total_points);
            if rounded > cheapest + context.policy.effort_window + EPSILON {
                continue;
            }
            let score = balance_score(&candidates[index].plan, context);
            tracing::debug!(
                strategy = candidates[index].kind.label(),
                total = candidates[index].plan.total_points,
                score,
                "strategy scored"
            );
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((index, score)),
            }
        }
        best.map(|(index, _)| index).unwrap_or(qualifying[0])
    };

    candidates
        .into_iter()
        .nth(chosen)
        .unwrap_or_else(|| CandidatePlan {
            kind: StrategyKind::LowScoreFirst,
            plan: AllocationPlan::empty(context.grades.len()),
        })
}

/// `2·touched − 4·σ(contribution) − 10·r² + bonus`, where `r` correlates weight
/// with points over the touched elements and the bonus rewards spreading
/// against uneven weights.
pub(crate) fn balance_score(plan: &AllocationPlan, context: &PlanningContext<'_>) -> f64 {
    let touched: Vec<usize> = plan.touched().collect();
    let weights: Vec<f64> = touched.iter().map(|&index| context.weights[index]).collect();
    let points: Vec<f64> = touched.iter().map(|&index| plan.points_for(index)).collect();
    let contributions: Vec<f64> = weights.iter().zip(&points).map(|(w, p)| w * p).collect();

    let correlation = pearson(&weights, &points);
    let r_squared = correlation * correlation;
    let bonus = match context.disparity() {
        Some(ratio) if touched.len() >= 2 => {
            let factor = (ratio - 1.0).clamp(0.0, context.policy.disparity_bonus_cap);
            (1.0 - r_squared) * factor
        }
        _ => 0.0,
    };

    2.0 * touched.len() as f64 - 4.0 * std_dev(&contributions) - 10.0 * r_squared + bonus
}

fn round_to_half(value: f64) -> f64 {
    (value * 2.0).round() / 2.0
}

fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

/// Pearson correlation; 0 when either series is constant or shorter than two.
fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().sum::<f64>() / n as f64;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs[..n].iter().zip(&ys[..n]) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= EPSILON || var_y <= EPSILON {
        0.0
    } else {
        covariance / (var_x.sqrt() * var_y.sqrt())
    }
}
