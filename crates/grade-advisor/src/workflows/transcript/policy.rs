use super::report::AdmissionStatus;
use serde::{Deserialize, Serialize};

/// Institutional thresholds and planner tuning knobs.
///
/// The disparity and tolerance values were chosen empirically; treat them as
/// tunable rather than as regulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingPolicy {
    /// Aggregate grade a module needs to count as passed.
    pub pass_threshold: f64,
    /// Element grade below which a module is disqualifying.
    pub element_floor: f64,
    pub max_grade: f64,
    /// Elements strictly above this grade receive at most `capped_increment` points.
    pub capped_above: f64,
    pub capped_increment: f64,
    /// Largest accepted gap between inferred and recorded module grade.
    pub fit_tolerance: f64,
    /// Slack when checking that a plan reaches its target.
    pub reach_tolerance: f64,
    /// Grid resolution of the minimum-total-points search.
    pub search_steps: usize,
    /// Beyond this many candidate elements the search falls back to a greedy fill.
    pub search_element_cap: usize,
    pub disparity_ratio: f64,
    pub dominant_weight: f64,
    pub disparity_bonus_cap: f64,
    /// Plans whose rounded total is within this many points of the cheapest compete on balance.
    pub effort_window: f64,
    /// A transcript is admitted with at most `total / failure_allowance_divisor` failed modules.
    pub failure_allowance_divisor: usize,
}

impl Default for GradingPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl GradingPolicy {
    pub const fn standard() -> Self {
        Self {
            pass_threshold: 12.0,
            element_floor: 5.0,
            max_grade: 20.0,
            capped_above: 10.0,
            capped_increment: 5.0,
            fit_tolerance: 0.5,
            reach_tolerance: 0.01,
            search_steps: 10,
            search_element_cap: 6,
            disparity_ratio: 1.2,
            dominant_weight: 0.35,
            disparity_bonus_cap: 2.0,
            effort_window: 1.0,
            failure_allowance_divisor: 4,
        }
    }

    /// Most points an element at `grade` may receive.
    pub fn max_increment(&self, grade: f64) -> f64 {
        let headroom = (self.max_grade - grade).max(0.0);
        if grade > self.capped_above {
            headroom.min(self.capped_increment)
        } else {
            headroom
        }
    }

    /// Points required to lift `grade` to the element floor.
    pub fn floor_deficit(&self, grade: f64) -> f64 {
        (self.element_floor - grade).max(0.0)
    }

    pub fn failure_allowance(&self, total_modules: usize) -> usize {
        total_modules / self.failure_allowance_divisor.max(1)
    }

    pub fn admission_status(
        &self,
        average: f64,
        total_modules: usize,
        failed_modules: usize,
    ) -> AdmissionStatus {
        if average >= self.pass_threshold && failed_modules <= self.failure_allowance(total_modules)
        {
            AdmissionStatus::Admitted
        } else {
            AdmissionStatus::Deferred
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceiling_depends_on_current_grade() {
        let policy = GradingPolicy::standard();
        assert_eq!(policy.max_increment(10.0), 10.0);
        assert_eq!(policy.max_increment(4.0), 16.0);
        assert_eq!(policy.max_increment(10.5), 5.0);
        assert_eq!(policy.max_increment(17.0), 3.0);
        assert_eq!(policy.max_increment(20.0), 0.0);
    }

    #[test]
    fn floor_deficit_is_zero_at_or_above_floor() {
        let policy = GradingPolicy::standard();
        assert_eq!(policy.floor_deficit(3.5), 1.5);
        assert_eq!(policy.floor_deficit(5.0), 0.0);
        assert_eq!(policy.floor_deficit(9.0), 0.0);
    }
}
