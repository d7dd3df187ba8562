use super::plan::EPSILON;

/// Cheapest per-element increments whose weighted sum covers `required`.
///
/// Every element but the last walks a grid of `steps + 1` increments between 0
/// and its room; the last element takes the exact residual. Branches whose
/// running total already matches the best complete combination are pruned.
/// Returns `None` when no grid point can cover the requirement.
pub(crate) fn cheapest_combination(
    weights: &[f64],
    rooms: &[f64],
    required: f64,
    steps: usize,
) -> Option<Vec<f64>> {
    if weights.is_empty() || weights.len() != rooms.len() {
        return None;
    }

    let mut search = GridSearch {
        weights,
        rooms,
        steps: steps.max(1),
        current: vec![0.0; weights.len()],
        best: None,
        best_total: f64::INFINITY,
    };
    search.descend(0, 0.0, required);
    search.best
}

struct GridSearch<'a> {
    weights: &'a [f64],
    rooms: &'a [f64],
    steps: usize,
    current: Vec<f64>,
    best: Option<Vec<f64>>,
    best_total: f64,
}

impl GridSearch<'_> {
    fn descend(&mut self, depth: usize, spent: f64, remaining: f64) {
        if spent >= self.best_total - EPSILON {
            return;
        }

        if remaining <= EPSILON {
            self.record(spent);
            return;
        }

        let last = self.weights.len() - 1;
        if depth == last {
            let weight = self.weights[depth];
            if weight <= EPSILON {
                return;
            }
            let needed = remaining / weight;
            if needed > self.rooms[depth] + EPSILON {
                return;
            }
            let needed = needed.min(self.rooms[depth]);
            self.current[depth] = needed;
            if spent + needed < self.best_total - EPSILON {
                self.record(spent + needed);
            }
            self.current[depth] = 0.0;
            return;
        }

        let room = self.rooms[depth];
        let weight = self.weights[depth];
        for step in 0..=self.steps {
            let increment = room * step as f64 / self.steps as f64;
            self.current[depth] = increment;
            self.descend(depth + 1, spent + increment, remaining - increment * weight);
        }
        self.current[depth] = 0.0;
    }

    fn record(&mut self, total: f64) {
        self.best_total = total;
        self.best = Some(self.current.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_cheapest_mix_on_the_grid() {
        // 0.5 * 6 = 3 beats routing the whole need through the lighter elements.
        let combination =
            cheapest_combination(&[0.5, 0.3, 0.2], &[10.0, 10.0, 15.0], 3.0, 10).expect("found");
        let total: f64 = combination.iter().sum();
        assert!((total - 6.0).abs() < 1e-9, "total was {total}");
        assert!((combination[0] - 6.0).abs() < 1e-9);
    }

    #[test]
    fn last_element_absorbs_exact_residual() {
        let combination =
            cheapest_combination(&[0.2, 0.2, 0.6], &[4.0, 4.0, 2.0], 1.3, 4).expect("found");
        let reached: f64 = combination
            .iter()
            .zip([0.2, 0.2, 0.6])
            .map(|(points, weight)| points * weight)
            .sum();
        assert!(reached >= 1.3 - 1e-9);
        assert!(combination.iter().zip([4.0, 4.0, 2.0]).all(|(p, room)| *p <= room + 1e-9));
    }

    #[test]
    fn unreachable_requirement_yields_none() {
        assert!(cheapest_combination(&[0.3, 0.3, 0.4], &[1.0, 1.0, 1.0], 5.0, 10).is_none());
        assert!(cheapest_combination(&[], &[], 1.0, 10).is_none());
    }
}
