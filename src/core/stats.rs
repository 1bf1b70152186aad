//! Null-aware weighted statistics.
//!
//! Missing inputs are skipped, never treated as zero. Ratios with an empty or
//! zero denominator are `None`, which callers must keep distinct from `0.0`.

/// Running Σ(value·weight) and Σ(weight).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightedMean {
    weighted_sum: f64,
    weight_sum: f64,
}

impl WeightedMean {
    /// Adds a pair; ignored when either side is missing.
    pub fn push(&mut self, value: Option<f64>, weight: Option<f64>) {
        if let (Some(value), Some(weight)) = (value, weight) {
            self.weighted_sum += value * weight;
            self.weight_sum += weight;
        }
    }

    pub fn value(&self) -> Option<f64> {
        (self.weight_sum != 0.0).then(|| self.weighted_sum / self.weight_sum)
    }
}

/// Running arithmetic mean over present values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    pub fn push(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.sum += value;
            self.count += 1;
        }
    }

    pub fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Σ(value·weight)/Σ(weight) over paired sequences.
///
/// Pairs with a missing side are skipped. Returns `None` for empty input or a
/// zero weight sum.
pub fn weighted_average<V, W>(values: V, weights: W) -> Option<f64>
where
    V: IntoIterator,
    V::Item: Into<Option<f64>>,
    W: IntoIterator,
    W::Item: Into<Option<f64>>,
{
    let mut acc = WeightedMean::default();
    for (value, weight) in values.into_iter().zip(weights) {
        acc.push(value.into(), weight.into());
    }
    acc.value()
}

/// Share of total weight carried by the items satisfying `predicate`.
///
/// Missing weights are skipped. Returns `None` when the total weight is zero.
pub fn weighted_share<T, I, W, P>(items: I, weight: W, predicate: P) -> Option<f64>
where
    I: IntoIterator<Item = T>,
    W: Fn(&T) -> Option<f64>,
    P: Fn(&T) -> bool,
{
    let mut selected = 0.0;
    let mut total = 0.0;
    for item in items {
        if let Some(w) = weight(&item) {
            total += w;
            if predicate(&item) {
                selected += w;
            }
        }
    }
    (total != 0.0).then(|| selected / total)
}

/// Sum of present values; zero when none are present.
pub fn sum_present<I>(values: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    values.into_iter().flatten().sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_average_of_equal_values() {
        assert_eq!(weighted_average([5.0, 5.0, 5.0], [1.0, 1.0, 1.0]), Some(5.0));
    }

    #[test]
    fn test_weighted_average_uneven_weights() {
        assert_eq!(weighted_average([10.0, 20.0], [1.0, 3.0]), Some(17.5));
    }

    #[test]
    fn test_zero_weights_are_undefined_not_zero() {
        assert_eq!(weighted_average([3.0, 4.0], [0.0, 0.0]), None);
    }

    #[test]
    fn test_empty_input_is_undefined() {
        assert_eq!(weighted_average(Vec::<f64>::new(), Vec::<f64>::new()), None);
    }

    #[test]
    fn test_true_zero_average_is_defined() {
        assert_eq!(weighted_average([0.0, 0.0], [1.0, 2.0]), Some(0.0));
    }

    #[test]
    fn test_missing_pairs_are_skipped() {
        let values = [Some(10.0), None, Some(20.0), Some(99.0)];
        let weights = [Some(1.0), Some(5.0), Some(3.0), None];
        assert_eq!(weighted_average(values, weights), Some(17.5));
    }

    #[test]
    fn test_all_pairs_missing_is_undefined() {
        let values = [None, Some(1.0)];
        let weights = [Some(1.0), None];
        assert_eq!(weighted_average(values, weights), None);
    }

    #[test]
    fn test_weighted_share() {
        let items = [(10.0, true), (20.0, false), (15.0, true)];
        let share = weighted_share(items, |(w, _)| Some(*w), |(_, fta)| *fta).unwrap();
        assert!((share - 25.0 / 45.0).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_share_zero_total_is_undefined() {
        let items = [(0.0, true), (0.0, false)];
        assert_eq!(weighted_share(items, |(w, _)| Some(*w), |(_, f)| *f), None);
        assert_eq!(
            weighted_share(Vec::<(f64, bool)>::new(), |(w, _)| Some(*w), |(_, f)| *f),
            None
        );
    }

    #[test]
    fn test_mean_skips_missing() {
        let mut mean = Mean::default();
        assert_eq!(mean.value(), None);
        mean.push(Some(100.0));
        mean.push(None);
        mean.push(Some(110.0));
        assert_eq!(mean.value(), Some(105.0));
    }

    #[test]
    fn test_sum_present() {
        assert_eq!(sum_present([Some(2.0), None, Some(4.0)]), 6.0);
        assert_eq!(sum_present([None, None]), 0.0);
    }
}
