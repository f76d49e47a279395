//! Period-over-period returns.

use ndarray::Array1;

/// Simple returns `(p[t] - p[t-1]) / p[t-1]` for consecutive prices.
///
/// The result has one element fewer than the input; the missing leading
/// value is dropped rather than filled. A zero or NaN previous price yields a
/// non-finite element, which callers are expected to filter.
#[must_use]
pub fn pct_change(prices: &Array1<f64>) -> Array1<f64> {
    if prices.len() < 2 {
        return Array1::zeros(0);
    }

    prices.windows(2).into_iter().map(|w| (w[1] - w[0]) / w[0]).collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;

    use super::*;

    #[test]
    fn pct_change_basic() {
        let returns = pct_change(&array![100.0, 110.0, 99.0]);
        assert_eq!(returns.len(), 2);
        assert_relative_eq!(returns[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(returns[1], -0.1, epsilon = 1e-12);
    }

    #[test]
    fn pct_change_short_input() {
        assert!(pct_change(&array![]).is_empty());
        assert!(pct_change(&array![42.0]).is_empty());
    }

    #[test]
    fn pct_change_zero_price_is_not_finite() {
        let returns = pct_change(&array![0.0, 1.0, 2.0]);
        assert!(!returns[0].is_finite());
        assert_relative_eq!(returns[1], 1.0);
    }

    #[test]
    fn pct_change_is_deterministic() {
        let prices = array![10.0, 10.5, 9.8, 11.2];
        assert_eq!(pct_change(&prices), pct_change(&prices));
    }
}
