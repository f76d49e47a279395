//! Rate conversion and rounding.

/// Convert an annual compounded rate to the equivalent rate per period.
///
/// `(1 + annual)^(1 / periods_per_year) - 1`
#[must_use]
pub fn periodic_rate(annual: f64, periods_per_year: u32) -> f64 {
    if periods_per_year == 0 {
        return annual;
    }
    (1.0 + annual).powf(1.0 / f64::from(periods_per_year)) - 1.0
}

/// Round to `decimals` places, halves to even (as `numpy.round` does).
#[must_use]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round_ties_even() / factor
}
