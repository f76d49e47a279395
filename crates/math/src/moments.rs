//! Sample moments and the beta ratio.
//!
//! Every second-moment function takes an explicit delta degrees of freedom
//! (`ddof`): the divisor is `n - ddof`, so `0` gives population moments and
//! `1` gives sample moments. Beta divides a covariance by a variance computed
//! with the same `ddof`, which makes the ratio independent of the choice.

use ndarray::Array1;

use crate::MathError;

/// Arithmetic mean.
///
/// # Errors
/// Returns `MathError::EmptyData` for an empty array and
/// `MathError::NumericalInstability` if the result is not finite.
pub fn mean(data: &Array1<f64>) -> Result<f64, MathError> {
    let value = data.mean().ok_or(MathError::EmptyData)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MathError::NumericalInstability(format!("mean is {value}")))
    }
}

/// Variance with `ddof` delta degrees of freedom.
///
/// # Errors
/// Returns `MathError::InsufficientData` if `data.len() <= ddof`.
pub fn variance(data: &Array1<f64>, ddof: u8) -> Result<f64, MathError> {
    covariance(data, data, ddof)
}

/// Covariance of two equally long arrays with `ddof` delta degrees of freedom.
///
/// # Errors
/// Returns `MathError::DimensionMismatch` if the lengths differ and
/// `MathError::InsufficientData` if there are not more than `ddof` observations.
pub fn covariance(x: &Array1<f64>, y: &Array1<f64>, ddof: u8) -> Result<f64, MathError> {
    if x.len() != y.len() {
        return Err(MathError::DimensionMismatch { expected: x.len(), actual: y.len() });
    }
    if x.is_empty() {
        return Err(MathError::EmptyData);
    }

    let n = x.len();
    let ddof = usize::from(ddof);
    if n <= ddof {
        return Err(MathError::InsufficientData { required: ddof + 1, actual: n });
    }

    let mean_x = mean(x)?;
    let mean_y = mean(y)?;
    let cross: f64 = x.iter().zip(y.iter()).map(|(a, b)| (a - mean_x) * (b - mean_y)).sum();

    Ok(cross / (n - ddof) as f64)
}

/// Beta of `asset` against `market`: `Cov(asset, market) / Var(market)`.
///
/// # Errors
/// Returns `MathError::InsufficientData` with fewer than two observations,
/// `MathError::ZeroVariance` if the market series is constant, and the
/// errors of [`covariance`] otherwise.
pub fn beta(asset: &Array1<f64>, market: &Array1<f64>, ddof: u8) -> Result<f64, MathError> {
    if market.len() < 2 {
        return Err(MathError::InsufficientData { required: 2, actual: market.len() });
    }

    let cov = covariance(asset, market, ddof)?;
    let var = variance(market, ddof)?;

    // Constant series leave rounding residue in the deviations, never exact zero.
    if var <= f64::EPSILON * f64::EPSILON {
        return Err(MathError::ZeroVariance);
    }

    let ratio = cov / var;
    if ratio.is_finite() {
        Ok(ratio)
    } else {
        Err(MathError::NumericalInstability(format!("beta is {ratio}")))
    }
}
