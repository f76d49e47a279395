//! Conversion of vendor bars to price series.

use capm_primitives::{Date, Period, PricePoint, PriceSeries, Symbol};
use capm_traits::ProviderError;
use time::{Duration, OffsetDateTime};

/// Start and end of the history request for `period`, ending at `end`.
#[must_use]
pub fn history_window(period: Period, end: OffsetDateTime) -> (OffsetDateTime, OffsetDateTime) {
    let days = 365 * i64::from(period.years()) + i64::from(period.years() / 4);
    (end - Duration::days(days), end)
}

/// Build a price series from `(unix timestamp, close)` bars.
///
/// Bars with a non-positive or non-finite close, or an out-of-range
/// timestamp, are skipped.
///
/// # Errors
/// Returns `ProviderError::NoData` if no bar is usable.
pub fn series_from_bars(
    symbol: &Symbol,
    bars: impl IntoIterator<Item = (i64, f64)>,
) -> Result<PriceSeries, ProviderError> {
    let points: Vec<PricePoint> = bars
        .into_iter()
        .filter(|(_, close)| close.is_finite() && *close > 0.0)
        .filter_map(|(ts, close)| bar_date(ts).map(|date| PricePoint::new(date, close)))
        .collect();

    if points.is_empty() {
        return Err(ProviderError::NoData(symbol.to_string()));
    }
    Ok(PriceSeries::new(symbol.clone(), points))
}

fn bar_date(timestamp: i64) -> Option<Date> {
    chrono::DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive())
}
