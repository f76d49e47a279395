//! Price series definitions.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::{Date, Symbol};

/// A single closing price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Bar date.
    pub date: Date,
    /// Closing price (split/dividend adjusted where the vendor provides it).
    pub close: f64,
}

impl PricePoint {
    /// Create a new observation.
    #[must_use]
    pub const fn new(date: Date, close: f64) -> Self {
        Self { date, close }
    }
}

/// Date-ordered closing prices for one symbol.
///
/// Points are kept sorted by date with at most one observation per date;
/// when the input repeats a date the later observation wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Symbol the prices belong to.
    pub symbol: Symbol,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Create a series, ordering and de-duplicating the points by date.
    #[must_use]
    pub fn new(symbol: Symbol, mut points: Vec<PricePoint>) -> Self {
        // Stable sort keeps input order among equal dates, so the last one survives dedup.
        points.sort_by_key(|p| p.date);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }
        Self { symbol, points: deduped }
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Observations in date order.
    #[must_use]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Observation dates in order.
    #[must_use]
    pub fn dates(&self) -> Vec<Date> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Closing prices in date order.
    #[must_use]
    pub fn closes(&self) -> Array1<f64> {
        self.points.iter().map(|p| p.close).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn series_sorted_by_date() {
        let series = PriceSeries::new(
            Symbol::new("AAPL"),
            vec![PricePoint::new(d(3), 3.0), PricePoint::new(d(1), 1.0), PricePoint::new(d(2), 2.0)],
        );

        assert_eq!(series.dates(), vec![d(1), d(2), d(3)]);
        assert_eq!(series.closes().to_vec(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn duplicate_dates_keep_last() {
        let series = PriceSeries::new(
            Symbol::new("AAPL"),
            vec![PricePoint::new(d(1), 1.0), PricePoint::new(d(2), 2.0), PricePoint::new(d(2), 2.5)],
        );

        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[1].close, 2.5);
    }

    #[test]
    fn empty_series() {
        let series = PriceSeries::new(Symbol::new("X"), Vec::new());
        assert!(series.is_empty());
        assert!(series.closes().is_empty());
    }
}
