//! Returns-transform: price series to an aligned returns table.

use std::{
    collections::HashSet,
    fmt,
    hash::{DefaultHasher, Hash, Hasher},
};

use capm_math::pct_change;
use capm_primitives::{Date, Interval, Period, PriceSeries, Symbol};
use ndarray::Array1;
use polars::prelude::*;
use serde::Serialize;

use crate::{AnalysisConfig, ModelError};

/// Name of the date column of a returns table.
pub const DATE_COLUMN: &str = "date";

/// Identity of a returns-table snapshot.
///
/// Derived tables carry the key of the sample they were computed from so
/// that tables from different samples are never combined. Two fetches with
/// the same settings and dates but different prices get different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SampleKey {
    /// Market index symbol.
    pub index: Symbol,
    /// History window.
    pub period: Period,
    /// Sampling interval.
    pub interval: Interval,
    /// Number of rows (index periods).
    pub observations: usize,
    /// First row date.
    pub first: Option<Date>,
    /// Last row date.
    pub last: Option<Date>,
    /// Hash of the dates, column names and return values.
    pub fingerprint: u64,
}

impl fmt::Display for SampleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{} n={}", self.index, self.period, self.interval, self.observations)?;
        if let (Some(first), Some(last)) = (self.first, self.last) {
            write!(f, " [{first}..{last}]")?;
        }
        write!(f, " #{:016x}", self.fingerprint)
    }
}

/// Period returns of the market index and the selected symbols, keyed by date.
///
/// Layout: a `date` column, the index column, then one column per symbol in
/// insertion order. Columns are named by the bare symbol. The index's dates
/// define the rows; a symbol without data for a date holds null there.
#[derive(Debug, Clone)]
pub struct ReturnsTable {
    sample: SampleKey,
    frame: DataFrame,
}

impl ReturnsTable {
    /// Build the table from the index prices and the prices of each symbol.
    ///
    /// Symbols equal to the index, or repeated, are skipped.
    ///
    /// # Errors
    /// Returns `ModelError::InsufficientData` if the index has fewer than two
    /// prices, or a polars error if the join fails.
    pub fn build(
        config: &AnalysisConfig,
        index_prices: &PriceSeries,
        assets: &[PriceSeries],
    ) -> Result<Self, ModelError> {
        if index_prices.len() < 2 {
            return Err(ModelError::InsufficientData {
                symbol: config.index.to_string(),
                required: 2,
                actual: index_prices.len(),
            });
        }

        let mut seen: HashSet<&Symbol> = HashSet::from([&config.index]);
        let mut lf = returns_frame(&config.index, index_prices)?.lazy();

        for prices in assets {
            if !seen.insert(&prices.symbol) {
                log::debug!("skipping duplicate or index column {}", prices.symbol);
                continue;
            }
            lf = lf.join(
                returns_frame(&prices.symbol, prices)?.lazy(),
                [col(DATE_COLUMN)],
                [col(DATE_COLUMN)],
                JoinArgs::new(JoinType::Left),
            );
        }

        let frame = lf.sort([DATE_COLUMN], SortMultipleOptions::default()).collect()?;
        Self::with_frame(config.index.clone(), config.period, config.interval, frame)
    }

    /// Wrap an existing frame, e.g. one reloaded from CSV.
    ///
    /// The `date` column is cast to a date, every other column to `f64`
    /// (unparseable cells become null), and rows are sorted by date.
    ///
    /// # Errors
    /// Returns `ModelError::MissingColumn` if the date or index column is absent.
    pub fn from_frame(
        index: Symbol,
        period: Period,
        interval: Interval,
        frame: DataFrame,
    ) -> Result<Self, ModelError> {
        let names: Vec<String> = frame.get_column_names().iter().map(|s| s.to_string()).collect();
        if !names.iter().any(|n| n == DATE_COLUMN) {
            return Err(ModelError::MissingColumn(DATE_COLUMN.to_string()));
        }
        if !names.iter().any(|n| n == index.as_str()) {
            return Err(ModelError::MissingColumn(index.to_string()));
        }

        let casts: Vec<Expr> = names
            .iter()
            .map(|name| {
                let dtype = if name == DATE_COLUMN { DataType::Date } else { DataType::Float64 };
                col(name.as_str()).cast(dtype)
            })
            .collect();

        let frame = frame
            .lazy()
            .with_columns(casts)
            .sort([DATE_COLUMN], SortMultipleOptions::default())
            .collect()?;

        Self::with_frame(index, period, interval, frame)
    }

    fn with_frame(
        index: Symbol,
        period: Period,
        interval: Interval,
        frame: DataFrame,
    ) -> Result<Self, ModelError> {
        let dates = column_dates(&frame)?;
        let sample = SampleKey {
            index,
            period,
            interval,
            observations: frame.height(),
            first: dates.first().copied(),
            last: dates.last().copied(),
            fingerprint: fingerprint(&frame, &dates)?,
        };
        Ok(Self { sample, frame })
    }

    /// Identity of this snapshot.
    #[must_use]
    pub const fn sample(&self) -> &SampleKey {
        &self.sample
    }

    /// Market index symbol.
    #[must_use]
    pub const fn index(&self) -> &Symbol {
        &self.sample.index
    }

    /// The underlying frame.
    #[must_use]
    pub const fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Number of rows (index periods).
    #[must_use]
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Symbols with a column in the table, excluding the index, in column order.
    #[must_use]
    pub fn symbols(&self) -> Vec<Symbol> {
        self.frame
            .get_column_names()
            .iter()
            .filter(|name| name.as_str() != DATE_COLUMN && name.as_str() != self.index().as_str())
            .map(|name| Symbol::new(name.as_str()))
            .collect()
    }

    /// Whether the table has no symbol columns.
    #[must_use]
    pub fn has_no_symbols(&self) -> bool {
        self.frame.width() <= 2
    }

    /// Row dates in order.
    ///
    /// # Errors
    /// Returns an error if the date column is missing or not a date.
    pub fn dates(&self) -> Result<Vec<Date>, ModelError> {
        column_dates(&self.frame)
    }

    /// Returns of one column, null where the symbol had no data.
    ///
    /// # Errors
    /// Returns `ModelError::MissingColumn` if the symbol has no column.
    pub fn column(&self, symbol: &Symbol) -> Result<Vec<Option<f64>>, ModelError> {
        let values = self
            .frame
            .column(symbol.as_str())
            .map_err(|_| ModelError::MissingColumn(symbol.to_string()))?
            .f64()?
            .into_iter()
            .collect();
        Ok(values)
    }

    /// Non-null index returns.
    ///
    /// # Errors
    /// Returns `ModelError::MissingColumn` if the index column is absent.
    pub fn market_returns(&self) -> Result<Array1<f64>, ModelError> {
        Ok(self.column(self.index())?.into_iter().flatten().collect())
    }

    /// Asset and index returns over every row of the table.
    ///
    /// Rows are never dropped per symbol: a symbol without a return on some
    /// index period has no complete sample against the index.
    ///
    /// # Errors
    /// Returns `ModelError::MissingColumn` if either column is absent and
    /// `ModelError::MissingReturns` if the symbol has a gap.
    pub fn aligned(&self, symbol: &Symbol) -> Result<(Array1<f64>, Array1<f64>), ModelError> {
        let asset = self.column(symbol)?;
        let market = self.column(self.index())?;

        let missing = asset
            .iter()
            .zip(&market)
            .filter(|pair| !matches!(pair, (Some(a), Some(m)) if a.is_finite() && m.is_finite()))
            .count();
        if missing > 0 {
            return Err(ModelError::MissingReturns {
                symbol: symbol.to_string(),
                missing,
                rows: asset.len(),
            });
        }

        Ok((asset.into_iter().flatten().collect(), market.into_iter().flatten().collect()))
    }

    /// Whether two tables hold the same sample and the same values.
    #[must_use]
    pub fn same_data(&self, other: &Self) -> bool {
        self.sample == other.sample && self.frame.equals_missing(&other.frame)
    }
}

/// Two-column frame `date | <symbol>` of period returns, leading and
/// non-finite values dropped.
fn returns_frame(symbol: &Symbol, prices: &PriceSeries) -> Result<DataFrame, ModelError> {
    let returns = pct_change(&prices.closes());
    let (dates, values): (Vec<Date>, Vec<f64>) = prices
        .dates()
        .into_iter()
        .skip(1)
        .zip(returns)
        .filter(|(_, r)| r.is_finite())
        .unzip();

    let frame = DataFrame::new(vec![
        Column::new(DATE_COLUMN.into(), dates),
        Column::new(symbol.as_str().into(), values),
    ])?;
    Ok(frame)
}

fn column_dates(frame: &DataFrame) -> Result<Vec<Date>, ModelError> {
    let column = frame
        .column(DATE_COLUMN)
        .map_err(|_| ModelError::MissingColumn(DATE_COLUMN.to_string()))?;
    Ok(column.as_materialized_series().date()?.as_date_iter().flatten().collect())
}

/// Content hash of a returns frame. Floats are hashed by bit pattern, nulls
/// by a marker, so a table reloaded from its own CSV hashes the same.
fn fingerprint(frame: &DataFrame, dates: &[Date]) -> Result<u64, ModelError> {
    let mut hasher = DefaultHasher::new();
    dates.hash(&mut hasher);

    for column in frame.get_columns() {
        if column.name().as_str() == DATE_COLUMN {
            continue;
        }
        column.name().as_str().hash(&mut hasher);
        for value in column.f64()? {
            value.map(f64::to_bits).hash(&mut hasher);
        }
    }

    Ok(hasher.finish())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use capm_primitives::PricePoint;

    use super::*;

    fn month(m: u32) -> Date {
        Date::from_ymd_opt(2024, m, 1).unwrap()
    }

    fn series(symbol: &str, months: &[u32], closes: &[f64]) -> PriceSeries {
        let points = months.iter().zip(closes).map(|(&m, &c)| PricePoint::new(month(m), c)).collect();
        PriceSeries::new(Symbol::new(symbol), points)
    }

    fn config() -> AnalysisConfig {
        AnalysisConfig::default()
    }

    #[test]
    fn build_drops_leading_value() {
        let index = series("^GSPC", &[1, 2, 3], &[100.0, 110.0, 99.0]);
        let table = ReturnsTable::build(&config(), &index, &[]).unwrap();

        assert_eq!(table.height(), 2);
        assert_eq!(table.dates().unwrap(), vec![month(2), month(3)]);
        let market = table.market_returns().unwrap();
        assert_relative_eq!(market[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(market[1], -0.1, epsilon = 1e-12);
        assert!(table.has_no_symbols());
    }

    #[test]
    fn index_dates_define_rows() {
        let index = series("^GSPC", &[1, 2, 3, 4], &[100.0, 101.0, 102.0, 103.0]);
        // Starts a month late: no return for February.
        let late = series("NEW", &[2, 3, 4], &[10.0, 11.0, 12.1]);
        // Has an extra date the index does not.
        let extra = series("OLD", &[1, 2, 3, 4, 5], &[5.0, 5.5, 6.05, 6.655, 7.0]);

        let table = ReturnsTable::build(&config(), &index, &[late, extra]).unwrap();

        assert_eq!(table.height(), 3);
        assert_eq!(table.symbols(), vec![Symbol::new("NEW"), Symbol::new("OLD")]);

        let new = table.column(&Symbol::new("NEW")).unwrap();
        assert_eq!(new[0], None);
        assert_relative_eq!(new[1].unwrap(), 0.1, epsilon = 1e-12);

        let old = table.column(&Symbol::new("OLD")).unwrap();
        assert!(old.iter().all(Option::is_some));
    }

    #[test]
    fn aligned_rejects_missing_rows() {
        let index = series("^GSPC", &[1, 2, 3, 4], &[100.0, 101.0, 102.0, 103.0]);
        let late = series("NEW", &[2, 3, 4], &[10.0, 11.0, 12.1]);
        let full = series("OLD", &[1, 2, 3, 4], &[5.0, 5.5, 5.0, 5.5]);
        let table = ReturnsTable::build(&config(), &index, &[late, full]).unwrap();

        let err = table.aligned(&Symbol::new("NEW")).unwrap_err();
        assert!(matches!(err, ModelError::MissingReturns { missing: 1, rows: 3, .. }));

        let (asset, market) = table.aligned(&Symbol::new("OLD")).unwrap();
        assert_eq!(asset.len(), 3);
        assert_eq!(market.len(), 3);
        assert_relative_eq!(market[0], 101.0 / 100.0 - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn index_and_duplicates_skipped() {
        let index = series("^GSPC", &[1, 2, 3], &[100.0, 110.0, 99.0]);
        let a = series("AAPL", &[1, 2, 3], &[1.0, 2.0, 3.0]);
        let table =
            ReturnsTable::build(&config(), &index, &[index.clone(), a.clone(), a]).unwrap();

        assert_eq!(table.symbols(), vec![Symbol::new("AAPL")]);
        assert_eq!(table.frame().width(), 3);
    }

    #[test]
    fn zero_price_return_dropped() {
        let index = series("^GSPC", &[1, 2, 3], &[100.0, 110.0, 99.0]);
        let broken = series("BRK", &[1, 2, 3], &[0.0, 1.0, 2.0]);
        let table = ReturnsTable::build(&config(), &index, &[broken]).unwrap();

        let values = table.column(&Symbol::new("BRK")).unwrap();
        assert_eq!(values[0], None);
        assert_relative_eq!(values[1].unwrap(), 1.0);
    }

    #[test]
    fn short_index_is_error() {
        let index = series("^GSPC", &[1], &[100.0]);
        let err = ReturnsTable::build(&config(), &index, &[]).unwrap_err();
        assert!(matches!(err, ModelError::InsufficientData { required: 2, actual: 1, .. }));
    }

    #[test]
    fn build_is_idempotent() {
        let index = series("^GSPC", &[1, 2, 3, 4], &[100.0, 102.0, 101.0, 104.0]);
        let assets = vec![
            series("AAPL", &[1, 2, 3, 4], &[10.0, 10.4, 10.1, 10.9]),
            series("MSFT", &[2, 3, 4], &[20.0, 19.0, 21.0]),
        ];

        let first = ReturnsTable::build(&config(), &index, &assets).unwrap();
        let second = ReturnsTable::build(&config(), &index, &assets).unwrap();
        assert!(first.same_data(&second));
    }

    #[test]
    fn sample_key_describes_snapshot() {
        let index = series("^GSPC", &[1, 2, 3], &[100.0, 110.0, 99.0]);
        let table = ReturnsTable::build(&config(), &index, &[]).unwrap();

        let key = table.sample();
        assert_eq!(key.observations, 2);
        assert_eq!(key.first, Some(month(2)));
        assert_eq!(key.last, Some(month(3)));
        assert!(key.to_string().starts_with("^GSPC 5y/1mo n=2 [2024-02-01..2024-03-01] #"));
    }

    #[test]
    fn sample_key_tracks_prices() {
        let config = config();
        let first = series("^GSPC", &[1, 2, 3], &[100.0, 110.0, 99.0]);
        let refetched = series("^GSPC", &[1, 2, 3], &[100.0, 105.0, 99.0]);
        let asset = series("AAPL", &[1, 2, 3], &[10.0, 11.0, 12.0]);

        let a = ReturnsTable::build(&config, &first, &[asset.clone()]).unwrap();
        let b = ReturnsTable::build(&config, &refetched, &[asset.clone()]).unwrap();
        let again = ReturnsTable::build(&config, &first, &[asset]).unwrap();

        assert_eq!(a.sample().first, b.sample().first);
        assert_eq!(a.sample().observations, b.sample().observations);
        assert_ne!(a.sample(), b.sample());
        assert!(!a.same_data(&b));
        assert_eq!(a.sample(), again.sample());
    }

    #[test]
    fn from_frame_requires_index_column() {
        let frame = DataFrame::new(vec![
            Column::new(DATE_COLUMN.into(), vec![month(1)]),
            Column::new("AAPL".into(), vec![0.1]),
        ])
        .unwrap();

        let err = ReturnsTable::from_frame(Symbol::new("^GSPC"), Period::FiveYears, Interval::Monthly, frame)
            .unwrap_err();
        assert!(matches!(err, ModelError::MissingColumn(c) if c == "^GSPC"));
    }

    #[test]
    fn missing_column_lookup() {
        let index = series("^GSPC", &[1, 2, 3], &[100.0, 110.0, 99.0]);
        let table = ReturnsTable::build(&config(), &index, &[]).unwrap();
        assert!(matches!(table.column(&Symbol::new("NOPE")), Err(ModelError::MissingColumn(_))));
    }
}
