//! CSV export and reload of analysis tables.

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use capm_model::{AnalysisConfig, AnalysisReport, ReturnsTable};
use polars::prelude::*;

use crate::UtilsError;

/// File name of an exported returns table,
/// `returns_<index>_<n>_tickers_<period>_<interval>.csv`.
#[must_use]
pub fn returns_file_name(config: &AnalysisConfig, tickers: usize) -> String {
    format!("returns_{}_{tickers}_tickers_{}_{}.csv", config.index, config.period, config.interval)
}

/// File name of an exported final table,
/// `all_info_<index>_<n>_tickers_<period>_<interval>.csv`.
#[must_use]
pub fn report_file_name(config: &AnalysisConfig, tickers: usize) -> String {
    format!("all_info_{}_{tickers}_tickers_{}_{}.csv", config.index, config.period, config.interval)
}

fn write_frame(frame: &DataFrame, path: &Path) -> Result<(), UtilsError> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(&mut frame.clone())?;
    log::info!("wrote {} rows to {}", frame.height(), path.display());
    Ok(())
}

/// Write a returns table to `path`: a `date` column, the index column, then
/// one column per symbol. Missing returns are written as empty cells.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_returns_csv(table: &ReturnsTable, path: impl AsRef<Path>) -> Result<(), UtilsError> {
    write_frame(table.frame(), path.as_ref())
}

/// Reload a returns table written by [`write_returns_csv`].
///
/// The index, period and interval of `config` identify the sample.
///
/// # Errors
/// Returns an error if the file cannot be read or lacks the date or index column.
pub fn read_returns_csv(path: impl AsRef<Path>, config: &AnalysisConfig) -> Result<ReturnsTable, UtilsError> {
    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_try_parse_dates(true))
        .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
        .finish()?;

    Ok(ReturnsTable::from_frame(config.index.clone(), config.period, config.interval, frame)?)
}

/// Write the final table of a report to `path`.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_report_csv(report: &AnalysisReport, path: impl AsRef<Path>) -> Result<(), UtilsError> {
    write_frame(&report.to_frame()?, path.as_ref())
}

/// Write both tables of a report into `dir` under their standard names.
///
/// Returns the paths of the returns file and the final-table file.
///
/// # Errors
/// Returns an error if either file cannot be written.
pub fn export_report(report: &AnalysisReport, dir: impl AsRef<Path>) -> Result<(PathBuf, PathBuf), UtilsError> {
    let dir = dir.as_ref();
    let returns_path = dir.join(returns_file_name(report.config(), report.requested()));
    let report_path = dir.join(report_file_name(report.config(), report.requested()));

    write_returns_csv(report.returns(), &returns_path)?;
    write_report_csv(report, &report_path)?;
    Ok((returns_path, report_path))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use capm_model::{BetaEstimator, CapmModel, SymbolIssue};
    use capm_primitives::{Date, Interval, Period, PricePoint, PriceSeries, Symbol};

    use super::*;

    fn series(symbol: &str, first_month: u32, closes: &[f64]) -> PriceSeries {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                PricePoint::new(Date::from_ymd_opt(2024, first_month + i as u32, 1).unwrap(), c)
            })
            .collect();
        PriceSeries::new(Symbol::new(symbol), points)
    }

    fn returns(config: &AnalysisConfig) -> ReturnsTable {
        let index = series("^GSPC", 1, &[100.0, 102.0, 100.98, 102.4947, 103.0071735]);
        let assets = [
            series("AAPL", 1, &[180.0, 185.3, 179.9, 188.1, 190.7]),
            // Listed a month late: the first row is empty.
            series("NEW", 2, &[10.0, 10.7, 10.4, 10.9]),
        ];
        ReturnsTable::build(config, &index, &assets).unwrap()
    }

    #[test]
    fn file_names_follow_run_parameters() {
        let config = AnalysisConfig::default();
        assert_eq!(returns_file_name(&config, 30), "returns_^GSPC_30_tickers_5y_1mo.csv");
        assert_eq!(report_file_name(&config, 30), "all_info_^GSPC_30_tickers_5y_1mo.csv");

        let config = config.with_period(Period::OneYear).with_interval(Interval::Daily);
        assert_eq!(returns_file_name(&config, 2), "returns_^GSPC_2_tickers_1y_1d.csv");
    }

    #[test]
    fn returns_csv_round_trip() {
        let config = AnalysisConfig::default();
        let table = returns(&config);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(returns_file_name(&config, 2));

        write_returns_csv(&table, &path).unwrap();
        let reloaded = read_returns_csv(&path, &config).unwrap();

        assert_eq!(reloaded.sample(), table.sample());
        assert_eq!(reloaded.symbols(), table.symbols());
        assert_eq!(reloaded.dates().unwrap(), table.dates().unwrap());

        for symbol in table.symbols() {
            let before = table.column(&symbol).unwrap();
            let after = reloaded.column(&symbol).unwrap();
            assert_eq!(before.len(), after.len());
            for (b, a) in before.iter().zip(&after) {
                match (b, a) {
                    (Some(b), Some(a)) => assert_relative_eq!(*b, *a, epsilon = 1e-12),
                    (None, None) => {}
                    _ => panic!("null mismatch for {symbol}: {b:?} vs {a:?}"),
                }
            }
        }
    }

    #[test]
    fn reloaded_table_reproduces_betas() {
        let config = AnalysisConfig::default();
        let table = returns(&config);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("returns.csv");

        write_returns_csv(&table, &path).unwrap();
        let reloaded = read_returns_csv(&path, &config).unwrap();

        let estimator = BetaEstimator::from_config(&config);
        let betas = estimator.estimate(&reloaded).unwrap();
        assert_eq!(estimator.estimate(&table).unwrap().entries(), betas.entries());
        // The late listing keeps its gap after the reload.
        assert_eq!(betas.get(&Symbol::new("NEW")), None);
        assert!(betas.get(&Symbol::new("AAPL")).is_some());
    }

    #[test]
    fn report_export_writes_both_files() {
        let config = AnalysisConfig::default();
        let table = returns(&config);
        let betas = BetaEstimator::from_config(&config).estimate(&table).unwrap();
        let capm = CapmModel::from_config(&config).estimate(&table, &betas).unwrap();
        let issues = vec![SymbolIssue::new(
            Symbol::new("XYZ"),
            capm_model::IssueStage::PriceHistory,
            "no data returned for XYZ",
        )];
        let report = AnalysisReport::assemble(
            config,
            3,
            table,
            betas,
            capm,
            &std::collections::HashMap::new(),
            issues,
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let (returns_path, report_path) = export_report(&report, dir.path()).unwrap();

        assert!(returns_path.ends_with("returns_^GSPC_3_tickers_5y_1mo.csv"));
        assert!(report_path.ends_with("all_info_^GSPC_3_tickers_5y_1mo.csv"));

        let content = std::fs::read_to_string(&report_path).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(
            header,
            "Ticker,Expected Monthly Returns (%),Beta 5y 1mo,Beta (vendor-reported),Market Cap (in $B)"
        );
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn read_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_returns_csv(dir.path().join("absent.csv"), &AnalysisConfig::default());
        assert!(result.is_err());
    }
}
