//! End-to-end analysis against a market data provider.

use std::{
    collections::{HashMap, HashSet},
    fmt,
    time::Instant,
};

use capm_primitives::{PriceSeries, Symbol, TickerProfile};
use capm_traits::{MarketDataProvider, ProviderError};

use crate::{AnalysisConfig, AnalysisReport, BetaEstimator, CapmModel, ModelError, ReturnsTable};

/// Step of the run at which a symbol failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueStage {
    /// Fetching the price history.
    PriceHistory,
    /// Fetching vendor metadata.
    Profile,
    /// Estimating the beta.
    Beta,
}

impl fmt::Display for IssueStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PriceHistory => "price history",
            Self::Profile => "profile",
            Self::Beta => "beta",
        })
    }
}

/// A per-symbol failure that was recovered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolIssue {
    /// Symbol.
    pub symbol: Symbol,
    /// Step that failed.
    pub stage: IssueStage,
    /// Failure description.
    pub message: String,
}

impl SymbolIssue {
    /// Create a new issue.
    #[must_use]
    pub fn new(symbol: Symbol, stage: IssueStage, message: impl Into<String>) -> Self {
        Self { symbol, stage, message: message.into() }
    }
}

impl fmt::Display for SymbolIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.symbol, self.stage, self.message)
    }
}

/// Why a run produced no table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoDataReason {
    /// The ticker selection was empty.
    NoTickersSelected,
    /// Every selected symbol failed to fetch.
    NoUsableSymbols,
}

impl fmt::Display for NoDataReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoTickersSelected => "no tickers selected",
            Self::NoUsableSymbols => "no selected ticker returned usable prices",
        })
    }
}

/// Outcome of [`CapmAnalysis::run`].
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    /// Nothing to report; not an error.
    NoData {
        /// Why.
        reason: NoDataReason,
        /// Failures recovered before giving up.
        issues: Vec<SymbolIssue>,
    },
    /// The final table.
    Complete(AnalysisReport),
}

impl AnalysisOutcome {
    /// The report, if the run completed.
    #[must_use]
    pub const fn report(&self) -> Option<&AnalysisReport> {
        match self {
            Self::Complete(report) => Some(report),
            Self::NoData { .. } => None,
        }
    }

    /// Consume the outcome and return the report, if any.
    #[must_use]
    pub fn into_report(self) -> Option<AnalysisReport> {
        match self {
            Self::Complete(report) => Some(report),
            Self::NoData { .. } => None,
        }
    }

    /// Per-symbol failures recovered during the run.
    #[must_use]
    pub fn issues(&self) -> &[SymbolIssue] {
        match self {
            Self::Complete(report) => report.issues(),
            Self::NoData { issues, .. } => issues,
        }
    }

    /// Check if the run produced no table.
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }
}

/// Runs returns-transform, beta, CAPM and the vendor merge for a ticker list.
///
/// Symbols are fetched one at a time. A symbol whose fetch fails is left out
/// and reported as a [`SymbolIssue`]; only a failure on the index aborts the
/// run.
pub struct CapmAnalysis<'a, P: MarketDataProvider + ?Sized> {
    provider: &'a P,
    config: AnalysisConfig,
}

impl<'a, P: MarketDataProvider + ?Sized> CapmAnalysis<'a, P> {
    /// Create an analysis over `provider`.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidConfig` if `config` does not validate.
    pub fn new(provider: &'a P, config: AnalysisConfig) -> Result<Self, ModelError> {
        config.validate()?;
        Ok(Self { provider, config })
    }

    /// Configuration of the analysis.
    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run the analysis for `tickers`.
    ///
    /// The index symbol and repeated symbols in `tickers` are ignored.
    ///
    /// # Errors
    /// Returns `ModelError::IndexUnavailable` if the index history cannot be
    /// fetched, `ModelError::InsufficientData` if it has fewer than two prices,
    /// a non-recoverable provider error, or any failure while combining tables.
    pub fn run(&self, tickers: &[Symbol]) -> Result<AnalysisOutcome, ModelError> {
        let config = &self.config;
        let selected = self.select(tickers);
        if selected.is_empty() {
            log::info!("no tickers selected");
            return Ok(AnalysisOutcome::NoData {
                reason: NoDataReason::NoTickersSelected,
                issues: Vec::new(),
            });
        }

        log::info!(
            "analysing {} tickers against {} ({} {}) via {}",
            selected.len(),
            config.index,
            config.period,
            config.interval,
            self.provider.name()
        );

        let start = Instant::now();
        let index_prices = self
            .provider
            .price_history(&config.index, config.period, config.interval)
            .map_err(|source| ModelError::IndexUnavailable { symbol: config.index.to_string(), source })?;

        let mut issues = Vec::new();
        let assets = self.fetch_prices(&selected, &mut issues)?;
        log::debug!("fetched {} price series in {:?}", assets.len() + 1, start.elapsed());

        if assets.is_empty() {
            log::warn!("none of the {} selected tickers returned usable prices", selected.len());
            return Ok(AnalysisOutcome::NoData { reason: NoDataReason::NoUsableSymbols, issues });
        }

        let start = Instant::now();
        let returns = ReturnsTable::build(config, &index_prices, &assets)?;
        log::debug!("returns table {} built in {:?}", returns.sample(), start.elapsed());

        let start = Instant::now();
        let betas = BetaEstimator::from_config(config).estimate(&returns)?;
        for entry in betas.entries() {
            if let Some(reason) = &entry.reason {
                issues.push(SymbolIssue::new(entry.symbol.clone(), IssueStage::Beta, reason.clone()));
            }
        }
        let capm = CapmModel::from_config(config).estimate(&returns, &betas)?;
        log::debug!("betas and expected returns computed in {:?}", start.elapsed());

        let start = Instant::now();
        let profiles = self.fetch_profiles(&returns.symbols(), &mut issues)?;
        log::debug!("fetched {} profiles in {:?}", profiles.len(), start.elapsed());

        let report = AnalysisReport::assemble(
            config.clone(),
            selected.len(),
            returns,
            betas,
            capm,
            &profiles,
            issues,
        )?;
        log::info!("analysis complete: {} rows, {} issues", report.rows().len(), report.issues().len());

        Ok(AnalysisOutcome::Complete(report))
    }

    /// Tickers in request order without the index and without repeats.
    fn select(&self, tickers: &[Symbol]) -> Vec<Symbol> {
        let mut seen = HashSet::new();
        tickers
            .iter()
            .filter(|symbol| {
                if **symbol == self.config.index {
                    log::info!("{symbol} is the market index, not analysed as a ticker");
                    return false;
                }
                seen.insert(*symbol)
            })
            .cloned()
            .collect()
    }

    fn fetch_prices(
        &self,
        symbols: &[Symbol],
        issues: &mut Vec<SymbolIssue>,
    ) -> Result<Vec<PriceSeries>, ModelError> {
        let mut series = Vec::with_capacity(symbols.len());

        for (i, symbol) in symbols.iter().enumerate() {
            log::info!("[{}/{}] fetching {symbol}", i + 1, symbols.len());
            match self.provider.price_history(symbol, self.config.period, self.config.interval) {
                Ok(prices) if prices.len() < 2 => {
                    log::warn!("skipping {symbol}: {} prices", prices.len());
                    issues.push(SymbolIssue::new(
                        symbol.clone(),
                        IssueStage::PriceHistory,
                        format!("need at least 2 prices, got {}", prices.len()),
                    ));
                }
                Ok(prices) => series.push(prices),
                Err(err) => {
                    Self::recover(symbol, IssueStage::PriceHistory, err, issues)?;
                }
            }
        }

        Ok(series)
    }

    fn fetch_profiles(
        &self,
        symbols: &[Symbol],
        issues: &mut Vec<SymbolIssue>,
    ) -> Result<HashMap<Symbol, TickerProfile>, ModelError> {
        let mut profiles = HashMap::with_capacity(symbols.len());

        for symbol in symbols {
            match self.provider.profile(symbol) {
                Ok(profile) => {
                    profiles.insert(symbol.clone(), profile);
                }
                Err(err) => Self::recover(symbol, IssueStage::Profile, err, issues)?,
            }
        }

        Ok(profiles)
    }

    fn recover(
        symbol: &Symbol,
        stage: IssueStage,
        err: ProviderError,
        issues: &mut Vec<SymbolIssue>,
    ) -> Result<(), ModelError> {
        if !err.is_recoverable() {
            return Err(err.into());
        }
        log::warn!("skipping {stage} for {symbol}: {err}");
        issues.push(SymbolIssue::new(symbol.clone(), stage, err.to_string()));
        Ok(())
    }
}

impl<P: MarketDataProvider + ?Sized> fmt::Debug for CapmAnalysis<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapmAnalysis")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .finish()
    }
}
