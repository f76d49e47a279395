//! Yahoo Finance provider.

use std::{fmt, sync::Mutex};

use capm_primitives::{Interval, Period, PriceSeries, Symbol, TickerProfile};
use capm_traits::{MarketDataProvider, ProviderError};
use time::OffsetDateTime;
use tokio::runtime::{Builder, Runtime};
use yahoo_finance_api as yahoo;

use crate::{history_window, series_from_bars};

/// Blocking [`MarketDataProvider`] over the Yahoo Finance API.
pub struct YahooProvider {
    connector: Mutex<yahoo::YahooConnector>,
    runtime: Runtime,
}

impl YahooProvider {
    /// Create a provider with its own single-threaded runtime.
    ///
    /// # Errors
    /// Returns `ProviderError::Init` if the HTTP client or runtime cannot be built.
    pub fn new() -> Result<Self, ProviderError> {
        let connector = yahoo::YahooConnector::new().map_err(|e| ProviderError::Init(e.to_string()))?;
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ProviderError::Init(e.to_string()))?;
        Ok(Self { connector: Mutex::new(connector), runtime })
    }

    fn request_error(symbol: &Symbol, err: impl fmt::Display) -> ProviderError {
        ProviderError::Request { symbol: symbol.to_string(), message: err.to_string() }
    }
}

impl MarketDataProvider for YahooProvider {
    fn price_history(
        &self,
        symbol: &Symbol,
        period: Period,
        interval: Interval,
    ) -> Result<PriceSeries, ProviderError> {
        let (start, end) = history_window(period, OffsetDateTime::now_utc());
        let connector =
            self.connector.lock().map_err(|_| ProviderError::Init("connector lock poisoned".to_string()))?;

        log::debug!("requesting {symbol} {period}/{interval} from Yahoo");
        let response = self
            .runtime
            .block_on(connector.get_quote_history_interval(symbol.as_str(), start, end, interval.as_str()))
            .map_err(|e| Self::request_error(symbol, e))?;

        let quotes = response.quotes().map_err(|e| ProviderError::Malformed {
            symbol: symbol.to_string(),
            message: e.to_string(),
        })?;

        series_from_bars(symbol, quotes.iter().map(|q| (q.timestamp as i64, q.adjclose)))
    }

    fn profile(&self, symbol: &Symbol) -> Result<TickerProfile, ProviderError> {
        let mut connector =
            self.connector.lock().map_err(|_| ProviderError::Init("connector lock poisoned".to_string()))?;

        let summary = self
            .runtime
            .block_on(connector.get_ticker_info(symbol.as_str()))
            .map_err(|e| Self::request_error(symbol, e))?;

        let detail = summary
            .quote_summary
            .and_then(|q| q.result)
            .and_then(|results| results.into_iter().next())
            .and_then(|data| data.summary_detail)
            .ok_or_else(|| ProviderError::NoData(symbol.to_string()))?;

        Ok(TickerProfile::new(detail.beta, detail.market_cap.map(|cap| cap as f64)))
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

impl fmt::Debug for YahooProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YahooProvider").finish_non_exhaustive()
    }
}
