//! Market data provider trait definitions.

use capm_primitives::{Interval, Period, PriceSeries, Symbol, TickerProfile};

/// Errors reported by a market data provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The request to the vendor failed (network, HTTP status, rate limit).
    #[error("request for {symbol} failed: {message}")]
    Request {
        /// Symbol being requested.
        symbol: String,
        /// Vendor error message.
        message: String,
    },

    /// The vendor answered but had no data for the symbol.
    #[error("no data returned for {0}")]
    NoData(String),

    /// The vendor response could not be interpreted.
    #[error("malformed response for {symbol}: {message}")]
    Malformed {
        /// Symbol being requested.
        symbol: String,
        /// Description of the problem.
        message: String,
    },

    /// The provider could not be set up.
    #[error("provider initialisation failed: {0}")]
    Init(String),
}

impl ProviderError {
    /// Returns whether the failure only affects the requested symbol.
    ///
    /// Recoverable failures drop the symbol from a batch; the others abort it.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Request { .. } | Self::NoData(_) | Self::Malformed { .. })
    }
}

/// Source of historical prices and vendor metadata.
///
/// Calls are blocking and made one symbol at a time.
pub trait MarketDataProvider: Send + Sync {
    /// Fetch closing prices for `symbol` over `period`, sampled at `interval`.
    ///
    /// # Errors
    /// Returns `ProviderError` if the vendor request fails or returns nothing usable.
    fn price_history(
        &self,
        symbol: &Symbol,
        period: Period,
        interval: Interval,
    ) -> Result<PriceSeries, ProviderError>;

    /// Fetch vendor-reported metadata (beta, market cap) for `symbol`.
    ///
    /// # Errors
    /// Returns `ProviderError` if the vendor request fails.
    fn profile(&self, symbol: &Symbol) -> Result<TickerProfile, ProviderError>;

    /// Short provider name used in log lines.
    fn name(&self) -> &str;
}
