//! Synthetic market example.
//!
//! Simulates monthly prices for an index and a handful of assets with known
//! betas, runs the full analysis on them and compares the estimates to the
//! true values. No network access is needed.
//!
//! Run with: `RUST_LOG=info cargo run --example synthetic_market`

use std::collections::HashMap;

use capm::{
    model::{AnalysisConfig, CapmAnalysis},
    primitives::{Date, Interval, Period, PricePoint, PriceSeries, Symbol, TickerProfile},
    traits::{MarketDataProvider, ProviderError},
};
use chrono::Months;
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};

/// Months of history (5 years).
const MONTHS: usize = 60;

/// (symbol, true beta, idiosyncratic volatility)
const ASSETS: &[(&str, f64, f64)] = &[
    ("UTIL", 0.45, 0.02),
    ("STPL", 0.70, 0.025),
    ("BANK", 1.10, 0.04),
    ("TECH", 1.35, 0.05),
    ("SEMI", 1.80, 0.07),
];

struct SimulatedProvider {
    prices: HashMap<Symbol, PriceSeries>,
    true_betas: HashMap<Symbol, f64>,
}

impl SimulatedProvider {
    fn new(seed: u64) -> Result<Self, Box<dyn std::error::Error>> {
        let mut rng = StdRng::seed_from_u64(seed);
        let market_shock = Normal::new(0.008, 0.045)?;
        let start = Date::from_ymd_opt(2020, 1, 1).ok_or("bad start date")?;

        let market: Vec<f64> = (0..MONTHS).map(|_| market_shock.sample(&mut rng)).collect();
        let mut prices = HashMap::new();
        let mut true_betas = HashMap::new();

        let index = Symbol::new("^GSPC");
        prices.insert(index.clone(), compound(&index, start, &market));

        for &(name, beta, vol) in ASSETS {
            let noise = Normal::new(0.0, vol)?;
            let returns: Vec<f64> = market.iter().map(|m| 0.002 + beta * m + noise.sample(&mut rng)).collect();
            let symbol = Symbol::new(name);
            prices.insert(symbol.clone(), compound(&symbol, start, &returns));
            true_betas.insert(symbol, beta);
        }

        Ok(Self { prices, true_betas })
    }
}

fn compound(symbol: &Symbol, start: Date, returns: &[f64]) -> PriceSeries {
    let mut price = 100.0;
    let mut points = vec![PricePoint::new(start, price)];
    for (i, r) in returns.iter().enumerate() {
        price *= 1.0 + r;
        if let Some(date) = start.checked_add_months(Months::new(i as u32 + 1)) {
            points.push(PricePoint::new(date, price));
        }
    }
    PriceSeries::new(symbol.clone(), points)
}

impl MarketDataProvider for SimulatedProvider {
    fn price_history(&self, symbol: &Symbol, _: Period, _: Interval) -> Result<PriceSeries, ProviderError> {
        self.prices.get(symbol).cloned().ok_or_else(|| ProviderError::NoData(symbol.to_string()))
    }

    fn profile(&self, symbol: &Symbol) -> Result<TickerProfile, ProviderError> {
        let beta = self.true_betas.get(symbol).copied();
        Ok(TickerProfile::new(beta, Some(50e9)))
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let provider = SimulatedProvider::new(42)?;
    let analysis = CapmAnalysis::new(&provider, AnalysisConfig::default())?;

    let mut tickers: Vec<Symbol> = ASSETS.iter().map(|&(name, _, _)| Symbol::new(name)).collect();
    // Not simulated: shows up as an issue.
    tickers.push(Symbol::new("GONE"));

    let outcome = analysis.run(&tickers)?;
    let Some(report) = outcome.report() else {
        println!("No results");
        return Ok(());
    };

    println!("{report}\n");
    println!("The vendor beta column holds the true simulated beta.\n");

    for issue in report.issues() {
        println!("issue: {issue}");
    }

    Ok(())
}
