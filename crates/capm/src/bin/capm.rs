//! CAPM analysis CLI tool.
//!
//! Estimates the beta of each ticker against a market index, converts it to
//! an expected monthly return with CAPM, and prints the result next to the
//! vendor-reported beta.
//!
//! Usage: `cargo run --features cli --bin capm -- [TICKERS]... [OPTIONS]`
//! Example: `cargo run --features cli --bin capm -- AAPL MSFT NVDA --period 2y -v`

use std::{error::Error, path::PathBuf, process::ExitCode};

use capm::{
    model::{AnalysisConfig, AnalysisOutcome, CapmAnalysis, SymbolIssue},
    primitives::{Interval, Period, Symbol},
    utils::{Universe, export_report},
    yahoo::YahooProvider,
};
use clap::Parser;

/// Default number of universe tickers analysed when none are given.
const DEFAULT_TOP: usize = 30;

#[derive(Parser)]
#[command(name = "capm")]
#[command(about = "CAPM beta and expected monthly returns against a market index", long_about = None)]
#[command(version)]
struct Cli {
    /// Tickers to analyse; defaults to the first `--top` tickers of the universe
    tickers: Vec<String>,

    /// TOML file with analysis settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Market index symbol
    #[arg(long)]
    index: Option<String>,

    /// History window (1y, 2y, 3y, 5y, 10y, 20y)
    #[arg(long)]
    period: Option<Period>,

    /// Sampling interval (1d, 1wk, 1mo)
    #[arg(long)]
    interval: Option<Interval>,

    /// Annual risk-free rate as a fraction
    #[arg(long)]
    risk_free: Option<f64>,

    /// Ticker universe snapshot (CSV, symbols in the first column)
    #[arg(long, default_value = "data/universe.csv")]
    universe: PathBuf,

    /// Number of universe tickers used when none are given
    #[arg(long, default_value_t = DEFAULT_TOP)]
    top: usize,

    /// Write the returns table and the final table as CSV
    #[arg(long)]
    export: bool,

    /// Directory for exported files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new().filter_level(log_level).init();
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = build_config(&cli)?;
    let tickers = select_tickers(&cli);

    println!(
        "Running analysis with {} tickers, {} period, {} interval against {}...\n",
        tickers.len(),
        config.period,
        config.interval,
        config.index
    );

    let provider = YahooProvider::new()?;
    let analysis = CapmAnalysis::new(&provider, config)?;

    match analysis.run(&tickers)? {
        AnalysisOutcome::NoData { reason, issues } => {
            println!("No results: {reason}.");
            print_issues(&issues);
        }
        AnalysisOutcome::Complete(report) => {
            println!("{report}\n");
            print_issues(report.issues());

            if cli.export {
                std::fs::create_dir_all(&cli.out_dir)?;
                let (returns_path, report_path) = export_report(&report, &cli.out_dir)?;
                println!("Returns table written to {}", returns_path.display());
                println!("Final table written to {}", report_path.display());
            }
        }
    }

    Ok(())
}

/// Settings from the config file (or defaults) with command-line overrides.
fn build_config(cli: &Cli) -> Result<AnalysisConfig, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_toml_file(path)?,
        None => AnalysisConfig::default(),
    };

    if let Some(index) = cli.index.as_deref() {
        config.index = Symbol::normalized(index).ok_or("--index must not be empty")?;
    }
    if let Some(period) = cli.period {
        config.period = period;
    }
    if let Some(interval) = cli.interval {
        config.interval = interval;
    }
    if let Some(risk_free) = cli.risk_free {
        config.risk_free_annual = risk_free;
    }

    config.validate()?;
    Ok(config)
}

fn select_tickers(cli: &Cli) -> Vec<Symbol> {
    let universe = Universe::load_or_fallback(&cli.universe);

    if cli.tickers.is_empty() {
        return universe.top(cli.top).to_vec();
    }

    let tickers: Vec<Symbol> = cli.tickers.iter().filter_map(|t| Symbol::normalized(t)).collect();
    for ticker in tickers.iter().filter(|t| !t.is_index() && !universe.contains(t)) {
        log::warn!("{ticker} is not in the ticker universe");
    }
    tickers
}

fn print_issues(issues: &[SymbolIssue]) {
    if issues.is_empty() {
        return;
    }
    println!("Skipped or incomplete ({}):", issues.len());
    for issue in issues {
        println!("  {issue}");
    }
}
