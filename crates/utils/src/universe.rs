//! Eligible ticker universe.

use std::path::Path;

use capm_primitives::Symbol;
use polars::prelude::*;

use crate::UtilsError;

/// Tickers used when no universe snapshot can be read.
pub const FALLBACK_TICKERS: [&str; 7] = ["AAPL", "NVDA", "TSLA", "AMZN", "MSFT", "GOOG", "INTC"];

/// Where a [`Universe`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniverseSource {
    /// Read from a snapshot file.
    Snapshot(String),
    /// The built-in fallback list.
    Fallback,
}

/// Ordered list of symbols the user may choose from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Universe {
    symbols: Vec<Symbol>,
    source: UniverseSource,
}

impl Universe {
    /// The built-in fallback universe.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            symbols: FALLBACK_TICKERS.iter().map(|&s| Symbol::new(s)).collect(),
            source: UniverseSource::Fallback,
        }
    }

    /// Read a snapshot CSV whose first column holds the symbols.
    ///
    /// Symbols are trimmed and upper-cased; blank cells and repeats are dropped.
    ///
    /// # Errors
    /// Returns an error if the file cannot be parsed or holds no symbols.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, UtilsError> {
        let path = path.as_ref();
        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;

        let column = frame
            .get_columns()
            .first()
            .ok_or_else(|| UtilsError::MissingColumn("symbol".to_string()))?
            .cast(&DataType::String)?;

        let mut symbols: Vec<Symbol> = Vec::with_capacity(column.len());
        for value in column.str()?.into_iter().flatten() {
            if let Some(symbol) = Symbol::normalized(value)
                && !symbols.contains(&symbol)
            {
                symbols.push(symbol);
            }
        }

        if symbols.is_empty() {
            return Err(UtilsError::EmptyUniverse(path.display().to_string()));
        }
        Ok(Self { symbols, source: UniverseSource::Snapshot(path.display().to_string()) })
    }

    /// Read a snapshot, falling back to [`FALLBACK_TICKERS`] with a warning.
    #[must_use]
    pub fn load_or_fallback(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_csv(path) {
            Ok(universe) => {
                log::info!("loaded {} tickers from {}", universe.len(), path.display());
                universe
            }
            Err(err) => {
                log::warn!("could not load tickers from {}: {err}; using fallback list", path.display());
                Self::fallback()
            }
        }
    }

    /// Symbols in snapshot order.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// The first `n` symbols.
    #[must_use]
    pub fn top(&self, n: usize) -> &[Symbol] {
        &self.symbols[..n.min(self.symbols.len())]
    }

    /// Where the universe came from.
    #[must_use]
    pub const fn source(&self) -> &UniverseSource {
        &self.source
    }

    /// Whether `symbol` is part of the universe.
    #[must_use]
    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.symbols.contains(symbol)
    }

    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn snapshot(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn first_column_is_read_in_order() {
        let file = snapshot("Symbol,Security,GICS Sector\nMMM,3M,Industrials\naos,A. O. Smith,Industrials\nABT,Abbott,Health Care\nMMM,3M,Industrials\n");
        let universe = Universe::from_csv(file.path()).unwrap();

        let names: Vec<&str> = universe.symbols().iter().map(Symbol::as_str).collect();
        assert_eq!(names, vec!["MMM", "AOS", "ABT"]);
        assert!(matches!(universe.source(), UniverseSource::Snapshot(_)));
        assert_eq!(universe.top(2).len(), 2);
        assert_eq!(universe.top(10).len(), 3);
    }

    #[test]
    fn missing_snapshot_uses_fallback() {
        let universe = Universe::load_or_fallback("/nonexistent/universe.csv");
        assert_eq!(universe.source(), &UniverseSource::Fallback);
        assert_eq!(universe.len(), 7);
        assert_eq!(universe.symbols()[0], Symbol::new("AAPL"));
        assert!(universe.contains(&Symbol::new("INTC")));
    }

    #[test]
    fn header_only_snapshot_is_empty() {
        let file = snapshot("Symbol\n");
        assert!(Universe::from_csv(file.path()).is_err());
        assert_eq!(Universe::load_or_fallback(file.path()).source(), &UniverseSource::Fallback);
    }
}
