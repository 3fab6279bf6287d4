//! Prohibited-ticker screening list.
//!
//! Tickers an analyst has blacklisted are never analyzed. The list comes
//! from configuration (`[screening] prohibited = GME, MEME`); membership is
//! case-insensitive.

use crate::domain::error::ScreenerError;
use crate::ports::config_port::ConfigPort;

#[derive(Debug, Clone, Default)]
pub struct ProhibitedTickers {
    tickers: Vec<String>,
}

impl ProhibitedTickers {
    pub fn new(tickers: Vec<String>) -> Self {
        ProhibitedTickers {
            tickers: tickers.into_iter().map(|t| t.to_uppercase()).collect(),
        }
    }

    /// Parses a comma-separated ticker list; empty tokens are skipped.
    pub fn from_list(input: &str) -> Self {
        let tickers = input
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_uppercase)
            .collect();
        ProhibitedTickers { tickers }
    }

    /// Reads `[screening] prohibited` from configuration; absent key means
    /// an empty list.
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        match config.get_string("screening", "prohibited") {
            Some(list) => ProhibitedTickers::from_list(&list),
            None => ProhibitedTickers::default(),
        }
    }

    pub fn is_prohibited(&self, ticker: &str) -> bool {
        self.tickers
            .iter()
            .any(|t| t.eq_ignore_ascii_case(ticker.trim()))
    }

    pub fn ensure_allowed(&self, ticker: &str) -> Result<(), ScreenerError> {
        if self.is_prohibited(ticker) {
            return Err(ScreenerError::TickerProhibited {
                ticker: ticker.to_string(),
            });
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}
