//! Market data access port trait.

use crate::domain::error::ScreenerError;
use crate::domain::market_data::TickerData;

/// Supplies evaluation snapshots. The engine itself never fetches, caches or
/// persists market data; implementations of this trait do.
pub trait MarketDataPort {
    /// The snapshot for one ticker: current quote plus historical series
    /// sorted by timestamp ascending.
    fn fetch_ticker_data(&self, ticker: &str) -> Result<TickerData, ScreenerError>;

    /// Every ticker this source can supply, sorted.
    fn list_tickers(&self) -> Result<Vec<String>, ScreenerError>;
}
