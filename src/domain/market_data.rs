//! Market data snapshot types.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// One OHLCV candle.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketDataPoint {
    pub timestamp: NaiveDateTime,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: i64,
}

/// Evaluation input for one ticker: the current quote plus its historical
/// series.
///
/// `historical_data` is ordered by timestamp ascending (most recent last)
/// and is a finite, immutable snapshot for the duration of one evaluation.
/// `indicators` is an optional cache of precomputed values keyed by display
/// name (e.g. `"SMA(200)"`); the resolver consults it for current-period
/// lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerData {
    pub ticker: String,
    pub current_price: Decimal,
    pub current_volume: i64,
    pub as_of: NaiveDateTime,
    pub indicators: BTreeMap<String, Decimal>,
    pub historical_data: Vec<MarketDataPoint>,
}

impl TickerData {
    /// Points eligible for indicator computation: timestamps at or before
    /// `as_of`. The series is sorted ascending, so this is a prefix.
    pub fn eligible_history(&self) -> &[MarketDataPoint] {
        let cut = self
            .historical_data
            .partition_point(|p| p.timestamp <= self.as_of);
        &self.historical_data[..cut]
    }
}
