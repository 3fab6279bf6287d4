#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{BTreeMap, HashMap};

use screener::domain::error::ScreenerError;
pub use screener::domain::market_data::{MarketDataPoint, TickerData};
use screener::domain::rule::Rule;
use screener::domain::strategy::Strategy;
use screener::ports::data_port::MarketDataPort;

pub struct MockDataPort {
    pub data: HashMap<String, TickerData>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        MockDataPort {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_data(mut self, data: TickerData) -> Self {
        self.data.insert(data.ticker.clone(), data);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockDataPort {
    fn fetch_ticker_data(&self, ticker: &str) -> Result<TickerData, ScreenerError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(ScreenerError::Data {
                reason: reason.clone(),
            });
        }
        self.data
            .get(ticker)
            .cloned()
            .ok_or_else(|| ScreenerError::NoData {
                ticker: ticker.to_string(),
            })
    }

    fn list_tickers(&self) -> Result<Vec<String>, ScreenerError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }
}

pub fn ts(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn make_point(day: u32, close: Decimal) -> MarketDataPoint {
    MarketDataPoint {
        timestamp: ts(day),
        open: close - dec!(1),
        high: close + dec!(1),
        low: close - dec!(2),
        close,
        volume: 1000,
    }
}

pub fn make_points(closes: &[Decimal]) -> Vec<MarketDataPoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_point(i as u32 + 1, close))
        .collect()
}

/// Snapshot whose `as_of` is the newest candle's timestamp.
pub fn make_data(ticker: &str, current_price: Decimal, closes: &[Decimal]) -> TickerData {
    let historical_data = make_points(closes);
    let as_of = historical_data.last().map(|p| p.timestamp).unwrap_or(ts(1));
    TickerData {
        ticker: ticker.to_string(),
        current_price,
        current_volume: 5000,
        as_of,
        indicators: BTreeMap::new(),
        historical_data,
    }
}

pub fn make_rule(
    id: i64,
    subject: &str,
    subject_param: Option<Decimal>,
    operator: &str,
    target: &str,
    target_param: Option<Decimal>,
) -> Rule {
    Rule {
        id,
        name: format!("Rule {id}"),
        subject_code: subject.to_string(),
        subject_param,
        operator: operator.to_string(),
        target_code: target.to_string(),
        target_param,
        description: String::new(),
    }
}

pub fn make_strategy(rules: Vec<Rule>) -> Strategy {
    Strategy {
        id: 1,
        name: "Test Strategy".into(),
        description: "Integration test strategy".into(),
        rules,
    }
}
