//! CSV file market-data adapter.
//!
//! One `<TICKER>.csv` file per ticker in the data directory, header row
//! `timestamp,open,high,low,close,volume`, timestamps as `YYYY-MM-DD` or
//! `YYYY-MM-DD HH:MM:SS`. The newest candle supplies the current price,
//! current volume and the `as_of` timestamp of the snapshot.

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::domain::error::ScreenerError;
use crate::domain::market_data::{MarketDataPoint, TickerData};
use crate::ports::data_port::MarketDataPort;

#[derive(Debug)]
pub struct CsvDataAdapter {
    base_path: PathBuf,
}

impl CsvDataAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        CsvDataAdapter { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker.to_uppercase()))
    }
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, ScreenerError> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|e| ScreenerError::Data {
            reason: format!("invalid timestamp '{raw}': {e}"),
        })
}

fn parse_decimal(record: &csv::StringRecord, index: usize, column: &str) -> Result<Decimal, ScreenerError> {
    let raw = record.get(index).ok_or_else(|| ScreenerError::Data {
        reason: format!("missing {column} column"),
    })?;
    Decimal::from_str(raw.trim()).map_err(|e| ScreenerError::Data {
        reason: format!("invalid {column} value '{raw}': {e}"),
    })
}

fn parse_volume(record: &csv::StringRecord, index: usize) -> Result<i64, ScreenerError> {
    let raw = record.get(index).ok_or_else(|| ScreenerError::Data {
        reason: "missing volume column".to_string(),
    })?;
    raw.trim().parse().map_err(|e| ScreenerError::Data {
        reason: format!("invalid volume value '{raw}': {e}"),
    })
}

impl MarketDataPort for CsvDataAdapter {
    fn fetch_ticker_data(&self, ticker: &str) -> Result<TickerData, ScreenerError> {
        let path = self.csv_path(ticker);
        if !path.exists() {
            return Err(ScreenerError::NoData {
                ticker: ticker.to_string(),
            });
        }
        let content = fs::read_to_string(&path)?;

        let mut reader = csv::Reader::from_reader(content.as_bytes());
        let mut points = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| ScreenerError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            let timestamp_raw = record.get(0).ok_or_else(|| ScreenerError::Data {
                reason: "missing timestamp column".to_string(),
            })?;
            let point = MarketDataPoint {
                timestamp: parse_timestamp(timestamp_raw.trim())?,
                open: parse_decimal(&record, 1, "open")?,
                high: parse_decimal(&record, 2, "high")?,
                low: parse_decimal(&record, 3, "low")?,
                close: parse_decimal(&record, 4, "close")?,
                volume: parse_volume(&record, 5)?,
            };
            if point.low > point.open
                || point.low > point.close
                || point.open > point.high
                || point.close > point.high
            {
                return Err(ScreenerError::Data {
                    reason: format!(
                        "inconsistent candle at {}: low {} / open {} / close {} / high {}",
                        point.timestamp, point.low, point.open, point.close, point.high
                    ),
                });
            }
            points.push(point);
        }

        points.sort_by_key(|p| p.timestamp);
        let (current_price, current_volume, as_of) = match points.last() {
            Some(last) => (last.close, last.volume, last.timestamp),
            None => {
                return Err(ScreenerError::NoData {
                    ticker: ticker.to_string(),
                })
            }
        };

        Ok(TickerData {
            ticker: ticker.to_uppercase(),
            current_price,
            current_volume,
            as_of,
            indicators: BTreeMap::new(),
            historical_data: points,
        })
    }

    fn list_tickers(&self) -> Result<Vec<String>, ScreenerError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| ScreenerError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut tickers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ScreenerError::Data {
                reason: format!("directory entry error: {e}"),
            })?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(stem) = name_str.strip_suffix(".csv") {
                tickers.push(stem.to_string());
            }
        }

        tickers.sort();
        Ok(tickers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "timestamp,open,high,low,close,volume\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-17,110.0,120.0,105.0,115.5,55000\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n";
        fs::write(path.join("AAPL.csv"), csv_content).unwrap();
        fs::write(
            path.join("MSFT.csv"),
            "timestamp,open,high,low,close,volume\n2024-01-15 16:00:00,400,410,395,405,30000\n",
        )
        .unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_builds_a_sorted_snapshot() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvDataAdapter::new(path);

        let data = adapter.fetch_ticker_data("AAPL").unwrap();
        assert_eq!(data.ticker, "AAPL");
        assert_eq!(data.historical_data.len(), 3);
        // out-of-order rows are sorted by timestamp
        assert!(data.historical_data[0].timestamp < data.historical_data[1].timestamp);
        assert!(data.historical_data[1].timestamp < data.historical_data[2].timestamp);
        // the newest candle supplies the snapshot quote
        assert_eq!(data.current_price, dec!(115.5));
        assert_eq!(data.current_volume, 55000);
        assert_eq!(data.as_of, data.historical_data[2].timestamp);
    }

    #[test]
    fn fetch_parses_datetime_timestamps() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvDataAdapter::new(path);

        let data = adapter.fetch_ticker_data("MSFT").unwrap();
        assert_eq!(data.historical_data.len(), 1);
        assert_eq!(data.current_price, dec!(405));
    }

    #[test]
    fn fetch_missing_ticker_is_no_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvDataAdapter::new(path);
        assert!(matches!(
            adapter.fetch_ticker_data("XYZ"),
            Err(ScreenerError::NoData { ticker }) if ticker == "XYZ"
        ));
    }

    #[test]
    fn fetch_empty_file_is_no_data() {
        let (_dir, path) = setup_test_data();
        fs::write(path.join("EMPTY.csv"), "timestamp,open,high,low,close,volume\n").unwrap();
        let adapter = CsvDataAdapter::new(path);
        assert!(matches!(
            adapter.fetch_ticker_data("EMPTY"),
            Err(ScreenerError::NoData { .. })
        ));
    }

    #[test]
    fn fetch_bad_price_is_a_data_error() {
        let (_dir, path) = setup_test_data();
        fs::write(
            path.join("BAD.csv"),
            "timestamp,open,high,low,close,volume\n2024-01-15,abc,1,1,1,10\n",
        )
        .unwrap();
        let adapter = CsvDataAdapter::new(path);
        assert!(matches!(
            adapter.fetch_ticker_data("BAD"),
            Err(ScreenerError::Data { .. })
        ));
    }

    #[test]
    fn fetch_rejects_inconsistent_candles() {
        let (_dir, path) = setup_test_data();
        // close above high
        fs::write(
            path.join("WONKY.csv"),
            "timestamp,open,high,low,close,volume\n2024-01-15,100,105,95,110,10\n",
        )
        .unwrap();
        let adapter = CsvDataAdapter::new(path);
        assert!(matches!(
            adapter.fetch_ticker_data("WONKY"),
            Err(ScreenerError::Data { reason }) if reason.contains("inconsistent candle")
        ));
    }

    #[test]
    fn list_tickers_scans_the_directory() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvDataAdapter::new(path);
        assert_eq!(adapter.list_tickers().unwrap(), vec!["AAPL", "MSFT"]);
    }
}
