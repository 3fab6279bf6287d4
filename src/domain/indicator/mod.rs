//! Indicator resolution: maps a `(code, param)` pair to a single decimal
//! value computed from a ticker's market data snapshot.
//!
//! Dispatch goes through [`IndicatorRegistry`], a lookup table from code to
//! metadata plus a pure resolver function, so new indicators are added by
//! registration rather than by editing a central conditional.
//!
//! Resolution is parameterised by a `lookback`: 0 is the live snapshot,
//! `k > 0` drops the last `k` eligible points before computing, which is how
//! crossing operators obtain previous-period values. Every operand of one
//! comparison therefore sees the same snapshot boundary.

pub mod avg_volume;
pub mod ema;
pub mod rsi;
pub mod sma;

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::error::EvalError;
use crate::domain::market_data::{MarketDataPoint, TickerData};
use crate::domain::rule::RuleDefinition;

/// View of a ticker's data at a period boundary.
///
/// At lookback 0 the price/volume are the live quote; at lookback `k` they
/// are those of the last historical point still included.
pub struct Snapshot<'a> {
    pub ticker: &'a str,
    pub price: Decimal,
    pub volume: i64,
    pub history: &'a [MarketDataPoint],
}

impl<'a> Snapshot<'a> {
    /// Builds the snapshot `lookback` periods before the present.
    /// `indicator` is the display name used in error messages.
    pub fn at(
        data: &'a TickerData,
        lookback: usize,
        indicator: &str,
    ) -> Result<Self, EvalError> {
        let eligible = data.eligible_history();
        if lookback == 0 {
            return Ok(Snapshot {
                ticker: &data.ticker,
                price: data.current_price,
                volume: data.current_volume,
                history: eligible,
            });
        }
        if eligible.len() <= lookback {
            return Err(EvalError::InsufficientHistory {
                indicator: indicator.to_string(),
                have: eligible.len(),
                need: lookback + 1,
            });
        }
        let history = &eligible[..eligible.len() - lookback];
        let last = &history[history.len() - 1];
        Ok(Snapshot {
            ticker: &data.ticker,
            price: last.close,
            volume: last.volume,
            history,
        })
    }

    /// The last `n` points of the snapshot's history, oldest first.
    pub fn tail(&self, n: usize, indicator: &str) -> Result<&'a [MarketDataPoint], EvalError> {
        if self.history.len() < n {
            return Err(EvalError::InsufficientHistory {
                indicator: indicator.to_string(),
                have: self.history.len(),
                need: n,
            });
        }
        Ok(&self.history[self.history.len() - n..])
    }
}

/// A pure resolver: snapshot + optional parameter → value.
pub type IndicatorFn = fn(&Snapshot<'_>, Option<Decimal>) -> Result<Decimal, EvalError>;

struct Registered {
    definition: RuleDefinition,
    resolve: IndicatorFn,
}

/// Lookup table from indicator code to its metadata and resolver.
pub struct IndicatorRegistry {
    entries: BTreeMap<String, Registered>,
}

impl IndicatorRegistry {
    /// An empty registry. Most callers want [`IndicatorRegistry::builtin`].
    pub fn new() -> Self {
        IndicatorRegistry {
            entries: BTreeMap::new(),
        }
    }

    /// Registry preloaded with the built-in vocabulary: `PRICE`, `VOLUME`,
    /// `CONSTANT`, `SMA`, `AVG_VOLUME`, `RSI`, `EMA`.
    pub fn builtin() -> Self {
        let mut registry = IndicatorRegistry::new();
        registry.register(
            RuleDefinition {
                code: "PRICE".into(),
                name: "Current Price".into(),
                requires_param: false,
                description: "Latest traded price of the ticker".into(),
            },
            resolve_price,
        );
        registry.register(
            RuleDefinition {
                code: "VOLUME".into(),
                name: "Current Volume".into(),
                requires_param: false,
                description: "Latest traded volume of the ticker".into(),
            },
            resolve_volume,
        );
        registry.register(
            RuleDefinition {
                code: "CONSTANT".into(),
                name: "Fixed Value".into(),
                requires_param: true,
                description: "The parameter itself, for fixed thresholds".into(),
            },
            resolve_constant,
        );
        registry.register(
            RuleDefinition {
                code: "SMA".into(),
                name: "Simple Moving Average".into(),
                requires_param: true,
                description: "Mean close over the last n periods".into(),
            },
            sma::resolve,
        );
        registry.register(
            RuleDefinition {
                code: "AVG_VOLUME".into(),
                name: "Average Volume".into(),
                requires_param: true,
                description: "Mean volume over the last n periods".into(),
            },
            avg_volume::resolve,
        );
        registry.register(
            RuleDefinition {
                code: "RSI".into(),
                name: "Relative Strength Index".into(),
                requires_param: true,
                description: "Momentum oscillator over the last n price changes".into(),
            },
            rsi::resolve,
        );
        registry.register(
            RuleDefinition {
                code: "EMA".into(),
                name: "Exponential Moving Average".into(),
                requires_param: true,
                description: "Exponentially weighted mean close, SMA-seeded".into(),
            },
            ema::resolve,
        );
        registry
    }

    /// Registers (or replaces) an indicator under its definition's code.
    pub fn register(&mut self, definition: RuleDefinition, resolve: IndicatorFn) {
        self.entries.insert(
            definition.code.clone(),
            Registered {
                definition,
                resolve,
            },
        );
    }

    /// Definitions of every registered code, ordered by code.
    pub fn definitions(&self) -> impl Iterator<Item = &RuleDefinition> {
        self.entries.values().map(|entry| &entry.definition)
    }

    pub fn definition(&self, code: &str) -> Option<&RuleDefinition> {
        self.entries.get(code).map(|entry| &entry.definition)
    }

    /// Resolves `(code, param)` against `data` at the given period lookback.
    ///
    /// Current-period lookups (`lookback == 0`) consult the precomputed
    /// cache on [`TickerData::indicators`] first, keyed by display name.
    pub fn resolve(
        &self,
        code: &str,
        param: Option<Decimal>,
        data: &TickerData,
        lookback: usize,
    ) -> Result<Decimal, EvalError> {
        let entry = self
            .entries
            .get(code)
            .ok_or_else(|| EvalError::UnknownIndicator {
                code: code.to_string(),
            })?;
        if entry.definition.requires_param && param.is_none() {
            return Err(EvalError::MissingParameter {
                code: code.to_string(),
            });
        }
        let name = display_name(code, param);
        if lookback == 0 {
            if let Some(cached) = data.indicators.get(&name) {
                return Ok(*cached);
            }
        }
        let snapshot = Snapshot::at(data, lookback, &name)?;
        (entry.resolve)(&snapshot, param)
    }
}

impl Default for IndicatorRegistry {
    fn default() -> Self {
        IndicatorRegistry::new()
    }
}

/// `"SMA(50)"`, `"PRICE"`, `"CONSTANT(100)"`.
pub fn display_name(code: &str, param: Option<Decimal>) -> String {
    match param {
        Some(p) => format!("{}({})", code, p.normalize()),
        None => code.to_string(),
    }
}

/// Parses a window parameter that must be a positive integer (e.g. an SMA
/// period).
pub(crate) fn window_period(code: &str, param: Option<Decimal>) -> Result<usize, EvalError> {
    let raw = param.ok_or_else(|| EvalError::MissingParameter {
        code: code.to_string(),
    })?;
    if raw <= Decimal::ZERO || !raw.fract().is_zero() {
        return Err(EvalError::Validation {
            reason: format!("{code} period must be a positive integer, got {raw}"),
        });
    }
    raw.to_usize().ok_or_else(|| EvalError::Validation {
        reason: format!("{code} period {raw} is out of range"),
    })
}

fn resolve_price(snapshot: &Snapshot<'_>, _param: Option<Decimal>) -> Result<Decimal, EvalError> {
    Ok(snapshot.price)
}

fn resolve_volume(snapshot: &Snapshot<'_>, _param: Option<Decimal>) -> Result<Decimal, EvalError> {
    Ok(Decimal::from(snapshot.volume))
}

fn resolve_constant(
    _snapshot: &Snapshot<'_>,
    param: Option<Decimal>,
) -> Result<Decimal, EvalError> {
    param.ok_or_else(|| EvalError::MissingParameter {
        code: "CONSTANT".to_string(),
    })
}
