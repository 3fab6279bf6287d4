//! EMA (Exponential Moving Average) indicator.
//!
//! Seeded with the SMA of the first n closes, then smoothed over every
//! remaining close with alpha = 2 / (n + 1). Needs at least n points.

use rust_decimal::Decimal;

use crate::domain::error::EvalError;
use crate::domain::indicator::{display_name, window_period, Snapshot};

pub fn resolve(snapshot: &Snapshot<'_>, param: Option<Decimal>) -> Result<Decimal, EvalError> {
    let period = window_period("EMA", param)?;
    if snapshot.history.len() < period {
        return Err(EvalError::InsufficientHistory {
            indicator: display_name("EMA", param),
            have: snapshot.history.len(),
            need: period,
        });
    }

    let seed_sum = snapshot.history[..period]
        .iter()
        .fold(Decimal::ZERO, |acc, point| acc + point.close);
    let mut ema = seed_sum / Decimal::from(period);

    let alpha = Decimal::from(2) / Decimal::from(period as u64 + 1);
    for point in &snapshot.history[period..] {
        ema += (point.close - ema) * alpha;
    }
    Ok(ema)
}
