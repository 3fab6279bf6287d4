//! SMA (Simple Moving Average) indicator.
//!
//! Mean of the closes over the last n points of the snapshot's history. The
//! mean is computed exactly; rounding happens at the point of comparison,
//! not here.

use rust_decimal::Decimal;

use crate::domain::error::EvalError;
use crate::domain::indicator::{display_name, window_period, Snapshot};

pub fn resolve(snapshot: &Snapshot<'_>, param: Option<Decimal>) -> Result<Decimal, EvalError> {
    let period = window_period("SMA", param)?;
    let window = snapshot.tail(period, &display_name("SMA", param))?;
    let sum = window
        .iter()
        .fold(Decimal::ZERO, |acc, point| acc + point.close);
    Ok(sum / Decimal::from(period))
}
