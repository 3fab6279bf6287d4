//! AVG_VOLUME indicator: mean volume over the last n points.
//!
//! Same windowing rules as SMA, over the volume column.

use rust_decimal::Decimal;

use crate::domain::error::EvalError;
use crate::domain::indicator::{display_name, window_period, Snapshot};

pub fn resolve(snapshot: &Snapshot<'_>, param: Option<Decimal>) -> Result<Decimal, EvalError> {
    let period = window_period("AVG_VOLUME", param)?;
    let window = snapshot.tail(period, &display_name("AVG_VOLUME", param))?;
    let sum = window
        .iter()
        .fold(Decimal::ZERO, |acc, point| acc + Decimal::from(point.volume));
    Ok(sum / Decimal::from(period))
}
