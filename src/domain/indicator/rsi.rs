//! RSI (Relative Strength Index) indicator.
//!
//! Window form: average gain and average loss are simple means over the last
//! n price changes, which need n+1 closes.
//!
//! RSI = 100 - (100 / (1 + avg_gain / avg_loss)); if avg_loss == 0 the RSI
//! is 100 by convention.

use rust_decimal::Decimal;

use crate::domain::error::EvalError;
use crate::domain::indicator::{display_name, window_period, Snapshot};

pub fn resolve(snapshot: &Snapshot<'_>, param: Option<Decimal>) -> Result<Decimal, EvalError> {
    let period = window_period("RSI", param)?;
    let window = snapshot.tail(period + 1, &display_name("RSI", param))?;

    let mut gain_sum = Decimal::ZERO;
    let mut loss_sum = Decimal::ZERO;
    for pair in window.windows(2) {
        let change = pair[1].close - pair[0].close;
        if change > Decimal::ZERO {
            gain_sum += change;
        } else {
            loss_sum -= change;
        }
    }

    let divisor = Decimal::from(period);
    let avg_gain = gain_sum / divisor;
    let avg_loss = loss_sum / divisor;

    if avg_loss.is_zero() {
        return Ok(Decimal::ONE_HUNDRED);
    }
    let rs = avg_gain / avg_loss;
    Ok(Decimal::ONE_HUNDRED - Decimal::ONE_HUNDRED / (Decimal::ONE + rs))
}
