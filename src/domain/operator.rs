//! Comparison operators.
//!
//! # Semantics
//!
//! - `>`, `<`, `>=`, `<=`, `==`: single-period comparison of the resolved
//!   subject and target values.
//! - `crosses_above`: passes iff the subject was at or below the target in
//!   the previous period and is strictly above it now.
//! - `crosses_below`: the mirror.
//!
//! Values are rounded half-up to [`COMPARE_SCALE`] decimal places at the
//! point of comparison; upstream window math stays exact.

use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

use crate::domain::error::EvalError;

/// Decimal places retained when two resolved values are compared.
pub const COMPARE_SCALE: u32 = 4;

/// Round-half-up to [`COMPARE_SCALE`] places.
pub fn round_for_compare(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(COMPARE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    Equal,
    CrossesAbove,
    CrossesBelow,
}

impl Operator {
    /// Parses an operator name from a rule. Unknown names fail evaluation of
    /// that rule.
    pub fn parse(name: &str) -> Result<Self, EvalError> {
        match name.trim() {
            ">" => Ok(Operator::GreaterThan),
            "<" => Ok(Operator::LessThan),
            ">=" => Ok(Operator::GreaterOrEqual),
            "<=" => Ok(Operator::LessOrEqual),
            "==" => Ok(Operator::Equal),
            "crosses_above" => Ok(Operator::CrossesAbove),
            "crosses_below" => Ok(Operator::CrossesBelow),
            other => Err(EvalError::UnknownOperator {
                name: other.to_string(),
            }),
        }
    }

    /// Whether this operator needs previous-period operand values.
    pub fn is_crossing(self) -> bool {
        matches!(self, Operator::CrossesAbove | Operator::CrossesBelow)
    }

    /// Applies the operator. `previous` carries the previous-period
    /// `(subject, target)` pair and is consulted only by crossing operators;
    /// callers resolve it before applying one of those. A crossing with no
    /// look-back never passes.
    pub fn apply(
        self,
        subject: Decimal,
        target: Decimal,
        previous: Option<(Decimal, Decimal)>,
    ) -> bool {
        let s = round_for_compare(subject);
        let t = round_for_compare(target);
        match self {
            Operator::GreaterThan => s > t,
            Operator::LessThan => s < t,
            Operator::GreaterOrEqual => s >= t,
            Operator::LessOrEqual => s <= t,
            Operator::Equal => s == t,
            Operator::CrossesAbove => match previous {
                Some((ps, pt)) => round_for_compare(ps) <= round_for_compare(pt) && s > t,
                None => false,
            },
            Operator::CrossesBelow => match previous {
                Some((ps, pt)) => round_for_compare(ps) >= round_for_compare(pt) && s < t,
                None => false,
            },
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::GreaterOrEqual => ">=",
            Operator::LessOrEqual => "<=",
            Operator::Equal => "==",
            Operator::CrossesAbove => "crosses_above",
            Operator::CrossesBelow => "crosses_below",
        };
        write!(f, "{symbol}")
    }
}
