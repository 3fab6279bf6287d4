//! Strategy evaluation: runs every rule of a strategy against one ticker
//! snapshot and assembles the aggregate result.
//!
//! Policy: fail-fast. The first rule that cannot be evaluated (unknown
//! code/operator, missing parameter, insufficient history) aborts the whole
//! evaluation and no partial result is returned. A rule whose condition is
//! simply not met contributes a normal `passed = false` result.
//!
//! Evaluation is a pure function of `(strategy, data)`: no shared state, no
//! clock reads (the analysis timestamp is the snapshot's `as_of`), so
//! concurrent callers need no coordination.

use crate::domain::analysis::AnalysisResult;
use crate::domain::error::EvalError;
use crate::domain::indicator::IndicatorRegistry;
use crate::domain::market_data::TickerData;
use crate::domain::rule_eval::evaluate_rule;
use crate::domain::strategy::Strategy;

pub fn evaluate_strategy(
    registry: &IndicatorRegistry,
    strategy: &Strategy,
    data: &TickerData,
) -> Result<AnalysisResult, EvalError> {
    strategy.validate()?;
    if data.ticker.trim().is_empty() {
        return Err(EvalError::Validation {
            reason: "ticker symbol cannot be empty".into(),
        });
    }

    let mut rule_results = Vec::with_capacity(strategy.rules.len());
    for rule in &strategy.rules {
        rule_results.push(evaluate_rule(registry, rule, data)?);
    }

    Ok(AnalysisResult::new(
        strategy.clone(),
        data.ticker.clone(),
        data.as_of,
        rule_results,
    ))
}
