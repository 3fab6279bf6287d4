//! Evaluation outcomes: per-rule results and the strategy-level analysis.

use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;

use crate::domain::rule::Rule;
use crate::domain::strategy::Strategy;

/// Decimal places of the compliance-rate metric.
pub const COMPLIANCE_SCALE: u32 = 2;

/// Outcome of evaluating one rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleResult {
    pub passed: bool,
    /// Human-readable explanation including the resolved numeric values.
    pub justification: String,
    /// Snapshot of the rule that was evaluated.
    pub rule: Rule,
}

/// Outcome of evaluating one strategy against one ticker snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub strategy: Strategy,
    pub ticker: String,
    pub analysis_timestamp: NaiveDateTime,
    /// Exactly one entry per rule in the strategy, same order.
    pub rule_results: Vec<RuleResult>,
    /// At minimum `compliance_rate`; extensions are keyed by name.
    pub calculated_metrics: BTreeMap<String, Decimal>,
    pub overall_passed: bool,
    pub summary: String,
}

impl AnalysisResult {
    /// Assembles the result for `strategy` evaluated against `ticker` data.
    ///
    /// Panics if the result count does not match the strategy's rule count;
    /// that mismatch is a programming error in the evaluator, not a runtime
    /// business condition.
    pub fn new(
        strategy: Strategy,
        ticker: String,
        analysis_timestamp: NaiveDateTime,
        rule_results: Vec<RuleResult>,
    ) -> Self {
        assert_eq!(
            rule_results.len(),
            strategy.rules.len(),
            "{} rule results for a strategy with {} rules",
            rule_results.len(),
            strategy.rules.len()
        );

        let total = rule_results.len();
        let passed_count = rule_results.iter().filter(|r| r.passed).count();
        let overall_passed = rule_results.iter().all(|r| r.passed);
        let rate = compliance_rate(passed_count, total);

        let mut calculated_metrics = BTreeMap::new();
        calculated_metrics.insert("compliance_rate".to_string(), rate);
        calculated_metrics.insert("rules_passed".to_string(), Decimal::from(passed_count));
        calculated_metrics.insert(
            "rules_failed".to_string(),
            Decimal::from(total - passed_count),
        );

        let summary = format!(
            "{passed_count}/{total} rules passed for {ticker} ({rate:.2}% compliance)"
        );

        AnalysisResult {
            strategy,
            ticker,
            analysis_timestamp,
            rule_results,
            calculated_metrics,
            overall_passed,
            summary,
        }
    }

    pub fn compliance_rate(&self) -> Decimal {
        self.calculated_metrics
            .get("compliance_rate")
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

/// `100 × passed / total`, rounded half-up to two decimal places. Zero when
/// the rule set is empty, so the metric is always defined.
pub fn compliance_rate(passed: usize, total: usize) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(passed) * Decimal::ONE_HUNDRED / Decimal::from(total))
        .round_dp_with_strategy(COMPLIANCE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}
