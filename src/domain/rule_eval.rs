//! Rule evaluation: one rule against one ticker snapshot.
//!
//! Steps: well-formedness check → resolve subject and target (plus the
//! previous period for crossing operators) → apply the operator → format a
//! justification embedding the resolved values.
//!
//! A resolution or operator error is never converted to `passed = false`;
//! it propagates wrapped with the rule's id and name so the caller can tell
//! "could not evaluate" apart from "condition not met".

use rust_decimal::Decimal;

use crate::domain::analysis::RuleResult;
use crate::domain::error::EvalError;
use crate::domain::indicator::{display_name, IndicatorRegistry};
use crate::domain::market_data::TickerData;
use crate::domain::operator::Operator;
use crate::domain::rule::Rule;

pub fn evaluate_rule(
    registry: &IndicatorRegistry,
    rule: &Rule,
    data: &TickerData,
) -> Result<RuleResult, EvalError> {
    evaluate_inner(registry, rule, data).map_err(|source| EvalError::Rule {
        rule_id: rule.id,
        rule_name: rule.name.clone(),
        source: Box::new(source),
    })
}

fn evaluate_inner(
    registry: &IndicatorRegistry,
    rule: &Rule,
    data: &TickerData,
) -> Result<RuleResult, EvalError> {
    rule.validate()?;
    let operator = Operator::parse(&rule.operator)?;

    let subject = registry.resolve(&rule.subject_code, rule.subject_param, data, 0)?;
    let target = registry.resolve(&rule.target_code, rule.target_param, data, 0)?;

    let previous = if operator.is_crossing() {
        let prev_subject = registry.resolve(&rule.subject_code, rule.subject_param, data, 1)?;
        let prev_target = registry.resolve(&rule.target_code, rule.target_param, data, 1)?;
        Some((prev_subject, prev_target))
    } else {
        None
    };

    let passed = operator.apply(subject, target, previous);
    let justification = justification(rule, data, operator, passed, subject, target, previous);

    Ok(RuleResult {
        passed,
        justification,
        rule: rule.clone(),
    })
}

fn justification(
    rule: &Rule,
    data: &TickerData,
    operator: Operator,
    passed: bool,
    subject: Decimal,
    target: Decimal,
    previous: Option<(Decimal, Decimal)>,
) -> String {
    let verdict = if passed { "passed" } else { "failed" };
    let subject_name = display_name(&rule.subject_code, rule.subject_param);
    let target_name = display_name(&rule.target_code, rule.target_param);
    let mut text = format!(
        "Rule '{}' {} for {}: {}={:.2} {} {}={:.2}",
        rule.name, verdict, data.ticker, subject_name, subject, operator, target_name, target
    );
    if let Some((prev_subject, prev_target)) = previous {
        text.push_str(&format!(
            " (previous period {prev_subject:.2} vs {prev_target:.2})"
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    use crate::domain::market_data::MarketDataPoint;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn make_data(current_price: Decimal, closes: &[Decimal]) -> TickerData {
        let historical_data: Vec<MarketDataPoint> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| MarketDataPoint {
                timestamp: ts(i as u32 + 1),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect();
        let as_of = historical_data.last().map(|p| p.timestamp).unwrap_or(ts(1));
        TickerData {
            ticker: "AAPL".into(),
            current_price,
            current_volume: 5000,
            as_of,
            indicators: BTreeMap::new(),
            historical_data,
        }
    }

    fn make_rule(
        subject: &str,
        subject_param: Option<Decimal>,
        operator: &str,
        target: &str,
        target_param: Option<Decimal>,
    ) -> Rule {
        Rule {
            id: 1,
            name: "Test Rule".into(),
            subject_code: subject.into(),
            subject_param,
            operator: operator.into(),
            target_code: target.into(),
            target_param,
            description: String::new(),
        }
    }

    #[test]
    fn price_above_constant_passes() {
        let registry = IndicatorRegistry::builtin();
        let data = make_data(dec!(150), &[dec!(140)]);
        let rule = make_rule("PRICE", None, ">", "CONSTANT", Some(dec!(100)));

        let result = evaluate_rule(&registry, &rule, &data).unwrap();
        assert!(result.passed);
        assert_eq!(
            result.justification,
            "Rule 'Test Rule' passed for AAPL: PRICE=150.00 > CONSTANT(100)=100.00"
        );
    }

    #[test]
    fn condition_not_met_is_a_result_not_an_error() {
        let registry = IndicatorRegistry::builtin();
        let data = make_data(dec!(90), &[dec!(89)]);
        let rule = make_rule("PRICE", None, ">", "CONSTANT", Some(dec!(100)));

        let result = evaluate_rule(&registry, &rule, &data).unwrap();
        assert!(!result.passed);
        assert!(result.justification.contains("failed"));
    }

    #[test]
    fn sma_cross_above_passes_on_transition() {
        let registry = IndicatorRegistry::builtin();
        // SMA(2) prev: (10+10)/2 = 10, curr: (10+14)/2 = 12
        // SMA(3) prev: (12+10+10)/3 ≈ 10.67, curr: (10+10+14)/3 ≈ 11.33
        let data = make_data(dec!(14), &[dec!(12), dec!(10), dec!(10), dec!(14)]);
        let rule = make_rule(
            "SMA",
            Some(dec!(2)),
            "crosses_above",
            "SMA",
            Some(dec!(3)),
        );

        let result = evaluate_rule(&registry, &rule, &data).unwrap();
        assert!(result.passed);
        assert!(result.justification.contains("previous period"));
    }

    #[test]
    fn sma_cross_above_fails_when_already_above() {
        let registry = IndicatorRegistry::builtin();
        // rising series: short SMA already above long SMA in both periods
        let data = make_data(
            dec!(20),
            &[dec!(10), dec!(12), dec!(14), dec!(16), dec!(18)],
        );
        let rule = make_rule(
            "SMA",
            Some(dec!(2)),
            "crosses_above",
            "SMA",
            Some(dec!(4)),
        );

        let result = evaluate_rule(&registry, &rule, &data).unwrap();
        assert!(!result.passed);
    }

    #[test]
    fn crossing_with_too_little_history_is_an_error() {
        let registry = IndicatorRegistry::builtin();
        // SMA(2) needs 2 points; previous period needs a third
        let data = make_data(dec!(12), &[dec!(10), dec!(11)]);
        let rule = make_rule(
            "SMA",
            Some(dec!(2)),
            "crosses_above",
            "CONSTANT",
            Some(dec!(10)),
        );

        let err = evaluate_rule(&registry, &rule, &data).unwrap_err();
        assert!(matches!(
            err.root(),
            EvalError::InsufficientHistory { .. }
        ));
    }

    #[test]
    fn unknown_indicator_is_wrapped_with_rule_context() {
        let registry = IndicatorRegistry::builtin();
        let data = make_data(dec!(100), &[dec!(99)]);
        let mut rule = make_rule("FOO", None, ">", "CONSTANT", Some(dec!(1)));
        rule.id = 42;

        let err = evaluate_rule(&registry, &rule, &data).unwrap_err();
        assert!(matches!(
            &err,
            EvalError::Rule { rule_id: 42, .. }
        ));
        assert!(matches!(
            err.root(),
            EvalError::UnknownIndicator { code } if code == "FOO"
        ));
    }

    #[test]
    fn unknown_operator_is_an_error() {
        let registry = IndicatorRegistry::builtin();
        let data = make_data(dec!(100), &[dec!(99)]);
        let rule = make_rule("PRICE", None, "between", "CONSTANT", Some(dec!(1)));

        let err = evaluate_rule(&registry, &rule, &data).unwrap_err();
        assert!(matches!(
            err.root(),
            EvalError::UnknownOperator { name } if name == "between"
        ));
    }

    #[test]
    fn malformed_rule_is_a_validation_error() {
        let registry = IndicatorRegistry::builtin();
        let data = make_data(dec!(100), &[dec!(99)]);
        let mut rule = make_rule("PRICE", None, ">", "CONSTANT", Some(dec!(1)));
        rule.name = String::new();

        let err = evaluate_rule(&registry, &rule, &data).unwrap_err();
        assert!(matches!(err.root(), EvalError::Validation { .. }));
    }

    #[test]
    fn justification_embeds_two_decimal_values() {
        let registry = IndicatorRegistry::builtin();
        let data = make_data(
            dec!(150),
            &[dec!(152.1), dec!(152.2), dec!(152.4), dec!(152.5)],
        );
        let rule = make_rule("SMA", Some(dec!(4)), ">=", "CONSTANT", Some(dec!(152)));

        let result = evaluate_rule(&registry, &rule, &data).unwrap();
        assert!(result.passed);
        assert!(result.justification.contains("SMA(4)=152.30"));
        assert!(result.justification.contains("CONSTANT(152)=152.00"));
    }
}
