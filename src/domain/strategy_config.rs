//! Strategy definition files.
//!
//! A strategy is one INI file: a `[strategy]` section naming its rules and
//! one `[rule.<key>]` section per rule, evaluated in listed order:
//!
//! ```ini
//! [strategy]
//! name = Golden Cross
//! description = Long-term trend screen
//! rules = sma_cross, price_floor
//!
//! [rule.sma_cross]
//! name = SMA Crossover
//! subject = SMA
//! subject_param = 50
//! operator = crosses_above
//! target = SMA
//! target_param = 200
//!
//! [rule.price_floor]
//! name = Price Floor
//! subject = PRICE
//! operator = >
//! target = CONSTANT
//! target_param = 5
//! ```
//!
//! Rule ids are assigned sequentially in file order.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::error::ScreenerError;
use crate::domain::rule::Rule;
use crate::domain::strategy::Strategy;
use crate::ports::config_port::ConfigPort;

pub fn load_strategy(config: &dyn ConfigPort) -> Result<Strategy, ScreenerError> {
    let name = require(config, "strategy", "name")?;
    let description = require(config, "strategy", "description")?;
    let rule_list = require(config, "strategy", "rules")?;

    let mut rules = Vec::new();
    for (index, key) in rule_list
        .split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .enumerate()
    {
        // configparser lowercases section names on load
        let section = format!("rule.{}", key.to_lowercase());
        rules.push(load_rule(config, &section, index as i64 + 1)?);
    }

    let strategy = Strategy {
        id: 0,
        name,
        description,
        rules,
    };
    strategy.validate()?;
    Ok(strategy)
}

fn load_rule(config: &dyn ConfigPort, section: &str, id: i64) -> Result<Rule, ScreenerError> {
    let rule = Rule {
        id,
        name: require(config, section, "name")?,
        subject_code: require(config, section, "subject")?,
        subject_param: optional_decimal(config, section, "subject_param")?,
        operator: require(config, section, "operator")?,
        target_code: require(config, section, "target")?,
        target_param: optional_decimal(config, section, "target_param")?,
        description: config
            .get_string(section, "description")
            .unwrap_or_default(),
    };
    rule.validate()?;
    Ok(rule)
}

fn require(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, ScreenerError> {
    match config.get_string(section, key) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ScreenerError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn optional_decimal(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<Decimal>, ScreenerError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => Decimal::from_str(raw.trim())
            .map(Some)
            .map_err(|e| ScreenerError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: e.to_string(),
            }),
    }
}
