//! Rule and indicator-definition types.

use rust_decimal::Decimal;

use crate::domain::error::EvalError;

/// Registry metadata describing an indicator code usable as a rule's subject
/// or target. This is what the resolver checks before evaluating a rule; it
/// is not itself evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDefinition {
    /// Unique key, e.g. `"SMA"`, `"RSI"`, `"PRICE"`, `"CONSTANT"`.
    pub code: String,
    /// Human-readable name, e.g. "Simple Moving Average".
    pub name: String,
    /// Whether a numeric window/value parameter is mandatory.
    pub requires_param: bool,
    pub description: String,
}

/// One subject/operator/target comparison.
///
/// Indicator codes and the operator stay strings here; they are resolved at
/// evaluation time so a reference to an unknown code fails through the error
/// taxonomy rather than at construction.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: i64,
    pub name: String,
    pub subject_code: String,
    pub subject_param: Option<Decimal>,
    pub operator: String,
    pub target_code: String,
    pub target_param: Option<Decimal>,
    pub description: String,
}

impl Rule {
    /// Well-formedness check, run before any market-data access.
    pub fn validate(&self) -> Result<(), EvalError> {
        if self.name.trim().is_empty() {
            return Err(EvalError::Validation {
                reason: "rule name cannot be empty".into(),
            });
        }
        if self.subject_code.trim().is_empty() {
            return Err(EvalError::Validation {
                reason: format!("rule '{}' has an empty subject code", self.name),
            });
        }
        if self.operator.trim().is_empty() {
            return Err(EvalError::Validation {
                reason: format!("rule '{}' has an empty operator", self.name),
            });
        }
        if self.target_code.trim().is_empty() {
            return Err(EvalError::Validation {
                reason: format!("rule '{}' has an empty target code", self.name),
            });
        }
        Ok(())
    }
}

/// Persistence identity: two rules with the same id are the same rule, even
/// if other fields differ. Structural assertions in tests go through the
/// public fields instead.
impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Rule {}

impl std::hash::Hash for Rule {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
