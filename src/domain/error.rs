//! Domain error types.

/// Typed failure set of the evaluation engine.
///
/// A rule whose condition is simply not met is a normal `passed = false`
/// outcome and never surfaces here. These variants mean the evaluation
/// itself could not be carried out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("invalid input: {reason}")]
    Validation { reason: String },

    #[error("unknown indicator code '{code}'")]
    UnknownIndicator { code: String },

    #[error("unknown operator '{name}'")]
    UnknownOperator { name: String },

    #[error("indicator '{code}' requires a parameter")]
    MissingParameter { code: String },

    #[error("insufficient history for {indicator}: have {have} points, need {need}")]
    InsufficientHistory {
        indicator: String,
        have: usize,
        need: usize,
    },

    /// Context wrapper tying any of the above to the rule being evaluated.
    #[error("rule {rule_id} ('{rule_name}'): {source}")]
    Rule {
        rule_id: i64,
        rule_name: String,
        #[source]
        source: Box<EvalError>,
    },
}

impl EvalError {
    /// Strips any rule-context wrappers down to the underlying failure.
    pub fn root(&self) -> &EvalError {
        match self {
            EvalError::Rule { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Top-level error type for screener.
#[derive(Debug, thiserror::Error)]
pub enum ScreenerError {
    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no market data for {ticker}")]
    NoData { ticker: String },

    #[error("ticker {ticker} is on the prohibited list")]
    TickerProhibited { ticker: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ScreenerError> for std::process::ExitCode {
    fn from(err: &ScreenerError) -> Self {
        let code: u8 = match err {
            ScreenerError::Io(_) => 1,
            ScreenerError::ConfigParse { .. }
            | ScreenerError::ConfigMissing { .. }
            | ScreenerError::ConfigInvalid { .. } => 2,
            ScreenerError::Data { .. } | ScreenerError::NoData { .. } => 3,
            ScreenerError::Eval(e) => match e.root() {
                EvalError::InsufficientHistory { .. } => 5,
                _ => 4,
            },
            ScreenerError::TickerProhibited { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
