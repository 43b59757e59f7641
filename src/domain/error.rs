//! Domain error types.

use chrono::NaiveDateTime;

/// Failure raised before any indicator computation begins.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndicatorError {
    #[error("invalid parameter {parameter} for {indicator}: {reason}")]
    Parameter {
        indicator: &'static str,
        parameter: &'static str,
        reason: String,
    },

    #[error("{}", insufficient_history_message(.indicator, .provided, .required, .recommended))]
    InsufficientHistory {
        indicator: &'static str,
        provided: usize,
        required: usize,
        recommended: Option<usize>,
    },
}

fn insufficient_history_message(
    indicator: &str,
    provided: &usize,
    required: &usize,
    recommended: &Option<usize>,
) -> String {
    let mut message = format!(
        "insufficient history for {indicator}: provided {provided} periods, \
         at least {required} required"
    );
    if let Some(recommended) = recommended {
        message.push_str(&format!(
            "; {indicator} uses a smoothing technique, use at least {recommended} \
             periods before the intended usage date for maximum precision"
        ));
    }
    message
}

/// Top-level error type for stockind.
#[derive(Debug, thiserror::Error)]
pub enum StockindError {
    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("duplicate quote for {date}")]
    DuplicateQuote { date: NaiveDateTime },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StockindError> for std::process::ExitCode {
    fn from(err: &StockindError) -> Self {
        let code: u8 = match err {
            StockindError::Io(_) => 1,
            StockindError::ConfigParse { .. } | StockindError::ConfigInvalid { .. } => 2,
            StockindError::Data { .. } | StockindError::DuplicateQuote { .. } => 3,
            StockindError::Indicator(IndicatorError::Parameter { .. }) => 4,
            StockindError::Indicator(IndicatorError::InsufficientHistory { .. }) => 5,
        };
        std::process::ExitCode::from(code)
    }
}
