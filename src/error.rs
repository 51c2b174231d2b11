use thiserror::Error;

/// Errors produced by the trading core.
///
/// The first three variants are local contract violations and abort the
/// current cycle only; `Exchange` wraps any failure from the remote
/// collaborator (fetch or submit).
#[derive(Debug, Error)]
pub enum BotError {
    /// The candle series is empty or too short to compute anything.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// The signal evaluator was invoked on a snapshot whose indicator
    /// values are not yet defined (warm-up positions).
    #[error("indeterminate signal: {0}")]
    IndeterminateSignal(String),

    /// A caller passed a value outside the documented domain.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("exchange error: {0}")]
    Exchange(#[from] ExchangeError),
}

/// Failures from the exchange collaborator.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The exchange answered but rejected the request.
    #[error("exchange rejected request (code {code}): {message}")]
    Api { code: i64, message: String },

    /// The exchange answered 200 with a payload we could not interpret.
    #[error("malformed exchange response: {0}")]
    Malformed(String),

    /// An authenticated endpoint was called without credentials.
    #[error("missing API credentials for {0}")]
    MissingCredentials(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_error_wraps_into_bot_error() {
        let err: BotError = ExchangeError::Api {
            code: -1121,
            message: "Invalid symbol.".to_string(),
        }
        .into();

        assert!(matches!(err, BotError::Exchange(_)));
        assert!(err.to_string().contains("-1121"));
    }

    #[test]
    fn test_error_messages_name_the_contract() {
        let err = BotError::InsufficientData("empty candle series".to_string());
        assert!(err.to_string().contains("insufficient data"));

        let err = BotError::InvalidInput("price must be positive".to_string());
        assert!(err.to_string().contains("invalid input"));
    }
}
