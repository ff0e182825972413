use thiserror::Error;

/// Errors raised while answering a stock price request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StockError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Quote unavailable for {symbol}: {reason}")]
    QuoteUnavailable { symbol: String, reason: String },

    #[error("Like ledger unavailable for {symbol}: {reason}")]
    LedgerUnavailable { symbol: String, reason: String },

    #[error("None of the {requested} requested symbol(s) could be resolved")]
    AggregateFailure { requested: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Startup error: {0}")]
    Startup(String),
}

impl StockError {
    /// HTTP status the request boundary answers with for this error
    pub fn status_code(&self) -> u16 {
        match self {
            StockError::InvalidRequest(_) => 400,
            StockError::QuoteUnavailable { .. }
            | StockError::LedgerUnavailable { .. }
            | StockError::AggregateFailure { .. }
            | StockError::InvalidConfig(_)
            | StockError::Database(_)
            | StockError::Startup(_) => 500,
        }
    }

    /// Wrap a database failure for a single symbol
    pub fn ledger(symbol: &str, err: impl std::fmt::Display) -> Self {
        StockError::LedgerUnavailable {
            symbol: symbol.to_string(),
            reason: extract_clean_error(&err.to_string()),
        }
    }
}

/// Extract clean error message from database error strings
///
/// Removes technical error codes and prefixes like:
/// "error returned from database: 1146 (42S02): Table 'stocks.stock_likes' doesn't exist"
///
/// Returns only the meaningful error message:
/// "Table 'stocks.stock_likes' doesn't exist"
pub fn extract_clean_error(error_msg: &str) -> String {
    if error_msg.contains("error returned from database:") {
        // Everything after the last colon is the server's own message
        if let Some(last_colon) = error_msg.rfind(": ") {
            error_msg[last_colon + 2..].trim().to_string()
        } else {
            error_msg.to_string()
        }
    } else {
        error_msg.to_string()
    }
}
