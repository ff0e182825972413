use async_trait::async_trait;

use crate::models::Quote;
use crate::utils::StockError;

/// Anything that can resolve a ticker symbol to its latest price.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch the latest price for `symbol`.
    ///
    /// Every failure (transport, non-2xx, missing price) is reported as
    /// `StockError::QuoteUnavailable` carrying the symbol. No retries.
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, StockError>;
}

/// Per-symbol set of distinct callers that liked it.
#[async_trait]
pub trait LikeLedger: Send + Sync {
    /// Add `caller` to the likers of `symbol` (creating the record if needed)
    /// and return the number of distinct likers. Repeating the same pair is a no-op.
    async fn register_like(&self, symbol: &str, caller: &str) -> Result<u64, StockError>;

    /// Number of distinct likers of `symbol`; 0 when no record exists. Never writes.
    async fn like_count(&self, symbol: &str) -> Result<u64, StockError>;
}
