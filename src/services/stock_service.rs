//! Stock Service - resolves ticker symbols to prices and like counts
//!
//! Quote fetches for one request run as independent tasks and are joined in
//! input order. Like accounting only starts once every fetch has finished, and
//! relative likes are computed last, from the surviving results.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, error, warn};

use crate::models::{apply_relative_likes, Quote, StockData};
use crate::services::{LikeLedger, QuoteSource};
use crate::utils::StockError;

/// What `likes` reports when the caller did not ask to like the symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LikesVisibility {
    /// Always 0; the ledger is not consulted
    #[default]
    Hidden,
    /// The ledger's stored count
    Stored,
}

pub struct StockPriceService {
    quotes: Arc<dyn QuoteSource>,
    ledger: Arc<dyn LikeLedger>,
    visibility: LikesVisibility,
}

impl StockPriceService {
    pub fn new(
        quotes: Arc<dyn QuoteSource>,
        ledger: Arc<dyn LikeLedger>,
        visibility: LikesVisibility,
    ) -> Self {
        Self {
            quotes,
            ledger,
            visibility,
        }
    }

    /// Resolve `symbols` positionally, optionally liking each one as `caller`.
    ///
    /// Symbols whose quote or like accounting fails are left out of the result.
    /// Duplicates are resolved independently. An empty result is returned as
    /// `Ok(vec![])`; deciding what that means for the caller is up to the boundary.
    pub async fn resolve(
        &self,
        symbols: &[String],
        like: bool,
        caller: &str,
    ) -> Result<Vec<StockData>, StockError> {
        if symbols.is_empty() {
            return Err(StockError::InvalidRequest("Missing stock symbol".to_string()));
        }

        let quotes = self.fetch_all(symbols).await;

        let counted = join_all(
            quotes
                .into_iter()
                .map(|quote| self.attach_likes(quote, like, caller)),
        )
        .await;

        let mut results: Vec<StockData> = counted
            .into_iter()
            .filter_map(|result| match result {
                Ok(data) => Some(data),
                Err(e) => {
                    warn!("Dropping symbol from response: {}", e);
                    None
                }
            })
            .collect();

        apply_relative_likes(&mut results);

        debug!("Resolved {}/{} symbol(s)", results.len(), symbols.len());
        Ok(results)
    }

    /// Fetch every symbol concurrently and wait for all of them.
    /// Successful quotes come back in input order.
    async fn fetch_all(&self, symbols: &[String]) -> Vec<Quote> {
        let handles: Vec<_> = symbols
            .iter()
            .map(|symbol| {
                let quotes = Arc::clone(&self.quotes);
                let symbol = symbol.clone();
                tokio::spawn(async move { quotes.fetch_quote(&symbol).await })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .zip(symbols)
            .filter_map(|(joined, symbol)| match joined {
                Ok(Ok(quote)) => Some(quote),
                Ok(Err(e)) => {
                    warn!("Dropping symbol from response: {}", e);
                    None
                }
                Err(e) => {
                    error!("Quote task for {} did not complete: {}", symbol, e);
                    None
                }
            })
            .collect()
    }

    async fn attach_likes(
        &self,
        quote: Quote,
        like: bool,
        caller: &str,
    ) -> Result<StockData, StockError> {
        let likes = if like {
            self.ledger.register_like(&quote.symbol, caller).await?
        } else {
            match self.visibility {
                LikesVisibility::Hidden => 0,
                LikesVisibility::Stored => self.ledger.like_count(&quote.symbol).await?,
            }
        };

        Ok(StockData::new(quote.symbol, quote.price, likes))
    }
}
