//! Like ledger backends
//!
//! Both backends keep a set of distinct caller identifiers per ticker symbol
//! and make "insert then count" atomic with respect to other callers.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sqlx::mysql::MySqlPool;
use tokio::sync::Mutex;
use tracing::debug;

use crate::db;
use crate::services::LikeLedger;
use crate::utils::StockError;

/// Ledger stored in MySQL, one row per (symbol, liker)
#[derive(Clone)]
pub struct SqlLikeLedger {
    pool: MySqlPool,
}

impl SqlLikeLedger {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeLedger for SqlLikeLedger {
    async fn register_like(&self, symbol: &str, caller: &str) -> Result<u64, StockError> {
        check_symbol_width(symbol)?;

        db::likes::add_like(&self.pool, symbol, caller)
            .await
            .map_err(|e| StockError::ledger(symbol, e))?;
        debug!("Like for {} from {}", symbol, caller);

        self.like_count(symbol).await
    }

    async fn like_count(&self, symbol: &str) -> Result<u64, StockError> {
        let count = db::likes::count_likes(&self.pool, symbol)
            .await
            .map_err(|e| StockError::ledger(symbol, e))?;

        Ok(count.max(0) as u64)
    }
}

/// A symbol wider than the column could only be stored truncated, under a different key
fn check_symbol_width(symbol: &str) -> Result<(), StockError> {
    let width = symbol.chars().count();
    if width > db::MAX_SYMBOL_CHARS {
        return Err(StockError::ledger(
            symbol,
            format!("symbol is {} characters, at most {} can be stored", width, db::MAX_SYMBOL_CHARS),
        ));
    }
    Ok(())
}

/// Process-local ledger, used when no database is configured
#[derive(Default)]
pub struct MemoryLikeLedger {
    likes: Mutex<HashMap<String, HashSet<String>>>,
}

impl MemoryLikeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of symbols that have at least one like
    pub async fn symbol_count(&self) -> usize {
        self.likes.lock().await.len()
    }
}

#[async_trait]
impl LikeLedger for MemoryLikeLedger {
    async fn register_like(&self, symbol: &str, caller: &str) -> Result<u64, StockError> {
        let mut likes = self.likes.lock().await;
        let likers = likes.entry(symbol.to_string()).or_default();
        likers.insert(caller.to_string());
        Ok(likers.len() as u64)
    }

    async fn like_count(&self, symbol: &str) -> Result<u64, StockError> {
        let likes = self.likes.lock().await;
        Ok(likes.get(symbol).map_or(0, |likers| likers.len() as u64))
    }
}
