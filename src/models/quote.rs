//! Quote models

/// Latest traded price for a ticker symbol, fetched fresh for every request
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
}
