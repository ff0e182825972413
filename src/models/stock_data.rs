//! Per-symbol response models

use serde::Serialize;

/// One entry of the `stockData` response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockData {
    pub stock: String,
    pub price: f64,
    pub likes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel_likes: Option<i64>,
}

impl StockData {
    pub fn new(stock: String, price: f64, likes: u64) -> Self {
        Self {
            stock,
            price,
            likes,
            rel_likes: None,
        }
    }
}

/// Fill in `rel_likes` when exactly two entries are present.
///
/// Each side sees its own count minus the other side's, so the two values
/// always sum to zero. Any other length is left untouched.
pub fn apply_relative_likes(results: &mut [StockData]) {
    if let [first, second] = results {
        let diff = first.likes as i64 - second.likes as i64;
        first.rel_likes = Some(diff);
        second.rel_likes = Some(-diff);
    }
}
