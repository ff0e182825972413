//! Data models for the stock price service
//!
//! `Quote` is what the upstream proxy gives us; `StockData` is what the
//! caller gets back.

pub mod quote;
pub mod stock_data;

pub use quote::Quote;
pub use stock_data::{apply_relative_likes, StockData};
