pub mod traits;
pub mod ledger;
pub mod stock_service;

pub use traits::{LikeLedger, QuoteSource};
pub use ledger::{MemoryLikeLedger, SqlLikeLedger};
pub use stock_service::{LikesVisibility, StockPriceService};
