//! GET /api/stock-prices
//!
//! `stock` may be given once or twice; `like=true` likes every requested stock
//! on behalf of the caller's address.

use serde_json::json;
use tracing::error;
use url::form_urlencoded;

use super::HttpResponse;
use crate::models::StockData;
use crate::services::StockPriceService;
use crate::utils::StockError;

/// Most symbols a single request may compare
pub const MAX_SYMBOLS: usize = 2;

const INTERNAL_ERROR_MESSAGE: &str = "An error occurred while processing the request.";

/// Validated query parameters
#[derive(Debug, Clone, PartialEq)]
pub struct StockQuery {
    pub symbols: Vec<String>,
    pub like: bool,
}

/// Parse and validate the query string. Symbols are kept exactly as sent,
/// including order, case and surrounding whitespace.
pub fn parse_query(query: &str) -> Result<StockQuery, StockError> {
    let mut symbols = Vec::new();
    let mut like: Option<bool> = None;

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match &*key {
            "stock" => symbols.push(value.into_owned()),
            "like" if like.is_none() => like = Some(value == "true"),
            _ => {}
        }
    }

    if symbols.is_empty() || symbols.iter().any(|s| s.is_empty()) {
        return Err(StockError::InvalidRequest("Missing stock symbol".to_string()));
    }

    if symbols.len() > MAX_SYMBOLS {
        return Err(StockError::InvalidRequest(format!(
            "At most {} stock symbols can be compared",
            MAX_SYMBOLS
        )));
    }

    Ok(StockQuery {
        symbols,
        like: like.unwrap_or(false),
    })
}

/// Shape the resolved results as the `stockData` body.
/// Two results become a list, one result a bare object.
pub fn render_stock_data(mut results: Vec<StockData>, requested: usize) -> Result<serde_json::Value, StockError> {
    match results.len() {
        0 => Err(StockError::AggregateFailure { requested }),
        1 => Ok(json!({ "stockData": results.remove(0) })),
        _ => Ok(json!({ "stockData": results })),
    }
}

fn error_response(err: &StockError) -> HttpResponse {
    let message = match err {
        StockError::InvalidRequest(msg) => msg.as_str(),
        _ => INTERNAL_ERROR_MESSAGE,
    };
    HttpResponse::json(err.status_code(), &json!({ "error": message }))
}

pub async fn execute(service: &StockPriceService, query: &str, caller: &str) -> HttpResponse {
    let params = match parse_query(query) {
        Ok(params) => params,
        Err(e) => return error_response(&e),
    };

    let rendered = service
        .resolve(&params.symbols, params.like, caller)
        .await
        .and_then(|results| render_stock_data(results, params.symbols.len()));

    match rendered {
        Ok(body) => HttpResponse::json(200, &body),
        Err(e) => {
            if e.status_code() >= 500 {
                error!("Error processing request for {:?}: {}", params.symbols, e);
            }
            error_response(&e)
        }
    }
}
