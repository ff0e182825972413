use std::net::IpAddr;

use reqwest::StatusCode;
use serde_json::Value;
use tracing::info;

use crate::services::StockPriceService;

pub mod stock_prices;

pub const STOCK_PRICES_PATH: &str = "/api/stock-prices";

/// Response produced by a route, before it is written to the socket
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            content_type: "application/json; charset=utf-8",
            body: body.to_string(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.to_string(),
        }
    }

    pub fn not_found() -> Self {
        Self::text(404, "Not Found")
    }

    /// Serialize as an HTTP/1.1 response that closes the connection
    pub fn to_bytes(&self) -> Vec<u8> {
        let reason = StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown");

        format!(
            "HTTP/1.1 {} {}\r\n\
             Content-Type: {}\r\n\
             Content-Length: {}\r\n\
             Access-Control-Allow-Origin: *\r\n\
             Connection: close\r\n\
             \r\n\
             {}",
            self.status,
            reason,
            self.content_type,
            self.body.len(),
            self.body
        )
        .into_bytes()
    }
}

/// Dispatch a request to its route. `target` is the raw request target (path and query).
pub async fn handle_request(
    service: &StockPriceService,
    method: &str,
    target: &str,
    caller: IpAddr,
) -> HttpResponse {
    let (path, query) = target.split_once('?').unwrap_or((target, ""));
    info!("{} {}", method, path);

    match (method, path) {
        ("GET", STOCK_PRICES_PATH) => stock_prices::execute(service, query, &caller.to_string()).await,
        _ => HttpResponse::not_found(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_bytes() {
        let response = HttpResponse::text(404, "Not Found");
        let raw = String::from_utf8(response.to_bytes()).unwrap();

        assert!(raw.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(raw.contains("Content-Length: 9\r\n"));
        assert!(raw.contains("Access-Control-Allow-Origin: *\r\n"));
        assert!(raw.ends_with("\r\n\r\nNot Found"));
    }
}
