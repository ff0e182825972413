use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use url::Url;
use tracing::{debug, warn};

use super::models::{ApiError, QuoteResponse};
use crate::models::Quote;
use crate::services::QuoteSource;
use crate::utils::StockError;

/// Client for the stock price checker quote proxy
pub struct QuoteProxyClient {
    http_client: HttpClient,
    base_url: Url,
}

impl QuoteProxyClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://stock-price-checker-proxy.freecodecamp.rocks";

    /// Create a client against `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StockError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| StockError::InvalidConfig(format!("Invalid quote API URL '{}': {}", base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(StockError::InvalidConfig(format!(
                "Quote API URL '{}' cannot hold a path",
                base_url
            )));
        }

        let http_client = HttpClient::builder()
            .timeout(timeout)
            .default_headers(Self::create_headers())
            .build()
            .map_err(|e| StockError::InvalidConfig(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    fn create_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// `{base}/v1/stock/{symbol}/quote`, with the symbol encoded as one path segment
    fn quote_url(&self, symbol: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["v1", "stock", symbol, "quote"]);
        }
        url
    }

    /// Parse error response based on HTTP status code
    async fn handle_error_response(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ApiError {
        let status_code = status.as_u16();
        let body_text = response.text().await.unwrap_or_default();

        match status_code {
            404 => ApiError::NotFound(body_text),
            500..=599 => ApiError::ServerError(status_code as i32, body_text),
            _ => ApiError::HttpError(status_code as i32, body_text),
        }
    }

    /// GET /v1/stock/{symbol}/quote
    ///
    /// # Returns
    /// * `Ok(QuoteResponse)` - Quote with a non-null latestPrice
    /// * `Err(ApiError)` - Transport failure, non-2xx status or unusable body
    pub async fn get_quote(&self, symbol: &str) -> Result<QuoteResponse, ApiError> {
        let url = self.quote_url(symbol);
        debug!("Fetching quote: {}", url);

        let response = self.http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        let quote = response
            .json::<QuoteResponse>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))?;

        match quote.latest_price {
            Some(price) if price.is_finite() => Ok(quote),
            _ => Err(ApiError::MissingPrice),
        }
    }
}

#[async_trait]
impl QuoteSource for QuoteProxyClient {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, StockError> {
        match self.get_quote(symbol).await {
            Ok(QuoteResponse { latest_price: Some(price), .. }) => Ok(Quote {
                symbol: symbol.to_string(),
                price,
            }),
            Ok(_) => Err(StockError::QuoteUnavailable {
                symbol: symbol.to_string(),
                reason: ApiError::MissingPrice.to_string(),
            }),
            Err(e) => {
                warn!("Quote lookup failed for {}: {}", symbol, e);
                Err(StockError::QuoteUnavailable {
                    symbol: symbol.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned HTTP response and hand back the request line that was received
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            let request = String::from_utf8_lossy(&buf).to_string();
            request.lines().next().unwrap_or_default().to_string()
        });

        (base, handle)
    }

    #[tokio::test]
    async fn test_fetch_quote_success() {
        let (base, server) = serve_once("200 OK", r#"{"symbol":"GOOG","latestPrice":140.25}"#).await;
        let client = QuoteProxyClient::new(&base, Duration::from_secs(5)).unwrap();

        let quote = client.fetch_quote("GOOG").await.unwrap();
        assert_eq!(quote, Quote { symbol: "GOOG".to_string(), price: 140.25 });

        let request_line = server.await.unwrap();
        assert_eq!(request_line, "GET /v1/stock/GOOG/quote HTTP/1.1");
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_unavailable() {
        let (base, _server) = serve_once("200 OK", r#""Unknown symbol""#).await;
        let client = QuoteProxyClient::new(&base, Duration::from_secs(5)).unwrap();

        let err = client.fetch_quote("NOPE").await.unwrap_err();
        assert!(matches!(err, StockError::QuoteUnavailable { ref symbol, .. } if symbol == "NOPE"));
    }

    #[tokio::test]
    async fn test_null_price_is_unavailable() {
        let (base, _server) = serve_once("200 OK", r#"{"symbol":"ZZZZ","latestPrice":null}"#).await;
        let client = QuoteProxyClient::new(&base, Duration::from_secs(5)).unwrap();

        assert_eq!(client.get_quote("ZZZZ").await.unwrap_err(), ApiError::MissingPrice);
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let (base, _server) = serve_once("503 Service Unavailable", r#"{"error":"down"}"#).await;
        let client = QuoteProxyClient::new(&base, Duration::from_secs(5)).unwrap();

        let err = client.get_quote("GOOG").await.unwrap_err();
        assert!(matches!(err, ApiError::ServerError(503, _)));
    }

    #[tokio::test]
    async fn test_symbol_is_a_single_path_segment() {
        let client = QuoteProxyClient::new("http://localhost:9/", Duration::from_secs(1)).unwrap();
        let url = client.quote_url("BRK/B");
        assert_eq!(url.path(), "/v1/stock/BRK%2FB/quote");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = QuoteProxyClient::new("not a url", Duration::from_secs(1)).err().unwrap();
        assert!(matches!(err, StockError::InvalidConfig(_)));
    }
}
