use serde::Deserialize;

/// Body of GET /v1/stock/{symbol}/quote
///
/// The proxy mirrors a much larger upstream payload; only the fields the
/// service reads are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteResponse {
    pub symbol: Option<String>,
    #[serde(rename = "latestPrice")]
    pub latest_price: Option<f64>,
}

/// Error type for quote proxy operations
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 404 Not Found
    NotFound(String),
    /// 5xx Server Error
    ServerError(i32, String),
    /// Other non-2xx HTTP errors
    HttpError(i32, String),
    /// Network/request error, including timeouts
    RequestError(String),
    /// Body was not a quote object (the proxy answers "Unknown symbol" as a bare string)
    DeserializationError(String),
    /// Quote object without a usable latestPrice
    MissingPrice,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::ServerError(code, msg) => write!(f, "Server Error ({}): {}", code, msg),
            ApiError::HttpError(code, msg) => write!(f, "HTTP Error ({}): {}", code, msg),
            ApiError::RequestError(msg) => write!(f, "Request Error: {}", msg),
            ApiError::DeserializationError(msg) => write!(f, "Deserialization Error: {}", msg),
            ApiError::MissingPrice => write!(f, "Response has no latestPrice"),
        }
    }
}
