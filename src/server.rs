use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::routes::{self, HttpResponse};
use crate::services::StockPriceService;
use crate::utils::StockError;

/// Upper bound on request line plus headers
const MAX_HEAD_BYTES: u64 = 16 * 1024;

/// HTTP front end for the stock price service
pub struct HttpServer {
    listener: TcpListener,
    service: Arc<StockPriceService>,
    read_timeout: Duration,
}

impl HttpServer {
    pub async fn bind(config: &Config, service: Arc<StockPriceService>) -> Result<Self, StockError> {
        let addr = config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| StockError::Startup(format!("Failed to bind to {}: {}", addr, e)))?;

        Ok(Self {
            listener,
            service,
            read_timeout: config.request_read_timeout,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until `shutdown` resolves
    pub async fn run(self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, no longer accepting connections");
                    break;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((socket, peer)) => {
                        debug!("New connection from {}", peer);
                        let service = Arc::clone(&self.service);
                        let read_timeout = self.read_timeout;

                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(socket, peer, service, read_timeout).await {
                                debug!("Connection from {} failed", peer);
                                error!("Connection error: {}", e);
                            }
                        });
                    }
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                    }
                }
            }
        }
    }
}

/// Outcome of reading the request line and headers
#[derive(Debug, PartialEq)]
enum RequestHead {
    /// Request line of a request whose headers ended with a blank line
    Complete(String),
    /// Client closed the connection before sending anything
    Closed,
    /// Head did not end within `MAX_HEAD_BYTES`
    TooLarge,
    /// Connection ended in the middle of the head
    Truncated,
    TimedOut,
}

/// Read the request line and skip the headers, never buffering more than `MAX_HEAD_BYTES`
async fn read_head<R: AsyncBufRead + Unpin>(reader: R) -> std::io::Result<RequestHead> {
    let mut limited = reader.take(MAX_HEAD_BYTES);

    let mut request_line = String::new();
    if limited.read_line(&mut request_line).await? == 0 {
        return Ok(RequestHead::Closed);
    }

    let mut terminated = request_line.ends_with('\n');
    let mut line = String::new();
    loop {
        if !terminated {
            return Ok(if limited.limit() == 0 {
                RequestHead::TooLarge
            } else {
                RequestHead::Truncated
            });
        }

        line.clear();
        limited.read_line(&mut line).await?;
        terminated = line.ends_with('\n');
        if terminated && line.trim_end().is_empty() {
            return Ok(RequestHead::Complete(request_line));
        }
    }
}

/// Read one request, answer it and close the connection
async fn handle_connection(
    mut socket: TcpStream,
    peer: SocketAddr,
    service: Arc<StockPriceService>,
    read_timeout: Duration,
) -> std::io::Result<()> {
    let (reader, mut writer) = socket.split();
    let mut reader = BufReader::new(reader);

    let head = match tokio::time::timeout(read_timeout, read_head(&mut reader)).await {
        Ok(head) => head?,
        Err(_) => RequestHead::TimedOut,
    };

    let response = match head {
        RequestHead::Closed => return Ok(()),
        RequestHead::Complete(request_line) => match parse_request_line(&request_line) {
            Some((method, target)) => {
                routes::handle_request(&service, method, target, peer.ip().to_canonical()).await
            }
            None => HttpResponse::text(400, "Bad Request"),
        },
        RequestHead::TooLarge => HttpResponse::text(431, "Request Header Fields Too Large"),
        RequestHead::Truncated => HttpResponse::text(400, "Bad Request"),
        RequestHead::TimedOut => {
            debug!("Request head not received within {:?}", read_timeout);
            HttpResponse::text(408, "Request Timeout")
        }
    };

    writer.write_all(&response.to_bytes()).await?;
    writer.flush().await?;
    writer.shutdown().await?;

    Ok(())
}

/// Split "GET /path?query HTTP/1.1" into method and target
fn parse_request_line(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split_whitespace();
    let method = parts.next()?;
    let target = parts.next()?;
    let version = parts.next()?;

    if !version.starts_with("HTTP/1.") || parts.next().is_some() {
        return None;
    }

    Some((method, target))
}
