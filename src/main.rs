use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod db;
mod models;
mod routes;
mod server;
mod services;
mod utils;

use api::quote_proxy::QuoteProxyClient;
use config::Config;
use server::HttpServer;
use services::{LikeLedger, MemoryLikeLedger, SqlLikeLedger, StockPriceService};

/// Resolves on Ctrl-C. If the signal handler cannot be installed the server keeps running.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("stock_price_checker=info,sqlx=warn")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("📈 Starting stock price checker...");

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };

    info!("Configuration:");
    info!("  Listen: {}", config.bind_addr());
    info!("  Quote API: {}", config.quote_api_base_url);
    info!("  Quote timeout: {}s", config.quote_timeout.as_secs());
    info!("  Request read timeout: {}s", config.request_read_timeout.as_secs());
    info!("  Likes visibility: {:?}", config.likes_visibility);

    let quotes = match QuoteProxyClient::new(&config.quote_api_base_url, config.quote_timeout) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("{}", e);
            return;
        }
    };

    // The pool is owned here so it can be closed once the server stops
    let pool = match &config.database_url {
        Some(url) => {
            info!("Initializing database...");
            match db::init_db(url).await {
                Ok(pool) => {
                    info!("Database initialized successfully");
                    Some(pool)
                }
                Err(e) => {
                    let err = utils::StockError::Database(utils::extract_clean_error(&e.to_string()));
                    error!("Failed to initialize database: {}", err);
                    return;
                }
            }
        }
        None => {
            warn!("DATABASE_URL not set, likes are kept in memory and lost on restart");
            None
        }
    };

    let ledger: Arc<dyn LikeLedger> = match &pool {
        Some(pool) => Arc::new(SqlLikeLedger::new(pool.clone())),
        None => Arc::new(MemoryLikeLedger::new()),
    };

    let service = Arc::new(StockPriceService::new(quotes, ledger, config.likes_visibility));

    let server = match HttpServer::bind(&config, service).await {
        Ok(s) => s,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };

    match server.local_addr() {
        Ok(addr) => info!("✅ Listening on {}", addr),
        Err(e) => warn!("Listening, but the local address is unknown: {}", e),
    }

    server.run(shutdown_signal()).await;

    if let Some(pool) = pool {
        pool.close().await;
        info!("Database pool closed");
    }

    info!("Stopped");
}
