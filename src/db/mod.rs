use sqlx::mysql::MySqlPool;
use tracing::debug;

pub mod likes;

/// Width of `stock_likes.symbol`, in characters
pub const MAX_SYMBOL_CHARS: usize = 64;

/// One row per (symbol, liker). Binary collation keeps symbols case-sensitive.
/// The symbol width must match `MAX_SYMBOL_CHARS`.
const CREATE_STOCK_LIKES: &str = r#"
CREATE TABLE IF NOT EXISTS stock_likes (
    symbol VARCHAR(64) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL,
    liker VARCHAR(64) CHARACTER SET ascii COLLATE ascii_bin NOT NULL,
    date_created TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    PRIMARY KEY (symbol, liker)
)
"#;

/// Initialize the MySQL connection pool and create tables
pub async fn init_db(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPool::connect(database_url).await?;

    create_tables(&pool).await?;

    Ok(pool)
}

/// Create all database tables
async fn create_tables(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(CREATE_STOCK_LIKES).execute(pool).await?;
    debug!("stock_likes table ready");

    Ok(())
}
