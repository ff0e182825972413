use sqlx::mysql::MySqlPool;

/// Record that `liker` likes `symbol`.
///
/// Relies on the (symbol, liker) primary key: a repeated pair only rewrites the
/// existing row, so concurrent calls never lose or duplicate a liker. Unlike
/// `INSERT IGNORE`, values that do not fit the columns are an error, not truncated.
pub async fn add_like(
    pool: &MySqlPool,
    symbol: &str,
    liker: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO stock_likes (symbol, liker) VALUES (?, ?) \
         ON DUPLICATE KEY UPDATE symbol = symbol",
    )
    .bind(symbol)
    .bind(liker)
    .execute(pool)
    .await?;

    Ok(())
}

/// Count distinct likers for a symbol (0 when it was never liked)
pub async fn count_likes(pool: &MySqlPool, symbol: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stock_likes WHERE symbol = ?")
        .bind(symbol)
        .fetch_one(pool)
        .await
}
