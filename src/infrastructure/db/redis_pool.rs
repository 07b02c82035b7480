use deadpool_redis::{Config, Pool, Runtime};
use tracing::info;

/// Builds a lazily-connecting pool and checks it with a `PING`.
pub async fn create_redis_pool(redis_url: &str) -> anyhow::Result<Pool> {
    let pool = Config::from_url(redis_url).create_pool(Some(Runtime::Tokio1))?;

    let mut conn = pool.get().await?;
    let _: String = redis::cmd("PING").query_async(&mut conn).await?;

    info!("Redis connection established.");
    Ok(pool)
}
