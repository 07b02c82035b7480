use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_redis::Pool;
use once_cell::sync::Lazy;
use redis::{AsyncCommands, Script};
use uuid::Uuid;

use crate::{
    errors::AppError,
    limiter::{QuotaDecision, QuotaPermit, QuotaPolicy, QuotaStore},
};

const KEY_PREFIX: &str = "quota";

/// Prune, count and conditionally record in one server-side step.
/// Returns `{1, 0}` when recorded, `{0, retry_after_ms}` otherwise.
static ACQUIRE_SCRIPT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
        local key = KEYS[1]
        local now = tonumber(ARGV[1])
        local window = tonumber(ARGV[2])
        local limit = tonumber(ARGV[3])
        local member = ARGV[4]

        redis.call('ZREMRANGEBYSCORE', key, '-inf', now - window)
        local count = redis.call('ZCARD', key)
        if count < limit then
            redis.call('ZADD', key, now, member)
            redis.call('PEXPIRE', key, window)
            return {1, 0}
        end

        local oldest = redis.call('ZRANGE', key, 0, 0, 'WITHSCORES')
        return {0, tonumber(oldest[2]) + window - now}
        "#,
    )
});

/// Quota store shared by every instance pointing at the same Redis.
#[derive(Clone)]
pub struct RedisQuotaStore {
    pool: Pool,
    policy: QuotaPolicy,
    scope: String,
}

impl RedisQuotaStore {
    pub fn new(pool: Pool, policy: QuotaPolicy, scope: impl Into<String>) -> Self {
        RedisQuotaStore {
            pool,
            policy,
            scope: scope.into(),
        }
    }

    /// Identities are URL-encoded to keep the key space flat.
    fn redis_key(&self, identity: &str) -> String {
        format!("{}:{}:{}", KEY_PREFIX, self.scope, urlencoding::encode(identity))
    }
}

#[async_trait]
impl QuotaStore for RedisQuotaStore {
    async fn try_acquire(&self, key: &str, now: DateTime<Utc>) -> Result<QuotaDecision, AppError> {
        let token = Uuid::new_v4();
        let mut conn = self.pool.get().await?;

        let (recorded, retry_after_ms): (i64, i64) = ACQUIRE_SCRIPT
            .key(self.redis_key(key))
            .arg(now.timestamp_millis())
            .arg(self.policy.window.num_milliseconds())
            .arg(self.policy.limit)
            .arg(token.to_string())
            .invoke_async(&mut conn)
            .await?;

        if recorded == 1 {
            return Ok(QuotaDecision::Granted(QuotaPermit {
                key: key.to_string(),
                token,
                recorded_at: now,
            }));
        }

        let retry_after_secs = (((retry_after_ms + 999) / 1000).max(1)) as u64;
        Ok(QuotaDecision::Denied { retry_after_secs })
    }

    async fn release(&self, permit: &QuotaPermit) -> Result<(), AppError> {
        let mut conn = self.pool.get().await?;
        let _: i64 = conn
            .zrem(self.redis_key(&permit.key), permit.token.to_string())
            .await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
