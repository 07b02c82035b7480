pub mod rate_limiter;
pub mod redis_quota;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::errors::AppError;

pub use rate_limiter::InMemoryQuotaStore;
pub use redis_quota::RedisQuotaStore;

/// At most `limit` accepted events per key in any trailing `window`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotaPolicy {
    pub limit: u32,
    pub window: Duration,
}

impl QuotaPolicy {
    pub fn new(limit: u32, window_secs: u64) -> Self {
        QuotaPolicy {
            limit,
            window: Duration::seconds(window_secs as i64),
        }
    }

    /// Seconds until the oldest recorded event leaves the window, at least 1.
    pub fn retry_after_secs(&self, oldest: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
        let remaining_ms = (oldest + self.window - now).num_milliseconds();
        (((remaining_ms + 999) / 1000).max(1)) as u64
    }
}

/// A recorded slot. Handing it back to [`QuotaStore::release`] forgets the event.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotaPermit {
    pub key: String,
    pub token: Uuid,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuotaDecision {
    Granted(QuotaPermit),
    Denied { retry_after_secs: u64 },
}

/// Per-key sliding window log with an atomic check-and-record.
#[async_trait]
pub trait QuotaStore: Send + Sync {
    /// Records an event for `key` at `now` if fewer than `limit` events fall
    /// within the trailing window, otherwise reports when to retry.
    async fn try_acquire(&self, key: &str, now: DateTime<Utc>) -> Result<QuotaDecision, AppError>;

    /// Removes a previously granted event.
    async fn release(&self, permit: &QuotaPermit) -> Result<(), AppError>;

    /// Drops keys with no live events. Returns how many were removed.
    async fn evict_idle(&self, _now: DateTime<Utc>) -> Result<usize, AppError> {
        Ok(0)
    }

    fn backend(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_after_rounds_up_and_never_hits_zero() {
        let policy = QuotaPolicy::new(5, 3600);
        let now = Utc::now();

        assert_eq!(policy.retry_after_secs(now - Duration::minutes(59), now), 60);
        assert_eq!(
            policy.retry_after_secs(now - Duration::seconds(3599) - Duration::milliseconds(500), now),
            1
        );
        assert_eq!(policy.retry_after_secs(now - Duration::hours(2), now), 1);
        assert_eq!(
            policy.retry_after_secs(now - Duration::minutes(10) + Duration::milliseconds(1), now),
            3001
        );
    }
}
