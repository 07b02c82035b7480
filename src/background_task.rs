use std::sync::Arc;

use chrono::Utc;
use tokio::time::{interval, Duration};

use crate::limiter::QuotaStore;

const MIN_EVICTION_PERIOD: Duration = Duration::from_secs(1);

/// Periodically forgets quota keys whose events have all expired.
pub async fn start_quota_eviction_task(store: Arc<dyn QuotaStore>, every: Duration) {
    // tokio's interval panics on a zero period
    let mut interval = interval(every.max(MIN_EVICTION_PERIOD));

    loop {
        interval.tick().await;

        match store.evict_idle(Utc::now()).await {
            Ok(0) => {}
            Ok(count) => tracing::debug!("Evicted {} idle quota keys", count),
            Err(e) => tracing::error!("Quota eviction failed: {}", e),
        }
    }
}
