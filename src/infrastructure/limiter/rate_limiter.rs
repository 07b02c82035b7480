use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::{
    errors::AppError,
    limiter::{QuotaDecision, QuotaPermit, QuotaPolicy, QuotaStore},
};

#[derive(Debug, Clone, Copy)]
struct Hit {
    at: DateTime<Utc>,
    token: Uuid,
}

/// Timestamps of accepted events for one key.
#[derive(Debug, Default)]
pub struct SlidingWindowLog {
    hits: VecDeque<Hit>,
}

impl SlidingWindowLog {
    /// Events at or before `now - window` no longer count.
    fn prune(&mut self, now: DateTime<Utc>, policy: &QuotaPolicy) {
        let cutoff = now - policy.window;
        self.hits.retain(|hit| hit.at > cutoff);
    }

    fn try_record(&mut self, now: DateTime<Utc>, policy: &QuotaPolicy, token: Uuid) -> Result<(), u64> {
        self.prune(now, policy);

        if self.hits.len() >= policy.limit as usize {
            let oldest = self.hits.iter().map(|hit| hit.at).min().unwrap_or(now);
            return Err(policy.retry_after_secs(oldest, now));
        }

        self.hits.push_back(Hit { at: now, token });
        Ok(())
    }

    fn forget(&mut self, token: Uuid) -> bool {
        let before = self.hits.len();
        self.hits.retain(|hit| hit.token != token);
        self.hits.len() != before
    }

    fn live_count(&self) -> usize {
        self.hits.len()
    }
}

type Key = String;

/// Process-local quota store. Counts are lost on restart and are not shared
/// between instances.
#[derive(Clone)]
pub struct InMemoryQuotaStore {
    map: Arc<DashMap<Key, Arc<Mutex<SlidingWindowLog>>>>,
    policy: QuotaPolicy,
}

impl InMemoryQuotaStore {
    pub fn new(policy: QuotaPolicy) -> Self {
        InMemoryQuotaStore {
            map: Arc::new(DashMap::new()),
            policy,
        }
    }

    pub fn policy(&self) -> QuotaPolicy {
        self.policy
    }

    /// Number of events currently counted for `key`.
    pub fn count(&self, key: &str, now: DateTime<Utc>) -> usize {
        match self.map.get(key) {
            Some(log) => {
                let mut log = log.lock();
                log.prune(now, &self.policy);
                log.live_count()
            }
            None => 0,
        }
    }

    pub fn tracked_keys(&self) -> usize {
        self.map.len()
    }
}

#[async_trait]
impl QuotaStore for InMemoryQuotaStore {
    async fn try_acquire(&self, key: &str, now: DateTime<Utc>) -> Result<QuotaDecision, AppError> {
        let token = Uuid::new_v4();

        // The entry guard is held across the log update so eviction cannot
        // detach the log between lookup and record.
        let entry = self
            .map
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(SlidingWindowLog::default())));
        let outcome = entry.lock().try_record(now, &self.policy, token);
        drop(entry);

        Ok(match outcome {
            Ok(()) => QuotaDecision::Granted(QuotaPermit {
                key: key.to_string(),
                token,
                recorded_at: now,
            }),
            Err(retry_after_secs) => QuotaDecision::Denied { retry_after_secs },
        })
    }

    async fn release(&self, permit: &QuotaPermit) -> Result<(), AppError> {
        if let Some(log) = self.map.get(&permit.key) {
            if !log.lock().forget(permit.token) {
                tracing::debug!(key = %permit.key, "Quota permit already expired");
            }
        }
        Ok(())
    }

    async fn evict_idle(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let before = self.map.len();
        self.map.retain(|_, log| {
            let mut log = log.lock();
            log.prune(now, &self.policy);
            log.live_count() > 0
        });
        Ok(before.saturating_sub(self.map.len()))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn store() -> InMemoryQuotaStore {
        InMemoryQuotaStore::new(QuotaPolicy::new(5, 3600))
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    async fn granted(store: &InMemoryQuotaStore, key: &str, at: DateTime<Utc>) -> QuotaPermit {
        match store.try_acquire(key, at).await.unwrap() {
            QuotaDecision::Granted(permit) => permit,
            other => panic!("expected a granted slot, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn sixth_event_in_window_is_denied() {
        let store = store();
        for minute in 0..5 {
            granted(&store, "10.0.0.1", t0() + Duration::minutes(minute)).await;
        }

        let decision = store.try_acquire("10.0.0.1", t0() + Duration::minutes(10)).await.unwrap();
        assert_eq!(decision, QuotaDecision::Denied { retry_after_secs: 50 * 60 });
    }

    #[tokio::test]
    async fn window_slides_per_event() {
        let store = store();
        for minute in 0..5 {
            granted(&store, "10.0.0.1", t0() + Duration::minutes(minute)).await;
        }

        // Exactly one hour after the first event it no longer counts.
        granted(&store, "10.0.0.1", t0() + Duration::minutes(60)).await;

        let decision = store.try_acquire("10.0.0.1", t0() + Duration::minutes(60)).await.unwrap();
        assert!(matches!(decision, QuotaDecision::Denied { .. }));
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let store = store();
        for _ in 0..5 {
            granted(&store, "a", t0()).await;
        }
        assert!(matches!(
            store.try_acquire("a", t0()).await.unwrap(),
            QuotaDecision::Denied { .. }
        ));
        granted(&store, "b", t0()).await;
        assert_eq!(store.count("b", t0()), 1);
    }

    #[tokio::test]
    async fn released_permit_frees_its_slot() {
        let store = store();
        let mut permits = Vec::new();
        for _ in 0..5 {
            permits.push(granted(&store, "a", t0()).await);
        }

        store.release(&permits[2]).await.unwrap();
        assert_eq!(store.count("a", t0()), 4);
        granted(&store, "a", t0() + Duration::seconds(1)).await;
    }

    #[tokio::test]
    async fn evict_idle_drops_only_expired_keys() {
        let store = store();
        granted(&store, "old", t0()).await;
        granted(&store, "fresh", t0() + Duration::minutes(30)).await;

        let removed = store.evict_idle(t0() + Duration::minutes(61)).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.tracked_keys(), 1);
        assert_eq!(store.count("fresh", t0() + Duration::minutes(61)), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_acquires_never_exceed_limit() {
        let store = store();
        let now = t0();

        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.try_acquire("shared", now).await.unwrap() })
            })
            .collect();

        let mut granted = 0;
        for task in tasks {
            if let QuotaDecision::Granted(_) = task.await.unwrap() {
                granted += 1;
            }
        }
        assert_eq!(granted, 5);
    }
}
