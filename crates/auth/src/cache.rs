//! Per-client access token cache.
//!
//! The cache is owned by one executor instance, never shared through a
//! process global. Acquisition is single-flight: the slot lock is held while a
//! token is being fetched, so concurrent first callers wait for the one
//! in-flight exchange instead of starting their own.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::Mutex;

use crate::token::AccessToken;

#[derive(Debug, Default)]
pub struct TokenCache {
    slot: Mutex<Option<AccessToken>>,
    exchanges: AtomicU64,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached token if still fresh, otherwise run `fetch` and cache its result.
    ///
    /// A failed fetch leaves the cache empty.
    pub async fn get_or_fetch<F, Fut, E>(&self, fetch: F) -> Result<AccessToken, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<AccessToken, E>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(token) = slot.as_ref().filter(|t| t.is_fresh(Utc::now())) {
            return Ok(token.clone());
        }

        *slot = None;
        let token = fetch().await?;
        self.exchanges.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(expires_at = ?token.expires_at(), "access token cached");
        *slot = Some(token.clone());
        Ok(token)
    }

    /// Drop the cached token if it is still `value`.
    ///
    /// A token refreshed by another caller in the meantime is kept.
    pub async fn invalidate(&self, value: &str) {
        let mut slot = self.slot.lock().await;
        if slot.as_ref().is_some_and(|t| t.value() == value) {
            *slot = None;
        }
    }

    /// Number of successful fetches performed so far.
    pub fn exchange_count(&self) -> u64 {
        self.exchanges.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use chrono::Duration;

    use super::*;

    fn token(value: &str, ttl_secs: i64) -> AccessToken {
        AccessToken::new(value, Some(Utc::now() + Duration::seconds(ttl_secs)))
    }

    #[tokio::test]
    async fn fresh_token_is_reused() {
        let cache = TokenCache::new();
        let first = cache
            .get_or_fetch(|| async { Ok::<_, ()>(token("a", 3600)) })
            .await
            .unwrap();
        let second = cache
            .get_or_fetch(|| async { Ok::<_, ()>(token("b", 3600)) })
            .await
            .unwrap();

        assert_eq!(first.value(), "a");
        assert_eq!(second.value(), "a");
        assert_eq!(cache.exchange_count(), 1);
    }

    #[tokio::test]
    async fn stale_token_is_refreshed() {
        let cache = TokenCache::new();
        cache
            .get_or_fetch(|| async { Ok::<_, ()>(token("old", 5)) })
            .await
            .unwrap();
        let refreshed = cache
            .get_or_fetch(|| async { Ok::<_, ()>(token("new", 3600)) })
            .await
            .unwrap();

        assert_eq!(refreshed.value(), "new");
        assert_eq!(cache.exchange_count(), 2);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let cache = TokenCache::new();
        let err = cache
            .get_or_fetch(|| async { Err::<AccessToken, _>("boom") })
            .await
            .unwrap_err();
        assert_eq!(err, "boom");
        assert_eq!(cache.exchange_count(), 0);

        let ok = cache
            .get_or_fetch(|| async { Ok::<_, &str>(token("a", 3600)) })
            .await
            .unwrap();
        assert_eq!(ok.value(), "a");
    }

    #[tokio::test]
    async fn invalidate_only_drops_matching_token() {
        let cache = TokenCache::new();
        cache
            .get_or_fetch(|| async { Ok::<_, ()>(token("a", 3600)) })
            .await
            .unwrap();

        cache.invalidate("other").await;
        let kept = cache
            .get_or_fetch(|| async { Ok::<_, ()>(token("b", 3600)) })
            .await
            .unwrap();
        assert_eq!(kept.value(), "a");

        cache.invalidate("a").await;
        let replaced = cache
            .get_or_fetch(|| async { Ok::<_, ()>(token("b", 3600)) })
            .await
            .unwrap();
        assert_eq!(replaced.value(), "b");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_calls_fetch_once() {
        let cache = Arc::new(TokenCache::new());
        let fetches = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            let fetches = Arc::clone(&fetches);
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_fetch(|| async move {
                        fetches.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                        Ok::<_, ()>(token("shared", 3600))
                    })
                    .await
                    .unwrap()
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap().value(), "shared");
        }
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(cache.exchange_count(), 1);
    }
}
