//! Client-credentials access token cache.

use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::error::Result;

/// Renew this long before the backend-reported expiry
pub const RENEWAL_MARGIN: Duration = Duration::from_secs(60);

/// A freshly granted access token
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub access_token: String,
    pub expires_in: Duration,
}

#[derive(Debug)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh_at(&self, now: Instant) -> bool {
        now + RENEWAL_MARGIN < self.expires_at
    }
}

/// Shared token slot.
///
/// The lock is held across the exchange, so concurrent callers wait for one
/// renewal instead of each starting their own.
#[derive(Debug, Default)]
pub struct TokenCache {
    slot: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached token, or run `exchange` and cache its grant.
    pub async fn get_or_renew<F, Fut>(&self, exchange: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TokenGrant>>,
    {
        let mut slot = self.slot.lock().await;

        if let Some(token) = slot.as_ref() {
            if token.is_fresh_at(Instant::now()) {
                return Ok(token.access_token.clone());
            }
        }

        let grant = exchange().await?;
        let access_token = grant.access_token.clone();
        *slot = Some(CachedToken {
            access_token: grant.access_token,
            expires_at: Instant::now() + grant.expires_in,
        });

        Ok(access_token)
    }

    /// Drop the cached token so the next call renews it.
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn grant(token: &str, secs: u64) -> TokenGrant {
        TokenGrant {
            access_token: token.to_string(),
            expires_in: Duration::from_secs(secs),
        }
    }

    #[test]
    fn freshness_honors_margin() {
        let now = Instant::now();
        let token = CachedToken {
            access_token: "t".to_string(),
            expires_at: now + Duration::from_secs(120),
        };
        assert!(token.is_fresh_at(now));
        assert!(!token.is_fresh_at(now + Duration::from_secs(60)));
        assert!(!token.is_fresh_at(now + Duration::from_secs(90)));
    }

    #[tokio::test]
    async fn long_lived_token_is_reused() {
        let cache = TokenCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let token = cache
                .get_or_renew(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(grant("abc", 3600))
                })
                .await
                .unwrap();
            assert_eq!(token, "abc");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn token_inside_margin_is_renewed() {
        let cache = TokenCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            cache
                .get_or_renew(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(grant("short", 30))
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_exchange_leaves_cache_empty() {
        let cache = TokenCache::new();

        let err = cache
            .get_or_renew(|| async { Err(ProviderError::AuthFailed("denied".to_string())) })
            .await;
        assert!(err.is_err());

        let token = cache
            .get_or_renew(|| async { Ok(grant("second", 3600)) })
            .await
            .unwrap();
        assert_eq!(token, "second");
    }

    #[tokio::test]
    async fn invalidate_forces_renewal() {
        let cache = TokenCache::new();
        cache
            .get_or_renew(|| async { Ok(grant("first", 3600)) })
            .await
            .unwrap();
        cache.invalidate().await;

        let token = cache
            .get_or_renew(|| async { Ok(grant("second", 3600)) })
            .await
            .unwrap();
        assert_eq!(token, "second");
    }
}
