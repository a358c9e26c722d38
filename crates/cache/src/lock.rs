//! Named TTL-bounded locks for coordinating cache population
//!
//! Process-local mutual exclusion, not a cross-process consensus
//! mechanism. Contention is resolved by bounded spin-retry with
//! cooperative sleeps; no fairness is guaranteed and starvation is
//! possible, which is acceptable for the short critical sections these
//! locks are meant to guard.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

/// Proof of lock ownership. Only the holder of the matching token can
/// release the lock; an expired-then-reacquired lock yields a new token,
/// so the original holder's release fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockToken(Uuid);

#[derive(Debug)]
struct LockState {
    token: Uuid,
    expires_at: Instant,
}

/// Acquisition parameters: lock TTL and the retry budget.
/// The total wait is bounded by `max_retries * retry_delay`.
#[derive(Debug, Clone)]
pub struct LockOptions {
    pub ttl: Duration,
    pub retry_delay: Duration,
    pub max_retries: u32,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30),
            retry_delay: Duration::from_millis(50),
            max_retries: 10,
        }
    }
}

/// Named lock table. At most one live (non-expired) token exists per key
/// at any instant.
#[derive(Debug, Default)]
pub struct LockManager {
    locks: DashMap<String, LockState>,
}

impl LockManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single acquisition attempt. Claims the lock if it is free or the
    /// current holder's TTL has passed; expired locks are superseded in
    /// place.
    pub fn try_acquire(&self, key: &str, ttl: Duration) -> Option<LockToken> {
        let now = Instant::now();
        let token = Uuid::new_v4();
        let state = LockState {
            token,
            expires_at: now + ttl,
        };

        match self.locks.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().expires_at > now {
                    return None;
                }
                occupied.insert(state);
                Some(LockToken(token))
            }
            Entry::Vacant(vacant) => {
                vacant.insert(state);
                Some(LockToken(token))
            }
        }
    }

    /// Acquire with bounded retry: the initial attempt plus up to
    /// `max_retries` further attempts, sleeping `retry_delay` between
    /// them. Exhausting the budget returns `None`; contention is ordinary
    /// control flow here, not an error.
    pub async fn acquire(&self, key: &str, options: &LockOptions) -> Option<LockToken> {
        for attempt in 0..=options.max_retries {
            if let Some(token) = self.try_acquire(key, options.ttl) {
                return Some(token);
            }
            if attempt < options.max_retries {
                tokio::time::sleep(options.retry_delay).await;
            }
        }
        tracing::debug!(key = %key, retries = options.max_retries, "Lock retries exhausted");
        None
    }

    /// Release the lock only if `token` is the one currently held.
    /// Returns whether the release happened.
    pub fn release(&self, key: &str, token: &LockToken) -> bool {
        self.locks
            .remove_if(key, |_, state| state.token == token.0)
            .is_some()
    }

    /// Whether a non-expired lock is currently held for `key`
    pub fn is_locked(&self, key: &str) -> bool {
        self.locks
            .get(key)
            .is_some_and(|state| state.expires_at > Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_second_acquire_blocked_while_held() {
        let locks = LockManager::new();
        let token = locks.try_acquire("job", Duration::from_secs(30)).unwrap();

        assert!(locks.try_acquire("job", Duration::from_secs(30)).is_none());
        assert!(locks.release("job", &token));
        assert!(locks.try_acquire("job", Duration::from_secs(30)).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_lock_is_claimable() {
        let locks = LockManager::new();
        let stale = locks.try_acquire("job", Duration::from_secs(1)).unwrap();

        tokio::time::advance(Duration::from_secs(2)).await;

        let fresh = locks.try_acquire("job", Duration::from_secs(30)).unwrap();
        assert_ne!(stale, fresh);

        // The superseded holder can no longer release
        assert!(!locks.release("job", &stale));
        assert!(locks.is_locked("job"));
        assert!(locks.release("job", &fresh));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_exhaust_to_none() {
        let locks = LockManager::new();
        let _held = locks.try_acquire("job", Duration::from_secs(60)).unwrap();

        let options = LockOptions {
            ttl: Duration::from_secs(1),
            retry_delay: Duration::from_millis(10),
            max_retries: 3,
        };
        assert!(locks.acquire("job", &options).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_acquires_yield_one_token() {
        let locks = Arc::new(LockManager::new());
        let options = LockOptions {
            ttl: Duration::from_secs(60),
            retry_delay: Duration::from_millis(10),
            max_retries: 3,
        };

        let a = {
            let locks = Arc::clone(&locks);
            let options = options.clone();
            tokio::spawn(async move { locks.acquire("job:7", &options).await })
        };
        let b = {
            let locks = Arc::clone(&locks);
            let options = options.clone();
            tokio::spawn(async move { locks.acquire("job:7", &options).await })
        };

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        // The holder never releases, so exactly one caller wins
        assert!(a.is_some() ^ b.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_succeeds_after_release() {
        let locks = Arc::new(LockManager::new());
        let token = locks.try_acquire("job", Duration::from_secs(60)).unwrap();

        let waiter = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let options = LockOptions {
                    ttl: Duration::from_secs(60),
                    retry_delay: Duration::from_millis(20),
                    max_retries: 10,
                };
                locks.acquire("job", &options).await
            })
        };

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(locks.release("job", &token));

        assert!(waiter.await.unwrap().is_some());
    }
}
