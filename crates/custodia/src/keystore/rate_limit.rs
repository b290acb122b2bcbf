//! Brute-force rate limiting for password unlock attempts.
//!
//! Per-DID, in-memory, mutex-guarded so concurrent failures cannot race
//! past the lockout threshold. State is deliberately not persisted: a
//! process restart resets it, which is an accepted weakness given the
//! PBKDF2 cost per guess.
//!
//! Policy: 4 failed attempts are free; from the 5th consecutive failure
//! the DID is locked for `min(60s × 2^(failures−5), 3600s)`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::warn;

use crate::error::KeyStoreError;
use crate::identity::Did;

/// Failed attempts allowed before lockout kicks in.
const FREE_ATTEMPTS: u32 = 4;

/// First lockout duration in seconds.
const BASE_LOCKOUT_SECS: u64 = 60;

/// Lockout cap in seconds (one hour).
const MAX_LOCKOUT_SECS: u64 = 3600;

/// Clock function, injectable so lockout expiry is testable.
pub type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

#[derive(Debug, Clone, Default)]
struct AttemptState {
    failed_attempts: u32,
    locked_until: u64,
    last_attempt: u64,
}

/// Per-DID exponential-backoff rate limiter.
///
/// Owned by the [`crate::keystore::KeyStore`] that uses it — there is no
/// process-wide state, so independent stores rate-limit independently.
pub struct RateLimiter {
    states: Mutex<HashMap<Did, AttemptState>>,
    clock: Clock,
}

impl RateLimiter {
    /// Create a limiter on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(crate::time::now_secs))
    }

    /// Create a limiter with an injected clock.
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Did, AttemptState>> {
        self.states.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fail with `RateLimited` if the DID is currently locked out.
    pub fn check(&self, did: &Did) -> Result<(), KeyStoreError> {
        let remaining = self.status(did);
        if remaining > 0 {
            return Err(KeyStoreError::RateLimited {
                retry_after_secs: remaining,
            });
        }
        Ok(())
    }

    /// Record a failed unlock attempt, extending the lockout if the DID
    /// is past its free attempts.
    pub fn record_failure(&self, did: &Did) {
        let now = (self.clock)();
        let mut states = self.lock();
        let state = states.entry(did.clone()).or_default();
        state.failed_attempts += 1;
        state.last_attempt = now;

        if state.failed_attempts > FREE_ATTEMPTS {
            let exponent = state.failed_attempts - FREE_ATTEMPTS - 1;
            let lockout = BASE_LOCKOUT_SECS
                .saturating_mul(1u64 << exponent.min(63))
                .min(MAX_LOCKOUT_SECS);
            state.locked_until = now + lockout;
            warn!(
                "rate limit: {} failed attempts for {}, locked for {}s",
                state.failed_attempts, did, lockout
            );
        }
    }

    /// Clear all failure state for a DID (called on successful unlock).
    pub fn clear(&self, did: &Did) {
        self.lock().remove(did);
    }

    /// Remaining lockout seconds for a DID. Never mutates state.
    pub fn status(&self, did: &Did) -> u64 {
        let now = (self.clock)();
        self.lock()
            .get(did)
            .map(|state| state.locked_until.saturating_sub(now))
            .unwrap_or(0)
    }

    /// Time of the last failed attempt for a DID, Unix seconds.
    pub fn last_attempt(&self, did: &Did) -> Option<u64> {
        self.lock().get(did).map(|state| state.last_attempt)
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
