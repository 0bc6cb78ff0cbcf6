use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Window shared by the login and bug report buckets.
pub const WINDOW: Duration = Duration::from_secs(15 * 60);

/// In-memory rate limiter keyed by `"<bucket>:<ip_hash>"`.
/// Buckets in use: `login` and `bug`.
pub struct RateLimiter {
    entries: Mutex<HashMap<String, Vec<Instant>>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    pub fn new() -> Self {
        RateLimiter {
            entries: Mutex::new(HashMap::new()),
        }
    }

    // A panic while holding the lock leaves only timestamps behind; keep using them.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<Instant>>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record an attempt and return true if it is still under `max_attempts` within `window`.
    pub fn check_and_record(&self, key: &str, max_attempts: u64, window: Duration) -> bool {
        let mut map = self.lock();
        let now = Instant::now();

        let attempts = map.entry(key.to_string()).or_default();
        attempts.retain(|t| now.duration_since(*t) < window);

        if (attempts.len() as u64) < max_attempts {
            attempts.push(now);
            true
        } else {
            false
        }
    }

    /// Check remaining attempts without recording a new one.
    pub fn remaining(&self, key: &str, max_attempts: u64, window: Duration) -> u64 {
        let map = self.lock();
        let now = Instant::now();
        let used = map
            .get(key)
            .map(|attempts| {
                attempts
                    .iter()
                    .filter(|t| now.duration_since(**t) < window)
                    .count()
            })
            .unwrap_or(0);
        max_attempts.saturating_sub(used as u64)
    }

    /// Forget a key, e.g. after a successful login.
    pub fn reset(&self, key: &str) {
        self.lock().remove(key);
    }

    /// Drop entries with no attempts younger than `max_age`.
    pub fn cleanup(&self, max_age: Duration) {
        let now = Instant::now();
        self.lock().retain(|_, attempts| {
            attempts.retain(|t| now.duration_since(*t) < max_age);
            !attempts.is_empty()
        });
    }

    #[cfg(test)]
    pub(crate) fn record_at(&self, key: &str, at: Instant) {
        self.lock().entry(key.to_string()).or_default().push(at);
    }

    #[cfg(test)]
    pub(crate) fn is_tracked(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }
}
