//! Fixed-window request counter, one window per key.
//!
//! Windows use wall-clock milliseconds, so a system clock adjustment can
//! shorten or stretch the current window. Known limitation.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Counter state for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    /// Epoch milliseconds after which the window rolls over.
    pub reset_time: i64,
}

/// Per-key fixed-window limiter.
#[derive(Debug, Default)]
pub struct RateLimiter {
    entries: Mutex<HashMap<String, RateLimitEntry>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one attempt against `key`. Returns `false` when the window's
    /// quota is already used up (the attempt is then not counted).
    pub fn check(&self, key: &str, max_requests: u32, window: Duration) -> bool {
        self.check_at(
            key,
            max_requests,
            window,
            chrono::Utc::now().timestamp_millis(),
        )
    }

    /// [`check`](Self::check) against an explicit clock reading.
    pub fn check_at(&self, key: &str, max_requests: u32, window: Duration, now_ms: i64) -> bool {
        let window_ms = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);
        let fresh = RateLimitEntry {
            count: 1,
            reset_time: now_ms.saturating_add(window_ms),
        };

        // Read-increment-write must be atomic per key.
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get_mut(key) {
            None => {
                entries.insert(key.to_string(), fresh);
                true
            }
            Some(entry) if now_ms > entry.reset_time => {
                *entry = fresh;
                true
            }
            Some(entry) if entry.count >= max_requests => false,
            Some(entry) => {
                entry.count += 1;
                true
            }
        }
    }

    /// Current state for `key`, if it has been seen.
    pub fn entry(&self, key: &str) -> Option<RateLimitEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(60);

    #[test]
    fn test_allows_exactly_max_requests_per_window() {
        let limiter = RateLimiter::new();
        let t0 = 1_000_000;
        for i in 0..5 {
            assert!(limiter.check_at("weather", 5, WINDOW, t0 + i), "call {i}");
        }
        assert!(!limiter.check_at("weather", 5, WINDOW, t0 + 10));
        assert_eq!(limiter.entry("weather").unwrap().count, 5);
    }

    #[test]
    fn test_denied_call_is_not_counted() {
        let limiter = RateLimiter::new();
        let t0 = 0;
        assert!(limiter.check_at("k", 1, WINDOW, t0));
        assert!(!limiter.check_at("k", 1, WINDOW, t0 + 1));
        assert!(!limiter.check_at("k", 1, WINDOW, t0 + 2));
        assert_eq!(limiter.entry("k").unwrap().count, 1);
    }

    #[test]
    fn test_window_rollover_resets_to_one() {
        let limiter = RateLimiter::new();
        let t0 = 5_000;
        assert!(limiter.check_at("k", 2, WINDOW, t0));
        assert!(limiter.check_at("k", 2, WINDOW, t0 + 1));
        assert!(!limiter.check_at("k", 2, WINDOW, t0 + 2));

        let reset = limiter.entry("k").unwrap().reset_time;
        assert_eq!(reset, t0 + 60_000);

        // Exactly at reset_time the old window still applies.
        assert!(!limiter.check_at("k", 2, WINDOW, reset));
        assert!(limiter.check_at("k", 2, WINDOW, reset + 1));
        let entry = limiter.entry("k").unwrap();
        assert_eq!(entry.count, 1);
        assert_eq!(entry.reset_time, reset + 1 + 60_000);
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::new();
        assert!(limiter.check_at("a", 1, WINDOW, 0));
        assert!(!limiter.check_at("a", 1, WINDOW, 1));
        assert!(limiter.check_at("b", 1, WINDOW, 1));
    }

    #[test]
    fn test_wall_clock_check() {
        let limiter = RateLimiter::new();
        assert!(limiter.check("tts", 2, WINDOW));
        assert!(limiter.check("tts", 2, WINDOW));
        assert!(!limiter.check("tts", 2, WINDOW));
    }

    #[test]
    fn test_concurrent_checks_never_exceed_quota() {
        let limiter = std::sync::Arc::new(RateLimiter::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || {
                    (0..50)
                        .filter(|_| limiter.check_at("shared", 100, WINDOW, 0))
                        .count()
                })
            })
            .collect();
        let allowed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(allowed, 100);
    }
}
