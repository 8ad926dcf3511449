//! Per-client token buckets in front of login attempts.
//!
//! Each key gets a bucket holding up to `burst` tokens that refills
//! continuously at one token per `interval`. An attempt consumes a token or
//! is rejected immediately; nothing ever waits.
//!
//! Buckets are created on first sight of a key and live for the rest of the
//! process.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

const DEFAULT_BURST: u32 = 3;
const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Bucket capacity
    burst: u32,
    /// Time to refill a single token
    interval: Duration,
}

impl RateLimitConfig {
    /// # Panics
    ///
    /// Panics if `burst` is zero or `interval` is zero.
    #[must_use]
    pub fn new(burst: u32, interval: Duration) -> Self {
        assert!(burst >= 1, "burst must be at least 1");
        assert!(!interval.is_zero(), "interval must be non-zero");
        Self { burst, interval }
    }

    pub fn burst(&self) -> u32 {
        self.burst
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BURST, DEFAULT_INTERVAL)
    }
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

impl Bucket {
    fn full(config: &RateLimitConfig, now: Instant) -> Self {
        Self {
            tokens: config.burst as f64,
            last_refill: now,
        }
    }

    /// Refill for the time elapsed since the last call, then take a token.
    /// On failure returns the wait until one token is available.
    fn try_acquire(&mut self, config: &RateLimitConfig, now: Instant) -> Result<(), Duration> {
        let elapsed = now.saturating_duration_since(self.last_refill);
        let refill = elapsed.as_secs_f64() / config.interval.as_secs_f64();
        self.tokens = (self.tokens + refill).min(config.burst as f64);
        if now > self.last_refill {
            self.last_refill = now;
        }

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            let deficit = 1.0 - self.tokens;
            Err(config.interval.mul_f64(deficit))
        }
    }
}

/// Process-wide login limiter keyed by client (address or handle).
///
/// Its bucket map has its own lock, so checks never wait on storage I/O.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// Consume one attempt for `key` if one is available.
    pub fn allow(&self, key: &str) -> bool {
        self.check(key).is_ok()
    }

    pub fn allow_at(&self, key: &str, now: Instant) -> bool {
        self.check_at(key, now).is_ok()
    }

    /// Like [`RateLimiter::allow`], returning the wait until the next
    /// attempt would be accepted on rejection.
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: &str, now: Instant) -> Result<(), Duration> {
        let mut buckets = self.buckets.lock();
        buckets
            .entry(key.to_string())
            .or_insert_with(|| Bucket::full(&self.config, now))
            .try_acquire(&self.config, now)
    }

    /// Number of keys seen so far.
    pub fn len(&self) -> usize {
        self.buckets.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
