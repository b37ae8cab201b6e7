//! Per-IP rate limiting for the public porting endpoint.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// A token bucket per client key. Burst capacity equals the per-minute rate;
/// tokens refill continuously.
pub struct RateLimiter {
    buckets: Mutex<HashMap<String, Bucket>>,
    per_minute: f64,
}

impl RateLimiter {
    pub fn new(per_minute: u32) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            per_minute: per_minute.max(1) as f64,
        }
    }

    pub fn check(&self, key: &str) -> bool {
        let mut buckets = self.buckets.lock().expect("rate limiter mutex poisoned");
        let bucket = buckets.entry(key.to_string()).or_insert(Bucket {
            tokens: self.per_minute,
            last_refill: Instant::now(),
        });

        let elapsed = bucket.last_refill.elapsed().as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.per_minute / 60.0).min(self.per_minute);
        bucket.last_refill = Instant::now();

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn allows_burst_then_refuses() {
        let limiter = RateLimiter::new(3);
        assert!(limiter.check("196.25.1.1"));
        assert!(limiter.check("196.25.1.1"));
        assert!(limiter.check("196.25.1.1"));
        assert!(!limiter.check("196.25.1.1"));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = RateLimiter::new(1);
        assert!(limiter.check("196.25.1.1"));
        assert!(!limiter.check("196.25.1.1"));
        assert!(limiter.check("196.25.1.2"));
    }

    #[test]
    fn refills_over_time() {
        let limiter = RateLimiter::new(600);
        for _ in 0..600 {
            assert!(limiter.check("196.25.1.1"));
        }
        assert!(!limiter.check("196.25.1.1"));
        // 600/min refills ten tokens per second
        std::thread::sleep(Duration::from_millis(200));
        assert!(limiter.check("196.25.1.1"));
    }
}
