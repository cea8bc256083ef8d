//! Sliding-window limiter for public form submissions.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

/// Accepts at most `limit` hits per key within `window`.
#[derive(Debug)]
pub struct RateLimiter {
    limit: usize,
    window: Duration,
    hits: DashMap<String, Vec<DateTime<Utc>>>,
}

impl RateLimiter {
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            hits: DashMap::new(),
        }
    }

    pub fn per_hour(limit: usize) -> Self {
        Self::new(limit, Duration::hours(1))
    }

    /// Record a hit for `key` unless it is over the limit.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Utc::now())
    }

    pub fn check_at(&self, key: &str, now: DateTime<Utc>) -> bool {
        let mut hits = self.hits.entry(key.to_string()).or_default();
        hits.retain(|hit| now - *hit < self.window);
        if hits.len() >= self.limit {
            return false;
        }
        hits.push(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_per_key() {
        let limiter = RateLimiter::per_hour(2);
        let now = Utc::now();
        assert!(limiter.check_at("1.2.3.4:form", now));
        assert!(limiter.check_at("1.2.3.4:form", now));
        assert!(!limiter.check_at("1.2.3.4:form", now));
        assert!(limiter.check_at("5.6.7.8:form", now));
    }

    #[test]
    fn test_window_expires() {
        let limiter = RateLimiter::per_hour(1);
        let start = Utc::now();
        assert!(limiter.check_at("k", start));
        assert!(!limiter.check_at("k", start + Duration::minutes(59)));
        assert!(limiter.check_at("k", start + Duration::minutes(61)));
    }

    #[test]
    fn test_zero_limit_rejects() {
        let limiter = RateLimiter::per_hour(0);
        assert!(!limiter.check("k"));
    }
}
