use crate::config::RateLimits;
use blogforge_errors::AppError;
use dashmap::DashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

const CLEANUP_INTERVAL_SECS: u64 = 300;

#[derive(Clone)]
struct RequestRecord {
    minute_count: u32,
    hour_count: u32,
    minute_start: Instant,
    hour_start: Instant,
}

impl Default for RequestRecord {
    fn default() -> Self {
        let now = Instant::now();
        Self {
            minute_count: 0,
            hour_count: 0,
            minute_start: now,
            hour_start: now,
        }
    }
}

/// Per-client fixed-window limiter (one minute and one hour windows).
#[derive(Clone)]
pub struct RateLimiter {
    limits: RateLimits,
    requests: Arc<DashMap<IpAddr, RequestRecord>>,
    last_cleanup: Arc<std::sync::Mutex<Instant>>,
}

impl RateLimiter {
    pub fn new(limits: RateLimits) -> Self {
        Self {
            limits,
            requests: Arc::new(DashMap::new()),
            last_cleanup: Arc::new(std::sync::Mutex::new(Instant::now())),
        }
    }

    pub fn limits(&self) -> RateLimits {
        self.limits
    }

    /// The address a request is counted against: the first
    /// `X-Forwarded-For` entry when the proxy is trusted and the entry
    /// parses, the peer address otherwise.
    pub fn client_ip(&self, peer: IpAddr, forwarded_for: Option<&str>) -> IpAddr {
        if !self.limits.trust_forwarded_for {
            return peer;
        }
        forwarded_for
            .and_then(|value| value.split(',').next())
            .and_then(|first| first.trim().parse().ok())
            .unwrap_or(peer)
    }

    pub fn check_rate_limit(&self, ip: IpAddr) -> Result<(), RateLimitError> {
        self.maybe_cleanup();

        let now = Instant::now();
        let mut record = self.requests.entry(ip).or_default();

        if now.duration_since(record.minute_start) > Duration::from_secs(60) {
            record.minute_count = 0;
            record.minute_start = now;
        }

        if now.duration_since(record.hour_start) > Duration::from_secs(3600) {
            record.hour_count = 0;
            record.hour_start = now;
        }

        if record.minute_count >= self.limits.per_minute {
            let wait_secs = 60u64.saturating_sub(now.duration_since(record.minute_start).as_secs());
            return Err(RateLimitError::TooManyRequestsPerMinute(wait_secs));
        }

        if record.hour_count >= self.limits.per_hour {
            let wait_secs =
                3600u64.saturating_sub(now.duration_since(record.hour_start).as_secs());
            return Err(RateLimitError::TooManyRequestsPerHour(wait_secs));
        }

        record.minute_count += 1;
        record.hour_count += 1;

        Ok(())
    }

    fn maybe_cleanup(&self) {
        let mut last_cleanup = self
            .last_cleanup
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if last_cleanup.elapsed() > Duration::from_secs(CLEANUP_INTERVAL_SECS) {
            let cutoff = Instant::now() - Duration::from_secs(3600);
            self.requests.retain(|_, v| v.hour_start > cutoff);
            *last_cleanup = Instant::now();
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimits::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitError {
    TooManyRequestsPerMinute(u64),
    TooManyRequestsPerHour(u64),
}

impl RateLimitError {
    pub fn message(&self) -> String {
        match self {
            Self::TooManyRequestsPerMinute(secs) => {
                format!("Too many requests. Try again in {} seconds.", secs)
            }
            Self::TooManyRequestsPerHour(secs) => {
                format!(
                    "Hourly limit reached. Try again in {} minutes.",
                    secs.div_ceil(60)
                )
            }
        }
    }
}

impl From<RateLimitError> for AppError {
    fn from(e: RateLimitError) -> Self {
        AppError::RateLimited(e.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    #[test]
    fn test_minute_window() {
        let limiter = RateLimiter::new(RateLimits {
            per_minute: 2,
            per_hour: 10,
            ..RateLimits::default()
        });
        assert!(limiter.check_rate_limit(ip(1)).is_ok());
        assert!(limiter.check_rate_limit(ip(1)).is_ok());
        assert!(matches!(
            limiter.check_rate_limit(ip(1)),
            Err(RateLimitError::TooManyRequestsPerMinute(_))
        ));
        assert!(limiter.check_rate_limit(ip(2)).is_ok());
    }

    #[test]
    fn test_hour_window() {
        let limiter = RateLimiter::new(RateLimits {
            per_minute: 10,
            per_hour: 1,
            ..RateLimits::default()
        });
        assert!(limiter.check_rate_limit(ip(1)).is_ok());
        assert!(matches!(
            limiter.check_rate_limit(ip(1)),
            Err(RateLimitError::TooManyRequestsPerHour(_))
        ));
    }

    #[test]
    fn test_converts_to_rate_limited() {
        let err: AppError = RateLimitError::TooManyRequestsPerMinute(30).into();
        assert_eq!(
            err,
            AppError::RateLimited("Too many requests. Try again in 30 seconds.".to_string())
        );
    }

    #[test]
    fn test_client_ip_ignores_forwarded_for_by_default() {
        let limiter = RateLimiter::new(RateLimits::default());
        assert_eq!(limiter.client_ip(ip(9), Some("203.0.113.7")), ip(9));
        assert_eq!(limiter.client_ip(ip(9), None), ip(9));
    }

    #[test]
    fn test_spoofed_forwarded_for_cannot_dodge_limit() {
        let limiter = RateLimiter::new(RateLimits {
            per_minute: 1,
            ..RateLimits::default()
        });
        let first = limiter.client_ip(ip(9), Some("198.51.100.1"));
        assert!(limiter.check_rate_limit(first).is_ok());
        let second = limiter.client_ip(ip(9), Some("198.51.100.2"));
        assert!(limiter.check_rate_limit(second).is_err());
    }

    #[test]
    fn test_client_ip_behind_trusted_proxy() {
        let limiter = RateLimiter::new(RateLimits {
            trust_forwarded_for: true,
            ..RateLimits::default()
        });
        assert_eq!(
            limiter.client_ip(ip(9), Some("203.0.113.7, 10.0.0.1")),
            "203.0.113.7".parse::<IpAddr>().unwrap()
        );
        assert_eq!(limiter.client_ip(ip(9), Some("garbage")), ip(9));
        assert_eq!(limiter.client_ip(ip(9), None), ip(9));
    }
}
