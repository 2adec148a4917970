//! Retry policy with fixed or exponential backoff.

use std::time::Duration;

use filings_core::FilingsError;

/// Backoff strategy between retries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Same delay before every retry.
    Fixed {
        /// Delay between retries.
        delay: Duration,
    },
    /// Delay of `base * factor^attempt`, capped at `max`.
    Exponential {
        /// Delay before the first retry.
        base: Duration,
        /// Multiplier applied per attempt.
        factor: f64,
        /// Upper bound on any delay.
        max: Duration,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(500),
            factor: 2.0,
            max: Duration::from_secs(8),
        }
    }
}

impl Backoff {
    /// Delay before retry number `attempt` (0-based).
    #[must_use]
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Exponential { base, factor, max } => {
                let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
                let seconds = base.as_secs_f64() * factor.powi(exponent);
                Duration::from_secs_f64(seconds.min(max.as_secs_f64()))
            }
        }
    }
}

/// When and how often failed SEC requests are retried.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Enables or disables retries.
    pub enabled: bool,
    /// Maximum retries; total attempts are `max_retries + 1`.
    pub max_retries: u32,
    /// Backoff between retries.
    pub backoff: Backoff,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_retries: 3,
            backoff: Backoff::default(),
        }
    }
}

impl RetryConfig {
    /// Exponential backoff with the given retry count.
    #[must_use]
    pub fn exponential(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Fixed backoff with the given retry count.
    #[must_use]
    pub fn fixed(delay: Duration, max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: Backoff::Fixed { delay },
            ..Self::default()
        }
    }

    /// Disables retries.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            enabled: false,
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Returns the delay before the next attempt, or `None` to give up.
    ///
    /// Only transient errors (403, 429, network and 5xx) are retried. A
    /// server-provided retry-after takes precedence over the backoff.
    #[must_use]
    pub fn next_delay(&self, error: &FilingsError, attempt: u32) -> Option<Duration> {
        if !self.enabled || attempt >= self.max_retries || !error.is_retryable() {
            return None;
        }
        match error {
            FilingsError::RateLimited {
                retry_after: Some(after),
                ..
            } => Some(*after),
            _ => Some(self.backoff.delay(attempt)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_backoff() {
        let backoff = Backoff::Fixed {
            delay: Duration::from_millis(100),
        };
        assert_eq!(backoff.delay(0), Duration::from_millis(100));
        assert_eq!(backoff.delay(7), Duration::from_millis(100));
    }

    #[test]
    fn test_exponential_backoff() {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(100),
            factor: 2.0,
            max: Duration::from_secs(1),
        };
        assert_eq!(backoff.delay(0), Duration::from_millis(100));
        assert_eq!(backoff.delay(1), Duration::from_millis(200));
        assert_eq!(backoff.delay(3), Duration::from_millis(800));
        assert_eq!(backoff.delay(4), Duration::from_secs(1));
    }

    #[test]
    fn test_next_delay() {
        let config = RetryConfig::fixed(Duration::from_millis(10), 2);
        let denied = FilingsError::AccessDenied {
            provider: "SEC EDGAR".to_string(),
            reason: "HTTP 403".to_string(),
        };
        assert_eq!(config.next_delay(&denied, 0), Some(Duration::from_millis(10)));
        assert_eq!(config.next_delay(&denied, 1), Some(Duration::from_millis(10)));
        assert_eq!(config.next_delay(&denied, 2), None);

        let parse = FilingsError::Parse("bad".to_string());
        assert_eq!(config.next_delay(&parse, 0), None);

        let limited = FilingsError::RateLimited {
            provider: "SEC EDGAR".to_string(),
            retry_after: Some(Duration::from_secs(2)),
        };
        assert_eq!(config.next_delay(&limited, 0), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_no_retry() {
        let config = RetryConfig::no_retry();
        let err = FilingsError::Network("reset".to_string());
        assert_eq!(config.next_delay(&err, 0), None);
    }
}
