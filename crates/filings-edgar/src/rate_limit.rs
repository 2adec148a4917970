//! Minimum-spacing rate limiter shared by SEC requests.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};

/// Default spacing between requests: 10 requests per second (SEC requirement).
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Enforces a minimum interval between consecutive requests.
///
/// Callers are served one at a time; the lock is held while waiting so that
/// concurrent callers queue up instead of bursting.
#[derive(Debug)]
pub struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    /// Creates a limiter with the given minimum spacing.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval,
        }
    }

    /// Creates a limiter wrapped in an `Arc` for sharing between clients.
    #[must_use]
    pub fn shared(min_interval: Duration) -> Arc<Self> {
        Arc::new(Self::new(min_interval))
    }

    /// Returns the minimum spacing.
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until a request may be sent and records it.
    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}
