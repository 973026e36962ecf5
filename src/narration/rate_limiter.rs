// Minimum-interval pacing for text generation requests.
//
// Hosted completion APIs throttle aggressive clients. Each request waits
// until at least `interval` has passed since the previous one was let through.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Spaces requests at least `1 / requests_per_second` apart.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<RateLimiterInner>>,
}

struct RateLimiterInner {
    interval: Duration,
    last_request: Option<Instant>,
}

impl RateLimiter {
    /// Non-positive or non-finite rates disable pacing.
    pub fn new(requests_per_second: f64) -> Self {
        let interval = if requests_per_second.is_finite() && requests_per_second > 0.0 {
            Duration::from_secs_f64(1.0 / requests_per_second)
        } else {
            Duration::ZERO
        };
        Self {
            inner: Arc::new(Mutex::new(RateLimiterInner {
                interval,
                last_request: None,
            })),
        }
    }

    /// Wait until the next request is allowed.
    pub async fn acquire(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(last) = inner.last_request {
            let elapsed = last.elapsed();
            if elapsed < inner.interval {
                let wait = inner.interval - elapsed;
                // Lock stays held: callers are served one at a time
                tokio::time::sleep(wait).await;
            }
        }
        inner.last_request = Some(Instant::now());
    }
}
