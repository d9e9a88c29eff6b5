use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::AppState;

/// In-memory fixed-window rate limit state (for single-instance deployments)
#[derive(Clone)]
pub struct RateLimitState {
    entries: Arc<Mutex<HashMap<String, RateLimitEntry>>>,
    max_requests: u32,
    window: Duration,
}

struct RateLimitEntry {
    count: u32,
    window_start: Instant,
}

impl RateLimitState {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    /// Check if the key is rate limited. Returns Ok(remaining) or Err(retry_after).
    pub async fn check(&self, key: &str) -> Result<u32, Duration> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        let entry = entries.entry(key.to_string()).or_insert(RateLimitEntry {
            count: 0,
            window_start: now,
        });

        // Reset window if expired
        if now.duration_since(entry.window_start) > self.window {
            entry.count = 0;
            entry.window_start = now;
        }

        if entry.count >= self.max_requests {
            let retry_after = self
                .window
                .saturating_sub(now.duration_since(entry.window_start));
            return Err(retry_after);
        }

        entry.count += 1;
        Ok(self.max_requests - entry.count)
    }

    /// Drop entries whose window expired long ago (call from a background task)
    pub async fn cleanup(&self) {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let keep_for = self.window * 2;

        entries.retain(|_, entry| now.duration_since(entry.window_start) < keep_for);
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

/// Rate limiting middleware for the analysis endpoints
pub async fn rate_limit_api(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = addr.ip().to_string();
    let path = req.uri().path().to_string();

    // Rate limit key: IP + path (so each endpoint has its own budget)
    let key = format!("{}:{}", ip, path);

    match state.rate_limiter.check(&key).await {
        Ok(remaining) => {
            tracing::debug!(ip = %ip, path = %path, remaining = remaining, "Rate limit check passed");
            Ok(next.run(req).await)
        }
        Err(retry_after) => {
            // Round up so clients never retry too early
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            tracing::warn!(
                ip = %ip,
                path = %path,
                retry_after_secs = secs,
                "Rate limit exceeded"
            );
            Err(AppError::RateLimited {
                retry_after_secs: secs.max(1),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_REQUESTS: u32 = 5;

    #[tokio::test]
    async fn test_rate_limit_allows_under_limit() {
        let limiter = RateLimitState::new(MAX_REQUESTS, 60);

        for i in 0..MAX_REQUESTS {
            let result = limiter.check("test_key").await;
            assert!(result.is_ok(), "Request {} should be allowed", i + 1);
        }
    }

    #[tokio::test]
    async fn test_rate_limit_blocks_over_limit() {
        let limiter = RateLimitState::new(MAX_REQUESTS, 60);

        for _ in 0..MAX_REQUESTS {
            let _ = limiter.check("test_key").await;
        }

        let retry_after = limiter.check("test_key").await.unwrap_err();
        assert!(retry_after <= Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_remaining_counts_down() {
        let limiter = RateLimitState::new(3, 60);
        assert_eq!(limiter.check("k").await, Ok(2));
        assert_eq!(limiter.check("k").await, Ok(1));
        assert_eq!(limiter.check("k").await, Ok(0));
    }

    #[tokio::test]
    async fn test_different_keys_have_separate_limits() {
        let limiter = RateLimitState::new(MAX_REQUESTS, 60);

        for _ in 0..MAX_REQUESTS {
            let _ = limiter.check("key1").await;
        }

        let result = limiter.check("key2").await;
        assert!(result.is_ok(), "Different key should have separate limit");
    }

    #[tokio::test]
    async fn test_zero_window_resets_immediately() {
        let limiter = RateLimitState::new(1, 0);
        assert!(limiter.check("k").await.is_ok());
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(limiter.check("k").await.is_ok());
    }

    #[tokio::test]
    async fn test_cleanup_drops_expired_entries() {
        let limiter = RateLimitState::new(1, 0);
        let _ = limiter.check("k").await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        limiter.cleanup().await;
        assert!(limiter.entries.lock().await.is_empty());
    }
}
