//! Rate limiting for external API calls
//!
//! Provides a rate-limited HTTP client so that consecutive requests to a
//! quota-bound API are spaced at least a fixed interval apart, plus small
//! helpers for turning responses into typed results.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{SyncError, SyncResult};

/// Configuration for rate limiting
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Minimum spacing between two requests. Zero disables throttling.
    pub min_interval: Duration,
    /// Per-request deadline
    pub timeout: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(500),
            timeout: Duration::from_secs(5),
        }
    }
}

/// A rate-limited HTTP client wrapper
pub struct RateLimitedClient {
    client: Client,
    limiter: Option<Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>>,
    name: String,
}

impl RateLimitedClient {
    /// Create a new rate-limited client
    pub fn new(name: &str, config: RateLimitConfig) -> SyncResult<Self> {
        // One permit per interval with no burst: a fixed-delay throttle expressed as a token bucket.
        let limiter = Quota::with_period(config.min_interval)
            .map(|quota| Arc::new(RateLimiter::direct(quota.allow_burst(NonZeroU32::MIN))));

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SyncError::Config(format!("cannot build {name} HTTP client: {e}")))?;

        Ok(Self {
            client,
            limiter,
            name: name.to_string(),
        })
    }

    /// Wait for rate limit and make a GET request with query parameters
    pub async fn get_with_query<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        query: &T,
    ) -> SyncResult<Response> {
        self.wait_for_permit().await;
        debug!(client = %self.name, url = %url, "Making rate-limited GET request with query");

        self.client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| SyncError::request(url, e))
    }

    #[cfg(test)]
    fn is_throttled(&self) -> bool {
        self.limiter.is_some()
    }

    /// Wait for a rate limit permit
    pub async fn wait_for_permit(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

/// Helper trait for classifying HTTP responses
pub trait ResponseExt: Sized {
    /// Turn a non-2xx response into [`SyncError::Status`]
    fn ensure_success(self, url: &str) -> SyncResult<Self>;
}

impl ResponseExt for Response {
    fn ensure_success(self, url: &str) -> SyncResult<Self> {
        let status = self.status();
        if status.is_success() {
            Ok(self)
        } else {
            Err(SyncError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            })
        }
    }
}

/// Read a response body and decode it as JSON.
///
/// Shape mismatches surface as [`SyncError::Decode`] carrying the serde message.
pub async fn read_json<T: DeserializeOwned>(response: Response, url: &str) -> SyncResult<T> {
    let body = response
        .bytes()
        .await
        .map_err(|e| SyncError::request(url, e))?;

    serde_json::from_slice(&body).map_err(|e| SyncError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}
