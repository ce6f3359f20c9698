//! reqwest-backed dispatcher
//!
//! Handles:
//! - Credentials (`Client-ID`, bearer token) and default headers
//! - Automatic retries with configurable backoff
//! - Local rate limiting ahead of the upstream quota
//! - Turning error responses into [`TransportError`]s with the response kept

use super::dispatcher::Dispatcher;
use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::envelope::{
    Envelope, Exchange, RawResponse, TransportError, RATELIMIT_REMAINING, RATELIMIT_RESET,
};
use crate::error::Result;
use crate::pagination::PageRequest;
use crate::types::{BackoffType, QueryParams};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Base URL of the Helix API
pub const DEFAULT_BASE_URL: &str = "https://api.twitch.tv/helix";

/// Configuration for the Helix client
#[derive(Debug, Clone)]
pub struct HelixClientConfig {
    /// Base URL for all requests
    pub base_url: String,
    /// Application client id, sent as `Client-ID`
    pub client_id: Option<String>,
    /// OAuth access token, sent as `Authorization: Bearer`
    pub bearer_token: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of retries
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Local rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HelixClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id: None,
            bearer_token: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(60),
            backoff_type: BackoffType::Exponential,
            rate_limit: Some(RateLimiterConfig::default()),
            default_headers: HashMap::new(),
            user_agent: format!("helix-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HelixClientConfig {
    /// Create a new config builder
    pub fn builder() -> HelixClientConfigBuilder {
        HelixClientConfigBuilder::default()
    }
}

/// Builder for [`HelixClientConfig`]
#[derive(Debug, Default)]
pub struct HelixClientConfigBuilder {
    config: HelixClientConfig,
}

impl HelixClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the client id
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.config.client_id = Some(client_id.into());
        self
    }

    /// Set the OAuth access token
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.config.bearer_token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable local rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HelixClientConfig {
        self.config
    }
}

/// Client for the Helix API.
///
/// Cheap to clone: clones share the connection pool and the rate limiter.
#[derive(Debug, Clone)]
pub struct HelixClient {
    client: Client,
    config: Arc<HelixClientConfig>,
    rate_limiter: Option<RateLimiter>,
}

impl HelixClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HelixClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: HelixClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config: Arc::new(config),
            rate_limiter,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &HelixClientConfig {
        &self.config
    }

    /// Check if local rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Request an endpoint and wrap the outcome in an envelope
    pub async fn get(&self, endpoint: &str, params: QueryParams) -> Envelope {
        self.send(PageRequest::new(endpoint, params)).await
    }

    /// Send a request; the returned envelope can page through this client
    pub async fn send(&self, request: PageRequest) -> Envelope {
        let exchange = self.dispatch(&request.endpoint, &request.params).await;
        Envelope::from_exchange(exchange).with_paginator(Arc::new(self.clone()), request)
    }

    /// Build full URL from an endpoint path
    pub fn build_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }

        let base = self.config.base_url.trim_end_matches('/');
        let endpoint = endpoint.trim_start_matches('/');
        format!("{base}/{endpoint}")
    }

    /// Calculate backoff delay for a given attempt
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.config.backoff_type {
            BackoffType::Constant => self.config.initial_backoff,
            BackoffType::Linear => self.config.initial_backoff * (attempt + 1),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.config.initial_backoff * factor
            }
        };

        std::cmp::min(delay, self.config.max_backoff)
    }

    /// Delay before retrying a throttled request
    fn throttle_delay(&self, response: &Response, attempt: u32) -> Duration {
        let delay = extract_retry_after(response)
            .unwrap_or_else(|| self.calculate_backoff(attempt));
        std::cmp::min(delay, self.config.max_backoff)
    }

    async fn execute(&self, endpoint: &str, params: &QueryParams) -> Exchange {
        let url = self.build_url(endpoint);
        let query: Vec<(&str, &str)> = params.pairs().collect();
        let max_retries = self.config.max_retries;
        let mut attempt = 0;

        loop {
            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            let mut req = self.client.get(&url).query(&query);

            for (key, value) in &self.config.default_headers {
                req = req.header(key.as_str(), value.as_str());
            }
            if let Some(ref client_id) = self.config.client_id {
                req = req.header("Client-ID", client_id.as_str());
            }
            if let Some(ref token) = self.config.bearer_token {
                req = req.bearer_auth(token);
            }

            match req.send().await {
                Ok(response) => {
                    let status = response.status();

                    if is_retryable_status(status) && attempt < max_retries {
                        let delay = if status == StatusCode::TOO_MANY_REQUESTS {
                            self.throttle_delay(&response, attempt)
                        } else {
                            self.calculate_backoff(attempt)
                        };
                        warn!(
                            "Request to {} failed with {}, attempt {}/{}, retrying in {:?}",
                            endpoint,
                            status.as_u16(),
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    let raw = read_response(response).await;

                    if status.is_client_error() || status.is_server_error() {
                        let kind = if status.is_client_error() {
                            "Client error"
                        } else {
                            "Server error"
                        };
                        debug!(status = status.as_u16(), %url, "Request returned an error response");
                        return Err(TransportError::with_response(
                            format!("{kind}: `GET {url}` resulted in a `{status}` response"),
                            raw,
                        ));
                    }

                    debug!(status = status.as_u16(), %url, "Request succeeded");
                    return Ok(raw);
                }
                Err(e) => {
                    if (e.is_timeout() || e.is_connect()) && attempt < max_retries {
                        let delay = self.calculate_backoff(attempt);
                        warn!(
                            "Request to {} failed ({}), attempt {}/{}, retrying in {:?}",
                            endpoint,
                            e,
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    warn!(%url, error = %e, "Request failed without a response");
                    return Err(TransportError::new(e.to_string()));
                }
            }
        }
    }
}

#[async_trait]
impl Dispatcher for HelixClient {
    async fn dispatch(&self, endpoint: &str, params: &QueryParams) -> Exchange {
        self.execute(endpoint, params).await
    }
}

/// Check if an HTTP status is retryable
fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status.as_u16(),
        429 | 500 | 502 | 503 | 504 | 520 | 521 | 522 | 523 | 524
    )
}

/// How long the server asked us to wait: `Retry-After` seconds, or the time
/// until `Ratelimit-Reset` once the bucket is drained
fn extract_retry_after(response: &Response) -> Option<Duration> {
    let header = |name: &str| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<i64>().ok())
    };

    if let Some(seconds) = header("retry-after") {
        return Some(Duration::from_secs(seconds.max(0) as u64));
    }

    if header(RATELIMIT_REMAINING) == Some(0) {
        let reset = header(RATELIMIT_RESET)?;
        let wait = reset - chrono::Utc::now().timestamp();
        return Some(Duration::from_secs(wait.max(1) as u64));
    }

    None
}

async fn read_response(response: Response) -> RawResponse {
    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let body = response.text().await.unwrap_or_default();

    RawResponse {
        status,
        headers,
        body,
    }
}
