//! HTTP dispatch module
//!
//! Provides the [`Dispatcher`] seam and the reqwest-backed [`HelixClient`].
//!
//! # Features
//!
//! - **Automatic Retries**: 429 and 5xx responses, timeouts and connect errors
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **Rate Limiting**: Local token bucket using governor, on top of the
//!   upstream `Ratelimit-*` headers
//! - **Credentials**: `Client-ID` and bearer token headers on every request

mod client;
mod dispatcher;
mod rate_limit;

pub use client::{HelixClient, HelixClientConfig, HelixClientConfigBuilder, DEFAULT_BASE_URL};
pub use dispatcher::Dispatcher;
pub use rate_limit::{RateLimiter, RateLimiterConfig};
