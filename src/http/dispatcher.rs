//! The transport seam
//!
//! Pagination only ever talks to a [`Dispatcher`]; [`HelixClient`] is the
//! network-backed one.
//!
//! [`HelixClient`]: super::HelixClient

use crate::envelope::Exchange;
use crate::types::QueryParams;
use async_trait::async_trait;

/// Performs one request for an endpoint and parameter set
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Send a GET for `endpoint` with `params` and report the outcome.
    ///
    /// Error responses and network failures come back as `Err`; they are
    /// never panics.
    async fn dispatch(&self, endpoint: &str, params: &QueryParams) -> Exchange;
}
