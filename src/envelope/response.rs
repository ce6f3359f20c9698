//! The response envelope
//!
//! One [`Envelope`] per HTTP call. Parsing is best-effort: the transport
//! outcome decides success, the body only fills in data.

use super::types::{
    Cursor, ErrorDetail, Exchange, Payload, RateLimit, RateLimitField, RateLimitInfo, RawResponse,
    TransportError, API_UNAVAILABLE,
};
use crate::error::{Error, Result};
use crate::http::Dispatcher;
use crate::pagination::{PageRequest, Paginator};
use crate::types::JsonValue;
use futures::stream::{self, Stream};
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

/// Normalized wrapper around one HTTP response
#[derive(Debug)]
pub struct Envelope {
    success: bool,
    status: u16,
    error: Option<ErrorDetail>,
    payload: Payload,
    total: u64,
    cursor: Option<Cursor>,
    rate_limit: Option<RateLimit>,
    paginator: Option<Paginator>,
}

impl Envelope {
    /// Build an envelope from a response and the transport error, if any.
    ///
    /// Never fails: a body that is not JSON produces an empty payload.
    pub fn parse(response: RawResponse, error: Option<TransportError>) -> Self {
        let rate_limit = RateLimit::from_headers(&response.headers);
        let (payload, total, cursor) = decode_body(&response.body);

        Self {
            success: error.is_none(),
            status: response.status,
            error: error.map(ErrorDetail::new),
            payload,
            total,
            cursor,
            rate_limit,
            paginator: None,
        }
    }

    /// Build an envelope from a dispatcher outcome.
    ///
    /// A failure is parsed against the response it carries, or against an
    /// empty status-0 response when there is none.
    pub fn from_exchange(exchange: Exchange) -> Self {
        match exchange {
            Ok(response) => Self::parse(response, None),
            Err(error) => {
                let response = error.response.clone().unwrap_or_default();
                Self::parse(response, Some(error))
            }
        }
    }

    /// Attach a paginator that replays `request` through `dispatcher`
    #[must_use]
    pub fn with_paginator(mut self, dispatcher: Arc<dyn Dispatcher>, request: PageRequest) -> Self {
        self.paginator = Paginator::from_envelope(&self, Some(request), dispatcher);
        self
    }

    /// Whether the request went through without a transport failure
    pub fn success(&self) -> bool {
        self.success
    }

    /// HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Failure details, set iff `success()` is false
    pub fn error(&self) -> Option<&ErrorDetail> {
        self.error.as_ref()
    }

    /// Diagnostic text for a failed request.
    ///
    /// Meant for unsuccessful envelopes. On a successful one it returns the
    /// generic `"API Unavailable"` text, same as a failure with no response.
    pub fn error_message(&self) -> String {
        self.error
            .as_ref()
            .map_or_else(|| API_UNAVAILABLE.to_string(), |e| e.message().to_string())
    }

    /// Decoded body
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Upstream-reported total (0 when absent)
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Pagination cursor, if the response had a usable one
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// Iterate over the items without consuming them
    pub fn items(&self) -> impl Iterator<Item = &JsonValue> {
        self.payload.items().into_iter().flatten()
    }

    pub(crate) fn items_mut(&mut self) -> Option<&mut VecDeque<JsonValue>> {
        match &mut self.payload {
            Payload::Items(items) => Some(items),
            _ => None,
        }
    }

    /// Number of items left; 0 for single-object or empty payloads
    pub fn item_count(&self) -> usize {
        self.payload.items().map_or(0, VecDeque::len)
    }

    /// Remove and return the first item.
    ///
    /// Destructive: each call consumes one item. Use [`peek_first`] to look
    /// without consuming.
    ///
    /// [`peek_first`]: Envelope::peek_first
    pub fn shift_first(&mut self) -> Option<JsonValue> {
        self.items_mut()?.pop_front()
    }

    /// First item, left in place
    pub fn peek_first(&self) -> Option<&JsonValue> {
        self.payload.items()?.front()
    }

    /// Rate-limit bucket from the response headers
    pub fn rate_limit(&self) -> Option<RateLimit> {
        self.rate_limit
    }

    /// Rate-limit info: the whole bucket, or one of `limit`, `remaining`,
    /// `reset` when `key` is given.
    ///
    /// `Ok(None)` when the response had no rate-limit headers. An unknown
    /// key is always an error.
    pub fn rate_limit_info(&self, key: Option<&str>) -> Result<Option<RateLimitInfo>> {
        let field = key.map(str::parse::<RateLimitField>).transpose()?;

        Ok(self.rate_limit.map(|rate_limit| match field {
            Some(field) => RateLimitInfo::Field(rate_limit.get(field)),
            None => RateLimitInfo::All(rate_limit),
        }))
    }

    /// Decode every item into `T`
    pub fn items_as<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.items()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item.clone())
                    .map_err(|e| Error::decode(format!("item {index}: {e}")))
            })
            .collect()
    }

    /// Decode the single-object payload into `T`
    pub fn single_as<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.payload
            .single()
            .map(|value| serde_json::from_value(value.clone()).map_err(|e| Error::decode(e.to_string())))
            .transpose()
    }

    // ========================================================================
    // Pagination
    // ========================================================================

    /// Paginator bound to this envelope, if one could be built
    pub fn paginator(&self) -> Option<&Paginator> {
        self.paginator.as_ref()
    }

    /// Whether a forward cursor is present
    pub fn has_next(&self) -> bool {
        self.cursor.as_ref().is_some_and(|c| c.after.is_some())
    }

    /// Whether a backward cursor is present
    pub fn has_previous(&self) -> bool {
        self.cursor.as_ref().is_some_and(|c| c.before.is_some())
    }

    /// Re-issue the original request without pagination parameters
    pub async fn first(&self) -> Option<Envelope> {
        self.paginator.as_ref()?.first().await
    }

    /// Fetch the page after this one
    pub async fn next(&self) -> Option<Envelope> {
        self.paginator.as_ref()?.next().await
    }

    /// Fetch the page before this one
    pub async fn back(&self) -> Option<Envelope> {
        self.paginator.as_ref()?.back().await
    }

    /// Walk forward from this page.
    ///
    /// Yields this envelope first, then each following page until one has
    /// no forward cursor or a request fails. The failed page is yielded.
    /// Pages with no items but a cursor do not stop the walk.
    pub fn pages(self) -> impl Stream<Item = Envelope> + Send {
        stream::unfold(Some(self), |state| async move {
            let current = state?;
            let following = if current.success() {
                current.next().await
            } else {
                None
            };
            Some((current, following))
        })
    }
}

/// Split a body into payload, total and cursor
fn decode_body(body: &str) -> (Payload, u64, Option<Cursor>) {
    let value = match serde_json::from_str::<JsonValue>(body) {
        Ok(JsonValue::Null) => return (Payload::Empty, 0, None),
        Ok(value) => value,
        Err(e) => {
            if !body.trim().is_empty() {
                debug!(error = %e, "Response body is not JSON, treating as empty");
            }
            return (Payload::Empty, 0, None);
        }
    };

    let JsonValue::Object(mut object) = value else {
        return (Payload::Single(value), 0, None);
    };

    let Some(data) = object.remove("data") else {
        return (Payload::Single(JsonValue::Object(object)), 0, None);
    };

    let items = match data {
        JsonValue::Null => VecDeque::new(),
        JsonValue::Array(items) => items.into(),
        other => VecDeque::from([other]),
    };
    let total = object
        .get("total")
        .and_then(JsonValue::as_u64)
        .unwrap_or(0);
    let cursor = object.get("pagination").and_then(Cursor::from_pagination);

    (Payload::Items(items), total, cursor)
}
