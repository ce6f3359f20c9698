//! Envelope building blocks
//!
//! Raw transport values going in, and the normalized pieces (payload, cursor,
//! rate limit, error detail) an [`Envelope`](super::Envelope) is made of.

use crate::error::{Error, Result};
use crate::types::{JsonValue, OptionStringExt};
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

/// Fallback error text when no upstream response explains a failure
pub const API_UNAVAILABLE: &str = "API Unavailable";

/// Header carrying the bucket size
pub const RATELIMIT_LIMIT: &str = "ratelimit-limit";
/// Header carrying the points left in the current window
pub const RATELIMIT_REMAINING: &str = "ratelimit-remaining";
/// Header carrying the epoch second the bucket refills
pub const RATELIMIT_RESET: &str = "ratelimit-reset";

// ============================================================================
// Transport values
// ============================================================================

/// An HTTP response as handed over by a dispatcher
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    /// HTTP status code (0 when synthesized for a response-less failure)
    pub status: u16,
    /// Response headers; lookups are case-insensitive
    pub headers: HeaderMap,
    /// Response body as text
    pub body: String,
}

impl RawResponse {
    /// Create a response with a status and body
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Add a header. Names or values that are not valid HTTP are skipped.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Look up a header value as text
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A transport-level failure, optionally carrying the response that caused it
#[derive(Debug, Clone)]
pub struct TransportError {
    /// Human-readable description of the failure
    pub message: String,
    /// Response attached to the failure (4xx/5xx), if any
    pub response: Option<RawResponse>,
}

impl TransportError {
    /// A failure with no response (connection refused, DNS, timeout)
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            response: None,
        }
    }

    /// A failure caused by an error response
    pub fn with_response(message: impl Into<String>, response: RawResponse) -> Self {
        Self {
            message: message.into(),
            response: Some(response),
        }
    }

    /// Whether a response is attached
    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for TransportError {}

/// Outcome of one dispatch
pub type Exchange = std::result::Result<RawResponse, TransportError>;

// ============================================================================
// Payload
// ============================================================================

/// Decoded response body, shape decided once at parse time
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Payload {
    /// A `data` list (possibly empty)
    Items(VecDeque<JsonValue>),
    /// A body without a `data` key
    Single(JsonValue),
    /// Missing or undecodable body
    #[default]
    Empty,
}

impl Payload {
    /// Items, when this payload is a list
    pub fn items(&self) -> Option<&VecDeque<JsonValue>> {
        match self {
            Self::Items(items) => Some(items),
            _ => None,
        }
    }

    /// The single object, when the body had no `data` key
    pub fn single(&self) -> Option<&JsonValue> {
        match self {
            Self::Single(value) => Some(value),
            _ => None,
        }
    }

    /// Check if this payload is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

// ============================================================================
// Cursor
// ============================================================================

/// Upstream pagination tokens
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cursor {
    /// Token for the previous page
    pub before: Option<String>,
    /// Token for the next page
    pub after: Option<String>,
}

impl Cursor {
    /// Read the `pagination` object of a response.
    ///
    /// A bare `cursor` serves both directions; explicit `before`/`after`
    /// keys win over it. Empty strings count as absent. Returns `None` when
    /// no direction is usable.
    pub fn from_pagination(value: &JsonValue) -> Option<Self> {
        let object = value.as_object()?;
        let text = |key: &str| {
            object
                .get(key)
                .and_then(JsonValue::as_str)
                .map(str::to_string)
                .none_if_empty()
        };

        let shared = text("cursor");
        let cursor = Self {
            before: text("before").or_else(|| shared.clone()),
            after: text("after").or(shared),
        };

        if cursor.is_empty() {
            None
        } else {
            Some(cursor)
        }
    }

    /// Cursor that only moves forward
    pub fn forward(token: impl Into<String>) -> Self {
        Self {
            before: None,
            after: Some(token.into()),
        }
    }

    /// Cursor that only moves backward
    pub fn backward(token: impl Into<String>) -> Self {
        Self {
            before: Some(token.into()),
            after: None,
        }
    }

    /// Check if neither direction has a token
    pub fn is_empty(&self) -> bool {
        self.before.is_none() && self.after.is_none()
    }
}

// ============================================================================
// Rate limit
// ============================================================================

/// Rate-limit bucket reported by the upstream API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}

impl RateLimit {
    /// Read the rate-limit headers. Present only when `Ratelimit-Remaining`
    /// is; values that do not parse read as 0.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers.get(RATELIMIT_REMAINING)?;

        let number = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(0)
        };

        Some(Self {
            limit: number(RATELIMIT_LIMIT),
            remaining: number(RATELIMIT_REMAINING),
            reset: number(RATELIMIT_RESET),
        })
    }

    /// Value of a single field
    pub fn get(&self, field: RateLimitField) -> u64 {
        match field {
            RateLimitField::Limit => self.limit,
            RateLimitField::Remaining => self.remaining,
            RateLimitField::Reset => self.reset,
        }
    }

    /// When the bucket refills
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::try_from(self.reset).ok()?, 0)
    }
}

/// Field selector for [`RateLimit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitField {
    Limit,
    Remaining,
    Reset,
}

impl FromStr for RateLimitField {
    type Err = Error;

    fn from_str(key: &str) -> Result<Self> {
        match key {
            "limit" => Ok(Self::Limit),
            "remaining" => Ok(Self::Remaining),
            "reset" => Ok(Self::Reset),
            other => Err(Error::unknown_rate_limit_key(other)),
        }
    }
}

/// Answer to a rate-limit query: the whole bucket or one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitInfo {
    All(RateLimit),
    Field(u64),
}

// ============================================================================
// Error detail
// ============================================================================

/// Failure information kept by an unsuccessful envelope
#[derive(Debug)]
pub struct ErrorDetail {
    source: TransportError,
    message: OnceCell<String>,
}

impl ErrorDetail {
    pub(crate) fn new(source: TransportError) -> Self {
        Self {
            source,
            message: OnceCell::new(),
        }
    }

    /// The transport failure as reported by the dispatcher
    pub fn source(&self) -> &TransportError {
        &self.source
    }

    /// Best available explanation, resolved on first access.
    ///
    /// Prefers the upstream `message` field of the attached response body,
    /// then the transport error text, then [`API_UNAVAILABLE`] when no
    /// response is attached at all.
    pub fn message(&self) -> &str {
        self.message.get_or_init(|| {
            let Some(response) = &self.source.response else {
                return API_UNAVAILABLE.to_string();
            };

            serde_json::from_str::<JsonValue>(&response.body)
                .ok()
                .and_then(|body| {
                    body.get("message")
                        .and_then(JsonValue::as_str)
                        .map(str::to_string)
                })
                .none_if_empty()
                .unwrap_or_else(|| self.source.message.clone())
        })
    }
}
