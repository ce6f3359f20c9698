//! Response envelope module
//!
//! # Overview
//!
//! Every dispatched request comes back as an [`Envelope`]: a success flag set
//! by the transport outcome, the decoded payload, the upstream total, the
//! pagination cursor and the rate-limit headers. A failed request keeps its
//! [`TransportError`] and explains itself lazily through
//! [`Envelope::error_message`].
//!
//! Body decoding never fails. A body with a top-level `data` key becomes
//! [`Payload::Items`]; any other JSON becomes [`Payload::Single`]; anything
//! else is [`Payload::Empty`].

mod response;
mod types;

pub use response::Envelope;
pub use types::{
    Cursor, ErrorDetail, Exchange, Payload, RateLimit, RateLimitField, RateLimitInfo, RawResponse,
    TransportError, API_UNAVAILABLE, RATELIMIT_LIMIT, RATELIMIT_REMAINING, RATELIMIT_RESET,
};

#[cfg(test)]
mod tests;
