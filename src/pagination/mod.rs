//! Pagination module
//!
//! # Overview
//!
//! A [`Paginator`] is built for every [`Envelope`](crate::envelope::Envelope)
//! that either carries a cursor or knows the request that produced it. It
//! replays that request through the injected
//! [`Dispatcher`](crate::http::Dispatcher) with only the cursor parameter
//! changed:
//!
//! - `first()` drops `after` and `before`
//! - `next()` sets `after` to the forward cursor
//! - `back()` sets `before` to the backward cursor
//!
//! A missing cursor makes that direction a no-op returning `None`. There is
//! no other end-of-results signal.

mod paginator;
mod types;

pub use paginator::Paginator;
pub use types::{Direction, PageRequest, PageState, AFTER_PARAM, BEFORE_PARAM};
