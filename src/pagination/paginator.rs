//! Cursor replay paginator

use super::types::{Direction, PageRequest, PageState};
use crate::envelope::{Cursor, Envelope};
use crate::http::Dispatcher;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Re-issues the request behind an envelope with an adjusted cursor.
///
/// Holds no mutable state: every move dispatches a new request and returns a
/// fresh envelope with its own paginator.
#[derive(Clone)]
pub struct Paginator {
    request: Option<PageRequest>,
    cursor: Option<Cursor>,
    dispatcher: Arc<dyn Dispatcher>,
}

impl Paginator {
    /// Build the paginator for an envelope.
    ///
    /// Returns `None` when the envelope has no cursor and there is no
    /// request to replay.
    pub fn from_envelope(
        envelope: &Envelope,
        request: Option<PageRequest>,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> Option<Self> {
        let cursor = envelope.cursor().cloned();
        if cursor.is_none() && request.is_none() {
            return None;
        }

        Some(Self {
            request,
            cursor,
            dispatcher,
        })
    }

    /// The request this paginator replays
    pub fn request(&self) -> Option<&PageRequest> {
        self.request.as_ref()
    }

    /// The cursor of the owning envelope
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// Directions currently available
    pub fn state(&self) -> PageState {
        PageState::from_cursor(self.cursor.as_ref())
    }

    /// Replay the original request without pagination parameters
    pub async fn first(&self) -> Option<Envelope> {
        self.go(Direction::First).await
    }

    /// Fetch the next page, or `None` without dispatching if there is no
    /// forward cursor
    pub async fn next(&self) -> Option<Envelope> {
        self.go(Direction::Next).await
    }

    /// Fetch the previous page, or `None` without dispatching if there is no
    /// backward cursor
    pub async fn back(&self) -> Option<Envelope> {
        self.go(Direction::Back).await
    }

    async fn go(&self, direction: Direction) -> Option<Envelope> {
        let request = self.request.as_ref()?;
        let params = request.params_for(direction, self.cursor.as_ref())?;

        debug!(
            endpoint = %request.endpoint,
            ?direction,
            "Replaying request for page"
        );

        let exchange = self.dispatcher.dispatch(&request.endpoint, &params).await;
        let replayed = PageRequest::new(request.endpoint.clone(), params);

        Some(Envelope::from_exchange(exchange).with_paginator(Arc::clone(&self.dispatcher), replayed))
    }
}

impl fmt::Debug for Paginator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginator")
            .field("request", &self.request)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}
