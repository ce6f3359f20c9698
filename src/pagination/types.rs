//! Pagination types
//!
//! The replayable request and the cursor-derived traversal state.

use crate::envelope::Cursor;
use crate::types::QueryParams;

/// Query parameter carrying the forward cursor
pub const AFTER_PARAM: &str = "after";

/// Query parameter carrying the backward cursor
pub const BEFORE_PARAM: &str = "before";

/// Which way to move from the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Back to the unpaginated request
    First,
    /// Forward, using `cursor.after`
    Next,
    /// Backward, using `cursor.before`
    Back,
}

/// A request that can be replayed: endpoint plus its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Endpoint path relative to the API base (e.g. `videos`)
    pub endpoint: String,
    /// Query parameters as originally sent
    pub params: QueryParams,
}

impl PageRequest {
    /// Create a request for an endpoint
    pub fn new(endpoint: impl Into<String>, params: QueryParams) -> Self {
        Self {
            endpoint: endpoint.into(),
            params,
        }
    }

    /// Add a parameter value; repeating a key builds a list
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.append(key, value);
        self
    }

    /// Parameters for moving in `direction`.
    ///
    /// Returns `None` when the cursor has no token for that direction.
    /// Only the pagination keys differ from the original parameters.
    pub fn params_for(&self, direction: Direction, cursor: Option<&Cursor>) -> Option<QueryParams> {
        let mut params = self.params.clone();
        params.remove(AFTER_PARAM);
        params.remove(BEFORE_PARAM);

        match direction {
            Direction::First => {}
            Direction::Next => {
                let token = cursor?.after.as_ref()?;
                params.set(AFTER_PARAM, token.as_str());
            }
            Direction::Back => {
                let token = cursor?.before.as_ref()?;
                params.set(BEFORE_PARAM, token.as_str());
            }
        }

        Some(params)
    }
}

/// Directions a paginator can move in.
///
/// Neither flag set is the initial state; both may be set at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageState {
    pub forward: bool,
    pub backward: bool,
}

impl PageState {
    /// Derive the state from a cursor
    pub fn from_cursor(cursor: Option<&Cursor>) -> Self {
        cursor.map_or_else(Self::default, |c| Self {
            forward: c.after.is_some(),
            backward: c.before.is_some(),
        })
    }

    /// No direction available
    pub fn is_initial(&self) -> bool {
        !self.forward && !self.backward
    }
}
