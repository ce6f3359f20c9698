//! `GET /users` and user enrichment

use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::http::HelixClient;
use crate::pagination::PageRequest;
use crate::types::{JsonValue, QueryParams};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Endpoint path for users
pub const USERS_ENDPOINT: &str = "users";

/// Most ids or logins `GET /users` accepts in one call
const MAX_USERS_PER_REQUEST: usize = 100;

/// Query for `GET /users`; needs at least one id or login
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersQuery {
    ids: Vec<String>,
    logins: Vec<String>,
}

impl UsersQuery {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.ids.push(id.into());
        self
    }

    #[must_use]
    pub fn ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.extend(ids.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn login(mut self, login: impl Into<String>) -> Self {
        self.logins.push(login.into());
        self
    }

    #[must_use]
    pub fn logins<I, S>(mut self, logins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.logins.extend(logins.into_iter().map(Into::into));
        self
    }

    /// Validate and build the request
    pub fn into_request(self) -> Result<PageRequest> {
        if self.ids.is_empty() && self.logins.is_empty() {
            return Err(Error::missing_parameter(USERS_ENDPOINT, &["id", "login"]));
        }

        let mut params = QueryParams::new();
        params.extend_key("id", self.ids);
        params.extend_key("login", self.logins);

        Ok(PageRequest::new(USERS_ENDPOINT, params))
    }
}

/// A user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub login: String,
    pub display_name: String,
    #[serde(rename = "type", default)]
    pub user_type: String,
    #[serde(default)]
    pub broadcaster_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub profile_image_url: String,
    #[serde(default)]
    pub offline_image_url: String,
    #[serde(default)]
    pub view_count: Option<u64>,
    /// Only returned with the `user:read:email` scope
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Ids arrive as strings, older payloads sometimes as numbers
fn id_of(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl HelixClient {
    /// `GET /users` for an arbitrary query
    pub async fn get_users(&self, query: UsersQuery) -> Result<Envelope> {
        let request = query.into_request()?;
        Ok(self.send(request).await)
    }

    pub async fn get_users_by_ids<I, S>(&self, ids: I) -> Result<Envelope>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.get_users(UsersQuery::new().ids(ids)).await
    }

    pub async fn get_users_by_logins<I, S>(&self, logins: I) -> Result<Envelope>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.get_users(UsersQuery::new().logins(logins)).await
    }

    /// Attach user objects to the items of `envelope`.
    ///
    /// Each item's `identifier` field is looked up with `GET /users` and the
    /// matching user is stored under `insert_to` (`null` when the user was
    /// not returned). Items without the identifier are left untouched, and
    /// nothing is requested when no item has one.
    pub async fn insert_users(
        &self,
        envelope: &mut Envelope,
        identifier: &str,
        insert_to: &str,
    ) -> Result<()> {
        let mut ids: Vec<String> = Vec::new();
        for id in envelope.items().filter_map(|item| item.get(identifier).and_then(id_of)) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        if ids.is_empty() {
            return Ok(());
        }

        let mut users: HashMap<String, JsonValue> = HashMap::new();
        for chunk in ids.chunks(MAX_USERS_PER_REQUEST) {
            let found = self.get_users_by_ids(chunk.iter().cloned()).await?;
            if !found.success() {
                return Err(Error::Other(format!(
                    "Failed to look up users: {}",
                    found.error_message()
                )));
            }
            for user in found.items() {
                if let Some(id) = user.get("id").and_then(id_of) {
                    users.insert(id, user.clone());
                }
            }
        }

        debug!(
            requested = ids.len(),
            found = users.len(),
            "Inserting users into response items"
        );

        if let Some(items) = envelope.items_mut() {
            for item in items.iter_mut() {
                let Some(id) = item.get(identifier).and_then(id_of) else {
                    continue;
                };
                if let JsonValue::Object(object) = item {
                    let user = users.get(&id).cloned().unwrap_or(JsonValue::Null);
                    object.insert(insert_to.to_string(), user);
                }
            }
        }

        Ok(())
    }
}
