//! `GET /videos`

use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::http::HelixClient;
use crate::pagination::PageRequest;
use crate::types::QueryParams;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Endpoint path for videos
pub const VIDEOS_ENDPOINT: &str = "videos";

/// Time window for video listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoPeriod {
    All,
    Day,
    Week,
    Month,
}

/// Sort order for video listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoSort {
    Time,
    Trending,
    Views,
}

/// Kind of video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoType {
    All,
    Upload,
    Archive,
    Highlight,
}

fn wire_name<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Query for `GET /videos`.
///
/// Needs at least one video id, a user id, or a game id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideosQuery {
    ids: Vec<String>,
    user_id: Option<String>,
    game_id: Option<String>,
    first: Option<u32>,
    language: Option<String>,
    period: Option<VideoPeriod>,
    sort: Option<VideoSort>,
    video_type: Option<VideoType>,
}

impl VideosQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a video id (repeatable)
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.ids.push(id.into());
        self
    }

    #[must_use]
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    #[must_use]
    pub fn game_id(mut self, game_id: impl Into<String>) -> Self {
        self.game_id = Some(game_id.into());
        self
    }

    /// Page size
    #[must_use]
    pub fn first(mut self, first: u32) -> Self {
        self.first = Some(first);
        self
    }

    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    #[must_use]
    pub fn period(mut self, period: VideoPeriod) -> Self {
        self.period = Some(period);
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: VideoSort) -> Self {
        self.sort = Some(sort);
        self
    }

    #[must_use]
    pub fn video_type(mut self, video_type: VideoType) -> Self {
        self.video_type = Some(video_type);
        self
    }

    /// Validate and build the request
    pub fn into_request(self) -> Result<PageRequest> {
        if self.ids.is_empty() && self.user_id.is_none() && self.game_id.is_none() {
            return Err(Error::missing_parameter(
                VIDEOS_ENDPOINT,
                &["id", "user_id", "game_id"],
            ));
        }

        let mut params = QueryParams::new();
        params.extend_key("id", self.ids);
        let optional = [
            ("user_id", self.user_id),
            ("game_id", self.game_id),
            ("first", self.first.map(|n| n.to_string())),
            ("language", self.language),
            ("period", self.period.as_ref().map(wire_name)),
            ("sort", self.sort.as_ref().map(wire_name)),
            ("type", self.video_type.as_ref().map(wire_name)),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                params.set(key, value);
            }
        }

        Ok(PageRequest::new(VIDEOS_ENDPOINT, params))
    }
}

/// A video record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub user_login: Option<String>,
    pub user_name: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub viewable: Option<String>,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub language: String,
    #[serde(rename = "type")]
    pub video_type: VideoType,
    /// Upstream duration string such as `3h8m33s`
    #[serde(default)]
    pub duration: String,
}

impl HelixClient {
    /// `GET /videos` for an arbitrary query
    pub async fn get_videos(&self, query: VideosQuery) -> Result<Envelope> {
        let request = query.into_request()?;
        Ok(self.send(request).await)
    }

    pub async fn get_videos_by_id(&self, id: impl Into<String>) -> Result<Envelope> {
        self.get_videos(VideosQuery::new().id(id)).await
    }

    pub async fn get_videos_by_user(&self, user_id: impl Into<String>) -> Result<Envelope> {
        self.get_videos(VideosQuery::new().user_id(user_id)).await
    }

    pub async fn get_videos_by_game(&self, game_id: impl Into<String>) -> Result<Envelope> {
        self.get_videos(VideosQuery::new().game_id(game_id)).await
    }
}
