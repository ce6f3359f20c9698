//! Typed endpoint requests
//!
//! Each query type checks its required parameters and turns into a
//! [`PageRequest`](crate::pagination::PageRequest) before anything is sent.
//! The matching shortcuts live on [`HelixClient`](crate::http::HelixClient).

mod users;
mod videos;

pub use users::{User, UsersQuery, USERS_ENDPOINT};
pub use videos::{Video, VideoPeriod, VideoSort, VideoType, VideosQuery, VIDEOS_ENDPOINT};
