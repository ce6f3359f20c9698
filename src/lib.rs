//! # Helix Client
//!
//! A typed client for the Twitch Helix API built around two pieces: the
//! response [`Envelope`] and the cursor [`Paginator`].
//!
//! ## Features
//!
//! - **Normalized Responses**: success flag, decoded payload, total, cursor
//!   and rate-limit headers in one value, with lazy error messages
//! - **Cursor Pagination**: `next()`, `back()` and `first()` replay the
//!   original request with only the cursor changed
//! - **Resilient Dispatch**: retries, backoff and local rate limiting
//! - **Typed Endpoints**: request builders that fail before dispatch when a
//!   required parameter is missing
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use helix_client::{HelixClient, HelixClientConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = HelixClientConfig::builder()
//!         .client_id("my-client-id")
//!         .bearer_token("my-token")
//!         .build();
//!     let client = HelixClient::with_config(config)?;
//!
//!     let mut page = client.get_videos_by_user("12826").await?;
//!     loop {
//!         if !page.success() {
//!             eprintln!("{}", page.error_message());
//!             break;
//!         }
//!         while let Some(video) = page.shift_first() {
//!             println!("{}", video["title"]);
//!         }
//!         match page.next().await {
//!             Some(next) => page = next,
//!             None => break,
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//!   Dispatcher ──raw response──▶ Envelope ──owns──▶ Paginator
//!       ▲                                              │
//!       └────────── replayed request (after/before) ───┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::new_without_default)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Response envelope
pub mod envelope;

/// Cursor pagination
pub mod pagination;

/// HTTP dispatch with retry and rate limiting
pub mod http;

/// Typed endpoint requests
pub mod endpoints;

/// Client settings
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use envelope::{Cursor, Envelope, Payload, RateLimit, RawResponse, TransportError};
pub use error::{Error, Result};
pub use http::{Dispatcher, HelixClient, HelixClientConfig};
pub use pagination::{PageRequest, Paginator};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
