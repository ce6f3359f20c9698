//! CLI module
//!
//! Command-line interface over [`HelixClient`](crate::http::HelixClient).
//!
//! # Commands
//!
//! - `get` - Request an endpoint and print its items, following pages
//! - `rate-limit` - Request an endpoint and print the rate-limit headers

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
