//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ClientSettings;
use crate::envelope::{Payload, RateLimitInfo};
use crate::error::{Error, Result};
use crate::http::HelixClient;
use crate::types::{JsonValue, QueryParams};
use futures::StreamExt;
use serde_json::json;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let client = HelixClient::with_config(self.settings()?.into_client_config()?)?;

        match &self.cli.command {
            Commands::Get {
                endpoint,
                params,
                pages,
            } => self.get(&client, endpoint, params, *pages).await,
            Commands::RateLimit {
                endpoint,
                params,
                key,
            } => {
                self.rate_limit(&client, endpoint, params, key.as_deref())
                    .await
            }
        }
    }

    /// Settings file, then environment, then flags
    fn settings(&self) -> Result<ClientSettings> {
        let mut settings = match &self.cli.config {
            Some(path) => ClientSettings::from_file(path)?,
            None => ClientSettings::default(),
        }
        .apply_env();

        if let Some(client_id) = &self.cli.client_id {
            settings.client_id = Some(client_id.clone());
        }
        if let Some(token) = &self.cli.token {
            settings.token = Some(token.clone());
        }
        if let Some(base_url) = &self.cli.base_url {
            settings.base_url = base_url.clone();
        }

        Ok(settings)
    }

    async fn get(
        &self,
        client: &HelixClient,
        endpoint: &str,
        params: &[(String, String)],
        max_pages: usize,
    ) -> Result<()> {
        let first = client.get(endpoint, to_query(params)).await;
        let pages = first.pages().take(max_pages.max(1));
        futures::pin_mut!(pages);

        let mut page_number = 0;
        while let Some(mut page) = pages.next().await {
            page_number += 1;
            if !page.success() {
                return Err(Error::Other(format!(
                    "Request failed on page {page_number} (HTTP {}): {}",
                    page.status(),
                    page.error_message()
                )));
            }

            info!(
                page = page_number,
                items = page.item_count(),
                total = page.total(),
                "Fetched page"
            );

            if let Payload::Single(value) = page.payload() {
                self.output(value)?;
                continue;
            }
            while let Some(item) = page.shift_first() {
                self.output(&item)?;
            }
        }

        Ok(())
    }

    async fn rate_limit(
        &self,
        client: &HelixClient,
        endpoint: &str,
        params: &[(String, String)],
        key: Option<&str>,
    ) -> Result<()> {
        let envelope = client.get(endpoint, to_query(params)).await;
        if !envelope.success() {
            return Err(Error::Other(format!(
                "Request failed (HTTP {}): {}",
                envelope.status(),
                envelope.error_message()
            )));
        }

        let value = rate_limit_json(envelope.rate_limit_info(key)?)?;
        self.output(&value)
    }

    fn output(&self, value: &JsonValue) -> Result<()> {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{rendered}");
        Ok(())
    }
}

/// Render a rate-limit answer; the full bucket also gets an RFC 3339 `reset_at`
fn rate_limit_json(info: Option<RateLimitInfo>) -> Result<JsonValue> {
    let value = match info {
        Some(RateLimitInfo::All(rate_limit)) => {
            let mut value = serde_json::to_value(rate_limit)?;
            if let (Some(reset_at), Some(object)) = (rate_limit.reset_at(), value.as_object_mut()) {
                object.insert("reset_at".to_string(), json!(reset_at.to_rfc3339()));
            }
            value
        }
        Some(RateLimitInfo::Field(value)) => json!(value),
        None => JsonValue::Null,
    };
    Ok(value)
}

/// Collect `key=value` pairs; a repeated key becomes a list
fn to_query(params: &[(String, String)]) -> QueryParams {
    params
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect()
}
