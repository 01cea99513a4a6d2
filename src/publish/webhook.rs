//! Outbound post delivery.
//!
//! The social network itself is an external collaborator; all this side
//! knows is "deliver this text". A disabled publisher logs the message,
//! which keeps dry runs and local development honest about what would
//! have been posted.

use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use serde_json::json;

use crate::config::PublisherSettings;

#[derive(Clone)]
pub enum Publisher {
    /// POSTs `{"text": ...}` to the configured webhook.
    Webhook {
        http: reqwest::Client,
        url: String,
    },
    /// Logs the message instead of sending it.
    Log,
}

impl Publisher {
    pub fn from_settings(settings: &PublisherSettings) -> Result<Self> {
        if !settings.enabled {
            return Ok(Self::Log);
        }

        let url = settings
            .webhook_url
            .clone()
            .context("publisher.enabled is set but publisher.webhook_url is missing")?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .context("Failed to build publisher HTTP client")?;

        Ok(Self::Webhook {
            http,
            url,
        })
    }

    pub async fn publish(&self, text: &str) -> Result<()> {
        match self {
            Self::Webhook {
                http,
                url,
            } => {
                http.post(url)
                    .json(&json!({ "text": text }))
                    .send()
                    .await
                    .context("Webhook request failed")?
                    .error_for_status()
                    .context("Webhook returned an error status")?;
                Ok(())
            },
            Self::Log => {
                info!("Publisher disabled, would post:\n{}", text);
                Ok(())
            },
        }
    }
}
