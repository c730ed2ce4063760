#[cfg(test)]
#[path = "webhook_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ReplyPayload;
use crate::domain::models::ReplyRequest;
use crate::domain::models::ReplyService;

/// Conversational workflow reachable through a single HTTP webhook.
pub struct Webhook {
    url: String,
    client: reqwest::Client,
}

impl Default for Webhook {
    fn default() -> Webhook {
        return Webhook::new(&Config::get(ConfigKey::WebhookUrl));
    }
}

impl Webhook {
    pub fn new(url: &str) -> Webhook {
        return Webhook {
            url: url.to_string(),
            client: reqwest::Client::new(),
        };
    }
}

#[async_trait]
impl ReplyService for Webhook {
    async fn reply(&self, request: ReplyRequest) -> Result<ReplyPayload> {
        if self.url.is_empty() {
            bail!("Webhook URL is not defined");
        }

        let res = self.client.post(&self.url).json(&request).send().await?;

        let status = res.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "Webhook request failed");
            bail!("Failed to get response from bot");
        }

        let payload = res.json::<Value>().await?;
        return Ok(ReplyPayload::new(payload));
    }
}
