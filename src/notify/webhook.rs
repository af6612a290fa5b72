use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::notify::notifier::{message_text, Notifier};

pub const DISPLAY_NAME: &str = "mr-reminder";
pub const ICON_EMOJI: &str = ":eyes:";

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub channel: String,
    pub username: String,
    pub text: String,
    pub icon_emoji: String,
}

/// Posts reminders to a chat incoming webhook.
pub struct WebhookNotifier {
    client: Client,
    url: String,
    channel: String,
    threshold_hours: f64,
}

impl WebhookNotifier {
    pub fn new(url: String, channel: String, threshold_hours: f64) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            url,
            channel,
            threshold_hours,
        })
    }

    pub fn message(&self, lines: &[String]) -> ChatMessage {
        ChatMessage {
            channel: self.channel.clone(),
            username: DISPLAY_NAME.to_string(),
            text: message_text(self.threshold_hours, lines),
            icon_emoji: ICON_EMOJI.to_string(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    // The whole list goes out in one message; nothing is truncated or split.
    async fn notify(&self, lines: &[String]) -> Result<()> {
        tracing::info!("Posting {} reminders to webhook", lines.len());

        let response = self
            .client
            .post(&self.url)
            .json(&self.message(lines))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Webhook(response.status()));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "webhook"
    }
}
