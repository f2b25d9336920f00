use std::future::Future;

use serde::Serialize;

use homework_common::config::AppConfig;
use homework_common::error::DeliveryError;

/// Trait that every outbound messaging transport implements.
pub trait MessageSender: Send + Sync {
    /// Deliver `text` to the configured chat.
    fn send_message(&self, text: &str) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Telegram Bot API transport bound to a single chat.
#[derive(Debug, Clone)]
pub struct TelegramSender {
    http: reqwest::Client,
    api_url: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramSender {
    pub fn new(http: reqwest::Client, api_url: String, bot_token: String, chat_id: String) -> Self {
        Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            bot_token,
            chat_id,
        }
    }

    pub fn from_config(http: reqwest::Client, config: &AppConfig) -> Self {
        Self::new(
            http,
            config.telegram_api_url.clone(),
            config.credentials.telegram_token.clone(),
            config.credentials.telegram_chat_id.clone(),
        )
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.bot_token)
    }
}

impl MessageSender for TelegramSender {
    async fn send_message(&self, text: &str) -> Result<(), DeliveryError> {
        let response = self
            .http
            .post(self.send_message_url())
            .json(&SendMessageRequest {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await
            // Strip the URL: it embeds the bot token
            .map_err(|e| DeliveryError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
