use crate::config::BotConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const ORDER_CREATED_MESSAGE: &str = "✅ Your order has been created successfully!";

/// Body accepted by the bot's `/notify_user` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotifyUserRequest {
    pub secret_key: String,
    pub telegram_id: i64,
    pub message_text: String,
}

/// Forwards user notifications to the bot process over HTTP.
#[derive(Clone)]
pub struct BotNotifier {
    client: Client,
    notify_url: Option<String>,
    secret_key: String,
}

impl BotNotifier {
    pub fn new(config: &BotConfig) -> Self {
        Self {
            client: Client::new(),
            notify_url: config.notify_url.clone().filter(|url| !url.is_empty()),
            secret_key: config.secret_key.clone(),
        }
    }

    /// A notifier that drops every message.
    pub fn disabled() -> Self {
        Self {
            client: Client::new(),
            notify_url: None,
            secret_key: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.notify_url.is_some()
    }

    pub async fn send(&self, telegram_id: i64, message_text: &str) -> AppResult<()> {
        let Some(url) = &self.notify_url else {
            return Ok(());
        };

        let body = NotifyUserRequest {
            secret_key: self.secret_key.clone(),
            telegram_id,
            message_text: message_text.to_string(),
        };

        let response = self.client.post(url).json(&body).send().await?;

        if response.status().is_success() {
            log::info!("Notification delivered to telegram user {telegram_id}");
            Ok(())
        } else {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(AppError::ExternalApiError(format!(
                "Bot notification failed ({status}): {error_text}"
            )))
        }
    }

    /// Fire-and-forget variant of [`send`](Self::send); failures are only logged.
    pub fn dispatch(&self, telegram_id: i64, message_text: impl Into<String>) {
        if !self.is_enabled() {
            log::debug!("Bot notifications disabled, skipping user {telegram_id}");
            return;
        }

        let notifier = self.clone();
        let message_text = message_text.into();
        tokio::spawn(async move {
            if let Err(e) = notifier.send(telegram_id, &message_text).await {
                log::error!("Failed to notify telegram user {telegram_id}: {e}");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_url_disables_notifier() {
        let config = BotConfig {
            notify_url: Some(String::new()),
            ..BotConfig::default()
        };
        assert!(!BotNotifier::new(&config).is_enabled());
        assert!(!BotNotifier::disabled().is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_send_is_noop() {
        assert!(BotNotifier::disabled().send(42, "hi").await.is_ok());
    }

    #[test]
    fn test_payload_shape() {
        let body = NotifyUserRequest {
            secret_key: "k".into(),
            telegram_id: 7,
            message_text: "m".into(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"secret_key": "k", "telegram_id": 7, "message_text": "m"})
        );
    }
}
