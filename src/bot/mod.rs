//! Telegram side of the system: binds chats to accounts by phone number and
//! relays backend notifications to users.

pub mod handlers;
pub mod keyboards;
pub mod relay;

use std::collections::HashSet;
use std::sync::Arc;

use teloxide::{dptree, prelude::*, types::Update};
use tokio::sync::Mutex;

use crate::services::ActivationService;

/// Chats that were asked for a phone number and have not answered yet.
#[derive(Clone, Default)]
pub struct PendingActivations {
    chats: Arc<Mutex<HashSet<ChatId>>>,
}

impl PendingActivations {
    pub async fn begin(&self, chat_id: ChatId) {
        self.chats.lock().await.insert(chat_id);
    }

    pub async fn is_waiting(&self, chat_id: ChatId) -> bool {
        self.chats.lock().await.contains(&chat_id)
    }

    pub async fn finish(&self, chat_id: ChatId) {
        self.chats.lock().await.remove(&chat_id);
    }
}

#[derive(Clone)]
pub struct BotState {
    pub activation: ActivationService,
    pub pending: PendingActivations,
}

impl BotState {
    pub fn new(activation: ActivationService) -> Self {
        Self {
            activation,
            pending: PendingActivations::default(),
        }
    }
}

pub async fn run_dispatcher(bot: Bot, state: BotState) {
    match bot.get_me().await {
        Ok(me) => log::info!(
            "Bot connected as @{}",
            me.username.clone().unwrap_or_else(|| "unknown".into())
        ),
        Err(e) => {
            log::error!("Bot failed to connect to Telegram: {e}");
            return;
        }
    }

    let handler = Update::filter_message().endpoint(handlers::message_handler);

    Dispatcher::builder(bot, dptree::entry().branch(handler))
        .dependencies(dptree::deps![state])
        .default_handler(|upd: Arc<Update>| async move {
            log::debug!("Unhandled update: {:?}", upd.id);
        })
        .build()
        .dispatch()
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pending_activation_lifecycle() {
        let pending = PendingActivations::default();
        let chat = ChatId(42);

        assert!(!pending.is_waiting(chat).await);
        pending.begin(chat).await;
        assert!(pending.is_waiting(chat).await);
        assert!(!pending.is_waiting(ChatId(43)).await);
        pending.finish(chat).await;
        assert!(!pending.is_waiting(chat).await);
    }
}
