use teloxide::prelude::*;

use crate::bot::BotState;
use crate::bot::keyboards::{remove_keyboard, share_phone_keyboard};
use crate::services::ActivationOutcome;
use crate::utils::{looks_like_phone, normalize_phone_number};

pub const START_PROMPT: &str =
    "To activate your account, please share your phone number using the button below.";
pub const NOT_A_PHONE: &str = "That doesn't look like a phone number. Share it with the button \
below or type it in the format +79XXXXXXXXX.";
pub const ACTIVATION_FAILED: &str =
    "An unexpected error occurred while activating your account. Please try again later.";

/// What a message means to the activation flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationInput {
    Start,
    /// Normalised phone number, from a shared contact or typed text.
    Phone(String),
    NotAPhone,
}

/// Classifies a message from a chat. `waiting` is whether the chat was asked
/// for its phone; outside that state only `/start` is meaningful.
pub fn classify(text: Option<&str>, contact_phone: Option<&str>, waiting: bool) -> Option<ActivationInput> {
    if text.is_some_and(|t| t.trim() == "/start" || t.trim().starts_with("/start ")) {
        return Some(ActivationInput::Start);
    }
    if !waiting {
        return None;
    }
    if let Some(phone) = contact_phone {
        return Some(ActivationInput::Phone(normalize_phone_number(phone)));
    }
    match text {
        Some(t) if looks_like_phone(t) => Some(ActivationInput::Phone(normalize_phone_number(t))),
        _ => Some(ActivationInput::NotAPhone),
    }
}

pub fn activation_reply(outcome: &ActivationOutcome) -> &'static str {
    match outcome {
        ActivationOutcome::Activated { .. } => {
            "Your account has been activated and linked to Telegram!"
        }
        ActivationOutcome::AlreadyActive { .. } => {
            "Your account was already active, Telegram ID updated."
        }
        ActivationOutcome::NotFound => {
            "No user with this phone number was found. Please check the number or contact support."
        }
        ActivationOutcome::BoundToAnotherChat => {
            "This phone number is already linked to another Telegram account. Contact support if you think this is a mistake."
        }
        ActivationOutcome::ChatAlreadyLinked => {
            "This Telegram account is already linked to another user. Contact support if you think this is a mistake."
        }
    }
}

pub async fn message_handler(bot: Bot, msg: Message, state: BotState) -> Result<(), teloxide::RequestError> {
    let chat_id = msg.chat.id;
    let waiting = state.pending.is_waiting(chat_id).await;
    let contact_phone = msg.contact().map(|c| c.phone_number.as_str());

    let Some(input) = classify(msg.text(), contact_phone, waiting) else {
        return Ok(());
    };

    match input {
        ActivationInput::Start => {
            state.pending.begin(chat_id).await;
            bot.send_message(chat_id, START_PROMPT)
                .reply_markup(share_phone_keyboard())
                .await?;
        }
        ActivationInput::NotAPhone => {
            bot.send_message(chat_id, NOT_A_PHONE).await?;
        }
        ActivationInput::Phone(phone) => {
            let telegram_id = msg
                .from
                .as_ref()
                .map(|u| u.id.0 as i64)
                .unwrap_or(chat_id.0);

            bot.send_message(
                chat_id,
                format!("Thank you, your number: {phone}. Activating your account..."),
            )
            .await?;

            let reply = match state.activation.activate_by_phone(&phone, telegram_id).await {
                Ok(outcome) => activation_reply(&outcome),
                Err(e) => {
                    log::error!("Activation for chat {chat_id} failed: {e}");
                    ACTIVATION_FAILED
                }
            };
            state.pending.finish(chat_id).await;

            bot.send_message(chat_id, reply)
                .reply_markup(remove_keyboard())
                .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_is_recognised_in_any_state() {
        assert_eq!(classify(Some("/start"), None, false), Some(ActivationInput::Start));
        assert_eq!(classify(Some("/start ref"), None, true), Some(ActivationInput::Start));
    }

    #[test]
    fn test_messages_outside_flow_are_ignored() {
        assert_eq!(classify(Some("+79991234567"), None, false), None);
        assert_eq!(classify(None, Some("+79991234567"), false), None);
    }

    #[test]
    fn test_contact_and_typed_phone_are_normalised() {
        assert_eq!(
            classify(None, Some("79991234567"), true),
            Some(ActivationInput::Phone("+79991234567".into()))
        );
        assert_eq!(
            classify(Some("8 (999) 123-45-67"), None, true),
            Some(ActivationInput::Phone("+79991234567".into()))
        );
    }

    #[test]
    fn test_other_text_is_rejected_while_waiting() {
        assert_eq!(classify(Some("hello"), None, true), Some(ActivationInput::NotAPhone));
        assert_eq!(classify(None, None, true), Some(ActivationInput::NotAPhone));
    }
}
