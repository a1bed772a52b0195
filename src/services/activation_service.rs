use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set, TransactionTrait,
};

use crate::entities::{SoftDeletable, SoftDeleteEntity, users};
use crate::error::AppResult;

/// Result of binding a chat identity to an account by phone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationOutcome {
    Activated { email: String },
    AlreadyActive { email: String },
    NotFound,
    /// The account is bound to a different chat id.
    BoundToAnotherChat,
    /// This chat id is already bound to a different account.
    ChatAlreadyLinked,
}

#[derive(Clone)]
pub struct ActivationService {
    pool: DatabaseConnection,
}

impl ActivationService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Binds `telegram_id` to the live account registered with `phone` (already
    /// normalised) and activates it, all in one transaction.
    pub async fn activate_by_phone(
        &self,
        phone: &str,
        telegram_id: i64,
    ) -> AppResult<ActivationOutcome> {
        let txn = self.pool.begin().await?;

        let Some(user) = users::Entity::find_live()
            .filter(users::Column::Phone.eq(phone))
            .one(&txn)
            .await?
        else {
            return Ok(ActivationOutcome::NotFound);
        };

        if let Some(bound) = user.telegram_id
            && bound != telegram_id
        {
            log::warn!("Account {} is already bound to another chat", user.id);
            return Ok(ActivationOutcome::BoundToAnotherChat);
        }

        let other = users::Entity::find()
            .filter(users::Column::TelegramId.eq(telegram_id))
            .filter(users::Column::Id.ne(user.id))
            .one(&txn)
            .await?;
        if other.is_some() {
            log::warn!("Chat {telegram_id} is already linked to another account");
            return Ok(ActivationOutcome::ChatAlreadyLinked);
        }

        let was_active = user.is_active;
        let email = user.email.clone();
        let mut model = user.into_active_model();
        model.telegram_id = Set(Some(telegram_id));
        model.is_active = Set(true);
        model.touch(Utc::now());
        let updated = model.update(&txn).await?;

        txn.commit().await?;

        log::info!("Account {} bound to chat {telegram_id}", updated.id);
        if was_active {
            Ok(ActivationOutcome::AlreadyActive { email })
        } else {
            Ok(ActivationOutcome::Activated { email })
        }
    }
}
