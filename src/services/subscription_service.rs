use chrono::{DateTime, Months, Utc};
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{SoftDeletable, SoftDeleteEntity, subscriptions, tariffs, users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::icontains;

/// `start` plus `months` calendar months, clamped to the last day of the
/// target month (Jan 31 + 1 month = Feb 28/29).
pub fn subscription_end(start: DateTime<Utc>, months: u32) -> AppResult<DateTime<Utc>> {
    start
        .checked_add_months(Months::new(months))
        .ok_or_else(|| AppError::ValidationError("month_duration is out of range".to_string()))
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Subscription with id {id} not found"))
}

/// Creates and manages subscriptions. Non-staff callers only ever see and
/// change their own.
#[derive(Clone)]
pub struct SubscriptionService {
    pool: DatabaseConnection,
}

impl SubscriptionService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        principal: &Principal,
        request: CreateSubscriptionRequest,
    ) -> AppResult<SubscriptionResponse> {
        if request.month_duration < 1 {
            return Err(AppError::ValidationError(
                "month_duration must be at least 1".to_string(),
            ));
        }
        let user_id = match request.user_id {
            Some(id) if principal.is_staff => id,
            _ => principal.id,
        };
        let tariff_id = request.tariff_id;

        let txn = self.pool.begin().await?;

        users::Entity::find_live()
            .filter(users::Column::Id.eq(user_id))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::CreationError(format!("User with id {user_id} does not exist")))?;
        let tariff = tariffs::Entity::find_live()
            .filter(tariffs::Column::Id.eq(tariff_id))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                AppError::CreationError(format!("Tariff with id {tariff_id} does not exist"))
            })?;

        let now = Utc::now();
        let end_date = subscription_end(now, request.month_duration as u32)?;

        let model = subscriptions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            tariff_id: Set(tariff_id),
            start_date: Set(now),
            end_date: Set(end_date),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            is_deleted: Set(false),
            deleted_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            AppError::from_constraint(
                e,
                || {
                    AppError::CreationError(
                        "Subscription for this user and tariff with the same start date already exists"
                            .to_string(),
                    )
                },
                || {
                    AppError::CreationError(
                        "Failed to create subscription: related user or tariff does not exist"
                            .to_string(),
                    )
                },
                |e| AppError::CreationError(format!("Failed to create subscription: {e}")),
            )
        })?;

        txn.commit().await?;

        log::info!(
            "Subscription {} created for user {} on tariff {} until {}",
            model.id,
            user_id,
            tariff_id,
            model.end_date
        );
        Ok(SubscriptionResponse::new(model, Some(tariff)))
    }

    fn scoped(select: Select<subscriptions::Entity>, principal: &Principal) -> Select<subscriptions::Entity> {
        match principal.owner_scope() {
            Some(owner) => select.filter(subscriptions::Column::UserId.eq(owner)),
            None => select,
        }
    }

    pub async fn get_by_id(&self, principal: &Principal, id: Uuid) -> AppResult<SubscriptionResponse> {
        let (model, tariff) = Self::scoped(subscriptions::Entity::find_live(), principal)
            .filter(subscriptions::Column::Id.eq(id))
            .find_also_related(tariffs::Entity)
            .one(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))?;
        Ok(SubscriptionResponse::new(model, tariff))
    }

    /// Full update: both the tariff and the end date are replaced.
    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        request: UpdateSubscriptionRequest,
    ) -> AppResult<SubscriptionResponse> {
        self.partial_update(principal, id, request.into()).await
    }

    pub async fn partial_update(
        &self,
        principal: &Principal,
        id: Uuid,
        request: PartialUpdateSubscriptionRequest,
    ) -> AppResult<SubscriptionResponse> {
        if request.is_empty() {
            return Err(AppError::EmptyUpdate(
                "No fields provided for subscription update".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;

        let existing = Self::scoped(subscriptions::Entity::find_live(), principal)
            .filter(subscriptions::Column::Id.eq(id))
            .one(&txn)
            .await?
            .ok_or_else(|| not_found(id))?;

        let tariff_id = request.tariff_id.unwrap_or(existing.tariff_id);
        let tariff = tariffs::Entity::find_live()
            .filter(tariffs::Column::Id.eq(tariff_id))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                AppError::UpdateError(format!("Tariff with id {tariff_id} does not exist"))
            })?;

        if let Some(end_date) = request.end_date
            && end_date < existing.start_date
        {
            return Err(AppError::ValidationError(
                "end_date must not be earlier than start_date".to_string(),
            ));
        }

        let mut model = existing.into_active_model();
        if let Some(tariff_id) = request.tariff_id {
            model.tariff_id = Set(tariff_id);
        }
        if let Some(end_date) = request.end_date {
            model.end_date = Set(end_date);
        }
        model.touch(Utc::now());

        let updated = model.update(&txn).await.map_err(|e| {
            AppError::from_constraint(
                e,
                || {
                    AppError::UpdateError(
                        "Subscription for this user and tariff with the same start date already exists"
                            .to_string(),
                    )
                },
                || AppError::UpdateError(format!("Tariff with id {tariff_id} does not exist")),
                |e| AppError::UpdateError(format!("Failed to update subscription {id}: {e}")),
            )
        })?;

        txn.commit().await?;
        Ok(SubscriptionResponse::new(updated, Some(tariff)))
    }

    /// Soft-deletes and deactivates. Repeating it on a deleted row returns
    /// the row unchanged.
    pub async fn soft_delete(&self, principal: &Principal, id: Uuid) -> AppResult<SubscriptionResponse> {
        principal.require_staff()?;

        let txn = self.pool.begin().await?;

        let (existing, tariff) = subscriptions::Entity::find_by_id(id)
            .find_also_related(tariffs::Entity)
            .one(&txn)
            .await?
            .ok_or_else(|| not_found(id))?;
        if existing.is_deleted {
            return Ok(SubscriptionResponse::new(existing, tariff));
        }

        let mut model = existing.into_active_model();
        model.is_active = Set(false);
        model.mark_deleted(Utc::now());
        let deleted = model.update(&txn).await?;

        txn.commit().await?;
        log::info!("Subscription {id} soft-deleted");
        Ok(SubscriptionResponse::new(deleted, tariff))
    }

    pub async fn hard_delete(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        principal.require_staff()?;

        let txn = self.pool.begin().await?;

        let existing = subscriptions::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| not_found(id))?;
        if !existing.is_deleted {
            return Err(AppError::ActiveDelete(
                "Subscription must be soft-deleted before it can be permanently removed"
                    .to_string(),
            ));
        }

        subscriptions::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::DeleteError(format!("Failed to delete subscription {id}: {e}")))?;

        txn.commit().await?;
        log::info!("Subscription {id} permanently deleted");
        Ok(())
    }

    fn search(select: Select<subscriptions::Entity>, query: &ListQuery) -> Select<subscriptions::Entity> {
        match query.search() {
            Some(term) => select.filter(
                subscriptions::Column::TariffId.in_subquery(
                    Query::select()
                        .column(tariffs::Column::Id)
                        .from(tariffs::Entity)
                        .and_where(icontains((tariffs::Entity, tariffs::Column::Name), term))
                        .to_owned(),
                ),
            ),
            None => select,
        }
    }

    fn archived() -> Select<subscriptions::Entity> {
        subscriptions::Entity::find_archived().filter(subscriptions::Column::IsActive.eq(false))
    }

    pub async fn list(
        &self,
        principal: &Principal,
        query: &ListQuery,
    ) -> AppResult<Vec<SubscriptionResponse>> {
        let rows = Self::search(Self::scoped(subscriptions::Entity::find_live(), principal), query)
            .order_by_desc(subscriptions::Column::CreatedAt)
            .order_by_asc(subscriptions::Column::Id)
            .offset(query.offset())
            .limit(query.limit())
            .find_also_related(tariffs::Entity)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(SubscriptionResponse::from).collect())
    }

    pub async fn count(&self, principal: &Principal, query: &ListQuery) -> AppResult<u64> {
        let total = Self::search(Self::scoped(subscriptions::Entity::find_live(), principal), query)
            .count(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn list_archive(
        &self,
        principal: &Principal,
        query: &ListQuery,
    ) -> AppResult<Vec<SubscriptionResponse>> {
        principal.require_staff()?;
        let rows = Self::search(Self::archived(), query)
            .order_by_desc(subscriptions::Column::DeletedAt)
            .order_by_asc(subscriptions::Column::Id)
            .offset(query.offset())
            .limit(query.limit())
            .find_also_related(tariffs::Entity)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(SubscriptionResponse::from).collect())
    }

    pub async fn count_archive(&self, principal: &Principal, query: &ListQuery) -> AppResult<u64> {
        principal.require_staff()?;
        let total = Self::search(Self::archived(), query).count(&self.pool).await?;
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_end_is_calendar_months_later() {
        let start = Utc.with_ymd_and_hms(2025, 3, 15, 10, 30, 0).unwrap();
        let end = subscription_end(start, 1).unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 4, 15, 10, 30, 0).unwrap());

        let end = subscription_end(start, 12).unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 3, 15, 10, 30, 0).unwrap());
    }

    #[test]
    fn test_end_is_clamped_to_month_end() {
        let start = Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap();
        assert_eq!(
            subscription_end(start, 1).unwrap(),
            Utc.with_ymd_and_hms(2025, 2, 28, 0, 0, 0).unwrap()
        );

        let leap = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        assert_eq!(
            subscription_end(leap, 1).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap()
        );
    }
}
