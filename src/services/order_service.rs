use chrono::Utc;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{
    OrderStatus, OrderTarget, SoftDeletable, SoftDeleteEntity, orders, products, subscriptions,
    users,
};
use crate::error::{AppError, AppResult};
use crate::external::{BotNotifier, ORDER_CREATED_MESSAGE};
use crate::models::*;
use crate::utils::icontains;
use crate::utils::validation::validate_length;

const MAX_DESCRIPTION_LEN: usize = 500;

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Order with id {id} not found"))
}

fn clean_description(description: Option<String>) -> AppResult<Option<String>> {
    match description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()) {
        Some(d) => {
            validate_length("description", &d, 1, MAX_DESCRIPTION_LEN)?;
            Ok(Some(d))
        }
        None => Ok(None),
    }
}

/// Orders for a product or a subscription. Creation notifies the owner's
/// chat once the order is committed.
#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
    notifier: BotNotifier,
}

impl OrderService {
    pub fn new(pool: DatabaseConnection, notifier: BotNotifier) -> Self {
        Self { pool, notifier }
    }

    pub async fn create(
        &self,
        principal: &Principal,
        request: CreateOrderRequest,
    ) -> AppResult<OrderResponse> {
        let target = OrderTarget::from_ids(request.product_id, request.subscription_id)
            .ok_or_else(|| {
                AppError::ValidationError(
                    "Exactly one of product_id or subscription_id must be provided".to_string(),
                )
            })?;
        let description = clean_description(request.description)?;
        let owner_id = match request.user_id {
            Some(id) if principal.is_staff => id,
            _ => principal.id,
        };

        let txn = self.pool.begin().await?;

        let owner = users::Entity::find_live()
            .filter(users::Column::Id.eq(owner_id))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::CreationError(format!("User with id {owner_id} does not exist")))?;

        match target {
            OrderTarget::Product(product_id) => {
                products::Entity::find_live()
                    .filter(products::Column::Id.eq(product_id))
                    .filter(products::Column::IsActive.eq(true))
                    .one(&txn)
                    .await?
                    .ok_or_else(|| {
                        AppError::CreationError(format!(
                            "Product with id {product_id} does not exist"
                        ))
                    })?;
            }
            OrderTarget::Subscription(subscription_id) => {
                subscriptions::Entity::find_live()
                    .filter(subscriptions::Column::Id.eq(subscription_id))
                    .filter(subscriptions::Column::UserId.eq(owner_id))
                    .one(&txn)
                    .await?
                    .ok_or_else(|| {
                        AppError::CreationError(format!(
                            "Subscription with id {subscription_id} does not exist"
                        ))
                    })?;
            }
        }

        let now = Utc::now();
        let model = orders::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(owner_id),
            product_id: Set(request.product_id),
            subscription_id: Set(request.subscription_id),
            description: Set(description),
            status: Set(OrderStatus::Pending),
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
                || AppError::CreationError("Order already exists".to_string()),
                || {
                    AppError::CreationError(
                        "Failed to create order: related record does not exist".to_string(),
                    )
                },
                |e| AppError::CreationError(format!("Failed to create order: {e}")),
            )
        })?;

        txn.commit().await?;
        log::info!("Order {} created for user {}", model.id, owner_id);

        match owner.telegram_id {
            Some(telegram_id) => self.notifier.dispatch(telegram_id, ORDER_CREATED_MESSAGE),
            None => log::debug!("User {owner_id} has no linked chat, order notification skipped"),
        }

        Ok(OrderResponse::from(model))
    }

    fn scoped(select: Select<orders::Entity>, principal: &Principal) -> Select<orders::Entity> {
        match principal.owner_scope() {
            Some(owner) => select.filter(orders::Column::UserId.eq(owner)),
            None => select,
        }
    }

    pub async fn get_by_id(&self, principal: &Principal, id: Uuid) -> AppResult<OrderResponse> {
        let model = Self::scoped(orders::Entity::find_live(), principal)
            .filter(orders::Column::Id.eq(id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))?;
        Ok(OrderResponse::from(model))
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        request: UpdateOrderRequest,
    ) -> AppResult<OrderResponse> {
        self.partial_update(principal, id, request.into()).await
    }

    /// Owners may edit the description; only staff may move the status.
    pub async fn partial_update(
        &self,
        principal: &Principal,
        id: Uuid,
        request: PartialUpdateOrderRequest,
    ) -> AppResult<OrderResponse> {
        if request.is_empty() {
            return Err(AppError::EmptyUpdate("No fields provided for order update".to_string()));
        }

        let txn = self.pool.begin().await?;

        let existing = Self::scoped(orders::Entity::find_live(), principal)
            .filter(orders::Column::Id.eq(id))
            .one(&txn)
            .await?
            .ok_or_else(|| not_found(id))?;

        if let Some(status) = request.status
            && status != existing.status
            && !principal.is_staff
        {
            log::warn!("User {} tried to change status of order {id}", principal.id);
            return Err(AppError::PermissionDenied);
        }

        let mut model = existing.into_active_model();
        if request.description.is_some() {
            model.description = Set(clean_description(request.description)?);
        }
        if let Some(status) = request.status {
            model.status = Set(status);
        }
        model.touch(Utc::now());

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| AppError::UpdateError(format!("Failed to update order {id}: {e}")))?;
        txn.commit().await?;
        Ok(OrderResponse::from(updated))
    }

    pub async fn soft_delete(&self, principal: &Principal, id: Uuid) -> AppResult<OrderResponse> {
        let txn = self.pool.begin().await?;

        let existing = Self::scoped(orders::Entity::find(), principal)
            .filter(orders::Column::Id.eq(id))
            .one(&txn)
            .await?
            .ok_or_else(|| not_found(id))?;
        if existing.is_deleted {
            return Ok(OrderResponse::from(existing));
        }

        let mut model = existing.into_active_model();
        model.mark_deleted(Utc::now());
        let deleted = model.update(&txn).await?;

        txn.commit().await?;
        log::info!("Order {id} soft-deleted");
        Ok(OrderResponse::from(deleted))
    }

    pub async fn hard_delete(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        principal.require_staff()?;
        let txn = self.pool.begin().await?;

        let existing = orders::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| not_found(id))?;
        if !existing.is_deleted {
            return Err(AppError::ActiveDelete(
                "Order must be soft-deleted before it can be permanently removed".to_string(),
            ));
        }

        orders::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::DeleteError(format!("Failed to delete order {id}: {e}")))?;

        txn.commit().await?;
        log::info!("Order {id} permanently deleted");
        Ok(())
    }

    fn search(select: Select<orders::Entity>, query: &ListQuery) -> Select<orders::Entity> {
        match query.search() {
            Some(term) => select.filter(
                Condition::any()
                    .add(icontains((orders::Entity, orders::Column::Description), term))
                    .add(
                        orders::Column::ProductId.in_subquery(
                            Query::select()
                                .column(products::Column::Id)
                                .from(products::Entity)
                                .and_where(icontains((products::Entity, products::Column::Title), term))
                                .to_owned(),
                        ),
                    ),
            ),
            None => select,
        }
    }

    pub async fn list(&self, principal: &Principal, query: &ListQuery) -> AppResult<Vec<OrderResponse>> {
        let models = Self::search(Self::scoped(orders::Entity::find_live(), principal), query)
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_asc(orders::Column::Id)
            .offset(query.offset())
            .limit(query.limit())
            .all(&self.pool)
            .await?;
        Ok(models.into_iter().map(OrderResponse::from).collect())
    }

    pub async fn count(&self, principal: &Principal, query: &ListQuery) -> AppResult<u64> {
        let total = Self::search(Self::scoped(orders::Entity::find_live(), principal), query)
            .count(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn list_archive(
        &self,
        principal: &Principal,
        query: &ListQuery,
    ) -> AppResult<Vec<OrderResponse>> {
        principal.require_staff()?;
        let models = Self::search(orders::Entity::find_archived(), query)
            .order_by_desc(orders::Column::DeletedAt)
            .order_by_asc(orders::Column::Id)
            .offset(query.offset())
            .limit(query.limit())
            .all(&self.pool)
            .await?;
        Ok(models.into_iter().map(OrderResponse::from).collect())
    }

    pub async fn count_archive(&self, principal: &Principal, query: &ListQuery) -> AppResult<u64> {
        principal.require_staff()?;
        let total = Self::search(orders::Entity::find_archived(), query)
            .count(&self.pool)
            .await?;
        Ok(total)
    }
}
