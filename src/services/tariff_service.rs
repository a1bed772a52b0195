use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{SoftDeletable, SoftDeleteEntity, tariffs};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::icontains;
use crate::utils::validation::{validate_length, validate_price};

#[derive(Clone)]
pub struct TariffService {
    pool: DatabaseConnection,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Tariff with id {id} not found"))
}

fn validate_name(name: &str) -> AppResult<()> {
    validate_length("name", name.trim(), 1, 100)
}

impl TariffService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        principal: &Principal,
        request: CreateTariffRequest,
    ) -> AppResult<TariffResponse> {
        principal.require_staff()?;
        validate_name(&request.name)?;
        validate_price("price", request.price)?;

        let now = Utc::now();
        let model = tariffs::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name.trim().to_string()),
            price: Set(request.price),
            created_at: Set(now),
            updated_at: Set(now),
            is_deleted: Set(false),
            deleted_at: Set(None),
        }
        .insert(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_constraint(
                e,
                || AppError::CreationError("Tariff with these fields already exists".to_string()),
                || AppError::CreationError("Tariff references a missing record".to_string()),
                |e| AppError::CreationError(format!("Failed to create tariff: {e}")),
            )
        })?;

        log::info!("Tariff {} ({}) created", model.id, model.name);
        Ok(TariffResponse::from(model))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<TariffResponse> {
        let model = tariffs::Entity::find_live()
            .filter(tariffs::Column::Id.eq(id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))?;
        Ok(TariffResponse::from(model))
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        request: UpdateTariffRequest,
    ) -> AppResult<TariffResponse> {
        self.partial_update(principal, id, request.into()).await
    }

    pub async fn partial_update(
        &self,
        principal: &Principal,
        id: Uuid,
        request: PartialUpdateTariffRequest,
    ) -> AppResult<TariffResponse> {
        principal.require_staff()?;
        if request.is_empty() {
            return Err(AppError::EmptyUpdate("No fields provided for tariff update".to_string()));
        }
        if let Some(name) = &request.name {
            validate_name(name)?;
        }
        if let Some(price) = request.price {
            validate_price("price", price)?;
        }

        let txn = self.pool.begin().await?;

        let mut model = tariffs::Entity::find_live()
            .filter(tariffs::Column::Id.eq(id))
            .one(&txn)
            .await?
            .ok_or_else(|| not_found(id))?
            .into_active_model();

        if let Some(name) = request.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(price) = request.price {
            model.price = Set(price);
        }
        model.touch(Utc::now());

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| AppError::UpdateError(format!("Failed to update tariff {id}: {e}")))?;
        txn.commit().await?;
        Ok(TariffResponse::from(updated))
    }

    /// Marks the tariff deleted. Deleting an already-deleted tariff returns it unchanged.
    pub async fn soft_delete(&self, principal: &Principal, id: Uuid) -> AppResult<TariffResponse> {
        principal.require_staff()?;
        let txn = self.pool.begin().await?;

        let existing = tariffs::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| not_found(id))?;
        if existing.is_deleted {
            return Ok(TariffResponse::from(existing));
        }

        let mut model = existing.into_active_model();
        model.mark_deleted(Utc::now());
        let deleted = model.update(&txn).await?;

        txn.commit().await?;
        log::info!("Tariff {id} soft-deleted");
        Ok(TariffResponse::from(deleted))
    }

    pub async fn hard_delete(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        principal.require_staff()?;
        let txn = self.pool.begin().await?;

        let existing = tariffs::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| not_found(id))?;
        if !existing.is_deleted {
            return Err(AppError::ActiveDelete(
                "Tariff must be soft-deleted before it can be permanently removed".to_string(),
            ));
        }

        tariffs::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::DeleteError(format!("Failed to delete tariff {id}: {e}")))?;

        txn.commit().await?;
        log::info!("Tariff {id} permanently deleted");
        Ok(())
    }

    fn search(select: Select<tariffs::Entity>, query: &ListQuery) -> Select<tariffs::Entity> {
        match query.search() {
            Some(term) => select.filter(icontains(tariffs::Column::Name, term)),
            None => select,
        }
    }

    pub async fn list(&self, query: &ListQuery) -> AppResult<Vec<TariffResponse>> {
        let models = Self::search(tariffs::Entity::find_live(), query)
            .order_by_desc(tariffs::Column::CreatedAt)
            .order_by_asc(tariffs::Column::Id)
            .offset(query.offset())
            .limit(query.limit())
            .all(&self.pool)
            .await?;
        Ok(models.into_iter().map(TariffResponse::from).collect())
    }

    pub async fn count(&self, query: &ListQuery) -> AppResult<u64> {
        let total = Self::search(tariffs::Entity::find_live(), query)
            .count(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn list_archive(
        &self,
        principal: &Principal,
        query: &ListQuery,
    ) -> AppResult<Vec<TariffResponse>> {
        principal.require_staff()?;
        let models = Self::search(tariffs::Entity::find_archived(), query)
            .order_by_desc(tariffs::Column::DeletedAt)
            .order_by_asc(tariffs::Column::Id)
            .offset(query.offset())
            .limit(query.limit())
            .all(&self.pool)
            .await?;
        Ok(models.into_iter().map(TariffResponse::from).collect())
    }

    pub async fn count_archive(&self, principal: &Principal, query: &ListQuery) -> AppResult<u64> {
        principal.require_staff()?;
        let total = Self::search(tariffs::Entity::find_archived(), query)
            .count(&self.pool)
            .await?;
        Ok(total)
    }
}
