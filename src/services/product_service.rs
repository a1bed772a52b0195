use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{SoftDeletable, SoftDeleteEntity, products};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::icontains;
use crate::utils::validation::{validate_length, validate_price};

const DUPLICATE_TITLE: &str = "Product with this title already exists";

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Product with id {id} not found"))
}

fn validate_title(title: &str) -> AppResult<()> {
    validate_length("title", title.trim(), 1, 255)
}

fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

#[derive(Clone)]
pub struct ProductService {
    pool: DatabaseConnection,
}

impl ProductService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        principal: &Principal,
        request: CreateProductRequest,
    ) -> AppResult<ProductResponse> {
        principal.require_staff()?;
        validate_title(&request.title)?;
        validate_price("price", request.price)?;

        let now = Utc::now();
        let model = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(request.title.trim().to_string()),
            description: Set(clean_description(request.description)),
            price: Set(request.price),
            is_active: Set(request.is_active.unwrap_or(true)),
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
                || AppError::CreationError(DUPLICATE_TITLE.to_string()),
                || AppError::CreationError("Product references a missing record".to_string()),
                |e| AppError::CreationError(format!("Failed to create product: {e}")),
            )
        })?;

        log::info!("Product {} ({}) created", model.id, model.title);
        Ok(ProductResponse::from(model))
    }

    /// Non-staff callers only see products that are on sale.
    fn visible(principal: &Principal) -> Select<products::Entity> {
        let select = products::Entity::find_live();
        if principal.is_staff {
            select
        } else {
            select.filter(products::Column::IsActive.eq(true))
        }
    }

    pub async fn get_by_id(&self, principal: &Principal, id: Uuid) -> AppResult<ProductResponse> {
        let model = Self::visible(principal)
            .filter(products::Column::Id.eq(id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))?;
        Ok(ProductResponse::from(model))
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        request: UpdateProductRequest,
    ) -> AppResult<ProductResponse> {
        self.partial_update(principal, id, request.into()).await
    }

    pub async fn partial_update(
        &self,
        principal: &Principal,
        id: Uuid,
        request: PartialUpdateProductRequest,
    ) -> AppResult<ProductResponse> {
        principal.require_staff()?;
        if request.is_empty() {
            return Err(AppError::EmptyUpdate("No fields provided for product update".to_string()));
        }
        if let Some(title) = &request.title {
            validate_title(title)?;
        }
        if let Some(price) = request.price {
            validate_price("price", price)?;
        }

        let txn = self.pool.begin().await?;

        let mut model = products::Entity::find_live()
            .filter(products::Column::Id.eq(id))
            .one(&txn)
            .await?
            .ok_or_else(|| not_found(id))?
            .into_active_model();

        if let Some(title) = request.title {
            model.title = Set(title.trim().to_string());
        }
        if request.description.is_some() {
            model.description = Set(clean_description(request.description));
        }
        if let Some(price) = request.price {
            model.price = Set(price);
        }
        if let Some(is_active) = request.is_active {
            model.is_active = Set(is_active);
        }
        model.touch(Utc::now());

        let updated = model.update(&txn).await.map_err(|e| {
            AppError::from_constraint(
                e,
                || AppError::UpdateError(DUPLICATE_TITLE.to_string()),
                || AppError::UpdateError("Product references a missing record".to_string()),
                |e| AppError::UpdateError(format!("Failed to update product {id}: {e}")),
            )
        })?;
        txn.commit().await?;
        Ok(ProductResponse::from(updated))
    }

    pub async fn soft_delete(&self, principal: &Principal, id: Uuid) -> AppResult<ProductResponse> {
        principal.require_staff()?;
        let txn = self.pool.begin().await?;

        let existing = products::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| not_found(id))?;
        if existing.is_deleted {
            return Ok(ProductResponse::from(existing));
        }

        let mut model = existing.into_active_model();
        model.is_active = Set(false);
        model.mark_deleted(Utc::now());
        let deleted = model.update(&txn).await?;

        txn.commit().await?;
        log::info!("Product {id} soft-deleted");
        Ok(ProductResponse::from(deleted))
    }

    pub async fn hard_delete(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        principal.require_staff()?;
        let txn = self.pool.begin().await?;

        let existing = products::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| not_found(id))?;
        if !existing.is_deleted {
            return Err(AppError::ActiveDelete(
                "Product must be soft-deleted before it can be permanently removed".to_string(),
            ));
        }

        products::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::DeleteError(format!("Failed to delete product {id}: {e}")))?;

        txn.commit().await?;
        log::info!("Product {id} permanently deleted");
        Ok(())
    }

    fn search(select: Select<products::Entity>, query: &ListQuery) -> Select<products::Entity> {
        match query.search() {
            Some(term) => select.filter(
                Condition::any()
                    .add(icontains(products::Column::Title, term))
                    .add(icontains(products::Column::Description, term)),
            ),
            None => select,
        }
    }

    fn archived() -> Select<products::Entity> {
        products::Entity::find_archived().filter(products::Column::IsActive.eq(false))
    }

    pub async fn list(
        &self,
        principal: &Principal,
        query: &ListQuery,
    ) -> AppResult<Vec<ProductResponse>> {
        let models = Self::search(Self::visible(principal), query)
            .order_by_asc(products::Column::Title)
            .offset(query.offset())
            .limit(query.limit())
            .all(&self.pool)
            .await?;
        Ok(models.into_iter().map(ProductResponse::from).collect())
    }

    pub async fn count(&self, principal: &Principal, query: &ListQuery) -> AppResult<u64> {
        let total = Self::search(Self::visible(principal), query)
            .count(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn list_archive(
        &self,
        principal: &Principal,
        query: &ListQuery,
    ) -> AppResult<Vec<ProductResponse>> {
        principal.require_staff()?;
        let models = Self::search(Self::archived(), query)
            .order_by_desc(products::Column::DeletedAt)
            .order_by_asc(products::Column::Id)
            .offset(query.offset())
            .limit(query.limit())
            .all(&self.pool)
            .await?;
        Ok(models.into_iter().map(ProductResponse::from).collect())
    }

    pub async fn count_archive(&self, principal: &Principal, query: &ListQuery) -> AppResult<u64> {
        principal.require_staff()?;
        let total = Self::search(Self::archived(), query).count(&self.pool).await?;
        Ok(total)
    }
}
