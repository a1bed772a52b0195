use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{SoftDeletable, SoftDeleteEntity, users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::validation::{validate_email, validate_length};
use crate::utils::{hash_password, icontains, validate_password, validate_phone};

fn not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_name(field: &str, value: &str) -> AppResult<()> {
    validate_length(field, value.trim(), 2, 30)
}

/// Empty or whitespace-only phone means "no phone".
fn clean_phone(phone: Option<&str>) -> AppResult<Option<String>> {
    match phone.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => {
            validate_phone(p)?;
            Ok(Some(p.to_string()))
        }
        None => Ok(None),
    }
}

#[derive(Clone)]
pub struct UserService {
    pool: DatabaseConnection,
    password_hash_cost: u32,
}

impl UserService {
    pub fn new(pool: DatabaseConnection, password_hash_cost: u32) -> Self {
        Self {
            pool,
            password_hash_cost,
        }
    }

    /// Registers an account. New accounts stay inactive until they are
    /// bound to a chat identity.
    pub async fn create(&self, request: CreateUserRequest) -> AppResult<UserResponse> {
        let email = normalize_email(&request.email);
        validate_email(&email)?;
        validate_password(&request.password)?;
        validate_name("first_name", &request.first_name)?;
        validate_name("last_name", &request.last_name)?;
        let phone = clean_phone(request.phone.as_deref())?;
        let password_hash = hash_password(&request.password, self.password_hash_cost)?;

        let txn = self.pool.begin().await?;

        let taken = users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .count(&txn)
            .await?;
        if taken > 0 {
            return Err(AppError::CreationError(
                "User with this email already exists".to_string(),
            ));
        }
        if let Some(phone) = &phone
            && Self::phone_taken(&txn, phone, None).await?
        {
            return Err(AppError::CreationError(
                "User with this phone number already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let model = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            password_hash: Set(password_hash),
            first_name: Set(request.first_name.trim().to_string()),
            last_name: Set(request.last_name.trim().to_string()),
            phone: Set(phone),
            telegram_id: Set(None),
            is_staff: Set(false),
            is_active: Set(false),
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
                || AppError::CreationError("User with this email already exists".to_string()),
                || AppError::CreationError("User references a missing record".to_string()),
                |e| AppError::CreationError(format!("Failed to create user: {e}")),
            )
        })?;

        txn.commit().await?;

        log::info!("User {} registered as {}", model.id, model.email);
        Ok(UserResponse::from(model))
    }

    /// Phones identify accounts during chat binding, so live accounts must not share one.
    async fn phone_taken<C: ConnectionTrait>(
        db: &C,
        phone: &str,
        except: Option<Uuid>,
    ) -> AppResult<bool> {
        let mut select = users::Entity::find_live().filter(users::Column::Phone.eq(phone));
        if let Some(id) = except {
            select = select.filter(users::Column::Id.ne(id));
        }
        Ok(select.count(db).await? > 0)
    }

    fn scoped(select: Select<users::Entity>, principal: &Principal) -> Select<users::Entity> {
        match principal.owner_scope() {
            Some(owner) => select.filter(users::Column::Id.eq(owner)),
            None => select,
        }
    }

    pub async fn get_by_id(&self, principal: &Principal, id: Uuid) -> AppResult<UserResponse> {
        let model = Self::scoped(users::Entity::find_live(), principal)
            .filter(users::Column::Id.eq(id))
            .one(&self.pool)
            .await?
            .ok_or_else(not_found)?;
        Ok(UserResponse::from(model))
    }

    pub async fn get_by_email(&self, principal: &Principal, email: &str) -> AppResult<UserResponse> {
        let model = Self::scoped(users::Entity::find_live(), principal)
            .filter(users::Column::Email.eq(normalize_email(email)))
            .one(&self.pool)
            .await?
            .ok_or_else(not_found)?;
        Ok(UserResponse::from(model))
    }

    /// Live, activated account for an authenticated request; `None` otherwise.
    pub async fn find_active(&self, id: Uuid) -> AppResult<Option<users::Model>> {
        let model = users::Entity::find_live()
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::IsActive.eq(true))
            .one(&self.pool)
            .await?;
        Ok(model)
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<users::Model>> {
        let model = users::Entity::find_live()
            .filter(users::Column::Email.eq(normalize_email(email)))
            .one(&self.pool)
            .await?;
        Ok(model)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> AppResult<UserResponse> {
        self.partial_update(principal, id, request.into()).await
    }

    pub async fn partial_update(
        &self,
        principal: &Principal,
        id: Uuid,
        request: PartialUpdateUserRequest,
    ) -> AppResult<UserResponse> {
        if request.is_empty() {
            return Err(AppError::EmptyUpdate("No fields provided for user update".to_string()));
        }

        let email = request.email.as_deref().map(normalize_email);
        if let Some(email) = &email {
            validate_email(email)?;
        }
        if let Some(first_name) = &request.first_name {
            validate_name("first_name", first_name)?;
        }
        if let Some(last_name) = &request.last_name {
            validate_name("last_name", last_name)?;
        }
        let phone = match request.phone.as_deref() {
            Some(raw) => Some(clean_phone(Some(raw))?),
            None => None,
        };
        let password_hash = match request.password.as_deref() {
            Some(password) => {
                validate_password(password)?;
                Some(hash_password(password, self.password_hash_cost)?)
            }
            None => None,
        };

        let txn = self.pool.begin().await?;

        let existing = Self::scoped(users::Entity::find_live(), principal)
            .filter(users::Column::Id.eq(id))
            .one(&txn)
            .await?
            .ok_or_else(not_found)?;

        if let Some(email) = &email {
            let taken = users::Entity::find()
                .filter(users::Column::Email.eq(email.as_str()))
                .filter(users::Column::Id.ne(id))
                .count(&txn)
                .await?;
            if taken > 0 {
                return Err(AppError::UpdateError(
                    "User with this email already exists".to_string(),
                ));
            }
        }
        if let Some(Some(phone)) = &phone
            && Self::phone_taken(&txn, phone, Some(id)).await?
        {
            return Err(AppError::UpdateError(
                "User with this phone number already exists".to_string(),
            ));
        }

        let mut model = existing.into_active_model();
        if let Some(email) = email {
            model.email = Set(email);
        }
        if let Some(first_name) = request.first_name {
            model.first_name = Set(first_name.trim().to_string());
        }
        if let Some(last_name) = request.last_name {
            model.last_name = Set(last_name.trim().to_string());
        }
        if let Some(phone) = phone {
            model.phone = Set(phone);
        }
        if let Some(password_hash) = password_hash {
            model.password_hash = Set(password_hash);
        }
        model.touch(Utc::now());

        let updated = model.update(&txn).await.map_err(|e| {
            AppError::from_constraint(
                e,
                || AppError::UpdateError("User with this email already exists".to_string()),
                || AppError::UpdateError("User references a missing record".to_string()),
                |e| AppError::UpdateError(format!("Failed to update user: {e}")),
            )
        })?;

        txn.commit().await?;
        Ok(UserResponse::from(updated))
    }

    /// Soft-deletes and deactivates the account. Repeating it returns the row unchanged.
    pub async fn soft_delete(&self, principal: &Principal, id: Uuid) -> AppResult<UserResponse> {
        let txn = self.pool.begin().await?;

        let existing = Self::scoped(users::Entity::find(), principal)
            .filter(users::Column::Id.eq(id))
            .one(&txn)
            .await?
            .ok_or_else(not_found)?;
        if existing.is_deleted {
            return Ok(UserResponse::from(existing));
        }

        let mut model = existing.into_active_model();
        model.is_active = Set(false);
        model.mark_deleted(Utc::now());
        let deleted = model.update(&txn).await?;
        txn.commit().await?;

        log::info!("User {id} soft-deleted");
        Ok(UserResponse::from(deleted))
    }

    pub async fn hard_delete(&self, principal: &Principal, id: Uuid) -> AppResult<()> {
        principal.require_staff()?;

        let txn = self.pool.begin().await?;

        let existing = users::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(not_found)?;
        if !existing.is_deleted {
            return Err(AppError::ActiveDelete(
                "User must be soft-deleted before it can be permanently removed".to_string(),
            ));
        }

        users::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::DeleteError(format!("Failed to delete user {id}: {e}")))?;
        txn.commit().await?;

        log::info!("User {id} permanently deleted");
        Ok(())
    }

    fn search(select: Select<users::Entity>, query: &ListQuery) -> Select<users::Entity> {
        match query.search() {
            Some(term) => select.filter(
                Condition::any()
                    .add(icontains(users::Column::FirstName, term))
                    .add(icontains(users::Column::LastName, term))
                    .add(icontains(users::Column::Email, term)),
            ),
            None => select,
        }
    }

    fn archived() -> Select<users::Entity> {
        users::Entity::find_archived().filter(users::Column::IsActive.eq(false))
    }

    pub async fn list(&self, principal: &Principal, query: &ListQuery) -> AppResult<Vec<UserResponse>> {
        let models = Self::search(Self::scoped(users::Entity::find_live(), principal), query)
            .order_by_desc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Id)
            .offset(query.offset())
            .limit(query.limit())
            .all(&self.pool)
            .await?;
        Ok(models.into_iter().map(UserResponse::from).collect())
    }

    pub async fn count(&self, principal: &Principal, query: &ListQuery) -> AppResult<u64> {
        let total = Self::search(Self::scoped(users::Entity::find_live(), principal), query)
            .count(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn list_archive(
        &self,
        principal: &Principal,
        query: &ListQuery,
    ) -> AppResult<Vec<UserResponse>> {
        principal.require_staff()?;
        let models = Self::search(Self::archived(), query)
            .order_by_desc(users::Column::DeletedAt)
            .order_by_asc(users::Column::Id)
            .offset(query.offset())
            .limit(query.limit())
            .all(&self.pool)
            .await?;
        Ok(models.into_iter().map(UserResponse::from).collect())
    }

    pub async fn count_archive(&self, principal: &Principal, query: &ListQuery) -> AppResult<u64> {
        principal.require_staff()?;
        let total = Self::search(Self::archived(), query).count(&self.pool).await?;
        Ok(total)
    }
}
