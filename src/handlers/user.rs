use actix_web::{HttpResponse, ResponseError, Result, web};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::*;
use crate::services::UserService;

#[utoipa::path(
    get,
    path = "/api/v1/users/",
    tag = "users",
    params(ListQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Users visible to the caller", body = UserListResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_users(
    user_service: web::Data<UserService>,
    principal: Principal,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let result = async {
        let items = user_service.list(&principal, &query).await?;
        let total = user_service.count(&principal, &query).await?;
        Ok::<_, AppError>(ListPayload::new(items, &query, total))
    }
    .await;

    match result {
        Ok(payload) => Ok(ApiResponse::ok(payload, "Users retrieved")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/users/create/",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation or creation error")
    )
)]
pub async fn create_user(
    user_service: web::Data<UserService>,
    request: web::Json<CreateUserRequest>,
) -> Result<HttpResponse> {
    match user_service.create(request.into_inner()).await {
        Ok(user) => Ok(ApiResponse::created(user, "User created")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users/archive/",
    tag = "users",
    params(ListQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Soft-deleted, inactive users", body = UserListResponse),
        (status = 403, description = "Staff only")
    )
)]
pub async fn list_archived_users(
    user_service: web::Data<UserService>,
    principal: Principal,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let result = async {
        let items = user_service.list_archive(&principal, &query).await?;
        let total = user_service.count_archive(&principal, &query).await?;
        Ok::<_, AppError>(ListPayload::new(items, &query, total))
    }
    .await;

    match result {
        Ok(payload) => Ok(ApiResponse::ok(payload, "Archived users retrieved")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users/detail_uuid/{id}/",
    tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_by_id(
    user_service: web::Data<UserService>,
    principal: Principal,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match user_service.get_by_id(&principal, path.into_inner()).await {
        Ok(user) => Ok(ApiResponse::ok(user, "User retrieved")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users/detail_email/{email}/",
    tag = "users",
    params(("email" = String, Path, description = "User email")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_by_email(
    user_service: web::Data<UserService>,
    principal: Principal,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match user_service.get_by_email(&principal, &path).await {
        Ok(user) => Ok(ApiResponse::ok(user, "User retrieved")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/users/update/{id}/",
    tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation or update error"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    user_service: web::Data<UserService>,
    principal: Principal,
    path: web::Path<Uuid>,
    request: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse> {
    match user_service
        .update(&principal, path.into_inner(), request.into_inner())
        .await
    {
        Ok(user) => Ok(ApiResponse::ok(user, "User updated")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/partial_update/{id}/",
    tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = PartialUpdateUserRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error or empty update"),
        (status = 404, description = "User not found")
    )
)]
pub async fn partial_update_user(
    user_service: web::Data<UserService>,
    principal: Principal,
    path: web::Path<Uuid>,
    request: web::Json<PartialUpdateUserRequest>,
) -> Result<HttpResponse> {
    match user_service
        .partial_update(&principal, path.into_inner(), request.into_inner())
        .await
    {
        Ok(user) => Ok(ApiResponse::ok(user, "User updated")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/soft_delete/{id}/",
    tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User deactivated and archived", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn soft_delete_user(
    user_service: web::Data<UserService>,
    principal: Principal,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match user_service.soft_delete(&principal, path.into_inner()).await {
        Ok(user) => Ok(ApiResponse::ok(user, "User deleted")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/hard_delete/{id}/",
    tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User permanently removed"),
        (status = 400, description = "User is not soft-deleted"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "User not found")
    )
)]
pub async fn hard_delete_user(
    user_service: web::Data<UserService>,
    principal: Principal,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match user_service.hard_delete(&principal, path.into_inner()).await {
        Ok(()) => Ok(ApiResponse::message_only("User permanently deleted")),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn user_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .service(
                web::resource("/")
                    .name("v1:users:users-list")
                    .route(web::get().to(list_users)),
            )
            .service(
                web::resource("/create/")
                    .name("v1:users:create-user")
                    .route(web::post().to(create_user)),
            )
            .service(
                web::resource("/archive/")
                    .name("v1:users:archive-users")
                    .route(web::get().to(list_archived_users)),
            )
            .service(
                web::resource("/detail_uuid/{id}/")
                    .name("v1:users:user-detail-by-id")
                    .route(web::get().to(get_user_by_id)),
            )
            .service(
                web::resource("/detail_email/{email}/")
                    .name("v1:users:user-detail-by-email")
                    .route(web::get().to(get_user_by_email)),
            )
            .service(
                web::resource("/update/{id}/")
                    .name("v1:users:update-user")
                    .route(web::put().to(update_user)),
            )
            .service(
                web::resource("/partial_update/{id}/")
                    .name("v1:users:partial-update-user")
                    .route(web::patch().to(partial_update_user)),
            )
            .service(
                web::resource("/soft_delete/{id}/")
                    .name("v1:users:soft-delete-user")
                    .route(web::delete().to(soft_delete_user)),
            )
            .service(
                web::resource("/hard_delete/{id}/")
                    .name("v1:users:hard-delete-user")
                    .route(web::delete().to(hard_delete_user)),
            ),
    );
}
