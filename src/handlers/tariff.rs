use actix_web::{HttpResponse, ResponseError, Result, web};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::*;
use crate::services::TariffService;

#[utoipa::path(
    get,
    path = "/api/v1/tariff/",
    tag = "tariff",
    params(ListQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Live tariffs", body = TariffListResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_tariffs(
    tariff_service: web::Data<TariffService>,
    _principal: Principal,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let result = async {
        let items = tariff_service.list(&query).await?;
        let total = tariff_service.count(&query).await?;
        Ok::<_, AppError>(ListPayload::new(items, &query, total))
    }
    .await;

    match result {
        Ok(payload) => Ok(ApiResponse::ok(payload, "Tariffs retrieved")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/tariff/",
    tag = "tariff",
    request_body = CreateTariffRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Tariff created", body = TariffResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Staff only")
    )
)]
pub async fn create_tariff(
    tariff_service: web::Data<TariffService>,
    principal: Principal,
    request: web::Json<CreateTariffRequest>,
) -> Result<HttpResponse> {
    match tariff_service.create(&principal, request.into_inner()).await {
        Ok(tariff) => Ok(ApiResponse::created(tariff, "Tariff created")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/tariff/archive/",
    tag = "tariff",
    params(ListQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Soft-deleted tariffs", body = TariffListResponse),
        (status = 403, description = "Staff only")
    )
)]
pub async fn list_archived_tariffs(
    tariff_service: web::Data<TariffService>,
    principal: Principal,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let result = async {
        let items = tariff_service.list_archive(&principal, &query).await?;
        let total = tariff_service.count_archive(&principal, &query).await?;
        Ok::<_, AppError>(ListPayload::new(items, &query, total))
    }
    .await;

    match result {
        Ok(payload) => Ok(ApiResponse::ok(payload, "Archived tariffs retrieved")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/tariff/{id}/",
    tag = "tariff",
    params(("id" = Uuid, Path, description = "Tariff id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Tariff", body = TariffResponse),
        (status = 404, description = "Tariff not found")
    )
)]
pub async fn get_tariff(
    tariff_service: web::Data<TariffService>,
    _principal: Principal,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match tariff_service.get_by_id(path.into_inner()).await {
        Ok(tariff) => Ok(ApiResponse::ok(tariff, "Tariff retrieved")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/tariff/{id}/",
    tag = "tariff",
    params(("id" = Uuid, Path, description = "Tariff id")),
    request_body = UpdateTariffRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Tariff updated", body = TariffResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Tariff not found")
    )
)]
pub async fn update_tariff(
    tariff_service: web::Data<TariffService>,
    principal: Principal,
    path: web::Path<Uuid>,
    request: web::Json<UpdateTariffRequest>,
) -> Result<HttpResponse> {
    match tariff_service
        .update(&principal, path.into_inner(), request.into_inner())
        .await
    {
        Ok(tariff) => Ok(ApiResponse::ok(tariff, "Tariff updated")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    patch,
    path = "/api/v1/tariff/{id}/",
    tag = "tariff",
    params(("id" = Uuid, Path, description = "Tariff id")),
    request_body = PartialUpdateTariffRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Tariff updated", body = TariffResponse),
        (status = 400, description = "Validation error or empty update"),
        (status = 404, description = "Tariff not found")
    )
)]
pub async fn partial_update_tariff(
    tariff_service: web::Data<TariffService>,
    principal: Principal,
    path: web::Path<Uuid>,
    request: web::Json<PartialUpdateTariffRequest>,
) -> Result<HttpResponse> {
    match tariff_service
        .partial_update(&principal, path.into_inner(), request.into_inner())
        .await
    {
        Ok(tariff) => Ok(ApiResponse::ok(tariff, "Tariff updated")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/tariff/{id}/",
    tag = "tariff",
    params(("id" = Uuid, Path, description = "Tariff id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Tariff moved to the archive", body = TariffResponse),
        (status = 404, description = "Tariff not found")
    )
)]
pub async fn soft_delete_tariff(
    tariff_service: web::Data<TariffService>,
    principal: Principal,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match tariff_service.soft_delete(&principal, path.into_inner()).await {
        Ok(tariff) => Ok(ApiResponse::ok(tariff, "Tariff deleted")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/tariff/{id}/hard-delete/",
    tag = "tariff",
    params(("id" = Uuid, Path, description = "Tariff id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Tariff permanently removed"),
        (status = 400, description = "Tariff is not soft-deleted"),
        (status = 404, description = "Tariff not found")
    )
)]
pub async fn hard_delete_tariff(
    tariff_service: web::Data<TariffService>,
    principal: Principal,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match tariff_service.hard_delete(&principal, path.into_inner()).await {
        Ok(()) => Ok(ApiResponse::message_only("Tariff permanently deleted")),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn tariff_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tariff")
            .service(
                web::resource("/")
                    .name("v1:tariff:tariff-list-create")
                    .route(web::get().to(list_tariffs))
                    .route(web::post().to(create_tariff)),
            )
            .service(
                web::resource("/archive/")
                    .name("v1:tariff:tariff-archive-list")
                    .route(web::get().to(list_archived_tariffs)),
            )
            .service(
                web::resource("/{id}/")
                    .name("v1:tariff:tariff-detail-actions")
                    .route(web::get().to(get_tariff))
                    .route(web::put().to(update_tariff))
                    .route(web::patch().to(partial_update_tariff))
                    .route(web::delete().to(soft_delete_tariff)),
            )
            .service(
                web::resource("/{id}/hard-delete/")
                    .name("v1:tariff:tariff-hard-delete")
                    .route(web::delete().to(hard_delete_tariff)),
            ),
    );
}
