use actix_web::{HttpResponse, ResponseError, Result, web};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::*;
use crate::services::SubscriptionService;

#[utoipa::path(
    get,
    path = "/api/v1/subscriptions/",
    tag = "subscriptions",
    params(ListQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's subscriptions (all for staff)", body = SubscriptionListResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_subscriptions(
    subscription_service: web::Data<SubscriptionService>,
    principal: Principal,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let result = async {
        let items = subscription_service.list(&principal, &query).await?;
        let total = subscription_service.count(&principal, &query).await?;
        Ok::<_, AppError>(ListPayload::new(items, &query, total))
    }
    .await;

    match result {
        Ok(payload) => Ok(ApiResponse::ok(payload, "Subscriptions retrieved")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/subscriptions/",
    tag = "subscriptions",
    request_body = CreateSubscriptionRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Subscription created", body = SubscriptionResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_subscription(
    subscription_service: web::Data<SubscriptionService>,
    principal: Principal,
    request: web::Json<CreateSubscriptionRequest>,
) -> Result<HttpResponse> {
    match subscription_service.create(&principal, request.into_inner()).await {
        Ok(subscription) => Ok(ApiResponse::created(subscription, "Subscription created")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/subscriptions/archive/",
    tag = "subscriptions",
    params(ListQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Soft-deleted, inactive subscriptions", body = SubscriptionListResponse),
        (status = 403, description = "Staff only")
    )
)]
pub async fn list_archived_subscriptions(
    subscription_service: web::Data<SubscriptionService>,
    principal: Principal,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let result = async {
        let items = subscription_service.list_archive(&principal, &query).await?;
        let total = subscription_service.count_archive(&principal, &query).await?;
        Ok::<_, AppError>(ListPayload::new(items, &query, total))
    }
    .await;

    match result {
        Ok(payload) => Ok(ApiResponse::ok(payload, "Archived subscriptions retrieved")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/subscriptions/{id}/",
    tag = "subscriptions",
    params(("id" = Uuid, Path, description = "Subscription id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Subscription", body = SubscriptionResponse),
        (status = 404, description = "Subscription not found")
    )
)]
pub async fn get_subscription(
    subscription_service: web::Data<SubscriptionService>,
    principal: Principal,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match subscription_service.get_by_id(&principal, path.into_inner()).await {
        Ok(subscription) => Ok(ApiResponse::ok(subscription, "Subscription retrieved")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/subscriptions/{id}/",
    tag = "subscriptions",
    params(("id" = Uuid, Path, description = "Subscription id")),
    request_body = UpdateSubscriptionRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Subscription updated", body = SubscriptionResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Subscription not found")
    )
)]
pub async fn update_subscription(
    subscription_service: web::Data<SubscriptionService>,
    principal: Principal,
    path: web::Path<Uuid>,
    request: web::Json<UpdateSubscriptionRequest>,
) -> Result<HttpResponse> {
    match subscription_service
        .update(&principal, path.into_inner(), request.into_inner())
        .await
    {
        Ok(subscription) => Ok(ApiResponse::ok(subscription, "Subscription updated")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    patch,
    path = "/api/v1/subscriptions/{id}/",
    tag = "subscriptions",
    params(("id" = Uuid, Path, description = "Subscription id")),
    request_body = PartialUpdateSubscriptionRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Subscription updated", body = SubscriptionResponse),
        (status = 400, description = "Validation error or empty update"),
        (status = 404, description = "Subscription not found")
    )
)]
pub async fn partial_update_subscription(
    subscription_service: web::Data<SubscriptionService>,
    principal: Principal,
    path: web::Path<Uuid>,
    request: web::Json<PartialUpdateSubscriptionRequest>,
) -> Result<HttpResponse> {
    match subscription_service
        .partial_update(&principal, path.into_inner(), request.into_inner())
        .await
    {
        Ok(subscription) => Ok(ApiResponse::ok(subscription, "Subscription updated")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/subscriptions/{id}/",
    tag = "subscriptions",
    params(("id" = Uuid, Path, description = "Subscription id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Subscription deactivated and archived", body = SubscriptionResponse),
        (status = 404, description = "Subscription not found")
    )
)]
pub async fn soft_delete_subscription(
    subscription_service: web::Data<SubscriptionService>,
    principal: Principal,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match subscription_service.soft_delete(&principal, path.into_inner()).await {
        Ok(subscription) => Ok(ApiResponse::ok(subscription, "Subscription deleted")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/subscriptions/{id}/hard-delete/",
    tag = "subscriptions",
    params(("id" = Uuid, Path, description = "Subscription id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Subscription permanently removed"),
        (status = 400, description = "Subscription is not soft-deleted"),
        (status = 404, description = "Subscription not found")
    )
)]
pub async fn hard_delete_subscription(
    subscription_service: web::Data<SubscriptionService>,
    principal: Principal,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match subscription_service.hard_delete(&principal, path.into_inner()).await {
        Ok(()) => Ok(ApiResponse::message_only("Subscription permanently deleted")),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn subscription_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/subscriptions")
            .service(
                web::resource("/")
                    .name("v1:subscriptions:subscriptions-list-create")
                    .route(web::get().to(list_subscriptions))
                    .route(web::post().to(create_subscription)),
            )
            .service(
                web::resource("/archive/")
                    .name("v1:subscriptions:subscription-archive-list")
                    .route(web::get().to(list_archived_subscriptions)),
            )
            .service(
                web::resource("/{id}/")
                    .name("v1:subscriptions:subscription-detail-actions")
                    .route(web::get().to(get_subscription))
                    .route(web::put().to(update_subscription))
                    .route(web::patch().to(partial_update_subscription))
                    .route(web::delete().to(soft_delete_subscription)),
            )
            .service(
                web::resource("/{id}/hard-delete/")
                    .name("v1:subscriptions:subscription-hard-delete")
                    .route(web::delete().to(hard_delete_subscription)),
            ),
    );
}
