use actix_web::{HttpResponse, ResponseError, Result, web};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::*;
use crate::services::OrderService;

#[utoipa::path(
    get,
    path = "/api/v1/orders/",
    tag = "orders",
    params(ListQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's orders (all for staff)", body = OrderListResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_orders(
    order_service: web::Data<OrderService>,
    principal: Principal,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let result = async {
        let items = order_service.list(&principal, &query).await?;
        let total = order_service.count(&principal, &query).await?;
        Ok::<_, AppError>(ListPayload::new(items, &query, total))
    }
    .await;

    match result {
        Ok(payload) => Ok(ApiResponse::ok(payload, "Orders retrieved")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/orders/",
    tag = "orders",
    request_body = CreateOrderRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Order created, owner notified in Telegram", body = OrderResponse),
        (status = 400, description = "Validation or creation error")
    )
)]
pub async fn create_order(
    order_service: web::Data<OrderService>,
    principal: Principal,
    request: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse> {
    match order_service.create(&principal, request.into_inner()).await {
        Ok(order) => Ok(ApiResponse::created(order, "Order created")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/archive/",
    tag = "orders",
    params(ListQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Soft-deleted orders", body = OrderListResponse),
        (status = 403, description = "Staff only")
    )
)]
pub async fn list_archived_orders(
    order_service: web::Data<OrderService>,
    principal: Principal,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let result = async {
        let items = order_service.list_archive(&principal, &query).await?;
        let total = order_service.count_archive(&principal, &query).await?;
        Ok::<_, AppError>(ListPayload::new(items, &query, total))
    }
    .await;

    match result {
        Ok(payload) => Ok(ApiResponse::ok(payload, "Archived orders retrieved")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/",
    tag = "orders",
    params(("id" = Uuid, Path, description = "Order id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order", body = OrderResponse),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    order_service: web::Data<OrderService>,
    principal: Principal,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match order_service.get_by_id(&principal, path.into_inner()).await {
        Ok(order) => Ok(ApiResponse::ok(order, "Order retrieved")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/",
    tag = "orders",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateOrderRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_order(
    order_service: web::Data<OrderService>,
    principal: Principal,
    path: web::Path<Uuid>,
    request: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse> {
    match order_service
        .update(&principal, path.into_inner(), request.into_inner())
        .await
    {
        Ok(order) => Ok(ApiResponse::ok(order, "Order updated")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    patch,
    path = "/api/v1/orders/{id}/",
    tag = "orders",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = PartialUpdateOrderRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, description = "Validation error or empty update"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn partial_update_order(
    order_service: web::Data<OrderService>,
    principal: Principal,
    path: web::Path<Uuid>,
    request: web::Json<PartialUpdateOrderRequest>,
) -> Result<HttpResponse> {
    match order_service
        .partial_update(&principal, path.into_inner(), request.into_inner())
        .await
    {
        Ok(order) => Ok(ApiResponse::ok(order, "Order updated")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/orders/{id}/",
    tag = "orders",
    params(("id" = Uuid, Path, description = "Order id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order moved to the archive", body = OrderResponse),
        (status = 404, description = "Order not found")
    )
)]
pub async fn soft_delete_order(
    order_service: web::Data<OrderService>,
    principal: Principal,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match order_service.soft_delete(&principal, path.into_inner()).await {
        Ok(order) => Ok(ApiResponse::ok(order, "Order deleted")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/orders/{id}/hard-delete/",
    tag = "orders",
    params(("id" = Uuid, Path, description = "Order id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order permanently removed"),
        (status = 400, description = "Order is not soft-deleted"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn hard_delete_order(
    order_service: web::Data<OrderService>,
    principal: Principal,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match order_service.hard_delete(&principal, path.into_inner()).await {
        Ok(()) => Ok(ApiResponse::message_only("Order permanently deleted")),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .service(
                web::resource("/")
                    .name("v1:orders:orders-list-create")
                    .route(web::get().to(list_orders))
                    .route(web::post().to(create_order)),
            )
            .service(
                web::resource("/archive/")
                    .name("v1:orders:order-archive-list")
                    .route(web::get().to(list_archived_orders)),
            )
            .service(
                web::resource("/{id}/")
                    .name("v1:orders:order-detail-actions")
                    .route(web::get().to(get_order))
                    .route(web::put().to(update_order))
                    .route(web::patch().to(partial_update_order))
                    .route(web::delete().to(soft_delete_order)),
            )
            .service(
                web::resource("/{id}/hard-delete/")
                    .name("v1:orders:order-hard-delete")
                    .route(web::delete().to(hard_delete_order)),
            ),
    );
}
