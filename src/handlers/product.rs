use actix_web::{HttpResponse, ResponseError, Result, web};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::*;
use crate::services::ProductService;

#[utoipa::path(
    get,
    path = "/api/v1/products/",
    tag = "products",
    params(ListQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Products on sale (all live products for staff)", body = ProductListResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_products(
    product_service: web::Data<ProductService>,
    principal: Principal,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let result = async {
        let items = product_service.list(&principal, &query).await?;
        let total = product_service.count(&principal, &query).await?;
        Ok::<_, AppError>(ListPayload::new(items, &query, total))
    }
    .await;

    match result {
        Ok(payload) => Ok(ApiResponse::ok(payload, "Products retrieved")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/products/",
    tag = "products",
    request_body = CreateProductRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Staff only")
    )
)]
pub async fn create_product(
    product_service: web::Data<ProductService>,
    principal: Principal,
    request: web::Json<CreateProductRequest>,
) -> Result<HttpResponse> {
    match product_service.create(&principal, request.into_inner()).await {
        Ok(product) => Ok(ApiResponse::created(product, "Product created")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/products/archive/",
    tag = "products",
    params(ListQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Soft-deleted products", body = ProductListResponse),
        (status = 403, description = "Staff only")
    )
)]
pub async fn list_archived_products(
    product_service: web::Data<ProductService>,
    principal: Principal,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let result = async {
        let items = product_service.list_archive(&principal, &query).await?;
        let total = product_service.count_archive(&principal, &query).await?;
        Ok::<_, AppError>(ListPayload::new(items, &query, total))
    }
    .await;

    match result {
        Ok(payload) => Ok(ApiResponse::ok(payload, "Archived products retrieved")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}/",
    tag = "products",
    params(("id" = Uuid, Path, description = "Product id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product", body = ProductResponse),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    product_service: web::Data<ProductService>,
    principal: Principal,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match product_service.get_by_id(&principal, path.into_inner()).await {
        Ok(product) => Ok(ApiResponse::ok(product, "Product retrieved")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/products/{id}/",
    tag = "products",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    product_service: web::Data<ProductService>,
    principal: Principal,
    path: web::Path<Uuid>,
    request: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse> {
    match product_service
        .update(&principal, path.into_inner(), request.into_inner())
        .await
    {
        Ok(product) => Ok(ApiResponse::ok(product, "Product updated")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    patch,
    path = "/api/v1/products/{id}/",
    tag = "products",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = PartialUpdateProductRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Validation error or empty update"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn partial_update_product(
    product_service: web::Data<ProductService>,
    principal: Principal,
    path: web::Path<Uuid>,
    request: web::Json<PartialUpdateProductRequest>,
) -> Result<HttpResponse> {
    match product_service
        .partial_update(&principal, path.into_inner(), request.into_inner())
        .await
    {
        Ok(product) => Ok(ApiResponse::ok(product, "Product updated")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}/",
    tag = "products",
    params(("id" = Uuid, Path, description = "Product id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product moved to the archive", body = ProductResponse),
        (status = 404, description = "Product not found")
    )
)]
pub async fn soft_delete_product(
    product_service: web::Data<ProductService>,
    principal: Principal,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match product_service.soft_delete(&principal, path.into_inner()).await {
        Ok(product) => Ok(ApiResponse::ok(product, "Product deleted")),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}/hard-delete/",
    tag = "products",
    params(("id" = Uuid, Path, description = "Product id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product permanently removed"),
        (status = 400, description = "Product is not soft-deleted"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn hard_delete_product(
    product_service: web::Data<ProductService>,
    principal: Principal,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match product_service.hard_delete(&principal, path.into_inner()).await {
        Ok(()) => Ok(ApiResponse::message_only("Product permanently deleted")),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn product_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .service(
                web::resource("/")
                    .name("v1:products:products-list-create")
                    .route(web::get().to(list_products))
                    .route(web::post().to(create_product)),
            )
            .service(
                web::resource("/archive/")
                    .name("v1:products:product-archive-list")
                    .route(web::get().to(list_archived_products)),
            )
            .service(
                web::resource("/{id}/")
                    .name("v1:products:product-detail-actions")
                    .route(web::get().to(get_product))
                    .route(web::put().to(update_product))
                    .route(web::patch().to(partial_update_product))
                    .route(web::delete().to(soft_delete_product)),
            )
            .service(
                web::resource("/{id}/hard-delete/")
                    .name("v1:products:product-hard-delete")
                    .route(web::delete().to(hard_delete_product)),
            ),
    );
}
