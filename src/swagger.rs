use actix_web::{HttpResponse, web};
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::{Config, SwaggerUi};

use crate::entities::{AuditFields, OrderStatus};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::obtain_token_pair,
        handlers::auth::refresh_token,
        handlers::auth::verify_token,
        handlers::user::list_users,
        handlers::user::create_user,
        handlers::user::list_archived_users,
        handlers::user::get_user_by_id,
        handlers::user::get_user_by_email,
        handlers::user::update_user,
        handlers::user::partial_update_user,
        handlers::user::soft_delete_user,
        handlers::user::hard_delete_user,
        handlers::tariff::list_tariffs,
        handlers::tariff::create_tariff,
        handlers::tariff::list_archived_tariffs,
        handlers::tariff::get_tariff,
        handlers::tariff::update_tariff,
        handlers::tariff::partial_update_tariff,
        handlers::tariff::soft_delete_tariff,
        handlers::tariff::hard_delete_tariff,
        handlers::subscription::list_subscriptions,
        handlers::subscription::create_subscription,
        handlers::subscription::list_archived_subscriptions,
        handlers::subscription::get_subscription,
        handlers::subscription::update_subscription,
        handlers::subscription::partial_update_subscription,
        handlers::subscription::soft_delete_subscription,
        handlers::subscription::hard_delete_subscription,
        handlers::product::list_products,
        handlers::product::create_product,
        handlers::product::list_archived_products,
        handlers::product::get_product,
        handlers::product::update_product,
        handlers::product::partial_update_product,
        handlers::product::soft_delete_product,
        handlers::product::hard_delete_product,
        handlers::order::list_orders,
        handlers::order::create_order,
        handlers::order::list_archived_orders,
        handlers::order::get_order,
        handlers::order::update_order,
        handlers::order::partial_update_order,
        handlers::order::soft_delete_order,
        handlers::order::hard_delete_order,
    ),
    components(
        schemas(
            AuditFields,
            ApiError,
            PaginationOut,
            UserPage,
            TariffPage,
            SubscriptionPage,
            ProductPage,
            OrderPage,
            UserListResponse,
            TariffListResponse,
            SubscriptionListResponse,
            ProductListResponse,
            OrderListResponse,
            TokenObtainRequest,
            TokenPairResponse,
            TokenRefreshRequest,
            TokenRefreshResponse,
            TokenVerifyRequest,
            CreateUserRequest,
            UpdateUserRequest,
            PartialUpdateUserRequest,
            UserResponse,
            CreateTariffRequest,
            UpdateTariffRequest,
            PartialUpdateTariffRequest,
            TariffResponse,
            CreateSubscriptionRequest,
            UpdateSubscriptionRequest,
            PartialUpdateSubscriptionRequest,
            SubscriptionResponse,
            CreateProductRequest,
            UpdateProductRequest,
            PartialUpdateProductRequest,
            ProductResponse,
            OrderStatus,
            CreateOrderRequest,
            UpdateOrderRequest,
            PartialUpdateOrderRequest,
            OrderResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration and JWT tokens"),
        (name = "users", description = "User accounts"),
        (name = "tariff", description = "Subscription tariffs"),
        (name = "subscriptions", description = "User subscriptions"),
        (name = "products", description = "Product catalogue"),
        (name = "orders", description = "Orders for products and subscriptions"),
    ),
    info(
        title = "Subshop Backend API",
        version = "1.0.0",
        description = "Subscription-gated shop REST API. Most endpoints need an active subscription."
    )
)]
pub struct ApiDoc;

const OPENAPI_JSON_PATH: &str = "/api/schema/openapi.json";

async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Swagger UI under `/api/docs/`, schema at `/api/schema/openapi.json`.
/// Must be registered before the `/api` scope so it is not shadowed.
pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(OPENAPI_JSON_PATH)
            .name("schema")
            .route(web::get().to(openapi_json)),
    )
    .service(SwaggerUi::new("/api/docs/{_:.*}").config(Config::from(OPENAPI_JSON_PATH)))
    .service(
        web::resource("/api/docs")
            .name("swagger-ui")
            .route(web::get().to(|| async {
                HttpResponse::Found()
                    .append_header(("Location", "/api/docs/"))
                    .finish()
            })),
    );
}
