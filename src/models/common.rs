use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::models::{OrderPage, ProductPage, SubscriptionPage, TariffPage, UserPage};

/// Envelope every JSON endpoint answers with. Errors use the same shape
/// with `data` omitted; see `AppError::error_response`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[aliases(
    UserListResponse = ApiResponse<UserPage>,
    TariffListResponse = ApiResponse<TariffPage>,
    SubscriptionListResponse = ApiResponse<SubscriptionPage>,
    ProductListResponse = ApiResponse<ProductPage>,
    OrderListResponse = ApiResponse<OrderPage>
)]
pub struct ApiResponse<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[schema(value_type = Object)]
    pub meta: Map<String, Value>,
    pub errors: Vec<ApiError>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub detail: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta: Map::new(),
            errors: Vec::new(),
        }
    }

    pub fn ok(data: T, message: impl Into<String>) -> HttpResponse {
        HttpResponse::Ok().json(Self::success(data, message))
    }

    pub fn created(data: T, message: impl Into<String>) -> HttpResponse {
        HttpResponse::Created().json(Self::success(data, message))
    }
}

impl ApiResponse<()> {
    pub fn message_only(message: impl Into<String>) -> HttpResponse {
        HttpResponse::Ok().json(ApiResponse::<()> {
            message: message.into(),
            data: None,
            meta: Map::new(),
            errors: Vec::new(),
        })
    }
}
