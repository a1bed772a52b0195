use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{AuditFields, Audited, OrderStatus, orders};

/// Exactly one of `product_id` and `subscription_id` must be given.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub product_id: Option<Uuid>,
    pub subscription_id: Option<Uuid>,
    pub description: Option<String>,
    /// Staff only; defaults to the caller
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub description: Option<String>,
    pub status: OrderStatus,
}

/// An empty `description` clears it.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PartialUpdateOrderRequest {
    pub description: Option<String>,
    pub status: Option<OrderStatus>,
}

impl PartialUpdateOrderRequest {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.status.is_none()
    }
}

impl From<UpdateOrderRequest> for PartialUpdateOrderRequest {
    fn from(req: UpdateOrderRequest) -> Self {
        Self {
            description: Some(req.description.unwrap_or_default()),
            status: Some(req.status),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Option<Uuid>,
    pub subscription_id: Option<Uuid>,
    pub description: Option<String>,
    pub status: OrderStatus,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl From<orders::Model> for OrderResponse {
    fn from(m: orders::Model) -> Self {
        Self {
            audit: m.audit(),
            id: m.id,
            user_id: m.user_id,
            product_id: m.product_id,
            subscription_id: m.subscription_id,
            description: m.description,
            status: m.status,
        }
    }
}
