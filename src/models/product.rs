use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{AuditFields, Audited, products};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub title: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "19.90")]
    pub price: Decimal,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub title: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "19.90")]
    pub price: Decimal,
    pub is_active: bool,
}

/// An empty `description` clears it.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PartialUpdateProductRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub is_active: Option<bool>,
}

impl PartialUpdateProductRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.is_active.is_none()
    }
}

impl From<UpdateProductRequest> for PartialUpdateProductRequest {
    fn from(req: UpdateProductRequest) -> Self {
        Self {
            title: Some(req.title),
            description: Some(req.description.unwrap_or_default()),
            price: Some(req.price),
            is_active: Some(req.is_active),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "19.90")]
    pub price: Decimal,
    pub is_active: bool,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl From<products::Model> for ProductResponse {
    fn from(m: products::Model) -> Self {
        Self {
            audit: m.audit(),
            id: m.id,
            title: m.title,
            description: m.description,
            price: m.price,
            is_active: m.is_active,
        }
    }
}
