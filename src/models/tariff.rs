use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{AuditFields, Audited, tariffs};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTariffRequest {
    pub name: String,
    #[schema(value_type = String, example = "9.99")]
    pub price: Decimal,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateTariffRequest {
    pub name: String,
    #[schema(value_type = String, example = "9.99")]
    pub price: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PartialUpdateTariffRequest {
    pub name: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
}

impl PartialUpdateTariffRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none()
    }
}

impl From<UpdateTariffRequest> for PartialUpdateTariffRequest {
    fn from(req: UpdateTariffRequest) -> Self {
        Self {
            name: Some(req.name),
            price: Some(req.price),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TariffResponse {
    pub id: Uuid,
    pub name: String,
    #[schema(value_type = String, example = "9.99")]
    pub price: Decimal,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl From<tariffs::Model> for TariffResponse {
    fn from(m: tariffs::Model) -> Self {
        Self {
            audit: m.audit(),
            id: m.id,
            name: m.name,
            price: m.price,
        }
    }
}
