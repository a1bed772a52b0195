use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{AuditFields, Audited, subscriptions, tariffs};
use crate::models::TariffResponse;
use crate::services::entitlement::grants_entitlement;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateSubscriptionRequest {
    pub tariff_id: Uuid,
    /// Length of the subscription in calendar months, at least 1
    pub month_duration: i32,
    /// Staff only; other callers always subscribe themselves
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateSubscriptionRequest {
    pub tariff_id: Uuid,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PartialUpdateSubscriptionRequest {
    pub tariff_id: Option<Uuid>,
    pub end_date: Option<DateTime<Utc>>,
}

impl PartialUpdateSubscriptionRequest {
    pub fn is_empty(&self) -> bool {
        self.tariff_id.is_none() && self.end_date.is_none()
    }
}

impl From<UpdateSubscriptionRequest> for PartialUpdateSubscriptionRequest {
    fn from(req: UpdateSubscriptionRequest) -> Self {
        Self {
            tariff_id: Some(req.tariff_id),
            end_date: Some(req.end_date),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tariff_id: Uuid,
    pub tariff_details: Option<TariffResponse>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
    /// Whether this subscription grants access right now
    pub is_current: bool,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl SubscriptionResponse {
    pub fn new(m: subscriptions::Model, tariff: Option<tariffs::Model>) -> Self {
        Self {
            is_current: grants_entitlement(&m, Utc::now()),
            audit: m.audit(),
            id: m.id,
            user_id: m.user_id,
            tariff_id: m.tariff_id,
            tariff_details: tariff.map(TariffResponse::from),
            start_date: m.start_date,
            end_date: m.end_date,
            is_active: m.is_active,
        }
    }
}

impl From<(subscriptions::Model, Option<tariffs::Model>)> for SubscriptionResponse {
    fn from((m, tariff): (subscriptions::Model, Option<tariffs::Model>)) -> Self {
        Self::new(m, tariff)
    }
}
