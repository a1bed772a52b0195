use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::audit::impl_audit;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "canceled")]
    Canceled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Pending
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Option<Uuid>,
    pub subscription_id: Option<Uuid>,
    pub description: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// What an order is for. Exactly one of the two foreign keys is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderTarget {
    Product(Uuid),
    Subscription(Uuid),
}

impl OrderTarget {
    pub fn from_ids(product_id: Option<Uuid>, subscription_id: Option<Uuid>) -> Option<Self> {
        match (product_id, subscription_id) {
            (Some(id), None) => Some(Self::Product(id)),
            (None, Some(id)) => Some(Self::Subscription(id)),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::subscriptions::Entity",
        from = "Column::SubscriptionId",
        to = "super::subscriptions::Column::Id",
        on_delete = "Cascade"
    )]
    Subscription,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::subscriptions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subscription.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl_audit!();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_target_requires_exactly_one() {
        let id = Uuid::new_v4();
        assert_eq!(
            OrderTarget::from_ids(Some(id), None),
            Some(OrderTarget::Product(id))
        );
        assert_eq!(
            OrderTarget::from_ids(None, Some(id)),
            Some(OrderTarget::Subscription(id))
        );
        assert_eq!(OrderTarget::from_ids(None, None), None);
        assert_eq!(OrderTarget::from_ids(Some(id), Some(id)), None);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Canceled).unwrap();
        assert_eq!(json, "\"canceled\"");
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }
}
