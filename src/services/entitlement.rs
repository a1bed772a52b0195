use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::subscriptions;
use crate::error::AppResult;

/// Whether a single subscription grants access at `now`.
pub fn grants_entitlement(subscription: &subscriptions::Model, now: DateTime<Utc>) -> bool {
    subscription.is_active && !subscription.is_deleted && subscription.end_date >= now
}

/// Answers "may this user use gated resources right now".
///
/// Evaluated against the database on every call; nothing is cached.
#[derive(Clone)]
pub struct EntitlementService {
    pool: DatabaseConnection,
}

impl EntitlementService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn has_active_subscription(&self, user_id: Uuid) -> AppResult<bool> {
        let current = subscriptions::Entity::find()
            .filter(subscriptions::Column::UserId.eq(user_id))
            .filter(subscriptions::Column::IsActive.eq(true))
            .filter(subscriptions::Column::IsDeleted.eq(false))
            .filter(subscriptions::Column::EndDate.gte(Utc::now()))
            .count(&self.pool)
            .await?;

        Ok(current > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn subscription(end_in: Duration, is_active: bool, is_deleted: bool) -> subscriptions::Model {
        let now = Utc::now();
        subscriptions::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            tariff_id: Uuid::new_v4(),
            start_date: now - Duration::days(1),
            end_date: now + end_in,
            is_active,
            created_at: now,
            updated_at: now,
            is_deleted,
            deleted_at: None,
        }
    }

    #[test]
    fn test_current_subscription_grants() {
        let sub = subscription(Duration::days(3), true, false);
        assert!(grants_entitlement(&sub, Utc::now()));
    }

    #[test]
    fn test_expired_inactive_or_deleted_do_not_grant() {
        let now = Utc::now();
        assert!(!grants_entitlement(&subscription(Duration::days(-1), true, false), now));
        assert!(!grants_entitlement(&subscription(Duration::days(3), false, false), now));
        assert!(!grants_entitlement(&subscription(Duration::days(3), true, true), now));
    }

    #[test]
    fn test_end_date_is_inclusive() {
        let sub = subscription(Duration::zero(), true, false);
        assert!(grants_entitlement(&sub, sub.end_date));
    }
}
