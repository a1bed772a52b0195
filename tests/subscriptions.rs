mod common;

use chrono::{Months, Utc};
use subshop_backend::{
    AppError,
    models::{CreateSubscriptionRequest, ListQuery, PartialUpdateSubscriptionRequest},
};

use common::{principal, setup};

#[tokio::test]
async fn test_subscription_lifecycle() {
    let ctx = setup().await;
    let staff = principal(&ctx.staff_user("admin@example.com").await);
    let customer = principal(&ctx.active_user("alice@example.com").await);
    let tariff = ctx.tariff(&staff, "Pro").await;

    let before = Utc::now();
    let sub = ctx
        .services
        .subscriptions
        .create(
            &customer,
            CreateSubscriptionRequest {
                tariff_id: tariff.id,
                month_duration: 1,
                user_id: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(sub.user_id, customer.id);
    assert!(sub.is_active);
    assert!(sub.is_current);
    assert!(sub.start_date >= before);
    assert_eq!(sub.end_date, sub.start_date.checked_add_months(Months::new(1)).unwrap());
    assert_eq!(sub.tariff_details.as_ref().map(|t| t.name.as_str()), Some("Pro"));

    // hard delete requires a prior soft delete
    let err = ctx.services.subscriptions.hard_delete(&staff, sub.id).await.unwrap_err();
    assert!(matches!(err, AppError::ActiveDelete(_)));

    let deleted = ctx.services.subscriptions.soft_delete(&staff, sub.id).await.unwrap();
    assert!(!deleted.is_active);
    assert!(deleted.audit.is_deleted);
    assert!(deleted.audit.deleted_at.is_some());

    let again = ctx.services.subscriptions.soft_delete(&staff, sub.id).await.unwrap();
    assert_eq!(again.audit.deleted_at, deleted.audit.deleted_at);

    let archived = ctx
        .services
        .subscriptions
        .list_archive(&staff, &ListQuery::default())
        .await
        .unwrap();
    assert_eq!(archived.len(), 1);
    let live = ctx
        .services
        .subscriptions
        .count(&staff, &ListQuery::default())
        .await
        .unwrap();
    assert_eq!(live, 0);

    ctx.services.subscriptions.hard_delete(&staff, sub.id).await.unwrap();
    let err = ctx.services.subscriptions.hard_delete(&staff, sub.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_create_rejects_zero_months_and_unknown_tariff() {
    let ctx = setup().await;
    let customer = principal(&ctx.active_user("bob@example.com").await);
    let staff = principal(&ctx.staff_user("admin@example.com").await);
    let tariff = ctx.tariff(&staff, "Basic").await;

    let err = ctx
        .services
        .subscriptions
        .create(
            &customer,
            CreateSubscriptionRequest {
                tariff_id: tariff.id,
                month_duration: 0,
                user_id: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    let err = ctx
        .services
        .subscriptions
        .create(
            &customer,
            CreateSubscriptionRequest {
                tariff_id: uuid::Uuid::new_v4(),
                month_duration: 3,
                user_id: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CreationError(_)));
}

#[tokio::test]
async fn test_non_staff_only_see_their_own_subscriptions() {
    let ctx = setup().await;
    let staff = principal(&ctx.staff_user("admin@example.com").await);
    let alice = principal(&ctx.active_user("alice@example.com").await);
    let bob = principal(&ctx.active_user("bob@example.com").await);
    let tariff = ctx.tariff(&staff, "Pro").await;

    // user_id from a non-staff caller is ignored
    let sub = ctx
        .services
        .subscriptions
        .create(
            &alice,
            CreateSubscriptionRequest {
                tariff_id: tariff.id,
                month_duration: 1,
                user_id: Some(bob.id),
            },
        )
        .await
        .unwrap();
    assert_eq!(sub.user_id, alice.id);

    let err = ctx.services.subscriptions.get_by_id(&bob, sub.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(ctx.services.subscriptions.count(&bob, &ListQuery::default()).await.unwrap(), 0);
    assert_eq!(ctx.services.subscriptions.count(&staff, &ListQuery::default()).await.unwrap(), 1);

    let err = ctx.services.subscriptions.soft_delete(&alice, sub.id).await.unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied));
}

#[tokio::test]
async fn test_partial_update_rejects_end_before_start() {
    let ctx = setup().await;
    let staff = principal(&ctx.staff_user("admin@example.com").await);
    let tariff = ctx.tariff(&staff, "Pro").await;
    let sub = ctx
        .services
        .subscriptions
        .create(
            &staff,
            CreateSubscriptionRequest {
                tariff_id: tariff.id,
                month_duration: 2,
                user_id: None,
            },
        )
        .await
        .unwrap();

    let err = ctx
        .services
        .subscriptions
        .partial_update(
            &staff,
            sub.id,
            PartialUpdateSubscriptionRequest {
                end_date: Some(sub.start_date - chrono::Duration::days(1)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    let err = ctx
        .services
        .subscriptions
        .partial_update(&staff, sub.id, PartialUpdateSubscriptionRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EmptyUpdate(_)));
}

#[tokio::test]
async fn test_search_matches_tariff_name_and_pagination_counts() {
    let ctx = setup().await;
    let staff = principal(&ctx.staff_user("admin@example.com").await);
    let pro = ctx.tariff(&staff, "Pro").await;
    let basic = ctx.tariff(&staff, "Basic").await;

    for tariff_id in [pro.id, pro.id, basic.id] {
        ctx.services
            .subscriptions
            .create(
                &staff,
                CreateSubscriptionRequest {
                    tariff_id,
                    month_duration: 1,
                    user_id: None,
                },
            )
            .await
            .unwrap();
    }

    let query = ListQuery::new(Some("pRo"), None, None);
    assert_eq!(ctx.services.subscriptions.count(&staff, &query).await.unwrap(), 2);

    let page = ListQuery::new(None, Some(2), Some(2));
    let items = ctx.services.subscriptions.list(&staff, &page).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(ctx.services.subscriptions.count(&staff, &page).await.unwrap(), 3);
}

#[tokio::test]
async fn test_offset_beyond_signed_range_returns_empty_page() {
    let ctx = setup().await;
    let staff = principal(&ctx.staff_user("admin@example.com").await);
    let tariff = ctx.tariff(&staff, "Pro").await;
    ctx.services
        .subscriptions
        .create(
            &staff,
            CreateSubscriptionRequest {
                tariff_id: tariff.id,
                month_duration: 1,
                user_id: None,
            },
        )
        .await
        .unwrap();

    let query = ListQuery::new(None, Some(i64::MAX as u64 + 1), Some(10));
    let items = ctx.services.subscriptions.list(&staff, &query).await.unwrap();
    assert!(items.is_empty());
    let archived = ctx.services.subscriptions.list_archive(&staff, &query).await.unwrap();
    assert!(archived.is_empty());
    assert_eq!(ctx.services.subscriptions.count(&staff, &query).await.unwrap(), 1);
}
