mod common;

use rust_decimal::Decimal;
use subshop_backend::{
    AppError,
    models::{CreateTariffRequest, ListQuery, PartialUpdateTariffRequest},
};

use common::{principal, setup};

#[tokio::test]
async fn test_tariff_hard_delete_requires_soft_delete() {
    let ctx = setup().await;
    let staff = principal(&ctx.staff_user("admin@example.com").await);
    let tariff = ctx.tariff(&staff, "Pro").await;

    let err = ctx.services.tariffs.hard_delete(&staff, tariff.id).await.unwrap_err();
    assert!(matches!(err, AppError::ActiveDelete(_)));
    assert!(ctx.services.tariffs.get_by_id(tariff.id).await.is_ok());

    let deleted = ctx.services.tariffs.soft_delete(&staff, tariff.id).await.unwrap();
    assert!(deleted.audit.is_deleted);
    assert!(deleted.audit.deleted_at.is_some());

    let err = ctx.services.tariffs.get_by_id(tariff.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(
        ctx.services.tariffs.count_archive(&staff, &ListQuery::default()).await.unwrap(),
        1
    );

    ctx.services.tariffs.hard_delete(&staff, tariff.id).await.unwrap();
    let err = ctx.services.tariffs.hard_delete(&staff, tariff.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(
        ctx.services.tariffs.count_archive(&staff, &ListQuery::default()).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_tariff_mutations_are_staff_only() {
    let ctx = setup().await;
    let staff = principal(&ctx.staff_user("admin@example.com").await);
    let customer = principal(&ctx.active_user("alice@example.com").await);
    let tariff = ctx.tariff(&staff, "Pro").await;

    let err = ctx
        .services
        .tariffs
        .create(
            &customer,
            CreateTariffRequest {
                name: "Cheap".to_string(),
                price: Decimal::new(100, 2),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied));

    let err = ctx.services.tariffs.soft_delete(&customer, tariff.id).await.unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied));
    let err = ctx.services.tariffs.hard_delete(&customer, tariff.id).await.unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied));

    // everyone may read
    assert_eq!(ctx.services.tariffs.count(&ListQuery::default()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_tariff_partial_update_validates_before_writing() {
    let ctx = setup().await;
    let staff = principal(&ctx.staff_user("admin@example.com").await);
    let tariff = ctx.tariff(&staff, "Pro").await;

    let err = ctx
        .services
        .tariffs
        .partial_update(
            &staff,
            tariff.id,
            PartialUpdateTariffRequest {
                price: Some(Decimal::new(-1, 0)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    let renamed = ctx
        .services
        .tariffs
        .partial_update(
            &staff,
            tariff.id,
            PartialUpdateTariffRequest {
                name: Some("Pro Plus".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Pro Plus");
}
