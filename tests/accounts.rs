mod common;

use subshop_backend::{
    AppError,
    models::{
        CreateUserRequest, ListQuery, PartialUpdateUserRequest, TokenObtainRequest,
        TokenRefreshRequest, TokenVerifyRequest,
    },
    services::{ActivationOutcome, ActivationService},
};

use common::{PASSWORD, principal, setup};

fn registration(email: &str, phone: Option<&str>) -> CreateUserRequest {
    CreateUserRequest {
        email: email.to_string(),
        password: PASSWORD.to_string(),
        first_name: "Ivan".to_string(),
        last_name: "Petrov".to_string(),
        phone: phone.map(str::to_string),
    }
}

#[tokio::test]
async fn test_registration_validates_and_starts_inactive() {
    let ctx = setup().await;

    let user = ctx.services.auth.register(registration("ivan@example.com", Some("+79991234567"))).await.unwrap();
    assert!(!user.is_active);
    assert!(!user.is_staff);
    assert_eq!(user.full_name, "Ivan Petrov");

    let err = ctx.services.auth.register(registration("ivan@example.com", None)).await.unwrap_err();
    assert!(matches!(err, AppError::CreationError(_)));

    let err = ctx
        .services
        .auth
        .register(registration("other@example.com", Some("+79991234567")))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CreationError(_)));

    let err = ctx.services.auth.register(registration("not-an-email", None)).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    let mut short = registration("short@example.com", None);
    short.password = "abc".to_string();
    let err = ctx.services.auth.register(short).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn test_tokens_require_an_active_account() {
    let ctx = setup().await;
    ctx.create_user("pending@example.com", None).await;
    let active = ctx.active_user("active@example.com").await;

    let err = ctx
        .services
        .auth
        .obtain_pair(TokenObtainRequest {
            email: "pending@example.com".to_string(),
            password: PASSWORD.to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AuthError(_)));

    let err = ctx
        .services
        .auth
        .obtain_pair(TokenObtainRequest {
            email: active.email.clone(),
            password: "wrong-password".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AuthError(_)));

    let pair = ctx
        .services
        .auth
        .obtain_pair(TokenObtainRequest {
            email: active.email.clone(),
            password: PASSWORD.to_string(),
        })
        .await
        .unwrap();
    assert_eq!(pair.expires_in, 3600);
    assert!(ctx.services.auth.verify(&TokenVerifyRequest { token: pair.access.clone() }).is_ok());

    let refreshed = ctx
        .services
        .auth
        .refresh(TokenRefreshRequest { refresh: pair.refresh.clone() })
        .await
        .unwrap();
    let claims = ctx.services.jwt.verify_access_token(&refreshed.access).unwrap();
    assert_eq!(claims.user_id().unwrap(), active.id);

    // an access token is not accepted where a refresh token is expected
    let err = ctx
        .services
        .auth
        .refresh(TokenRefreshRequest { refresh: pair.access })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AuthError(_)));
}

#[tokio::test]
async fn test_users_are_scoped_and_soft_deleted() {
    let ctx = setup().await;
    let staff = principal(&ctx.staff_user("admin@example.com").await);
    let alice = principal(&ctx.active_user("alice@example.com").await);
    let bob = principal(&ctx.active_user("bob@example.com").await);

    let err = ctx.services.users.get_by_id(&alice, bob.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(ctx.services.users.count(&alice, &ListQuery::default()).await.unwrap(), 1);
    assert_eq!(ctx.services.users.count(&staff, &ListQuery::default()).await.unwrap(), 3);

    let query = ListQuery::new(Some("ALICE"), None, None);
    assert_eq!(ctx.services.users.count(&staff, &query).await.unwrap(), 1);

    let renamed = ctx
        .services
        .users
        .partial_update(
            &alice,
            alice.id,
            PartialUpdateUserRequest {
                first_name: Some("Alicia".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.first_name, "Alicia");
    assert_eq!(renamed.email, "alice@example.com");

    let err = ctx.services.users.hard_delete(&staff, bob.id).await.unwrap_err();
    assert!(matches!(err, AppError::ActiveDelete(_)));

    let deleted = ctx.services.users.soft_delete(&bob, bob.id).await.unwrap();
    assert!(deleted.audit.is_deleted);
    assert!(!deleted.is_active);
    assert_eq!(ctx.services.users.count_archive(&staff, &ListQuery::default()).await.unwrap(), 1);

    ctx.services.users.hard_delete(&staff, bob.id).await.unwrap();
    let err = ctx.services.users.hard_delete(&staff, bob.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_phone_activation_outcomes() {
    let ctx = setup().await;
    let activation = ActivationService::new(ctx.pool.clone());
    ctx.create_user("ivan@example.com", Some("+79991234567")).await;
    ctx.create_user("olga@example.com", Some("+79990000000")).await;

    assert_eq!(
        activation.activate_by_phone("+70000000000", 100).await.unwrap(),
        ActivationOutcome::NotFound
    );
    assert_eq!(
        activation.activate_by_phone("+79991234567", 100).await.unwrap(),
        ActivationOutcome::Activated { email: "ivan@example.com".to_string() }
    );
    assert_eq!(
        activation.activate_by_phone("+79991234567", 100).await.unwrap(),
        ActivationOutcome::AlreadyActive { email: "ivan@example.com".to_string() }
    );
    assert_eq!(
        activation.activate_by_phone("+79991234567", 200).await.unwrap(),
        ActivationOutcome::BoundToAnotherChat
    );
    assert_eq!(
        activation.activate_by_phone("+79990000000", 100).await.unwrap(),
        ActivationOutcome::ChatAlreadyLinked
    );

    // an activated account can now obtain tokens
    let pair = ctx
        .services
        .auth
        .obtain_pair(TokenObtainRequest {
            email: "ivan@example.com".to_string(),
            password: PASSWORD.to_string(),
        })
        .await;
    assert!(pair.is_ok());
}

#[tokio::test]
async fn test_rejected_update_leaves_user_untouched() {
    let ctx = setup().await;
    let alice = principal(&ctx.active_user("alice@example.com").await);
    ctx.create_user("bob@example.com", Some("+79991234567")).await;

    let err = ctx
        .services
        .users
        .partial_update(
            &alice,
            alice.id,
            PartialUpdateUserRequest {
                first_name: Some("Alicia".to_string()),
                phone: Some("+79991234567".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UpdateError(_)));

    let unchanged = ctx.services.users.get_by_id(&alice, alice.id).await.unwrap();
    assert_eq!(unchanged.first_name, "Test");
    assert_eq!(unchanged.phone, None);

    // the aborted transaction must not hold on to the only connection
    let renamed = ctx
        .services
        .users
        .partial_update(
            &alice,
            alice.id,
            PartialUpdateUserRequest {
                first_name: Some("Alicia".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.first_name, "Alicia");
}
