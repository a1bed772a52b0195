mod common;

use actix_web::{App, http::StatusCode, test};
use serde_json::{Value, json};
use subshop_backend::{
    app::{access_gate, configure_app},
    models::CreateSubscriptionRequest,
};

use common::{principal, setup};

macro_rules! app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .wrap(access_gate(&$ctx.services))
                .configure(|cfg| configure_app(cfg, &$ctx.services)),
        )
        .await
    };
}

fn error_code(body: &Value) -> &str {
    body["errors"][0]["code"].as_str().unwrap_or_default()
}

#[actix_web::test]
async fn test_registration_is_public() {
    let ctx = setup().await;
    let app = app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/register/")
        .set_json(json!({
            "email": "new@example.com",
            "password": "long-enough",
            "first_name": "New",
            "last_name": "User"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["email"], "new@example.com");
    assert_eq!(body["data"]["is_active"], false);
}

#[actix_web::test]
async fn test_anonymous_caller_is_stopped_at_protected_routes() {
    let ctx = setup().await;
    let app = app!(ctx);

    let req = test::TestRequest::get().uri("/api/v1/products/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(error_code(&body), "AUTHENTICATION_REQUIRED");

    // allowlisted, but the handler itself still wants a caller
    let req = test::TestRequest::get().uri("/api/v1/tariff/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get().uri("/api/v1/no-such-thing/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_subscription_decides_access_for_regular_users() {
    let ctx = setup().await;
    let staff = ctx.staff_user("admin@example.com").await;
    let customer = ctx.active_user("alice@example.com").await;
    let token = ctx.access_token(&customer);
    let app = app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/v1/products/")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(error_code(&body), "SUBSCRIPTION_REQUIRED");

    // tariffs and subscribing stay reachable without a subscription
    let req = test::TestRequest::get()
        .uri("/api/v1/tariff/")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let tariff = ctx.tariff(&principal(&staff), "Pro").await;
    ctx.services
        .subscriptions
        .create(
            &principal(&customer),
            CreateSubscriptionRequest {
                tariff_id: tariff.id,
                month_duration: 1,
                user_id: None,
            },
        )
        .await
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/v1/products/")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["pagination"]["total"], 0);
}

#[actix_web::test]
async fn test_staff_bypass_the_subscription_check() {
    let ctx = setup().await;
    let staff = ctx.staff_user("admin@example.com").await;
    let token = ctx.access_token(&staff);
    let app = app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/products/")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({"title": "Mug", "price": "12.50"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/v1/orders/")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_invalid_token_is_treated_as_anonymous() {
    let ctx = setup().await;
    let app = app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/v1/orders/")
        .insert_header(("Authorization", "Bearer not-a-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(error_code(&body), "AUTHENTICATION_REQUIRED");
}

#[actix_web::test]
async fn test_openapi_document_is_public() {
    let ctx = setup().await;
    let app = app!(ctx);

    let req = test::TestRequest::get().uri("/api/schema/openapi.json").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    let schemas = &body["components"]["schemas"];
    assert!(schemas["SubscriptionListResponse"].is_object());
    assert!(schemas["SubscriptionPage"].is_object());
    let list_ref = &body["paths"]["/api/v1/subscriptions/"]["get"]["responses"]["200"]["content"]
        ["application/json"]["schema"]["$ref"];
    assert_eq!(list_ref, "#/components/schemas/SubscriptionListResponse");
}
