//! HTTP endpoint the backend calls to push a message to a user's chat.

use actix_web::{HttpResponse, Result, http::StatusCode, web};
use serde_json::{Value, json};
use teloxide::prelude::*;

#[derive(Clone)]
pub struct RelayState {
    pub bot: Bot,
    pub secret_key: String,
}

/// A rejected notification request, rendered as `{"status":"error",...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRejection {
    pub status: StatusCode,
    pub message: String,
}

impl RelayRejection {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn into_response(self) -> HttpResponse {
        HttpResponse::build(self.status).json(json!({
            "status": "error",
            "message": self.message,
        }))
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Bool(b)) => !b,
        Some(_) => false,
    }
}

fn parse_telegram_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Checks the shared secret and extracts `(telegram_id, message_text)`.
pub fn validate_notify_payload(payload: &Value, secret_key: &str) -> Result<(i64, String), RelayRejection> {
    if payload.get("secret_key").and_then(Value::as_str) != Some(secret_key) {
        log::warn!("Rejected notification with a bad secret key");
        return Err(RelayRejection::new(StatusCode::FORBIDDEN, "Unauthorized"));
    }

    let telegram_id = payload.get("telegram_id");
    let message_text = payload.get("message_text");
    if is_blank(telegram_id) || is_blank(message_text) {
        return Err(RelayRejection::new(
            StatusCode::BAD_REQUEST,
            "Missing 'telegram_id' or 'message_text'",
        ));
    }

    let telegram_id = telegram_id
        .and_then(parse_telegram_id)
        .ok_or_else(|| RelayRejection::new(StatusCode::BAD_REQUEST, "Invalid 'telegram_id' format"))?;

    let message_text = match message_text {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };

    Ok((telegram_id, message_text))
}

pub async fn notify_user(state: web::Data<RelayState>, body: web::Bytes) -> Result<HttpResponse> {
    let Ok(payload) = serde_json::from_slice::<Value>(&body) else {
        return Ok(RelayRejection::new(StatusCode::BAD_REQUEST, "Invalid JSON format").into_response());
    };

    let (telegram_id, message_text) = match validate_notify_payload(&payload, &state.secret_key) {
        Ok(parsed) => parsed,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    match state.bot.send_message(ChatId(telegram_id), message_text).await {
        Ok(_) => {
            log::info!("Notification delivered to chat {telegram_id}");
            Ok(HttpResponse::Ok().json(json!({
                "status": "success",
                "message": "Notification sent",
            })))
        }
        Err(e) => {
            log::error!("Failed to deliver notification to chat {telegram_id}: {e}");
            Ok(RelayRejection::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to send notification: {e}"),
            )
            .into_response())
        }
    }
}

pub fn relay_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/notify_user", web::post().to(notify_user));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};

    const SECRET: &str = "shared";

    #[::core::prelude::v1::test]
    fn test_accepts_numeric_and_string_ids() {
        let payload = json!({"secret_key": SECRET, "telegram_id": 123, "message_text": "hi"});
        assert_eq!(validate_notify_payload(&payload, SECRET), Ok((123, "hi".to_string())));

        let payload = json!({"secret_key": SECRET, "telegram_id": "456", "message_text": "hi"});
        assert_eq!(validate_notify_payload(&payload, SECRET), Ok((456, "hi".to_string())));
    }

    #[::core::prelude::v1::test]
    fn test_rejects_wrong_secret_before_anything_else() {
        let payload = json!({"secret_key": "nope"});
        let err = validate_notify_payload(&payload, SECRET).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message, "Unauthorized");
    }

    #[::core::prelude::v1::test]
    fn test_rejects_missing_fields() {
        for payload in [
            json!({"secret_key": SECRET, "message_text": "hi"}),
            json!({"secret_key": SECRET, "telegram_id": 1, "message_text": ""}),
            json!({"secret_key": SECRET, "telegram_id": 0, "message_text": "hi"}),
        ] {
            let err = validate_notify_payload(&payload, SECRET).unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST);
            assert_eq!(err.message, "Missing 'telegram_id' or 'message_text'");
        }
    }

    #[::core::prelude::v1::test]
    fn test_rejects_non_integer_id() {
        let payload = json!({"secret_key": SECRET, "telegram_id": "abc", "message_text": "hi"});
        let err = validate_notify_payload(&payload, SECRET).unwrap_err();
        assert_eq!(err.message, "Invalid 'telegram_id' format");

        let payload = json!({"secret_key": SECRET, "telegram_id": 1.5, "message_text": "hi"});
        assert!(validate_notify_payload(&payload, SECRET).is_err());
    }

    #[actix_web::test]
    async fn test_endpoint_rejects_bad_json_and_bad_secret() {
        let state = RelayState {
            bot: Bot::new("0:test"),
            secret_key: SECRET.to_string(),
        };
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(relay_config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/notify_user")
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Invalid JSON format");

        let req = test::TestRequest::post()
            .uri("/notify_user")
            .set_json(json!({"secret_key": "wrong", "telegram_id": 1, "message_text": "x"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
