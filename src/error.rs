use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    AuthError(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    CreationError(String),

    #[error("{0}")]
    UpdateError(String),

    #[error("{0}")]
    DeleteError(String),

    #[error("{0}")]
    EmptyUpdate(String),

    #[error("{0}")]
    ActiveDelete(String),

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Active subscription required")]
    SubscriptionRequired,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::AuthError(_) | AppError::JwtError(_) => "AUTH_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::CreationError(_) => "CREATION_ERROR",
            AppError::UpdateError(_) => "UPDATE_ERROR",
            AppError::DeleteError(_) => "DELETE_ERROR",
            AppError::EmptyUpdate(_) => "EMPTY_UPDATE",
            AppError::ActiveDelete(_) => "ACTIVE_DELETE",
            AppError::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
            AppError::SubscriptionRequired => "SUBSCRIPTION_REQUIRED",
            AppError::PermissionDenied => "FORBIDDEN",
            AppError::ExternalApiError(_) => "EXTERNAL_API_ERROR",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            _ => "INTERNAL_ERROR",
        }
    }

    /// Maps a storage failure during a mutation onto a domain error.
    ///
    /// `on_unique` and `on_foreign_key` produce the messages for the two
    /// constraint classes; anything else is wrapped by `fallback`.
    pub fn from_constraint(
        err: DbErr,
        on_unique: impl FnOnce() -> AppError,
        on_foreign_key: impl FnOnce() -> AppError,
        fallback: impl FnOnce(DbErr) -> AppError,
    ) -> AppError {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => on_unique(),
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => on_foreign_key(),
            _ => fallback(err),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::CreationError(_)
            | AppError::UpdateError(_)
            | AppError::DeleteError(_)
            | AppError::EmptyUpdate(_)
            | AppError::ActiveDelete(_) => StatusCode::BAD_REQUEST,
            AppError::AuthError(_) | AppError::JwtError(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AuthenticationRequired
            | AppError::SubscriptionRequired
            | AppError::PermissionDenied => StatusCode::FORBIDDEN,
            AppError::ExternalApiError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let message = match self {
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                "Database error".to_string()
            }
            AppError::ExternalApiError(msg) => {
                log::error!("External API error: {msg}");
                msg.clone()
            }
            AppError::AuthenticationRequired
            | AppError::SubscriptionRequired
            | AppError::PermissionDenied => {
                log::warn!("Forbidden: {self}");
                self.to_string()
            }
            _ if status_code.is_server_error() => {
                log::error!("Internal error: {self}");
                "Internal server error".to_string()
            }
            _ => {
                log::warn!("Request rejected ({}): {self}", self.code());
                self.to_string()
            }
        };

        // the detail carries the raw error text, including for 5xx
        HttpResponse::build(status_code).json(json!({
            "message": message,
            "meta": {},
            "errors": [{
                "code": self.code(),
                "detail": self.to_string(),
            }]
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_not_found_renders_envelope() {
        let resp = AppError::NotFound("Tariff not found".into()).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["message"], "Tariff not found");
        assert_eq!(value["errors"][0]["code"], "NOT_FOUND");
        assert!(value.get("data").is_none());
    }

    #[actix_web::test]
    async fn test_internal_error_keeps_detail() {
        let resp = AppError::InternalError("boom".into()).error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["message"], "Internal server error");
        assert_eq!(value["errors"][0]["detail"], "Internal server error: boom");
    }

    #[test]
    fn test_gate_rejections_are_forbidden() {
        assert_eq!(
            AppError::AuthenticationRequired.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::SubscriptionRequired.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::ActiveDelete("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_from_constraint_falls_back_for_plain_errors() {
        let err = AppError::from_constraint(
            DbErr::Custom("nope".into()),
            || AppError::CreationError("dup".into()),
            || AppError::CreationError("fk".into()),
            |e| AppError::CreationError(format!("other: {e}")),
        );
        assert!(matches!(err, AppError::CreationError(msg) if msg.starts_with("other")));
    }
}
