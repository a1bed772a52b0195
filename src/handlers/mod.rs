pub mod auth;
pub mod order;
pub mod product;
pub mod subscription;
pub mod tariff;
pub mod user;

pub use auth::auth_config;
pub use order::order_config;
pub use product::product_config;
pub use subscription::subscription_config;
pub use tariff::tariff_config;
pub use user::user_config;

use actix_web::{HttpRequest, ResponseError, error, web};

use crate::error::AppError;

/// Everything under `/api`. Each resource carries a name the access gate
/// resolves against its allowlist.
pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(auth_config)
            .service(
                web::scope("/v1")
                    .configure(user_config)
                    .configure(tariff_config)
                    .configure(subscription_config)
                    .configure(product_config)
                    .configure(order_config),
            ),
    );
}

/// Malformed JSON bodies answer with the standard error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: error::JsonPayloadError, _req: &HttpRequest| {
        let app_error = AppError::ValidationError(format!("Invalid request body: {err}"));
        error::InternalError::from_response(err, app_error.error_response()).into()
    })
}

/// Malformed query strings answer with the standard error envelope.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: error::QueryPayloadError, _req: &HttpRequest| {
        let app_error = AppError::ValidationError(format!("Invalid query parameters: {err}"));
        error::InternalError::from_response(err, app_error.error_response()).into()
    })
}
