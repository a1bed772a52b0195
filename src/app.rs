use actix_web::web;

use crate::handlers;
use crate::middlewares::AccessGate;
use crate::services::Services;
use crate::swagger::swagger_config;

/// Registers services, extractor configs, docs and the `/api` routes.
pub fn configure_app(cfg: &mut web::ServiceConfig, services: &Services) {
    services.register(cfg);
    cfg.app_data(handlers::json_config())
        .app_data(handlers::query_config())
        .configure(swagger_config)
        .configure(handlers::api_config);
}

pub fn access_gate(services: &Services) -> AccessGate {
    AccessGate::new(
        services.jwt.clone(),
        services.users.clone(),
        services.entitlement.clone(),
    )
}
