use actix_web::{HttpResponse, ResponseError, Result, web};

use crate::models::*;
use crate::services::AuthService;

#[utoipa::path(
    post,
    path = "/api/register/",
    tag = "auth",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created, inactive until bound to Telegram", body = UserResponse),
        (status = 400, description = "Validation or creation error")
    )
)]
pub async fn register(
    auth_service: web::Data<AuthService>,
    request: web::Json<CreateUserRequest>,
) -> Result<HttpResponse> {
    match auth_service.register(request.into_inner()).await {
        Ok(user) => Ok(ApiResponse::created(
            user,
            "Registration successful. Activate your account through the Telegram bot.",
        )),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/token/",
    tag = "auth",
    request_body = TokenObtainRequest,
    responses(
        (status = 200, description = "Access and refresh tokens", body = TokenPairResponse),
        (status = 401, description = "No active account found with the given credentials")
    )
)]
pub async fn obtain_token_pair(
    auth_service: web::Data<AuthService>,
    request: web::Json<TokenObtainRequest>,
) -> Result<HttpResponse> {
    match auth_service.obtain_pair(request.into_inner()).await {
        Ok(pair) => Ok(HttpResponse::Ok().json(pair)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/token/refresh/",
    tag = "auth",
    request_body = TokenRefreshRequest,
    responses(
        (status = 200, description = "New access token", body = TokenRefreshResponse),
        (status = 401, description = "Refresh token invalid or expired")
    )
)]
pub async fn refresh_token(
    auth_service: web::Data<AuthService>,
    request: web::Json<TokenRefreshRequest>,
) -> Result<HttpResponse> {
    match auth_service.refresh(request.into_inner()).await {
        Ok(token) => Ok(HttpResponse::Ok().json(token)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/token/verify/",
    tag = "auth",
    request_body = TokenVerifyRequest,
    responses(
        (status = 200, description = "Token is valid"),
        (status = 401, description = "Token invalid or expired")
    )
)]
pub async fn verify_token(
    auth_service: web::Data<AuthService>,
    request: web::Json<TokenVerifyRequest>,
) -> Result<HttpResponse> {
    match auth_service.verify(&request) {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({}))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/register/")
            .name("register")
            .route(web::post().to(register)),
    )
    .service(
        web::resource("/token/")
            .name("token_obtain_pair")
            .route(web::post().to(obtain_token_pair)),
    )
    .service(
        web::resource("/token/refresh/")
            .name("token_refresh")
            .route(web::post().to(refresh_token)),
    )
    .service(
        web::resource("/token/verify/")
            .name("token_verify")
            .route(web::post().to(verify_token)),
    );
}
