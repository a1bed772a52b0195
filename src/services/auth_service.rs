use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::UserService;
use crate::utils::*;

const NO_ACTIVE_ACCOUNT: &str = "No active account found with the given credentials";

/// Registration and the JWT pair endpoints.
#[derive(Clone)]
pub struct AuthService {
    users: UserService,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(users: UserService, jwt_service: JwtService) -> Self {
        Self { users, jwt_service }
    }

    pub async fn register(&self, request: CreateUserRequest) -> AppResult<UserResponse> {
        self.users.create(request).await
    }

    /// Exchanges credentials for an access/refresh pair. Unknown, inactive
    /// and deleted accounts all fail the same way.
    pub async fn obtain_pair(&self, request: TokenObtainRequest) -> AppResult<TokenPairResponse> {
        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::AuthError(NO_ACTIVE_ACCOUNT.to_string()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            log::warn!("Failed login for {}", user.email);
            return Err(AppError::AuthError(NO_ACTIVE_ACCOUNT.to_string()));
        }

        Ok(TokenPairResponse {
            access: self.jwt_service.generate_access_token(user.id, &user.email)?,
            refresh: self.jwt_service.generate_refresh_token(user.id, &user.email)?,
            expires_in: self.jwt_service.access_token_expires_in(),
        })
    }

    pub async fn refresh(&self, request: TokenRefreshRequest) -> AppResult<TokenRefreshResponse> {
        let claims = self
            .jwt_service
            .verify_refresh_token(&request.refresh)
            .map_err(|_| AppError::AuthError("Token is invalid or expired".to_string()))?;

        let user = self
            .users
            .find_active(claims.user_id()?)
            .await?
            .ok_or_else(|| AppError::AuthError(NO_ACTIVE_ACCOUNT.to_string()))?;

        Ok(TokenRefreshResponse {
            access: self.jwt_service.generate_access_token(user.id, &user.email)?,
            expires_in: self.jwt_service.access_token_expires_in(),
        })
    }

    pub fn verify(&self, request: &TokenVerifyRequest) -> AppResult<()> {
        self.jwt_service
            .verify_token(&request.token)
            .map(|_| ())
            .map_err(|_| AppError::AuthError("Token is invalid or expired".to_string()))
    }
}
