use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{AuditFields, Audited, users};

/// Body of `POST /api/register/` and of the staff-side user creation.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub password: Option<String>,
}

/// Every field optional; an empty body is rejected.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PartialUpdateUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

impl PartialUpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.password.is_none()
    }
}

impl From<UpdateUserRequest> for PartialUpdateUserRequest {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            email: Some(req.email),
            first_name: Some(req.first_name),
            last_name: Some(req.last_name),
            // a full update clears the phone when it is omitted
            phone: Some(req.phone.unwrap_or_default()),
            password: req.password,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub telegram_id: Option<i64>,
    pub is_staff: bool,
    pub is_active: bool,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl From<users::Model> for UserResponse {
    fn from(m: users::Model) -> Self {
        Self {
            audit: m.audit(),
            full_name: m.full_name(),
            id: m.id,
            email: m.email,
            first_name: m.first_name,
            last_name: m.last_name,
            phone: m.phone,
            telegram_id: m.telegram_id,
            is_staff: m.is_staff,
            is_active: m.is_active,
        }
    }
}
