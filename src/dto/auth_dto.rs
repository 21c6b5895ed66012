use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{session::Session, user::Role, user::User};

pub const FORCE_PASSWORD_CHANGE_PATH: &str = "/auth/force-password-change";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterPayload {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordPayload {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserPayload {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserListQuery {
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub party_id: Option<Uuid>,
    pub needs_password_change: bool,
    pub is_active: bool,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            party_id: user.party_id,
            needs_password_change: user.needs_password_change,
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserSummary,
    /// Where the client should go next.
    pub redirect: String,
}

impl LoginResponse {
    pub fn new(token: String, expires_at: DateTime<Utc>, user: User) -> Self {
        let redirect = if user.needs_password_change {
            FORCE_PASSWORD_CHANGE_PATH.to_string()
        } else {
            user.role.home_path()
        };
        Self {
            success: true,
            token,
            expires_at,
            user: user.into(),
            redirect,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub role: Role,
    pub party_id: Option<Uuid>,
    pub home: String,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            user_id: session.user_id,
            role: session.role,
            party_id: session.party_id,
            home: session.role.home_path(),
        }
    }
}

/// Returned once, when an administrator provisions an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionedAccountResponse {
    pub user: UserSummary,
    pub temporary_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListResponse {
    pub items: Vec<UserSummary>,
}
