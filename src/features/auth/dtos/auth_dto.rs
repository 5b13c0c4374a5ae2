use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::auth::model::{Role, Session};
use crate::features::auth::services::SignupOutcome;
use crate::features::users::models::UserSummary;

/// Request DTO for user login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request DTO for administrator login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct AdminLoginRequestDto {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request DTO for user registration
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequestDto {
    #[validate(length(max = 128, message = "Name must not exceed 128 characters"))]
    pub full_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,

    pub confirm_password: String,
}

/// Identity attached to a session
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUserDto {
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Stored account details; absent for the administrator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<UserSummary>,
}

/// Response DTO for authentication (login/signup)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseDto {
    /// Opaque session token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: SessionUserDto,
}

impl From<Session> for AuthResponseDto {
    fn from(session: Session) -> Self {
        Self {
            access_token: session.token,
            token_type: "Bearer".to_string(),
            expires_at: session.expires_at,
            user: SessionUserDto {
                email: session.email,
                name: session.name,
                role: session.role,
                account: session.user,
            },
        }
    }
}

/// Response DTO for signup
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponseDto {
    #[serde(flatten)]
    pub auth: AuthResponseDto,
    /// Whether the account also reached the remote user directory
    pub remote_synced: bool,
}

impl From<SignupOutcome> for SignupResponseDto {
    fn from(outcome: SignupOutcome) -> Self {
        Self {
            auth: outcome.session.into(),
            remote_synced: outcome.remote_synced,
        }
    }
}

/// DTO for /auth/me response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponseDto {
    pub user: SessionUserDto,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<Session> for MeResponseDto {
    fn from(session: Session) -> Self {
        Self {
            is_admin: session.is_admin(),
            created_at: session.created_at,
            expires_at: session.expires_at,
            user: SessionUserDto {
                email: session.email,
                name: session.name,
                role: session.role,
                account: session.user,
            },
        }
    }
}
