use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::auth::model::Role;
use crate::features::users::models::{Preferences, UserActivity};

/// Profile of the signed-in account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponseDto {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub profile: UserActivity,
}

/// Request DTO for updating preferences. Omitted fields keep their value.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesDto {
    #[validate(length(min = 1, max = 32, message = "Theme must be 1-32 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_notifications: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_notifications: Option<bool>,
}

impl From<UpdatePreferencesDto> for Preferences {
    fn from(dto: UpdatePreferencesDto) -> Self {
        Self {
            theme: dto.theme,
            push_notifications: dto.push_notifications,
            email_notifications: dto.email_notifications,
        }
    }
}
