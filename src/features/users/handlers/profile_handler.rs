use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::Session;
use crate::features::reports::services::ReportService;
use crate::features::users::dtos::{UpdatePreferencesDto, UserProfileResponseDto};
use crate::features::users::models::Preferences;
use crate::features::users::services::UserService;
use crate::shared::types::ApiResponse;
use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

/// State for user handlers
#[derive(Clone)]
pub struct UsersState {
    pub user_service: Arc<UserService>,
    pub report_service: Arc<ReportService>,
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Profile retrieved successfully", body = ApiResponse<UserProfileResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_profile(
    session: Session,
    State(state): State<UsersState>,
) -> Result<Json<ApiResponse<UserProfileResponseDto>>> {
    let reports_count = state.report_service.count_by_reporter(&session.email).await;
    let profile = state.user_service.profile(&session, reports_count).await;
    Ok(Json(ApiResponse::success(Some(profile), None, None)))
}

#[utoipa::path(
    get,
    path = "/api/users/me/preferences",
    responses(
        (status = 200, description = "Preferences retrieved successfully", body = ApiResponse<Preferences>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_preferences(
    session: Session,
    State(state): State<UsersState>,
) -> Result<Json<ApiResponse<Preferences>>> {
    let prefs = state.user_service.get_preferences(&session.email).await;
    Ok(Json(ApiResponse::success(Some(prefs), None, None)))
}

#[utoipa::path(
    put,
    path = "/api/users/me/preferences",
    request_body = UpdatePreferencesDto,
    responses(
        (status = 200, description = "Preferences updated successfully", body = ApiResponse<Preferences>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_preferences(
    session: Session,
    State(state): State<UsersState>,
    AppJson(dto): AppJson<UpdatePreferencesDto>,
) -> Result<Json<ApiResponse<Preferences>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let prefs = state
        .user_service
        .update_preferences(&session.email, dto.into())
        .await?;
    Ok(Json(ApiResponse::success(
        Some(prefs),
        Some("Preferences updated successfully".to_string()),
        None,
    )))
}
