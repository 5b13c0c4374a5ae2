use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::admin::dtos::*;
use crate::features::auth::guards::RequireAdmin;
use crate::features::reports::dtos::ReportResponseDto;
use crate::features::reports::models::{Report, ReportFilter, ReportStats};
use crate::features::reports::services::ReportService;
use crate::shared::types::{ApiResponse, Meta};

/// List reports matching the search, status and reporter filters, newest first
#[utoipa::path(
    get,
    path = "/api/admin/reports",
    params(ReportQueryParams),
    responses(
        (status = 200, description = "List of matching reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 400, description = "Invalid filter"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Administrator access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_reports(
    RequireAdmin(_session): RequireAdmin,
    State(service): State<Arc<ReportService>>,
    Query(params): Query<ReportQueryParams>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let filter = ReportFilter::try_from(params)?;
    let items: Vec<ReportResponseDto> = service
        .filter(&filter)
        .await
        .into_iter()
        .map(ReportResponseDto::from)
        .collect();
    let total = items.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Report counts per status
#[utoipa::path(
    get,
    path = "/api/admin/reports/stats",
    responses(
        (status = 200, description = "Report statistics", body = ApiResponse<ReportStats>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Administrator access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn report_stats(
    RequireAdmin(_session): RequireAdmin,
    State(service): State<Arc<ReportService>>,
) -> Result<Json<ApiResponse<ReportStats>>> {
    Ok(Json(ApiResponse::success(
        Some(service.stats().await),
        None,
        None,
    )))
}

/// Distinct reporters, for the reporter filter
#[utoipa::path(
    get,
    path = "/api/admin/reports/reporters",
    responses(
        (status = 200, description = "Reporter labels in first-seen order", body = ApiResponse<Vec<String>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Administrator access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_reporters(
    RequireAdmin(_session): RequireAdmin,
    State(service): State<Arc<ReportService>>,
) -> Result<Json<ApiResponse<Vec<String>>>> {
    let reporters = service.reporters().await;
    let total = reporters.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(reporters),
        None,
        Some(Meta { total }),
    )))
}

/// Change a report's status
#[utoipa::path(
    patch,
    path = "/api/admin/reports/{id}/status",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Invalid status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Administrator access required"),
        (status = 404, description = "Report not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_status(
    RequireAdmin(session): RequireAdmin,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateStatusDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service
        .update_status(id, dto.status, session.actor_name())
        .await?;
    updated(id, report, format!("Report status updated to {}", dto.status))
}

/// Attach an administrator comment to a report
#[utoipa::path(
    put,
    path = "/api/admin/reports/{id}/comment",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    request_body = AdminCommentDto,
    responses(
        (status = 200, description = "Comment saved", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Empty comment"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Administrator access required"),
        (status = 404, description = "Report not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn set_comment(
    RequireAdmin(session): RequireAdmin,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<AdminCommentDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = service
        .set_admin_comment(id, &dto.comment, session.actor_name())
        .await?;
    updated(id, report, "Comment saved".to_string())
}

/// Overwrite the editable fields of a report
#[utoipa::path(
    put,
    path = "/api/admin/reports/{id}",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    request_body = EditReportDto,
    responses(
        (status = 200, description = "Report updated", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Administrator access required"),
        (status = 404, description = "Report not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn edit_report(
    RequireAdmin(session): RequireAdmin,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<EditReportDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = service
        .apply_edit(id, dto.into(), session.actor_name())
        .await?;
    updated(id, report, "Report updated successfully".to_string())
}

/// Delete a report. Deleting a missing report succeeds.
#[utoipa::path(
    delete,
    path = "/api/admin/reports/{id}",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report deleted or already absent"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Administrator access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_report(
    RequireAdmin(session): RequireAdmin,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    let message = if service.delete(id).await? {
        tracing::info!("{} deleted report {}", session.actor_name(), id);
        format!("Report {} deleted", id)
    } else {
        format!("Report {} was already deleted", id)
    };

    Ok(Json(ApiResponse::success(None, Some(message), None)))
}

fn updated(
    id: i64,
    report: Option<Report>,
    message: String,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = report.ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;
    Ok(Json(ApiResponse::success(
        Some(report.into()),
        Some(message),
        None,
    )))
}
