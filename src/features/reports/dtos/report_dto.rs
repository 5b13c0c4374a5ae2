use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::reports::models::{GeoPoint, NewReport, Report, ReportStatus};
use crate::shared::serde_ext::trimmed;
use crate::shared::validation::ISSUE_TYPE_REGEX;

/// Request DTO for submitting a report
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportDto {
    /// Lowercase snake_case category code, e.g. "pothole" or "water_leak"
    #[serde(deserialize_with = "trimmed")]
    #[validate(regex(path = *ISSUE_TYPE_REGEX, message = "Invalid issue type"))]
    pub issue_type: String,

    #[validate(length(max = 5000, message = "Description is too long"))]
    pub description: Option<String>,

    #[validate(length(max = 500, message = "Address is too long"))]
    pub address: Option<String>,

    pub location: Option<GeoPoint>,

    /// Photos as `data:image/...` URLs
    #[serde(default)]
    #[validate(length(max = 10, message = "At most 10 photos per report"))]
    pub photos: Vec<String>,
}

impl From<CreateReportDto> for NewReport {
    fn from(dto: CreateReportDto) -> Self {
        Self {
            issue_type: dto.issue_type,
            description: dto.description,
            address: dto.address,
            location: dto.location,
            photos: dto.photos,
        }
    }
}

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponseDto {
    pub id: i64,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub issue_type: Option<String>,
    /// Display label, e.g. "Water leak Issue"
    pub issue_label: String,
    /// Reporter name, email or "Unknown User"
    pub reporter_label: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub location: Option<GeoPoint>,
    pub photos: Vec<String>,
    pub status: ReportStatus,
    pub admin_comment: Option<String>,
    pub admin_comment_timestamp: Option<DateTime<Utc>>,
    pub status_updated: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
    pub timestamp: String,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            issue_label: r.issue_label(),
            reporter_label: r.reporter_label().to_string(),
            id: r.id,
            user_id: r.user_id,
            user_name: r.user_name,
            issue_type: r.issue_type,
            description: r.description,
            address: r.address,
            location: r.location,
            photos: r.photos,
            status: r.status,
            admin_comment: r.admin_comment,
            admin_comment_timestamp: r.admin_comment_timestamp,
            status_updated: r.status_updated,
            updated_by: r.updated_by,
            timestamp: r.timestamp,
        }
    }
}
