use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::core::error::AppError;
use crate::features::reports::models::{
    ReportEdit, ReportFilter, ReportStatus, ReporterFilter, StatusFilter,
};
use crate::shared::constants::FILTER_ALL;

// =============================================================================
// LISTING
// =============================================================================

/// Query params for the admin report listing
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ReportQueryParams {
    /// Case-insensitive search over description, type, reporter and address
    pub search: Option<String>,
    /// "all", "pending", "in-progress" or "resolved"
    #[serde(default = "default_filter")]
    pub status: String,
    /// "all", or a reporter name or email
    #[serde(default = "default_filter")]
    pub reporter: String,
}

fn default_filter() -> String {
    FILTER_ALL.to_string()
}

impl TryFrom<ReportQueryParams> for ReportFilter {
    type Error = AppError;

    fn try_from(params: ReportQueryParams) -> Result<Self, Self::Error> {
        let status: StatusFilter = params.status.parse().map_err(AppError::Validation)?;
        Ok(Self {
            search: params.search,
            status,
            reporter: ReporterFilter::from(params.reporter.as_str()),
        })
    }
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// Request DTO for changing a report's status
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusDto {
    pub status: ReportStatus,
}

/// Request DTO for attaching an administrator comment
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AdminCommentDto {
    #[validate(length(max = 2000, message = "Comment must not exceed 2000 characters"))]
    pub comment: String,
}

/// Request DTO for the full report edit form
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditReportDto {
    pub issue_type: String,
    #[validate(length(max = 5000, message = "Description is too long"))]
    #[serde(default)]
    pub description: String,
    pub status: ReportStatus,
    #[validate(length(max = 500, message = "Address is too long"))]
    #[serde(default)]
    pub address: String,
    #[validate(length(max = 2000, message = "Comment must not exceed 2000 characters"))]
    #[serde(default)]
    pub admin_comment: String,
}

impl From<EditReportDto> for ReportEdit {
    fn from(dto: EditReportDto) -> Self {
        Self {
            issue_type: dto.issue_type,
            description: dto.description,
            status: dto.status,
            address: dto.address,
            admin_comment: dto.admin_comment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(status: &str, reporter: &str) -> ReportQueryParams {
        ReportQueryParams {
            search: None,
            status: status.to_string(),
            reporter: reporter.to_string(),
        }
    }

    #[test]
    fn test_defaults_mean_no_filter() {
        let filter = ReportFilter::try_from(params("all", "all")).unwrap();
        assert_eq!(filter.status, StatusFilter::All);
        assert_eq!(filter.reporter, ReporterFilter::All);
    }

    #[test]
    fn test_specific_values() {
        let filter = ReportFilter::try_from(params("in-progress", "Ana")).unwrap();
        assert_eq!(filter.status, StatusFilter::Only(ReportStatus::InProgress));
        assert_eq!(filter.reporter, ReporterFilter::Only("Ana".to_string()));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let result = ReportFilter::try_from(params("closed", "all"));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
