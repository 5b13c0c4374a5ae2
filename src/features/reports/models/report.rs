use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::shared::constants::UNKNOWN_REPORTER;

/// Triage state of a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ReportStatus {
    #[default]
    Pending,
    InProgress,
    Resolved,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 3] = [
        ReportStatus::Pending,
        ReportStatus::InProgress,
        ReportStatus::Resolved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::InProgress => "in-progress",
            ReportStatus::Resolved => "resolved",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid status '{}'. Expected one of: pending, in-progress, resolved",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Stored report (element of the `reports` collection)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default, deserialize_with = "status_or_pending")]
    pub status: ReportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_comment_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    /// Creation time as written by the submitting client. Kept verbatim.
    #[serde(default)]
    pub timestamp: String,
    /// Fields written by other clients, carried through rewrites untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Data for submitting a new report
#[derive(Debug, Clone)]
pub struct NewReport {
    pub issue_type: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub location: Option<GeoPoint>,
    pub photos: Vec<String>,
}

/// Full overwrite of the admin-editable fields
#[derive(Debug, Clone)]
pub struct ReportEdit {
    pub issue_type: String,
    pub description: String,
    pub status: ReportStatus,
    pub address: String,
    pub admin_comment: String,
}

/// Counts per status for the admin dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub resolved: usize,
}

impl ReportStats {
    pub fn from_reports(reports: &[Report]) -> Self {
        reports.iter().fold(
            Self {
                total: reports.len(),
                ..Self::default()
            },
            |mut stats, report| {
                match report.status {
                    ReportStatus::Pending => stats.pending += 1,
                    ReportStatus::InProgress => stats.in_progress += 1,
                    ReportStatus::Resolved => stats.resolved += 1,
                }
                stats
            },
        )
    }
}

impl Report {
    /// Parsed creation time. Unparsable timestamps count as the epoch so
    /// they sort after every valid one.
    pub fn created_at(&self) -> DateTime<Utc> {
        parse_timestamp(&self.timestamp).unwrap_or_default()
    }

    /// Reporter shown in listings: name, then email, then a placeholder
    pub fn reporter_label(&self) -> &str {
        non_blank(self.user_name.as_deref())
            .or_else(|| non_blank(self.user_id.as_deref()))
            .unwrap_or(UNKNOWN_REPORTER)
    }

    pub fn issue_label(&self) -> String {
        format_issue_type(self.issue_type.as_deref())
    }

    pub fn is_reported_by(&self, email: &str) -> bool {
        self.user_id.as_deref() == Some(email)
    }
}

/// Human label for an issue type code: "water_leak" → "Water leak Issue"
pub fn format_issue_type(issue_type: Option<&str>) -> String {
    let Some(code) = non_blank(issue_type) else {
        return "General Issue".to_string();
    };

    let mut chars = code.chars();
    let mut label = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>(),
        None => String::new(),
    };
    label.push_str(&chars.as_str().replacen('_', " ", 1));
    label.push_str(" Issue");
    label
}

/// Newest first; ties keep their stored order
pub fn sort_for_display(reports: &mut [Report]) {
    reports.sort_by_key(|report| std::cmp::Reverse(report.created_at()));
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Stored statuses outside the known set (or not strings at all) read as
/// pending, so one odd record cannot make the whole collection unreadable.
fn status_or_pending<'de, D>(deserializer: D) -> Result<ReportStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|status| status.parse().ok())
        .unwrap_or_default())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
