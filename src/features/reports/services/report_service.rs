use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::Map;
use tokio::sync::Mutex;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::Session;
use crate::features::reports::models::{
    sort_for_display, NewReport, Report, ReportEdit, ReportFilter, ReportStats, ReportStatus,
};
use crate::modules::storage::LocalStore;
use crate::shared::constants::REPORTS_KEY;
use crate::shared::validation::ISSUE_TYPE_REGEX;

/// Service for report operations
///
/// The reports collection is a single JSON array. Every mutation reads the
/// whole array, edits it in memory and writes it back while holding
/// `write_lock`, so concurrent requests in this process never lose updates.
pub struct ReportService {
    store: Arc<LocalStore>,
    write_lock: Mutex<()>,
}

impl ReportService {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// All reports in stored order. A malformed collection reads as empty.
    pub async fn load_all(&self) -> Vec<Report> {
        match self.store.load_collection(REPORTS_KEY).await {
            Ok(reports) => reports,
            Err(e) => {
                tracing::warn!("Ignoring unreadable reports collection: {}", e);
                Vec::new()
            }
        }
    }

    /// Strict read used before a rewrite, so a malformed collection is never
    /// replaced by a partial one
    async fn load_for_update(&self) -> Result<Vec<Report>> {
        Ok(self.store.load_collection(REPORTS_KEY).await?)
    }

    pub async fn find_by_id(&self, id: i64) -> Option<Report> {
        self.load_all().await.into_iter().find(|r| r.id == id)
    }

    /// Reports matching `filter`, newest first
    pub async fn filter(&self, filter: &ReportFilter) -> Vec<Report> {
        let mut reports: Vec<Report> = self
            .load_all()
            .await
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect();
        sort_for_display(&mut reports);
        reports
    }

    /// Reports submitted by `email`, newest first
    pub async fn list_by_reporter(&self, email: &str) -> Vec<Report> {
        let mut reports: Vec<Report> = self
            .load_all()
            .await
            .into_iter()
            .filter(|r| r.is_reported_by(email))
            .collect();
        sort_for_display(&mut reports);
        reports
    }

    pub async fn count_by_reporter(&self, email: &str) -> usize {
        self.load_all()
            .await
            .iter()
            .filter(|r| r.is_reported_by(email))
            .count()
    }

    /// Submit a new report on behalf of the session's user
    pub async fn create(&self, data: NewReport, session: &Session) -> Result<Report> {
        let issue_type = data.issue_type.trim();
        if !ISSUE_TYPE_REGEX.is_match(issue_type) {
            return Err(AppError::Validation(format!(
                "Invalid issue type '{}'",
                data.issue_type
            )));
        }
        if let Some(bad) = data.photos.iter().position(|p| !p.starts_with("data:image/")) {
            return Err(AppError::Validation(format!(
                "Photo {} is not an image data URL",
                bad + 1
            )));
        }

        let _guard = self.write_lock.lock().await;
        let mut reports = self.load_for_update().await?;

        let now = Utc::now();
        let newest = reports.iter().map(|r| r.id).max().unwrap_or(0);
        let next_free = newest.checked_add(1).ok_or_else(|| {
            AppError::Internal(format!("No report id left above {}", newest))
        })?;
        let id = now.timestamp_millis().max(next_free);

        let report = Report {
            id,
            user_id: Some(session.email.clone()),
            user_name: Some(session.name.clone()),
            issue_type: Some(issue_type.to_string()),
            description: non_empty(data.description),
            address: non_empty(data.address),
            location: data.location,
            photos: data.photos,
            status: ReportStatus::Pending,
            admin_comment: None,
            admin_comment_timestamp: None,
            status_updated: None,
            updated_by: None,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            extra: Map::new(),
        };

        reports.push(report.clone());
        self.store.save_collection(REPORTS_KEY, &reports).await?;

        tracing::info!("Created report {} for {}", report.id, session.email);
        Ok(report)
    }

    /// Set a report's status. `Ok(None)` when no report has `id`.
    pub async fn update_status(
        &self,
        id: i64,
        status: ReportStatus,
        actor: &str,
    ) -> Result<Option<Report>> {
        let updated = self
            .mutate(id, |report| {
                report.status = status;
                report.status_updated = Some(Utc::now());
                report.updated_by = Some(actor.to_string());
            })
            .await?;

        if updated.is_some() {
            tracing::info!("Report {} marked {} by {}", id, status, actor);
        }
        Ok(updated)
    }

    pub async fn set_admin_comment(
        &self,
        id: i64,
        text: &str,
        actor: &str,
    ) -> Result<Option<Report>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("Comment cannot be empty".to_string()));
        }

        self.mutate(id, |report| {
            report.admin_comment = Some(text.to_string());
            report.admin_comment_timestamp = Some(Utc::now());
            report.updated_by = Some(actor.to_string());
        })
        .await
    }

    /// Overwrite the admin-editable fields of a report
    pub async fn apply_edit(
        &self,
        id: i64,
        edit: ReportEdit,
        actor: &str,
    ) -> Result<Option<Report>> {
        let issue_type = edit.issue_type.trim();
        if !issue_type.is_empty() && !ISSUE_TYPE_REGEX.is_match(issue_type) {
            return Err(AppError::Validation(format!(
                "Invalid issue type '{}'",
                edit.issue_type
            )));
        }

        self.mutate(id, |report| {
            let now = Utc::now();
            let comment = non_empty(Some(edit.admin_comment));

            report.issue_type = non_empty(Some(edit.issue_type));
            report.description = non_empty(Some(edit.description));
            report.status = edit.status;
            report.address = non_empty(Some(edit.address));
            if comment.is_some() {
                report.admin_comment_timestamp = Some(now);
            }
            report.admin_comment = comment;
            report.status_updated = Some(now);
            report.updated_by = Some(actor.to_string());
        })
        .await
    }

    /// Remove a report. Returns `false` (and leaves the store alone) when
    /// there is nothing to delete.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut reports = self.load_for_update().await?;

        let before = reports.len();
        reports.retain(|r| r.id != id);
        if reports.len() == before {
            return Ok(false);
        }

        self.store.save_collection(REPORTS_KEY, &reports).await?;
        tracing::info!("Deleted report {}", id);
        Ok(true)
    }

    pub async fn stats(&self) -> ReportStats {
        ReportStats::from_reports(&self.load_all().await)
    }

    /// Distinct reporter labels in first-seen order
    pub async fn reporters(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for report in self.load_all().await {
            let label = report.reporter_label();
            if !labels.iter().any(|l| l == label) {
                labels.push(label.to_string());
            }
        }
        labels
    }

    async fn mutate<F>(&self, id: i64, apply: F) -> Result<Option<Report>>
    where
        F: FnOnce(&mut Report),
    {
        let _guard = self.write_lock.lock().await;
        let mut reports = self.load_for_update().await?;

        let Some(report) = reports.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        apply(report);
        let updated = report.clone();

        self.store.save_collection(REPORTS_KEY, &reports).await?;
        Ok(Some(updated))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
