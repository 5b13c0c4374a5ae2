use std::sync::Arc;

use axum::{
    routing::{get, patch, put},
    Router,
};

use crate::features::admin::handlers;
use crate::features::reports::services::ReportService;

/// Create admin routes (all require administrator access)
pub fn routes(report_service: Arc<ReportService>) -> Router {
    Router::new()
        .route("/api/admin/reports", get(handlers::list_reports))
        .route("/api/admin/reports/stats", get(handlers::report_stats))
        .route("/api/admin/reports/reporters", get(handlers::list_reporters))
        .route(
            "/api/admin/reports/{id}",
            put(handlers::edit_report).delete(handlers::delete_report),
        )
        .route(
            "/api/admin/reports/{id}/status",
            patch(handlers::update_status),
        )
        .route("/api/admin/reports/{id}/comment", put(handlers::set_comment))
        .with_state(report_service)
}
