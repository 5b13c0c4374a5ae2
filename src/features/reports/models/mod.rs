mod filter;
mod report;

pub use filter::{ReportFilter, ReporterFilter, StatusFilter};
pub use report::{
    format_issue_type, sort_for_display, GeoPoint, NewReport, Report, ReportEdit, ReportStats,
    ReportStatus,
};
