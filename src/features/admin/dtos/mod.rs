mod admin_dtos;

pub use admin_dtos::{AdminCommentDto, EditReportDto, ReportQueryParams, UpdateStatusDto};
