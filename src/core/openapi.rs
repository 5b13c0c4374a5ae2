use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers};
use crate::features::auth::{self, dtos as auth_dtos, model as auth_model};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::users::{dtos as users_dtos, handlers::profile_handler, models as users_models};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::signup,
        auth::handlers::login,
        auth::handlers::admin_login,
        auth::handlers::logout,
        auth::handlers::get_me,
        // Users
        profile_handler::get_profile,
        profile_handler::get_preferences,
        profile_handler::update_preferences,
        // Reports
        reports_handlers::create_report,
        reports_handlers::list_my_reports,
        reports_handlers::get_report,
        // Admin
        admin_handlers::list_reports,
        admin_handlers::report_stats,
        admin_handlers::list_reporters,
        admin_handlers::update_status,
        admin_handlers::set_comment,
        admin_handlers::edit_report,
        admin_handlers::delete_report,
    ),
    components(
        schemas(
            Meta,
            // Auth
            auth_model::Role,
            auth_dtos::LoginRequestDto,
            auth_dtos::AdminLoginRequestDto,
            auth_dtos::SignupRequestDto,
            auth_dtos::SessionUserDto,
            auth_dtos::AuthResponseDto,
            auth_dtos::SignupResponseDto,
            auth_dtos::MeResponseDto,
            ApiResponse<auth_dtos::AuthResponseDto>,
            ApiResponse<auth_dtos::SignupResponseDto>,
            ApiResponse<auth_dtos::MeResponseDto>,
            // Users
            users_models::UserSummary,
            users_models::UserActivity,
            users_models::Preferences,
            users_dtos::UserProfileResponseDto,
            users_dtos::UpdatePreferencesDto,
            ApiResponse<users_dtos::UserProfileResponseDto>,
            ApiResponse<users_models::Preferences>,
            // Reports
            reports_models::ReportStatus,
            reports_models::GeoPoint,
            reports_models::ReportStats,
            reports_dtos::CreateReportDto,
            reports_dtos::ReportResponseDto,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            // Admin
            admin_dtos::UpdateStatusDto,
            admin_dtos::AdminCommentDto,
            admin_dtos::EditReportDto,
            ApiResponse<reports_models::ReportStats>,
            ApiResponse<Vec<String>>,
        )
    ),
    tags(
        (name = "auth", description = "Login, signup and session endpoints"),
        (name = "users", description = "Profile and preferences of the signed-in user"),
        (name = "reports", description = "Citizen issue reports"),
        (name = "admin", description = "Report triage (administrator only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "CivicBridge API",
        version = "0.1.0",
        description = "API documentation for CivicBridge",
    )
)]
pub struct ApiDoc;

/// Adds the Bearer session token scheme to the OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("opaque")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/login",
            "/api/auth/admin/login",
            "/api/auth/signup",
            "/api/reports/{id}",
            "/api/admin/reports/{id}/comment",
            "/api/users/me/preferences",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{} missing", path);
        }
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer_auth")));
    }
}
