use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, middleware::from_fn, Router};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::core::config::{AuthConfig, Config};
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::admin::routes as admin_routes;
use crate::features::auth::routes as auth_routes;
use crate::features::auth::services::{AuthService, SessionService};
use crate::features::reports::{routes as reports_routes, ReportService};
use crate::features::users::{handlers::UsersState, routes as users_routes, services::UserService};
use crate::modules::remote_sync::UserDirectory;
use crate::modules::storage::LocalStore;

/// Every service the HTTP layer needs, wired over one store
#[derive(Clone)]
pub struct AppServices {
    pub sessions: Arc<SessionService>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub reports: Arc<ReportService>,
}

impl AppServices {
    pub fn new(
        store: Arc<LocalStore>,
        auth_config: AuthConfig,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        let sessions = Arc::new(SessionService::new(
            Arc::clone(&store),
            auth_config.session_ttl,
        ));
        let users = Arc::new(UserService::new(Arc::clone(&store)));
        let reports = Arc::new(ReportService::new(Arc::clone(&store)));
        let auth = Arc::new(AuthService::new(
            auth_config,
            Arc::clone(&sessions),
            Arc::clone(&users),
            Arc::clone(&reports),
            directory,
        ));

        Self {
            sessions,
            auth,
            users,
            reports,
        }
    }
}

/// API routes without documentation or transport layers
pub fn api_router(services: &AppServices) -> Router {
    // Protected routes (require a session)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes(Arc::clone(&services.auth)))
        .merge(users_routes::routes(UsersState {
            user_service: Arc::clone(&services.users),
            report_service: Arc::clone(&services.reports),
        }))
        .merge(reports_routes::routes(Arc::clone(&services.reports)))
        .merge(admin_routes::routes(Arc::clone(&services.reports)))
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&services.sessions),
            middleware::session_middleware,
        ));

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }

    Router::new()
        .merge(protected_routes)
        .merge(auth_routes::public_routes(Arc::clone(&services.auth)))
        .route("/health", axum::routing::get(health_check))
}

/// Full application: API, Swagger UI, CORS, body limit, tracing and request ids
pub fn build_router(services: &AppServices, config: &Config) -> Router {
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    Router::new()
        .merge(swagger)
        .merge(api_router(services))
        // Photos travel as data URLs, so bodies can be large
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}

#[cfg(test)]
mod tests {
    use crate::shared::test_helpers::{
        test_server, test_services, ADMIN_EMAIL, ADMIN_PASSWORD, DEMO_EMAIL, DEMO_PASSWORD,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    async fn login(server: &TestServer, email: &str, password: &str) -> String {
        let response = server
            .post("/api/auth/login")
            .json(&json!({"email": email, "password": password}))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        response.json::<Value>()["data"]["accessToken"]
            .as_str()
            .unwrap()
            .to_string()
    }

    async fn submit(server: &TestServer, token: &str, issue_type: &str) -> i64 {
        let response = server
            .post("/api/reports")
            .authorization_bearer(token)
            .json(&json!({
                "issueType": issue_type,
                "description": "Needs attention",
                "address": "1 Main St"
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        response.json::<Value>()["data"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let server = test_server(&test_services());
        let response = server.get("/health").await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_routes_require_session() {
        let server = test_server(&test_services());

        let missing = server.get("/api/reports").await;
        assert_eq!(missing.status_code(), StatusCode::UNAUTHORIZED);

        let bogus = server
            .get("/api/auth/me")
            .authorization_bearer("not-a-token")
            .await;
        assert_eq!(bogus.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(bogus.json::<Value>()["success"], false);
    }

    #[tokio::test]
    async fn test_bad_credentials_are_rejected() {
        let server = test_server(&test_services());
        let response = server
            .post("/api/auth/login")
            .json(&json!({"email": DEMO_EMAIL, "password": "nope"}))
            .await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.json::<Value>()["message"],
            "Invalid email or password"
        );
    }

    #[tokio::test]
    async fn test_signup_me_and_logout() {
        let server = test_server(&test_services());

        let response = server
            .post("/api/auth/signup")
            .json(&json!({
                "fullName": "Jane Citizen",
                "email": "jane@example.com",
                "password": "secret1",
                "confirmPassword": "secret1"
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        let body = response.json::<Value>();
        assert_eq!(body["data"]["remoteSynced"], false);
        let token = body["data"]["accessToken"].as_str().unwrap().to_string();

        let me = server.get("/api/auth/me").authorization_bearer(&token).await;
        assert_eq!(me.status_code(), StatusCode::OK);
        assert_eq!(me.json::<Value>()["data"]["user"]["name"], "Jane Citizen");

        let logout = server
            .post("/api/auth/logout")
            .authorization_bearer(&token)
            .await;
        assert_eq!(logout.status_code(), StatusCode::OK);

        let after = server.get("/api/auth/me").authorization_bearer(&token).await;
        assert_eq!(after.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_signup_with_admin_email_is_rejected() {
        let server = test_server(&test_services());
        let response = server
            .post("/api/auth/signup")
            .json(&json!({
                "fullName": "Impostor",
                "email": ADMIN_EMAIL,
                "password": "secret1",
                "confirmPassword": "secret1"
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let server = test_server(&test_services());
        let response = server
            .post("/api/auth/login")
            .content_type("application/json")
            .bytes("{not json".into())
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_user_sees_only_own_reports() {
        let services = test_services();
        let server = test_server(&services);
        let demo = login(&server, DEMO_EMAIL, DEMO_PASSWORD).await;

        let id = submit(&server, &demo, "pothole").await;

        let mine = server.get("/api/reports").authorization_bearer(&demo).await;
        let body = mine.json::<Value>();
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["data"][0]["issueLabel"], "Pothole Issue");
        assert_eq!(body["data"][0]["reporterLabel"], "Demo User");

        let outsider = server
            .post("/api/auth/signup")
            .json(&json!({
                "fullName": "Other",
                "email": "other@example.com",
                "password": "secret1",
                "confirmPassword": "secret1"
            }))
            .await
            .json::<Value>()["data"]["accessToken"]
            .as_str()
            .unwrap()
            .to_string();
        let hidden = server
            .get(&format!("/api/reports/{}", id))
            .authorization_bearer(&outsider)
            .await;
        assert_eq!(hidden.status_code(), StatusCode::NOT_FOUND);

        let admin = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;
        let visible = server
            .get(&format!("/api/reports/{}", id))
            .authorization_bearer(&admin)
            .await;
        assert_eq!(visible.status_code(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_issue_type_is_rejected() {
        let server = test_server(&test_services());
        let demo = login(&server, DEMO_EMAIL, DEMO_PASSWORD).await;

        let response = server
            .post("/api/reports")
            .authorization_bearer(&demo)
            .json(&json!({"issueType": "Water Leak"}))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        let padded = server
            .post("/api/reports")
            .authorization_bearer(&demo)
            .json(&json!({"issueType": " pothole "}))
            .await;
        assert_eq!(padded.status_code(), StatusCode::CREATED);
        assert_eq!(padded.json::<Value>()["data"]["issueType"], "pothole");
    }

    #[tokio::test]
    async fn test_admin_routes_reject_users() {
        let server = test_server(&test_services());
        let demo = login(&server, DEMO_EMAIL, DEMO_PASSWORD).await;

        let response = server
            .get("/api/admin/reports")
            .authorization_bearer(&demo)
            .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_triage_flow() {
        let server = test_server(&test_services());
        let demo = login(&server, DEMO_EMAIL, DEMO_PASSWORD).await;
        let first = submit(&server, &demo, "pothole").await;
        let second = submit(&server, &demo, "graffiti").await;

        let admin = server
            .post("/api/auth/admin/login")
            .json(&json!({"username": "admin", "password": ADMIN_PASSWORD}))
            .await
            .json::<Value>()["data"]["accessToken"]
            .as_str()
            .unwrap()
            .to_string();

        let status = server
            .patch(&format!("/api/admin/reports/{}/status", first))
            .authorization_bearer(&admin)
            .json(&json!({"status": "in-progress"}))
            .await;
        assert_eq!(status.status_code(), StatusCode::OK);
        let body = status.json::<Value>();
        assert_eq!(body["data"]["status"], "in-progress");
        assert_eq!(body["data"]["updatedBy"], "Administrator");

        let invalid = server
            .patch(&format!("/api/admin/reports/{}/status", first))
            .authorization_bearer(&admin)
            .json(&json!({"status": "closed"}))
            .await;
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let blank = server
            .put(&format!("/api/admin/reports/{}/comment", second))
            .authorization_bearer(&admin)
            .json(&json!({"comment": "   "}))
            .await;
        assert_eq!(blank.status_code(), StatusCode::BAD_REQUEST);

        let filtered = server
            .get("/api/admin/reports")
            .add_query_param("status", "in-progress")
            .authorization_bearer(&admin)
            .await;
        let body = filtered.json::<Value>();
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["data"][0]["id"], first);

        let stats = server
            .get("/api/admin/reports/stats")
            .authorization_bearer(&admin)
            .await
            .json::<Value>();
        assert_eq!(stats["data"]["total"], 2);
        assert_eq!(stats["data"]["inProgress"], 1);
        assert_eq!(stats["data"]["pending"], 1);

        let reporters = server
            .get("/api/admin/reports/reporters")
            .authorization_bearer(&admin)
            .await
            .json::<Value>();
        assert_eq!(reporters["data"], json!(["Demo User"]));

        let edit = server
            .put(&format!("/api/admin/reports/{}", second))
            .authorization_bearer(&admin)
            .json(&json!({
                "issueType": "water_leak",
                "description": "Leaking hydrant",
                "status": "resolved",
                "address": "2 Harbor Rd",
                "adminComment": "Fixed"
            }))
            .await;
        assert_eq!(edit.status_code(), StatusCode::OK);
        assert_eq!(edit.json::<Value>()["data"]["adminComment"], "Fixed");

        for _ in 0..2 {
            let deleted = server
                .delete(&format!("/api/admin/reports/{}", second))
                .authorization_bearer(&admin)
                .await;
            assert_eq!(deleted.status_code(), StatusCode::OK);
        }

        let missing = server
            .patch(&format!("/api/admin/reports/{}/status", second))
            .authorization_bearer(&admin)
            .json(&json!({"status": "resolved"}))
            .await;
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_profile_and_preferences() {
        let server = test_server(&test_services());
        let demo = login(&server, DEMO_EMAIL, DEMO_PASSWORD).await;
        submit(&server, &demo, "garbage").await;

        let profile = server
            .get("/api/users/me")
            .authorization_bearer(&demo)
            .await
            .json::<Value>();
        assert_eq!(profile["data"]["email"], DEMO_EMAIL);
        assert_eq!(profile["data"]["profile"]["reportsCount"], 1);

        let updated = server
            .put("/api/users/me/preferences")
            .authorization_bearer(&demo)
            .json(&json!({"theme": "dark"}))
            .await;
        assert_eq!(updated.status_code(), StatusCode::OK);

        server
            .post("/api/auth/logout")
            .authorization_bearer(&demo)
            .await;
        let demo = login(&server, DEMO_EMAIL, DEMO_PASSWORD).await;

        let prefs = server
            .get("/api/users/me/preferences")
            .authorization_bearer(&demo)
            .await
            .json::<Value>();
        assert_eq!(prefs["data"]["theme"], "dark");
    }
}
