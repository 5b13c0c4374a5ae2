use crate::features::users::handlers::{profile_handler, UsersState};
use axum::{routing::get, Router};

pub fn routes(state: UsersState) -> Router {
    Router::new()
        .route("/api/users/me", get(profile_handler::get_profile))
        .route(
            "/api/users/me/preferences",
            get(profile_handler::get_preferences).put(profile_handler::update_preferences),
        )
        .with_state(state)
}
