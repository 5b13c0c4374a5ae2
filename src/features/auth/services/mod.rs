mod auth_service;
mod password;
mod session_service;

pub use auth_service::{AuthService, SignupOutcome};
pub use session_service::SessionService;
