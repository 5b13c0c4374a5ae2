pub mod admin;
pub mod auth;
pub mod reports;
pub mod users;
