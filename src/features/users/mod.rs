//! Local user accounts.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/users/me` | Profile with activity counters |
//! | GET | `/api/users/me/preferences` | Display and notification settings |
//! | PUT | `/api/users/me/preferences` | Merge new settings into the stored ones |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
