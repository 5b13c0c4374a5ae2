mod preferences;
mod user;

pub use preferences::Preferences;
pub use user::{User, UserActivity, UserSummary};
