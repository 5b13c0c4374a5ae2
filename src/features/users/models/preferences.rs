use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-user display and notification settings. Never cleared by logout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_notifications: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_notifications: Option<bool>,
}

impl Preferences {
    /// Overwrite the fields that `update` sets, keep the rest
    pub fn merge(&mut self, update: Preferences) {
        if update.theme.is_some() {
            self.theme = update.theme;
        }
        if update.push_notifications.is_some() {
            self.push_notifications = update.push_notifications;
        }
        if update.email_notifications.is_some() {
            self.email_notifications = update.email_notifications;
        }
    }
}
