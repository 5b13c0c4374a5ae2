// =============================================================================
// STORE KEYS
// =============================================================================

/// Collection of registered users
pub const USERS_KEY: &str = "CivicBridge_users";

/// Collection of submitted reports
pub const REPORTS_KEY: &str = "CivicBridge_reports";

/// Prefix for per-token session records
pub const SESSION_KEY_PREFIX: &str = "session:";

/// Prefix for per-user preference documents
pub const PREFERENCES_KEY_PREFIX: &str = "CivicBridge-preferences:";

// =============================================================================
// REPORTS
// =============================================================================

/// Label shown for reports with no reporter identity
pub const UNKNOWN_REPORTER: &str = "Unknown User";

/// Filter value meaning "do not filter on this field"
pub const FILTER_ALL: &str = "all";
