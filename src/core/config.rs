use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub remote_sync: RemoteSyncConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

/// Where the key-value store keeps its data
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Path of the JSON file backing the store
    pub path: PathBuf,
    /// Keep everything in memory and never touch the disk
    pub in_memory: bool,
}

/// A username/email/password triple accepted without a stored user record
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: String,
}

#[derive(Debug, Clone)]
pub struct DemoAccount {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub admin: AdminCredentials,
    /// Fallback account accepted when no stored user matches
    pub demo: Option<DemoAccount>,
    pub session_ttl: chrono::Duration,
    pub min_password_length: usize,
    /// bcrypt work factor
    pub password_hash_cost: u32,
}

/// Spreadsheet-backed user directory. Disabled when `url` is `None`.
#[derive(Debug, Clone)]
pub struct RemoteSyncConfig {
    pub url: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            remote_sync: RemoteSyncConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    // Photos travel as data URIs inside report bodies
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 10 * 1024 * 1024;

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StorageConfig {
    const DEFAULT_STORE_PATH: &'static str = "data/civicbridge-store.json";

    pub fn from_env() -> Result<Self, String> {
        let path = env::var("STORE_PATH")
            .unwrap_or_else(|_| Self::DEFAULT_STORE_PATH.to_string())
            .into();

        let in_memory = env::var("STORE_IN_MEMORY")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .map_err(|_| "STORE_IN_MEMORY must be true or false".to_string())?;

        Ok(Self { path, in_memory })
    }
}

impl AuthConfig {
    const DEFAULT_SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60; // 7 days
    const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;
    const DEFAULT_PASSWORD_HASH_COST: u32 = bcrypt::DEFAULT_COST;

    pub fn from_env() -> Result<Self, String> {
        let admin = AdminCredentials {
            username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            email: env::var("ADMIN_EMAIL")
                .map_err(|_| "ADMIN_EMAIL environment variable is required".to_string())?,
            password: env::var("ADMIN_PASSWORD")
                .ok()
                .filter(|s| !s.is_empty())
                .ok_or_else(|| "ADMIN_PASSWORD environment variable is required".to_string())?,
            display_name: env::var("ADMIN_DISPLAY_NAME")
                .unwrap_or_else(|_| "Administrator".to_string()),
        };

        // The demo account only exists when both halves are configured
        let demo = match (
            env::var("DEMO_EMAIL").ok().filter(|s| !s.is_empty()),
            env::var("DEMO_PASSWORD").ok().filter(|s| !s.is_empty()),
        ) {
            (Some(email), Some(password)) => Some(DemoAccount { email, password }),
            _ => None,
        };

        let session_ttl = env::var("SESSION_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_SESSION_TTL_SECS.to_string())
            .parse::<i64>()
            .ok()
            .filter(|secs| *secs > 0)
            .and_then(chrono::Duration::try_seconds)
            .ok_or_else(|| "SESSION_TTL_SECS must be a positive number of seconds".to_string())?;

        let min_password_length = env::var("MIN_PASSWORD_LENGTH")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_PASSWORD_LENGTH.to_string())
            .parse::<usize>()
            .map_err(|_| "MIN_PASSWORD_LENGTH must be a valid number".to_string())?;

        let password_hash_cost = env::var("PASSWORD_HASH_COST")
            .unwrap_or_else(|_| Self::DEFAULT_PASSWORD_HASH_COST.to_string())
            .parse::<u32>()
            .ok()
            .filter(|cost| (4..=31).contains(cost))
            .ok_or_else(|| "PASSWORD_HASH_COST must be a number between 4 and 31".to_string())?;

        Ok(Self {
            admin,
            demo,
            session_ttl,
            min_password_length,
            password_hash_cost,
        })
    }
}

impl RemoteSyncConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 10;

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("SHEETS_API_URL").ok().filter(|s| !s.is_empty());

        let timeout_secs = env::var("SHEETS_API_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "SHEETS_API_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "CivicBridge API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Civic issue reporting and triage API".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
