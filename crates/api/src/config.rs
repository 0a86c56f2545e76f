use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry duration).
    pub jwt: JwtConfig,
    /// Email address of the single admin account.
    pub admin_email: String,
    /// Argon2 hash of the admin password.
    pub admin_password_hash: String,
    /// Directory where uploaded images are stored and served from.
    pub upload_dir: PathBuf,
    /// Maximum accepted upload size in bytes (default: 10 MiB).
    pub max_upload_bytes: usize,
    /// Path of the local catalog blob, used when no database is configured.
    pub catalog_path: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    /// | `ADMIN_EMAIL`          | -- (required)              |
    /// | `ADMIN_PASSWORD_HASH`  | -- (required)              |
    /// | `UPLOAD_DIR`           | `./uploads`                |
    /// | `MAX_UPLOAD_BYTES`     | `10485760`                 |
    /// | `CATALOG_PATH`         | `./data/catalog.json`      |
    ///
    /// # Panics
    ///
    /// Panics when a required variable is missing or a numeric variable
    /// fails to parse. Misconfiguration should fail fast at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        let admin_email =
            std::env::var("ADMIN_EMAIL").expect("ADMIN_EMAIL must be set in the environment");
        let admin_password_hash = std::env::var("ADMIN_PASSWORD_HASH")
            .expect("ADMIN_PASSWORD_HASH must be set in the environment");

        let upload_dir =
            PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".into()));

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| (10 * 1024 * 1024).to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let catalog_path = PathBuf::from(
            std::env::var("CATALOG_PATH").unwrap_or_else(|_| "./data/catalog.json".into()),
        );

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt,
            admin_email,
            admin_password_hash,
            upload_dir,
            max_upload_bytes,
            catalog_path,
        }
    }
}
