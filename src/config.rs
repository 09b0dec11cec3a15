//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use axum::http::HeaderValue;
use std::env;
use std::path::PathBuf;

/// Default origin of the catalog frontend
pub const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:5173";

/// Default upload size limit (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Extra request body allowance for multipart boundaries and text fields
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Image storage configuration
    pub storage: StorageConfig,
    /// Cross-origin configuration
    pub cors: CorsConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Image storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding stored product images, served under `/uploads`
    pub upload_dir: PathBuf,
    /// Directory where incoming uploads are staged before being committed
    pub staging_dir: PathBuf,
    /// Maximum size of a single uploaded file
    pub max_upload_bytes: u64,
    /// Delete a product's image file when the product is deleted
    pub prune_images_on_delete: bool,
}

/// Cross-origin configuration
///
/// Requests to the product routes are checked against `allowed_origins`
/// before any handler runs.
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Origins allowed to call the product API
    pub allowed_origins: Vec<String>,
    /// Whether requests without an `Origin` header are accepted
    pub allow_missing_origin: bool,
}

impl CorsConfig {
    /// Check an optional request origin against the allow-list
    pub fn is_allowed(&self, origin: Option<&str>) -> bool {
        match origin {
            Some(origin) => self.allowed_origins.iter().any(|o| o == origin),
            None => self.allow_missing_origin,
        }
    }

    /// Parse the allowed origins into header values
    pub fn origin_header_values(&self) -> anyhow::Result<Vec<HeaderValue>> {
        self.allowed_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o)
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 5000,
                host: "0.0.0.0".to_string(),
            },
            storage: StorageConfig {
                upload_dir: PathBuf::from("uploads"),
                staging_dir: PathBuf::from("tmp/uploads"),
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
                prune_images_on_delete: false,
            },
            cors: CorsConfig {
                allowed_origins: vec![DEFAULT_FRONTEND_ORIGIN.to_string()],
                allow_missing_origin: true,
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `5000`                  |
    /// | `UPLOAD_DIR`                | `uploads`               |
    /// | `STAGING_DIR`               | `tmp/uploads`           |
    /// | `MAX_UPLOAD_BYTES`          | `10485760`              |
    /// | `PRUNE_IMAGES_ON_DELETE`    | `false`                 |
    /// | `CORS_ALLOWED_ORIGINS`      | `http://localhost:5173` |
    /// | `CORS_ALLOW_MISSING_ORIGIN` | `true`                  |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server: ServerConfig {
                port: parse_env("PORT").unwrap_or(defaults.server.port),
                host: env::var("HOST").unwrap_or(defaults.server.host),
            },
            storage: StorageConfig {
                upload_dir: env::var("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.upload_dir),
                staging_dir: env::var("STAGING_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.staging_dir),
                max_upload_bytes: parse_env("MAX_UPLOAD_BYTES")
                    .unwrap_or(defaults.storage.max_upload_bytes),
                prune_images_on_delete: parse_env("PRUNE_IMAGES_ON_DELETE")
                    .unwrap_or(defaults.storage.prune_images_on_delete),
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .map(|v| {
                        v.split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or(defaults.cors.allowed_origins),
                allow_missing_origin: parse_env("CORS_ALLOW_MISSING_ORIGIN")
                    .unwrap_or(defaults.cors.allow_missing_origin),
            },
        }
    }

    /// Reject configurations the server cannot start with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.cors.allowed_origins.is_empty() {
            anyhow::bail!("CORS_ALLOWED_ORIGINS must name at least one origin");
        }
        self.cors.origin_header_values()?;
        if self.storage.max_upload_bytes == 0 {
            anyhow::bail!("MAX_UPLOAD_BYTES must be greater than zero");
        }
        Ok(())
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Request body limit for multipart endpoints
    pub fn body_limit(&self) -> usize {
        usize::try_from(self.storage.max_upload_bytes)
            .unwrap_or(usize::MAX)
            .saturating_add(FORM_OVERHEAD_BYTES)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
