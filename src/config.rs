//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! TOML config files are looked up in a few default locations; `ADMIN_DASH_*`
//! environment variables override whatever the file says.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::client::{ApiClientConfig, DEFAULT_API_BASE};
use crate::token::LocalTokenIssuer;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub web: WebConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    1
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

impl ApiConfig {
    pub fn client_config(&self) -> ApiClientConfig {
        ApiClientConfig {
            base_url: self.base_url.clone(),
            request_timeout_ms: self.request_timeout_secs.saturating_mul(1000),
            max_retries: self.max_retries,
        }
    }
}

/// Web front end configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Key-value store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_path() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("admin-dash").join("store.json").to_string_lossy().to_string())
        .unwrap_or_else(|| "./admin-dash-store.json".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Local token configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Signing secret for fallback tokens; generated per process when unset
    #[serde(default)]
    pub token_secret: Option<String>,

    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: i64,
}

fn default_token_ttl() -> i64 {
    24
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: None,
            token_ttl_hours: default_token_ttl(),
        }
    }
}

impl AuthConfig {
    pub fn token_issuer(&self) -> LocalTokenIssuer {
        let ttl = chrono::Duration::hours(self.token_ttl_hours.max(1));
        match self.token_secret.as_deref().filter(|s| !s.is_empty()) {
            Some(secret) => LocalTokenIssuer::new(secret.as_bytes(), ttl),
            None => {
                tracing::debug!("No token secret configured, using an ephemeral one");
                LocalTokenIssuer::ephemeral(ttl)
            }
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from an explicit path, or the default locations, or environment
    ///
    /// An explicit path that fails to load is an error; default locations
    /// that fail are skipped with a warning.
    pub fn load_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            let config = Self::load_with_env(path)?;
            tracing::info!("Loaded config from {:?}", path);
            return Ok(config);
        }

        let config_paths = [
            dirs::config_dir().map(|p| p.join("admin-dash").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Ok(Self::from_env())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply `ADMIN_DASH_*` overrides from `lookup`
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("ADMIN_DASH_API_URL") {
            self.api.base_url = url;
        }

        if let Some(host) = lookup("ADMIN_DASH_HOST") {
            self.web.host = host;
        }
        if let Some(port) = lookup("ADMIN_DASH_PORT") {
            match port.parse() {
                Ok(p) => self.web.port = p,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid ADMIN_DASH_PORT"),
            }
        }

        if let Some(path) = lookup("ADMIN_DASH_STORE") {
            self.storage.path = path;
        }

        if let Some(secret) = lookup("ADMIN_DASH_TOKEN_SECRET") {
            self.auth.token_secret = Some(secret);
        }

        if let Some(level) = lookup("ADMIN_DASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("ADMIN_DASH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Address the web front end binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.web.host, self.web.port)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# admin-dash Configuration
#
# Environment variables override these settings:
# - ADMIN_DASH_API_URL
# - ADMIN_DASH_HOST
# - ADMIN_DASH_PORT
# - ADMIN_DASH_STORE
# - ADMIN_DASH_TOKEN_SECRET
# - ADMIN_DASH_LOG_LEVEL
# - ADMIN_DASH_LOG_FORMAT

[api]
# Origin of the remote dashboard API
base_url = "https://task-api-eight-flax.vercel.app"

# Per-request timeout in seconds
request_timeout_secs = 10

# Extra attempts for read requests (logins and creates are never retried)
max_retries = 1

[web]
# Web front end host
host = "127.0.0.1"

# Web front end port
port = 3000

[storage]
# JSON file holding the session and preferences
# path = "~/.local/share/admin-dash/store.json"

[auth]
# Secret used to sign offline-login tokens (random per process when unset)
# token_secret = "change-me"

# Lifetime of offline-login tokens (hours)
token_ttl_hours = 24

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
