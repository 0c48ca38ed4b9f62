//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `BI_TOOL_*` environment overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::credentials::HttpCredentialConfig;
use crate::session::SessionConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Mock credential API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// JSON file the user directory is persisted to; in-memory when unset
    #[serde(default)]
    pub db_path: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            db_path: None,
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Credential client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8082".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ClientConfig {
    pub fn credential_config(&self) -> HttpCredentialConfig {
        HttpCredentialConfig {
            base_url: self.base_url.clone(),
            request_timeout_secs: self.request_timeout_secs,
        }
    }
}

/// Session policy and CLI session file
#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Where the CLI keeps its session; defaults under the local data dir
    #[serde(default)]
    pub storage_path: Option<String>,
}

fn default_idle_timeout() -> u64 {
    60
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout(),
            storage_path: None,
        }
    }
}

impl SessionSettings {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            idle_timeout: Duration::from_secs(self.idle_timeout_secs.max(1)),
        }
    }

    pub fn storage_file(&self) -> PathBuf {
        match &self.storage_path {
            Some(path) => PathBuf::from(path),
            None => dirs::data_local_dir()
                .map(|p| p.join("bi-tool").join("session.json"))
                .unwrap_or_else(|| PathBuf::from("./.bi-tool-session.json")),
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

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("bi-tool").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `BI_TOOL_*` overrides from any variable source
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(host) = var("BI_TOOL_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("BI_TOOL_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }
        if let Some(db_path) = var("BI_TOOL_DB_PATH") {
            self.api.db_path = Some(db_path);
        }

        // Client overrides
        if let Some(url) = var("BI_TOOL_API_URL") {
            self.client.base_url = url;
        }

        // Session overrides
        if let Some(secs) = var("BI_TOOL_IDLE_TIMEOUT_SECS") {
            if let Ok(s) = secs.parse() {
                self.session.idle_timeout_secs = s;
            }
        }
        if let Some(path) = var("BI_TOOL_SESSION_FILE") {
            self.session.storage_path = Some(path);
        }

        // Logging overrides
        if let Some(level) = var("BI_TOOL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("BI_TOOL_LOG_FORMAT") {
            self.logging.format = format;
        }
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
    r#"# BI Tool Configuration
#
# Environment variables override these settings:
# - BI_TOOL_API_HOST
# - BI_TOOL_API_PORT
# - BI_TOOL_DB_PATH
# - BI_TOOL_API_URL
# - BI_TOOL_IDLE_TIMEOUT_SECS
# - BI_TOOL_SESSION_FILE
# - BI_TOOL_LOG_LEVEL
# - BI_TOOL_LOG_FORMAT

[api]
# Mock credential API host
host = "0.0.0.0"

# Mock credential API port
port = 8082

# Allowed CORS origins, e.g. ["http://localhost:8084"] (empty means any origin)
cors_origins = []

# Persist registered users to a JSON file
# db_path = "./users.json"

[client]
# Credential service the CLI talks to
base_url = "http://localhost:8082"

# Request timeout in seconds
request_timeout_secs = 10

[session]
# Log out after this many idle seconds unless "keep me logged in" is set
idle_timeout_secs = 60

# Session file used by the CLI
# storage_path = "~/.local/share/bi-tool/session.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.port, 8082);
        assert_eq!(config.api.addr(), "0.0.0.0:8082");
        assert!(config.api.cors_origins.is_empty());
        assert_eq!(config.client.base_url, "http://localhost:8082");
        assert_eq!(config.session.idle_timeout_secs, 60);
        assert_eq!(
            config.session.session_config().idle_timeout,
            Duration::from_secs(60)
        );
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        let defaults = Config::default();
        assert_eq!(config.api.host, defaults.api.host);
        assert_eq!(config.api.cors_origins, defaults.api.cors_origins);
        assert_eq!(config.api.db_path, None);
        assert_eq!(config.client.request_timeout_secs, 10);
        assert_eq!(config.session.idle_timeout_secs, 60);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[session]\nidle_timeout_secs = 5\nstorage_path = \"/tmp/s.json\"\n")
            .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.session.idle_timeout_secs, 5);
        assert_eq!(config.session.storage_file(), PathBuf::from("/tmp/s.json"));
        assert_eq!(config.api.port, 8082);
    }

    #[test]
    fn test_load_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[api\nport = ").unwrap();
        assert!(matches!(Config::load(&bad), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("BI_TOOL_API_PORT", "9000"),
            ("BI_TOOL_API_URL", "http://api.test"),
            ("BI_TOOL_IDLE_TIMEOUT_SECS", "not-a-number"),
            ("BI_TOOL_DB_PATH", "/data/users.json"),
            ("BI_TOOL_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.api.port, 9000);
        assert_eq!(config.client.base_url, "http://api.test");
        assert_eq!(config.session.idle_timeout_secs, 60);
        assert_eq!(config.api.db_path.as_deref(), Some("/data/users.json"));
        assert_eq!(config.logging.format, "json");
    }
}
