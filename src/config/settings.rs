//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub auth: AuthConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served under `/public`
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_public_dir() -> String {
    "public".to_string()
}

/// Which embedded engine persists items
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Document,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Sqlite => write!(f, "sqlite"),
            StorageBackend::Document => write!(f, "document"),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Database file path, or `:memory:` for the sqlite backend
    #[serde(default = "default_storage_path")]
    pub path: String,
    #[serde(default)]
    pub seed_on_start: bool,
}

fn default_storage_path() -> String {
    "./data/items.db".to_string()
}

/// Session cookie and session store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default)]
    pub secure: bool,
    /// SQLite file holding session records, or `:memory:`
    #[serde(default = "default_session_path")]
    pub path: String,
    /// Sessions expire after this long without a request
    #[serde(default = "default_idle_minutes")]
    pub idle_minutes: i64,
}

fn default_cookie_name() -> String {
    "inventory.sid".to_string()
}

fn default_session_path() -> String {
    "./data/sessions.db".to_string()
}

fn default_idle_minutes() -> i64 {
    24 * 60
}

/// Bearer token configuration for the task API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: i64,
}

fn default_token_ttl() -> i64 {
    60
}

/// Upper bound for token and session lifetimes (one year)
pub const MAX_LIFETIME_MINUTES: i64 = 365 * 24 * 60;

/// How form errors are reported back to the user
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackMode {
    /// Store the message in the session and redirect back to the form
    #[default]
    Flash,
    /// Re-render the form in place with the message
    Inline,
}

/// Page rendering configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    #[serde(default)]
    pub feedback: FeedbackMode,
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Load settings from the default configuration file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/app.yaml")
    }

    /// Load settings from a specific configuration file path
    ///
    /// The file is optional. YAML is assumed for `.yaml`/`.yml`, TOML otherwise.
    /// Environment variables prefixed with `INVENTORY` override file values,
    /// using `__` as the section separator.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let format = if path.extension().map_or(false, |ext| ext == "yaml" || ext == "yml") {
            FileFormat::Yaml
        } else {
            FileFormat::Toml
        };

        let mut config_builder = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("server.public_dir", default_public_dir())?
            .set_default("storage.backend", "sqlite")?
            .set_default("storage.path", default_storage_path())?
            .set_default("storage.seed_on_start", false)?
            .set_default("session.cookie_name", default_cookie_name())?
            .set_default("session.secure", false)?
            .set_default("session.path", default_session_path())?
            .set_default("session.idle_minutes", default_idle_minutes())?
            .set_default("auth.token_ttl_minutes", default_token_ttl())?
            .set_default("ui.feedback", "flash")?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", "json")?;

        if path.exists() {
            config_builder = config_builder.add_source(File::from(path).format(format));
        }

        config_builder = config_builder.add_source(
            Environment::with_prefix("INVENTORY")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = config_builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(invalid("Server port cannot be 0"));
        }

        if self.storage.path.trim().is_empty() {
            return Err(invalid("Storage path cannot be empty"));
        }

        if self.storage.backend == StorageBackend::Document && self.storage.path == ":memory:" {
            return Err(invalid("The document backend requires a file path"));
        }

        if self.session.cookie_name.trim().is_empty() {
            return Err(invalid("Session cookie name cannot be empty"));
        }

        if self.session.path.trim().is_empty() {
            return Err(invalid("Session store path cannot be empty"));
        }

        if !(1..=MAX_LIFETIME_MINUTES).contains(&self.session.idle_minutes) {
            return Err(invalid("Session idle timeout must be between 1 minute and 1 year"));
        }

        if !(1..=MAX_LIFETIME_MINUTES).contains(&self.auth.token_ttl_minutes) {
            return Err(invalid("Token TTL must be between 1 minute and 1 year"));
        }

        Ok(())
    }

    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn invalid(message: &str) -> AppError {
    AppError::Config(config::ConfigError::Message(message.to_string()))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                public_dir: default_public_dir(),
            },
            storage: StorageConfig {
                backend: StorageBackend::default(),
                path: default_storage_path(),
                seed_on_start: false,
            },
            session: SessionConfig {
                cookie_name: default_cookie_name(),
                secure: false,
                path: default_session_path(),
                idle_minutes: default_idle_minutes(),
            },
            auth: AuthConfig {
                jwt_secret: None,
                token_ttl_minutes: default_token_ttl(),
            },
            ui: UiConfig {
                feedback: FeedbackMode::default(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: LogFormat::default(),
            },
        }
    }
}
