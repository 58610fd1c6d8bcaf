//! Configuration module

mod settings;

pub use settings::{
    AuthConfig, FeedbackMode, LogFormat, LoggingConfig, ServerConfig, SessionConfig, Settings,
    StorageBackend, StorageConfig, UiConfig, MAX_LIFETIME_MINUTES,
};
