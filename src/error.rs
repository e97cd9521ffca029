//! Error hierarchy for epocrs
//!
//! The estimator itself never fails; these errors cover the fallible
//! surroundings: configuration files and logging setup.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all epocrs operations
#[derive(Debug, Error)]
pub enum EpocRsError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Logging initialisation errors
    #[error("Logging error: {0}")]
    Logging(String),
}

/// Configuration file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file does not exist
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    /// Config file could not be parsed
    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// Config could not be serialized
    #[error("Failed to serialize configuration: {reason}")]
    Serialize { reason: String },
}

/// Result type alias for epocrs operations
pub type Result<T> = std::result::Result<T, EpocRsError>;

impl EpocRsError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EpocRsError::Configuration(ConfigError::NotFound { .. }) => ErrorSeverity::Warning,
            EpocRsError::Configuration(_) => ErrorSeverity::Error,
            EpocRsError::Io(_) => ErrorSeverity::Error,
            EpocRsError::Logging(_) => ErrorSeverity::Warning,
        }
    }

    /// Emit this error through `tracing` at its severity level
    pub fn log(&self) {
        let message = self.user_message();
        if self.severity().to_tracing_level() == tracing::Level::ERROR {
            tracing::error!(error = %self, "{}", message);
        } else {
            tracing::warn!(error = %self, "{}", message);
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            EpocRsError::Configuration(ConfigError::NotFound { path }) => {
                format!("No configuration at {}; using defaults.", path.display())
            }
            EpocRsError::Configuration(ConfigError::Parse { path, .. }) => {
                format!(
                    "Configuration file {} is invalid. Please check its TOML syntax.",
                    path.display()
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents the operation
    Error,
    /// Warning that doesn't prevent operation
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
