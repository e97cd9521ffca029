use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::epoc::EpocParams;
use crate::error::{ConfigError, EpocRsError, Result};
use crate::logging::LogConfig;
use crate::session::AthleteSettings;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpocConfig {
    /// Configuration metadata
    pub metadata: ConfigMetadata,

    /// EPOC model hyperparameters
    pub model: EpocParams,

    /// Athlete calibration settings
    pub athlete: AthleteSettings,

    /// Logging settings
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Default for ConfigMetadata {
    fn default() -> Self {
        let now = Utc::now();
        ConfigMetadata {
            version: "1.0".to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for EpocConfig {
    fn default() -> Self {
        EpocConfig {
            metadata: ConfigMetadata::default(),
            model: EpocParams::default(),
            athlete: AthleteSettings::default(),
            logging: LogConfig::default(),
        }
    }
}

impl EpocConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = fs::read_to_string(path)?;
        let config: EpocConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        tracing::debug!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_content = toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            reason: e.to_string(),
        })?;

        fs::write(&path, toml_content)?;
        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".epocrs")
            .join("config.toml")
    }

    /// Load configuration, falling back to defaults
    ///
    /// The load error is handed back instead of logged so callers can report
    /// it once their subscriber is installed.
    pub fn load_with_fallback(path: Option<&Path>) -> (Self, Option<EpocRsError>) {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        match Self::load_from_file(&config_path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load configuration with fallback to defaults, logging any load error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let (config, error) = Self::load_with_fallback(path);
        if let Some(e) = error {
            e.log();
        }
        config
    }
}
