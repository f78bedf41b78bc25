use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for the form layer.
///
/// These settings tune the account rules applied by the driver creation
/// form. The license-number rule is fixed and not configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The maximum number of characters in a username.
    username_max_length: usize,

    /// The minimum number of characters in a password.
    min_password_length: usize,

    /// Whether passwords made up entirely of digits are accepted.
    pub allow_numeric_passwords: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username_max_length: default_username_max_length(),
            min_password_length: default_min_password_length(),
            allow_numeric_passwords: false,
        }
    }
}

/// Errors that can occur while loading or saving a [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file content is not a valid configuration.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the maximum number of characters in a username.
    #[must_use]
    pub const fn username_max_length(&self) -> usize {
        self.username_max_length
    }

    /// Returns the minimum number of characters in a password.
    #[must_use]
    pub const fn min_password_length(&self) -> usize {
        self.min_password_length
    }

    /// Sets the minimum password length.
    pub const fn set_min_password_length(&mut self, value: usize) {
        self.min_password_length = value;
    }
}

const fn default_username_max_length() -> usize {
    150
}

const fn default_min_password_length() -> usize {
    8
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_username_max_length")]
        username_max_length: usize,

        #[serde(default = "default_min_password_length")]
        min_password_length: usize,

        #[serde(default)]
        allow_numeric_passwords: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                username_max_length,
                min_password_length,
                allow_numeric_passwords,
            } => Self {
                username_max_length,
                min_password_length,
                allow_numeric_passwords,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            username_max_length: config.username_max_length,
            min_password_length: config.min_password_length,
            allow_numeric_passwords: config.allow_numeric_passwords,
        }
    }
}
