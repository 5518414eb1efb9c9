//! Error types for configuration loading and run resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal configuration errors. Any of these stops a run before sampling.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration document does not exist.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigurationMissing(PathBuf),

    /// The configuration document exists but could not be read.
    #[error("Failed to read configuration file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid YAML for [`crate::Config`].
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// No usable profile: none loaded, unknown name, or a required field is missing.
    #[error("Invalid profile: {0}")]
    ProfileInvalid(String),

    /// No non-zero URL count was given on the command line or in the defaults.
    #[error("No URL count given and no default count configured")]
    CountMissing,
}

impl ConfigError {
    pub(crate) fn profile(msg: impl Into<String>) -> Self {
        ConfigError::ProfileInvalid(msg.into())
    }
}
