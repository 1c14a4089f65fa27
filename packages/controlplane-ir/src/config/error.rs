//! Configuration error types

use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing version field in YAML
    #[error("Missing 'version' field in configuration file. Add 'version: 1' to the top of your YAML file.")]
    MissingVersion,

    /// Unsupported version
    #[error("Unsupported configuration version {found}. Supported versions: {}", supported.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "))]
    UnsupportedVersion { found: u32, supported: Vec<u32> },

    /// Unknown target name
    #[error("Unknown target '{0}'. Valid targets: core, v1model")]
    UnknownTarget(String),

    /// Record format could not be derived from a file name
    #[error("Cannot infer configuration record format from '{0}'. Use a .json, .yaml or .yml file")]
    UnknownRecordFormat(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;
