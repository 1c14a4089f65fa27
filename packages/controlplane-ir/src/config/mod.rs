//! Conversion configuration
//!
//! Selects the target whose match kinds and static-entry rules apply, whether
//! program-embedded entries seed the constraints, and the encoding of
//! configuration records. Loaded from a versioned YAML file:
//!
//! ```yaml
//! version: 1
//! target: v1model
//! seed_static_entries: true
//! record_format: json
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use controlplane_ir::config::ControlPlaneConfig;
//!
//! let config = ControlPlaneConfig::default().with_target(TargetId::V1Model);
//! let config = ControlPlaneConfig::from_yaml("controlplane.yaml")?;
//! ```

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::features::control_plane::targets::TargetId;

pub use error::{ConfigError, ConfigResult};

/// Supported schema versions
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Encoding of a configuration record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    #[default]
    Json,
    Yaml,
}

impl RecordFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(RecordFormat::Json),
            Some("yaml") | Some("yml") => Ok(RecordFormat::Yaml),
            _ => Err(ConfigError::UnknownRecordFormat(path.display().to_string())),
        }
    }
}

/// Validated conversion configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlPlaneConfig {
    pub target: TargetId,
    pub seed_static_entries: bool,
    pub record_format: RecordFormat,
}

impl Default for ControlPlaneConfig {
    fn default() -> Self {
        Self {
            target: TargetId::Core,
            seed_static_entries: true,
            record_format: RecordFormat::Json,
        }
    }
}

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFileV1 {
    /// Schema version (always 1 for v1)
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<u32>,

    #[serde(default)]
    target: TargetId,

    #[serde(default = "default_seed_static_entries")]
    seed_static_entries: bool,

    #[serde(default)]
    record_format: RecordFormat,
}

fn default_seed_static_entries() -> bool {
    true
}

impl ControlPlaneConfig {
    pub fn with_target(mut self, target: TargetId) -> Self {
        self.target = target;
        self
    }

    pub fn with_static_entries(mut self, seed: bool) -> Self {
        self.seed_static_entries = seed;
        self
    }

    pub fn with_record_format(mut self, format: RecordFormat) -> Self {
        self.record_format = format;
        self
    }

    /// Load from a YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Parse YAML text
    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(text)?;
        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }
        Ok(Self {
            target: file.target,
            seed_static_entries: file.seed_static_entries,
            record_format: file.record_format,
        })
    }

    /// Serialize as YAML schema v1
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(1),
            target: self.target,
            seed_static_entries: self.seed_static_entries,
            record_format: self.record_format,
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}
