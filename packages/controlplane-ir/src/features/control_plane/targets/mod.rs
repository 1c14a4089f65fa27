//! Target plugins
//!
//! Each target contributes a static-entry initializer and, if it defines its
//! own match kinds, a match handler for the resolver chain.

pub mod base;
pub mod v1model;

pub use base::CoreInitializer;
pub use v1model::{V1ModelInitializer, V1ModelMatchHandler};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;
use crate::features::control_plane::infrastructure::TableMatchResolver;
use crate::features::control_plane::ports::ControlPlaneInitializer;

/// Supported targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetId {
    /// Core match kinds only
    #[default]
    Core,
    V1Model,
}

impl TargetId {
    pub fn name(&self) -> &'static str {
        match self {
            TargetId::Core => "core",
            TargetId::V1Model => "v1model",
        }
    }
}

impl FromStr for TargetId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "core" => Ok(TargetId::Core),
            "v1model" => Ok(TargetId::V1Model),
            _ => Err(ConfigError::UnknownTarget(s.to_string())),
        }
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolver with `target`'s match handlers registered
pub fn create_resolver(target: TargetId) -> TableMatchResolver {
    match target {
        TargetId::Core => TableMatchResolver::new(),
        TargetId::V1Model => {
            TableMatchResolver::new().with_handler(Box::new(V1ModelMatchHandler::new()))
        }
    }
}

/// Static-entry initializer for `target`
pub fn create_initializer(target: TargetId) -> Box<dyn ControlPlaneInitializer> {
    match target {
        TargetId::Core => Box::new(CoreInitializer),
        TargetId::V1Model => Box::new(V1ModelInitializer),
    }
}
