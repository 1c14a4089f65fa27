//! Error types for controlplane-ir
//!
//! Two levels of failure exist:
//! - [`ControlPlaneError`] unwinds out of the crate: a corrupt configuration
//!   record, an invalid conversion config, or a match kind no resolver
//!   handles (a target-authoring defect).
//! - [`EntryError`] is confined to a single entry, field or table. It is
//!   turned into a [`Diagnostic`](crate::features::control_plane::Diagnostic)
//!   and processing continues.

use num_bigint::BigUint;
use thiserror::Error;

use crate::config::ConfigError;
use crate::shared::models::{EvalError, Type};

/// Main error type for controlplane-ir operations
#[derive(Debug, Error)]
pub enum ControlPlaneError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON configuration record
    #[error("Malformed configuration record: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML configuration record
    #[error("Malformed configuration record: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No handler in the resolver chain recognizes a declared match kind
    #[error("BUG: no handler for match kind '{match_kind}' of table '{table}'")]
    UnhandledMatchKind { table: String, match_kind: String },

    /// A bit-vector match kind declared on a boolean key
    #[error("match kind '{match_kind}' cannot be applied to boolean key '{field}' of table '{table}'")]
    BooleanKeyMatch {
        table: String,
        field: String,
        match_kind: String,
    },

    /// Evaluation error
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvalError),
}

/// Result type alias for control-plane operations
pub type Result<T> = std::result::Result<T, ControlPlaneError>;

/// Recoverable failure while converting one entry, field or static table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("unknown table id {0}")]
    UnknownTable(u32),

    #[error("table '{table}' has no key field with id {field_id}")]
    UnknownField { table: String, field_id: u32 },

    #[error("entry for table '{table}' matches field id {field_id} more than once")]
    DuplicateField { table: String, field_id: u32 },

    #[error("unknown action id {0}")]
    UnknownActionId(u32),

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("action '{action}' is not an action of table '{table}'")]
    ActionNotInTable { table: String, action: String },

    #[error("action '{action}' has no parameter with id {param_id}")]
    UnknownParam { action: String, param_id: u32 },

    #[error("action '{action}' expects {expected} arguments, got {found}")]
    ArgumentCount {
        action: String,
        expected: usize,
        found: usize,
    },

    #[error("table entry has no action")]
    MissingAction,

    #[error("default-action entry must not carry match fields")]
    DefaultActionWithMatches,

    #[error("match kind '{0}' is not supported")]
    UnsupportedMatchKind(String),

    #[error("field '{field}' is declared as '{declared}' but configured as '{configured}'")]
    MatchKindMismatch {
        field: String,
        declared: String,
        configured: String,
    },

    #[error("match kind '{match_kind}' cannot be applied to field '{field}' of type {ty}")]
    UnsupportedKeyType {
        field: String,
        match_kind: String,
        ty: Type,
    },

    #[error("prefix length {prefix_len} exceeds the {width}-bit width of field '{field}'")]
    InvalidPrefixLength {
        field: String,
        prefix_len: u32,
        width: u32,
    },

    #[error("value {value} does not fit '{name}' of type {ty}")]
    ValueOutOfRange {
        name: String,
        value: BigUint,
        ty: Type,
    },

    #[error("static entry lists {found} keys, table declares {expected}")]
    KeyCountMismatch { expected: usize, found: usize },

    #[error("static key for field '{field}' cannot be matched as '{match_kind}'")]
    StaticKeyMismatch { field: String, match_kind: String },
}
