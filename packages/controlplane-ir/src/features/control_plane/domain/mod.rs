//! Control-plane domain models
//!
//! Symbol registry, constraint model, configuration record entities and
//! diagnostics. No conversion logic lives here.

pub mod constraints;
pub mod diagnostics;
pub mod entity;
pub mod symbols;

pub use constraints::{
    ActionArgument, ActionBinding, ControlPlaneConstraints, ConversionOutcome, ProfileRef,
    TableConfiguration, TableKeySet, TableMatchEntry,
};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use entity::{
    Action, ActionParamValue, ActionProfileGroup, ActionProfileMember, ConfigRecord, Entity,
    FieldMatch, GroupMember, MatchValue, TableAction, TableEntry,
};
