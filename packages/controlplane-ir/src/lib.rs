/*
 * Controlplane IR - control-plane constraints for symbolic data-plane analysis
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (Type, Expr, declarations, id map)
 * - features/    : Vertical slices (control_plane)
 * - config/      : Versioned YAML configuration
 * - errors       : Crate-wide error types
 *
 * Pipeline:
 * - static entries → constraints (per-target initializer)
 * - configuration record → constraints (deserializer)
 * - key field → match predicate (per-target resolver chain)
 */

// Crate-level lint configuration
#![allow(clippy::should_implement_trait)] // Expr::not/eq/sub builders
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models
pub mod shared;

/// Feature modules
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{ControlPlaneConfig, RecordFormat};
pub use errors::{ControlPlaneError, EntryError, Result};
pub use features::control_plane::{
    ControlPlaneConstraints, ControlPlaneUseCase, ControlPlaneUseCaseImpl, ConversionOutcome,
    Diagnostic, DiagnosticKind, TableMatchResolver, TargetId,
};
pub use shared::models::{Expr, IdToDeclMap, Program, SymbolicVariable, Type};
