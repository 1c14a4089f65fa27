//! Target-independent initializer, used by the `core` target

use crate::errors::EntryError;
use crate::features::control_plane::domain::ActionBinding;
use crate::features::control_plane::infrastructure::{compute_core_static_match, resolve_action_call};
use crate::features::control_plane::ports::ControlPlaneInitializer;
use crate::shared::models::{EntryKey, Expr, KeyElement, Program, TableDecl};

/// `exact`, `ternary` and `lpm` keys; the declared default action only
#[derive(Debug, Clone, Copy, Default)]
pub struct CoreInitializer;

impl ControlPlaneInitializer for CoreInitializer {
    fn target(&self) -> &'static str {
        "core"
    }

    fn compute_match(
        &self,
        _table: &TableDecl,
        key: &KeyElement,
        entry_key: &EntryKey,
    ) -> Result<Option<Expr>, EntryError> {
        compute_core_static_match(key, entry_key)
    }

    fn default_action(
        &self,
        table: &TableDecl,
        program: &Program,
    ) -> Option<Result<ActionBinding, EntryError>> {
        table
            .default_action
            .as_ref()
            .map(|call| resolve_action_call(table, program, call))
    }
}
