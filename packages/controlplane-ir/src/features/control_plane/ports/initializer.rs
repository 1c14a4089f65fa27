//! Static-entry initializer extension point
//!
//! The seeding algorithm itself is fixed (see
//! [`generate_initial_constraints`](crate::features::control_plane::infrastructure::generate_initial_constraints));
//! a target customizes how a single embedded key is matched and which action
//! a table falls back to.

use crate::errors::EntryError;
use crate::features::control_plane::domain::ActionBinding;
use crate::shared::models::{EntryKey, Expr, KeyElement, Program, TableDecl};

pub trait ControlPlaneInitializer: Send + Sync {
    /// Target this initializer belongs to
    fn target(&self) -> &'static str;

    /// Constraint for one embedded key of `table`.
    ///
    /// `Ok(None)` means the key is a wildcard. An error disables the
    /// table's embedded entries.
    fn compute_match(
        &self,
        table: &TableDecl,
        key: &KeyElement,
        entry_key: &EntryKey,
    ) -> Result<Option<Expr>, EntryError>;

    /// Default action of `table`, if it has one
    fn default_action(
        &self,
        table: &TableDecl,
        program: &Program,
    ) -> Option<Result<ActionBinding, EntryError>>;
}
