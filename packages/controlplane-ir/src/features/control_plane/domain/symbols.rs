//! Canonical symbolic variables for control-plane state
//!
//! Every unknown a table can introduce has exactly one name. The static-entry
//! initializer, the configuration deserializer and the execution-time match
//! resolver each build references independently; they agree because they all
//! go through these functions.
//!
//! | unknown | name |
//! |---|---|
//! | table active flag | `<table>.active` |
//! | match key | `<table>.key.<field>` |
//! | ternary mask | `<table>.key.<field>.mask` |
//! | LPM prefix length | `<table>.key.<field>.lpm_prefix` |
//! | action argument | `<table>.action.<action>.<param>` |
//! | action choice | `<table>.action_choice` |
//! | range bounds | `<table>.key.<field>.range_low` / `.range_high` |
//! | selector key | `<table>.selector.<field>` |

use crate::shared::models::{SymbolicVariable, Type};

/// Width of the action-choice variable
pub const ACTION_CHOICE_WIDTH: u32 = 32;

/// Action-choice value bound when an entry points into an action profile
/// instead of naming an action.
pub const ACTION_PROFILE_MARKER: u32 = u32::MAX;

pub fn action_choice_type() -> Type {
    Type::bits(ACTION_CHOICE_WIDTH)
}

/// Whether `table` is configured by the control plane
pub fn table_active(table: &str) -> SymbolicVariable {
    SymbolicVariable::new(format!("{}.active", table), Type::Bool)
}

/// Value a key field is matched against
pub fn table_key(table: &str, field: &str, ty: Type) -> SymbolicVariable {
    SymbolicVariable::new(format!("{}.key.{}", table, field), ty)
}

pub fn table_ternary_mask(table: &str, field: &str, ty: Type) -> SymbolicVariable {
    SymbolicVariable::new(format!("{}.key.{}.mask", table, field), ty)
}

pub fn table_lpm_prefix(table: &str, field: &str, ty: Type) -> SymbolicVariable {
    SymbolicVariable::new(format!("{}.key.{}.lpm_prefix", table, field), ty)
}

/// Argument `param` of `action` when invoked by `table`
pub fn table_action_arg(table: &str, action: &str, param: &str, ty: Type) -> SymbolicVariable {
    SymbolicVariable::new(format!("{}.action.{}.{}", table, action, param), ty)
}

/// Which action `table` invokes
pub fn table_action_choice(table: &str) -> SymbolicVariable {
    SymbolicVariable::new(format!("{}.action_choice", table), action_choice_type())
}

// Target extras

/// Lower and upper bound of a range-matched key
pub fn table_range(table: &str, field: &str, ty: Type) -> (SymbolicVariable, SymbolicVariable) {
    (
        SymbolicVariable::new(format!("{}.key.{}.range_low", table, field), ty),
        SymbolicVariable::new(format!("{}.key.{}.range_high", table, field), ty),
    )
}

/// Placeholder for an action-selector key
pub fn table_selector_key(table: &str, field: &str, ty: Type) -> SymbolicVariable {
    SymbolicVariable::new(format!("{}.selector.{}", table, field), ty)
}
