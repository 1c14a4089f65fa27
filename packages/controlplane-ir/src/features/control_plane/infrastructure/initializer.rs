//! Static-entry initializer
//!
//! Seeds constraints from entries embedded in the program. Keys and actions
//! are encoded with the same helpers the configuration deserializer uses, so
//! a static entry and an equivalent configured entry produce the same key set.
//!
//! A table whose embedded entries do not fit its key declaration is disabled
//! as a whole; the rest of the program is still seeded.

use num_bigint::BigUint;
use tracing::{debug, info};

use super::match_conversion::{
    exact_match, lpm_match, mask_prefix_len, ternary_match, MATCH_KIND_EXACT, MATCH_KIND_LPM,
    MATCH_KIND_TERNARY,
};
use crate::errors::EntryError;
use crate::features::control_plane::domain::{
    ActionArgument, ActionBinding, ControlPlaneConstraints, ConversionOutcome, Diagnostic,
    DiagnosticKind, Diagnostics, TableKeySet, TableMatchEntry,
};
use crate::features::control_plane::ports::ControlPlaneInitializer;
use crate::shared::models::{ActionCall, EntryKey, Expr, KeyElement, Program, TableDecl, Type};

/// Seed constraints for every table of `program`
pub fn generate_initial_constraints(
    initializer: &dyn ControlPlaneInitializer,
    program: &Program,
) -> ConversionOutcome {
    let mut constraints = ControlPlaneConstraints::new();
    let mut diagnostics = Diagnostics::new();

    for table in &program.tables {
        if let Some(default) = initializer.default_action(table, program) {
            match default {
                Ok(action) => constraints.set_default_action(&table.name, action),
                Err(err) => diagnostics.push(Diagnostic::from_entry_error(Some(&table.name), &err)),
            }
        }

        let Some(entries) = &table.entries else {
            continue;
        };
        match static_entries(initializer, table, program) {
            Ok(converted) => {
                debug!(table = %table.name, entries = entries.len(), "seeded static entries");
                for entry in converted {
                    constraints.add_match_entry(&table.name, entry);
                }
            }
            Err(err) => {
                constraints.disable_table(&table.name);
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::StaticEntryMismatch,
                    Some(&table.name),
                    format!("static entries disabled: {}", err),
                ));
            }
        }
    }

    info!(
        arch = initializer.target(),
        tables = constraints.len(),
        diagnostics = diagnostics.len(),
        "generated initial control-plane constraints"
    );
    ConversionOutcome::new(constraints, diagnostics)
}

fn static_entries(
    initializer: &dyn ControlPlaneInitializer,
    table: &TableDecl,
    program: &Program,
) -> Result<Vec<TableMatchEntry>, EntryError> {
    let entries = table.entries.as_deref().unwrap_or_default();
    let mut converted = Vec::with_capacity(entries.len());

    for entry in entries {
        if entry.keys.len() != table.keys.len() {
            return Err(EntryError::KeyCountMismatch {
                expected: table.keys.len(),
                found: entry.keys.len(),
            });
        }
        let mut key_set = TableKeySet::new();
        for (key, entry_key) in table.keys.iter().zip(&entry.keys) {
            if let Some(predicate) = initializer.compute_match(table, key, entry_key)? {
                key_set.insert(key.field_name(), predicate);
            }
        }
        let action = resolve_action_call(table, program, &entry.action)?;
        converted.push(TableMatchEntry::new(key_set, action));
    }
    Ok(converted)
}

/// Bind a program-level action call to `table`'s action list
pub fn resolve_action_call(
    table: &TableDecl,
    program: &Program,
    call: &ActionCall,
) -> Result<ActionBinding, EntryError> {
    let decl = program
        .action(&call.action)
        .ok_or_else(|| EntryError::UnknownAction(call.action.clone()))?;
    let ordinal = table
        .action_ordinal(&decl.name)
        .ok_or_else(|| EntryError::ActionNotInTable {
            table: table.name.clone(),
            action: decl.name.clone(),
        })?;
    if call.args.len() != decl.params.len() {
        return Err(EntryError::ArgumentCount {
            action: decl.name.clone(),
            expected: decl.params.len(),
            found: call.args.len(),
        });
    }

    let mut arguments = Vec::with_capacity(call.args.len());
    for (param, value) in decl.params.iter().zip(&call.args) {
        checked(&param.name, param.ty, value)?;
        arguments.push(ActionArgument::new(param.name.clone(), param.ty, value.clone()));
    }
    Ok(ActionBinding::direct(decl.name.clone(), ordinal, arguments))
}

/// Embedded key matching for `exact`, `ternary` and `lpm` keys.
///
/// A plain value on a ternary key matches all bits; a masked value on an LPM
/// key must use a contiguous prefix mask.
pub fn compute_core_static_match(
    key: &KeyElement,
    entry_key: &EntryKey,
) -> Result<Option<Expr>, EntryError> {
    let ty = key.ty();
    let field = key.field_name();
    let mismatch = || EntryError::StaticKeyMismatch {
        field: field.clone(),
        match_kind: key.match_kind.clone(),
    };

    if let EntryKey::DontCare = entry_key {
        return Ok(None);
    }

    let predicate = match (key.match_kind.as_str(), entry_key) {
        (MATCH_KIND_EXACT, EntryKey::Value(value)) => {
            exact_match(&key.expr, ty, checked(&field, ty, value)?.clone())
        }
        (MATCH_KIND_TERNARY, EntryKey::Value(value)) if !ty.is_bool() => {
            ternary_match(&key.expr, ty, checked(&field, ty, value)?.clone(), ty.max_value())
        }
        (MATCH_KIND_TERNARY, EntryKey::Mask { value, mask }) if !ty.is_bool() => ternary_match(
            &key.expr,
            ty,
            checked(&field, ty, value)?.clone(),
            checked(&field, ty, mask)?.clone(),
        ),
        (MATCH_KIND_LPM, EntryKey::Value(value)) if !ty.is_bool() => {
            lpm_match(&key.expr, ty, checked(&field, ty, value)?.clone(), ty.width())
        }
        (MATCH_KIND_LPM, EntryKey::Mask { value, mask }) if !ty.is_bool() => {
            let prefix_len = mask_prefix_len(ty.width(), mask).ok_or_else(mismatch)?;
            lpm_match(&key.expr, ty, checked(&field, ty, value)?.clone(), prefix_len)
        }
        _ => return Err(mismatch()),
    };
    Ok(Some(predicate))
}

pub(crate) fn checked<'v>(
    name: &str,
    ty: Type,
    value: &'v BigUint,
) -> Result<&'v BigUint, EntryError> {
    if ty.fits(value) {
        Ok(value)
    } else {
        Err(EntryError::ValueOutOfRange {
            name: name.to_string(),
            value: value.clone(),
            ty,
        })
    }
}
