//! v1model target
//!
//! Adds the `optional`, `selector` and `range` match kinds on top of the core
//! kinds, for both execution-time resolution and embedded entries.

use crate::errors::EntryError;
use crate::features::control_plane::domain::{symbols, ActionBinding};
use crate::features::control_plane::infrastructure::match_conversion::{
    exact_match, range_match, MATCH_KIND_OPTIONAL, MATCH_KIND_RANGE,
};
use crate::features::control_plane::infrastructure::initializer::checked;
use crate::features::control_plane::infrastructure::{compute_core_static_match, resolve_action_call};
use crate::features::control_plane::ports::{ControlPlaneInitializer, MatchContext, TargetMatchHandler};
use crate::shared::models::{EntryKey, Expr, KeyElement, Program, TableDecl};

pub const MATCH_KIND_SELECTOR: &str = "selector";

/// Action v1model tables fall back to when no default is declared
pub const NO_ACTION: &str = "NoAction";

const MATCH_KINDS: &[&str] = &[MATCH_KIND_OPTIONAL, MATCH_KIND_SELECTOR, MATCH_KIND_RANGE];

#[derive(Debug, Clone, Copy, Default)]
pub struct V1ModelMatchHandler;

impl V1ModelMatchHandler {
    pub fn new() -> Self {
        Self
    }

    /// An optional match on a tainted key cannot exclude any path.
    fn optional(ctx: &MatchContext<'_>) -> Expr {
        if ctx.tainted {
            return Expr::bool(true);
        }
        let ty = ctx.key_type();
        ctx.key_expr()
            .clone()
            .eq(Expr::symbol(symbols::table_key(ctx.table, &ctx.field_name(), ty)))
    }

    /// Registers the selector placeholder; not a real filter.
    fn selector(ctx: &MatchContext<'_>) -> Expr {
        let ty = ctx.key_type();
        ctx.key_expr()
            .clone()
            .eq(Expr::symbol(symbols::table_selector_key(ctx.table, &ctx.field_name(), ty)))
    }

    /// `low < high && low <= key && key <= high`. A tainted key degrades to
    /// the full interval with the key replaced by the lower bound.
    fn range(ctx: &MatchContext<'_>) -> Expr {
        let ty = ctx.key_type();
        let (low, high, key) = if ctx.tainted {
            let low = Expr::literal(ty, Default::default());
            let high = Expr::literal(ty, ty.max_value());
            (low.clone(), high, low)
        } else {
            let (low, high) = symbols::table_range(ctx.table, &ctx.field_name(), ty);
            (Expr::symbol(low), Expr::symbol(high), ctx.key_expr().clone())
        };
        low.clone()
            .lt(high.clone())
            .and(low.le(key.clone()))
            .and(key.le(high))
    }
}

impl TargetMatchHandler for V1ModelMatchHandler {
    fn target(&self) -> &'static str {
        "v1model"
    }

    fn match_kinds(&self) -> &[&'static str] {
        MATCH_KINDS
    }

    fn compute_target_match(&self, ctx: &MatchContext<'_>) -> Option<Expr> {
        match ctx.match_kind() {
            MATCH_KIND_OPTIONAL => Some(Self::optional(ctx)),
            MATCH_KIND_SELECTOR => Some(Self::selector(ctx)),
            MATCH_KIND_RANGE => Some(Self::range(ctx)),
            _ => None,
        }
    }
}

/// Embedded entries with `range` and `optional` keys; tables listing
/// `NoAction` default to it
#[derive(Debug, Clone, Copy, Default)]
pub struct V1ModelInitializer;

impl ControlPlaneInitializer for V1ModelInitializer {
    fn target(&self) -> &'static str {
        "v1model"
    }

    fn compute_match(
        &self,
        _table: &TableDecl,
        key: &KeyElement,
        entry_key: &EntryKey,
    ) -> Result<Option<Expr>, EntryError> {
        let ty = key.ty();
        let field = key.field_name();
        let mismatch = || EntryError::StaticKeyMismatch {
            field: field.clone(),
            match_kind: key.match_kind.clone(),
        };

        match (key.match_kind.as_str(), entry_key) {
            (MATCH_KIND_RANGE | MATCH_KIND_OPTIONAL, EntryKey::DontCare) => Ok(None),
            (MATCH_KIND_RANGE, _) if ty.is_bool() => Err(mismatch()),
            (MATCH_KIND_RANGE, EntryKey::Range { low, high }) => {
                let low = checked(&field, ty, low)?.clone();
                let high = checked(&field, ty, high)?.clone();
                Ok(Some(range_match(&key.expr, ty, low, high)))
            }
            (MATCH_KIND_RANGE, EntryKey::Value(value)) => {
                let value = checked(&field, ty, value)?;
                Ok(Some(range_match(&key.expr, ty, value.clone(), value.clone())))
            }
            (MATCH_KIND_OPTIONAL, EntryKey::Value(value)) => {
                Ok(Some(exact_match(&key.expr, ty, checked(&field, ty, value)?.clone())))
            }
            (MATCH_KIND_RANGE | MATCH_KIND_OPTIONAL, _) => Err(mismatch()),
            _ => compute_core_static_match(key, entry_key),
        }
    }

    fn default_action(
        &self,
        table: &TableDecl,
        program: &Program,
    ) -> Option<Result<ActionBinding, EntryError>> {
        if let Some(call) = &table.default_action {
            return Some(resolve_action_call(table, program, call));
        }
        table
            .action_ordinal(NO_ACTION)
            .map(|ordinal| Ok(ActionBinding::direct(NO_ACTION, ordinal, Vec::new())))
    }
}
