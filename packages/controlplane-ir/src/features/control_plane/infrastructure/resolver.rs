//! Execution-time match-kind resolver
//!
//! Builds the predicate a table applies to a key field when the interpreter
//! reaches the table. The predicate relates the key's runtime expression to
//! the table's control-plane symbols, so whatever the configuration binds
//! those symbols to decides whether the table hits.
//!
//! Registered target handlers are consulted in order, then the core kinds.
//! A match kind nobody recognizes is an error in the target definition, not
//! in the input.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::match_conversion::{
    MATCH_KIND_EXACT, MATCH_KIND_LPM, MATCH_KIND_RANGE, MATCH_KIND_TERNARY,
};
use crate::errors::{ControlPlaneError, Result};
use crate::features::control_plane::domain::symbols;
use crate::features::control_plane::ports::{MatchContext, TargetMatchHandler};
use crate::shared::models::{Expr, TableDecl};

/// Match kinds whose predicates need bit-vector arithmetic on the key
const BIT_VECTOR_KINDS: &[&str] = &[MATCH_KIND_TERNARY, MATCH_KIND_LPM, MATCH_KIND_RANGE];

/// Match kinds every target supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreMatchKind {
    Exact,
    Ternary,
    Lpm,
}

impl CoreMatchKind {
    pub fn name(&self) -> &'static str {
        match self {
            CoreMatchKind::Exact => MATCH_KIND_EXACT,
            CoreMatchKind::Ternary => MATCH_KIND_TERNARY,
            CoreMatchKind::Lpm => MATCH_KIND_LPM,
        }
    }
}

impl FromStr for CoreMatchKind {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            MATCH_KIND_EXACT => Ok(CoreMatchKind::Exact),
            MATCH_KIND_TERNARY => Ok(CoreMatchKind::Ternary),
            MATCH_KIND_LPM => Ok(CoreMatchKind::Lpm),
            _ => Err(()),
        }
    }
}

impl fmt::Display for CoreMatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Predicate for a core match kind; `None` if `ctx` uses another kind
pub fn compute_core_match(ctx: &MatchContext<'_>) -> Option<Expr> {
    let kind = ctx.match_kind().parse::<CoreMatchKind>().ok()?;
    let field = ctx.field_name();
    let ty = ctx.key_type();
    let key = ctx.key_expr().clone();
    let value = Expr::symbol(symbols::table_key(ctx.table, &field, ty));

    let predicate = match kind {
        CoreMatchKind::Exact => key.eq(value),
        CoreMatchKind::Ternary => {
            let mask = Expr::symbol(symbols::table_ternary_mask(ctx.table, &field, ty));
            key.bit_and(mask.clone()).eq(value.bit_and(mask))
        }
        CoreMatchKind::Lpm => {
            // m = max << (width - prefix)
            let prefix = Expr::symbol(symbols::table_lpm_prefix(ctx.table, &field, ty));
            let mask = Expr::literal(ty, ty.max_value())
                .shl(Expr::constant(ty, ty.width()).sub(prefix));
            key.bit_and(mask.clone()).eq(value.bit_and(mask))
        }
    };
    Some(predicate)
}

/// Chain of target handlers in front of the core match kinds
#[derive(Default)]
pub struct TableMatchResolver {
    handlers: Vec<Box<dyn TargetMatchHandler>>,
}

impl TableMatchResolver {
    /// Resolver for the core match kinds only
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handler(mut self, handler: Box<dyn TargetMatchHandler>) -> Self {
        self.register(handler);
        self
    }

    pub fn register(&mut self, handler: Box<dyn TargetMatchHandler>) {
        debug!(arch = handler.target(), kinds = ?handler.match_kinds(), "registered match handler");
        self.handlers.push(handler);
    }

    /// Whether some handler or the core recognizes `match_kind`
    pub fn supports(&self, match_kind: &str) -> bool {
        match_kind.parse::<CoreMatchKind>().is_ok()
            || self.handlers.iter().any(|h| h.handles(match_kind))
    }

    /// Predicate for one key field.
    ///
    /// # Errors
    /// [`ControlPlaneError::BooleanKeyMatch`] for a ternary, lpm or range
    /// match on a boolean key, and [`ControlPlaneError::UnhandledMatchKind`]
    /// when no handler and no core kind recognizes the field's match kind.
    pub fn compute_match_predicate(&self, ctx: &MatchContext<'_>) -> Result<Expr> {
        if ctx.key_type().is_bool() && BIT_VECTOR_KINDS.contains(&ctx.match_kind()) {
            return Err(ControlPlaneError::BooleanKeyMatch {
                table: ctx.table.to_string(),
                field: ctx.field_name(),
                match_kind: ctx.match_kind().to_string(),
            });
        }
        self.handlers
            .iter()
            .find_map(|handler| handler.compute_target_match(ctx))
            .or_else(|| compute_core_match(ctx))
            .ok_or_else(|| ControlPlaneError::UnhandledMatchKind {
                table: ctx.table.to_string(),
                match_kind: ctx.match_kind().to_string(),
            })
    }

    /// Condition under which `table` hits: the table is active and every key
    /// field matches. `tainted` reports, per key, whether its runtime value
    /// is unknown.
    pub fn compute_hit_condition(
        &self,
        table: &TableDecl,
        tainted: impl Fn(&Expr) -> bool,
    ) -> Result<Expr> {
        let mut parts = vec![Expr::symbol(symbols::table_active(&table.name))];
        for key in &table.keys {
            let ctx = MatchContext::new(&table.name, key).tainted(tainted(&key.expr));
            parts.push(self.compute_match_predicate(&ctx)?);
        }
        Ok(Expr::all(parts))
    }
}

impl fmt::Debug for TableMatchResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let targets: Vec<_> = self.handlers.iter().map(|h| h.target()).collect();
        f.debug_struct("TableMatchResolver")
            .field("handlers", &targets)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::control_plane::targets::{create_resolver, TargetId};
    use crate::shared::models::{KeyElement, Type, Valuation, Value};

    const T: &str = "ingress.route";

    fn key(kind: &str, width: u32) -> KeyElement {
        KeyElement::new(Expr::field("hdr.ipv4.dst", Type::bits(width)), kind).with_name("dst")
    }

    #[test]
    fn test_core_match_kind_parse() {
        assert_eq!("lpm".parse::<CoreMatchKind>(), Ok(CoreMatchKind::Lpm));
        assert!("range".parse::<CoreMatchKind>().is_err());
        assert_eq!(CoreMatchKind::Ternary.to_string(), "ternary");
    }

    #[test]
    fn test_exact_uses_registry_symbol() {
        let key = key("exact", 32);
        let pred = TableMatchResolver::new()
            .compute_match_predicate(&MatchContext::new(T, &key))
            .unwrap();
        assert_eq!(
            pred,
            Expr::field("hdr.ipv4.dst", Type::bits(32))
                .eq(Expr::symbol(symbols::table_key(T, "dst", Type::bits(32))))
        );
    }

    #[test]
    fn test_ternary() {
        let key = key("ternary", 8);
        let pred = TableMatchResolver::new()
            .compute_match_predicate(&MatchContext::new(T, &key))
            .unwrap();
        let env = |k: u32, v: u32, m: u32| {
            Valuation::new()
                .with_field("hdr.ipv4.dst", Value::bits(k))
                .with_symbol(symbols::table_key(T, "dst", Type::bits(8)), Value::bits(v))
                .with_symbol(symbols::table_ternary_mask(T, "dst", Type::bits(8)), Value::bits(m))
        };
        assert_eq!(pred.evaluate_bool(&env(0xAB, 0xA0, 0xF0)), Ok(true));
        assert_eq!(pred.evaluate_bool(&env(0xBB, 0xA0, 0xF0)), Ok(false));
        assert_eq!(pred.evaluate_bool(&env(0xBB, 0x00, 0x00)), Ok(true));
    }

    #[test]
    fn test_lpm_prefix_semantics() {
        let key = key("lpm", 32);
        let pred = TableMatchResolver::new()
            .compute_match_predicate(&MatchContext::new(T, &key))
            .unwrap();
        let ty = Type::bits(32);
        let env = |k: u32, prefix: u32| {
            Valuation::new()
                .with_field("hdr.ipv4.dst", Value::bits(k))
                .with_symbol(symbols::table_key(T, "dst", ty), Value::bits(0x0A00_0000u32))
                .with_symbol(symbols::table_lpm_prefix(T, "dst", ty), Value::bits(prefix))
        };
        assert_eq!(pred.evaluate_bool(&env(0x0A01_0203, 8)), Ok(true));
        assert_eq!(pred.evaluate_bool(&env(0x0B01_0203, 8)), Ok(false));
        assert_eq!(pred.evaluate_bool(&env(0x0A01_0203, 16)), Ok(false));
        assert_eq!(pred.evaluate_bool(&env(0xFFFF_FFFF, 0)), Ok(true));
        assert_eq!(pred.evaluate_bool(&env(0x0A00_0000, 32)), Ok(true));
    }

    #[test]
    fn test_unhandled_kind_is_error() {
        let key = key("selector", 16);
        let err = TableMatchResolver::new()
            .compute_match_predicate(&MatchContext::new(T, &key))
            .unwrap_err();
        assert!(matches!(err, ControlPlaneError::UnhandledMatchKind { .. }));
        assert!(err.to_string().starts_with("BUG:"));
    }

    #[test]
    fn test_boolean_key_kinds() {
        let resolver = create_resolver(TargetId::V1Model);
        let flag = |kind: &str| {
            KeyElement::new(Expr::field("meta.is_local", Type::Bool), kind).with_name("is_local")
        };

        for kind in ["ternary", "lpm", "range"] {
            let key = flag(kind);
            for tainted in [false, true] {
                let err = resolver
                    .compute_match_predicate(&MatchContext::new(T, &key).tainted(tainted))
                    .unwrap_err();
                assert!(matches!(err, ControlPlaneError::BooleanKeyMatch { .. }), "{kind}");
            }
        }

        let env = |k: bool, v: bool| {
            Valuation::new()
                .with_field("meta.is_local", Value::Bool(k))
                .with_symbol(symbols::table_key(T, "is_local", Type::Bool), Value::Bool(v))
        };
        for kind in ["exact", "optional"] {
            let key = flag(kind);
            let pred = resolver
                .compute_match_predicate(&MatchContext::new(T, &key))
                .unwrap();
            assert_eq!(pred.evaluate_bool(&env(true, true)), Ok(true), "{kind}");
            assert_eq!(pred.evaluate_bool(&env(true, false)), Ok(false), "{kind}");
        }
    }

    #[test]
    fn test_hit_condition() {
        let table = TableDecl::new(T).with_key(key("exact", 32));
        let cond = TableMatchResolver::new()
            .compute_hit_condition(&table, |_| false)
            .unwrap();
        let vars = cond.collect_symbols();
        assert!(vars.contains(&symbols::table_active(T)));
        assert!(vars.contains(&symbols::table_key(T, "dst", Type::bits(32))));
    }
}
