//! Execution-time match-kind extension point
//!
//! A target adds match kinds by registering a [`TargetMatchHandler`] with the
//! resolver. Handlers are consulted before the core kinds; a handler returns
//! `None` for kinds it does not recognize.

use crate::shared::models::{Expr, KeyElement, Type};

/// Key field being matched during execution
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    pub table: &'a str,
    pub key: &'a KeyElement,
    /// The analyzer cannot determine the key's runtime value here
    pub tainted: bool,
}

impl<'a> MatchContext<'a> {
    pub fn new(table: &'a str, key: &'a KeyElement) -> Self {
        Self {
            table,
            key,
            tainted: false,
        }
    }

    pub fn tainted(mut self, tainted: bool) -> Self {
        self.tainted = tainted;
        self
    }

    pub fn match_kind(&self) -> &str {
        &self.key.match_kind
    }

    pub fn field_name(&self) -> String {
        self.key.field_name()
    }

    pub fn key_expr(&self) -> &Expr {
        &self.key.expr
    }

    pub fn key_type(&self) -> Type {
        self.key.ty()
    }
}

/// Target-specific match kinds
pub trait TargetMatchHandler: Send + Sync {
    /// Target this handler belongs to
    fn target(&self) -> &'static str;

    /// Match kinds this handler recognizes
    fn match_kinds(&self) -> &[&'static str];

    /// Predicate for `ctx`, or `None` to defer to the next handler
    fn compute_target_match(&self, ctx: &MatchContext<'_>) -> Option<Expr>;

    fn handles(&self, match_kind: &str) -> bool {
        self.match_kinds().contains(&match_kind)
    }
}
