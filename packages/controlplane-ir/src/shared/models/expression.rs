//! Expression IR for control-plane constraints
//!
//! Boolean and bit-vector expressions over program fields and symbolic
//! variables. The analyzer's expression language is much richer; this is the
//! subset that control-plane constraints and match predicates are built from.
//!
//! Expressions are immutable trees. Builders consume their operands:
//!
//! ```text
//! let key = Expr::field("hdr.ipv4.dst", Type::bits(32));
//! let pred = key.bit_and(Expr::constant(Type::bits(32), 0xFF00_0000u32))
//!     .eq(Expr::constant(Type::bits(32), 0x0A00_0000u32));
//! // (hdr.ipv4.dst & 32w4278190080) == 32w167772160
//! ```

use num_bigint::BigUint;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use super::types::Type;

/// A named unknown whose value is decided by the control plane (or is
/// otherwise undetermined).
///
/// Identity is the pair (name, type): two variables with equal name and type
/// are interchangeable no matter where they were created. Variables are only
/// created through the canonical constructors in
/// [`crate::features::control_plane::domain::symbols`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SymbolicVariable {
    name: String,
    ty: Type,
}

impl SymbolicVariable {
    pub(crate) fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> Type {
        self.ty
    }
}

impl fmt::Display for SymbolicVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|{}|", self.name)
    }
}

/// Ordered set of symbolic variables
pub type SymbolSet = BTreeSet<SymbolicVariable>;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOp {
    /// `==`
    Eq,
    /// `!=`
    Neq,
    /// `<` (unsigned)
    Lt,
    /// `<=` (unsigned)
    Le,
    /// `&` (bitwise)
    BitAnd,
    /// `<<` (bits shifted out are dropped)
    Shl,
    /// `-` (wraps modulo 2^width)
    Sub,
    /// `&&`
    And,
    /// `||`
    Or,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::BitAnd => "&",
            BinaryOp::Shl => "<<",
            BinaryOp::Sub => "-",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    /// Whether the result is boolean regardless of operand types
    pub fn is_predicate(&self) -> bool {
        !matches!(self, BinaryOp::BitAnd | BinaryOp::Shl | BinaryOp::Sub)
    }
}

/// Expression tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Expr {
    /// Boolean literal
    Bool(bool),

    /// Typed unsigned constant
    Constant { ty: Type, value: BigUint },

    /// Reference to a symbolic variable
    Symbol(SymbolicVariable),

    /// Runtime program value, e.g. a header field used as a table key
    Field { path: String, ty: Type },

    /// Logical negation
    Not(Box<Expr>),

    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    pub fn bool(value: bool) -> Self {
        Expr::Bool(value)
    }

    pub fn constant(ty: Type, value: impl Into<BigUint>) -> Self {
        Expr::Constant {
            ty,
            value: value.into(),
        }
    }

    /// Literal of type `ty`; booleans are true for any non-zero value
    pub fn literal(ty: Type, value: BigUint) -> Self {
        match ty {
            Type::Bool => Expr::Bool(value != BigUint::default()),
            Type::Bits { .. } => Expr::Constant { ty, value },
        }
    }

    pub fn field(path: impl Into<String>, ty: Type) -> Self {
        Expr::Field {
            path: path.into(),
            ty,
        }
    }

    pub fn symbol(var: SymbolicVariable) -> Self {
        Expr::Symbol(var)
    }

    fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn eq(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Eq, self, rhs)
    }

    pub fn neq(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Neq, self, rhs)
    }

    pub fn lt(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Lt, self, rhs)
    }

    pub fn le(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Le, self, rhs)
    }

    pub fn bit_and(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::BitAnd, self, rhs)
    }

    pub fn shl(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Shl, self, rhs)
    }

    pub fn sub(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Sub, self, rhs)
    }

    pub fn and(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::And, self, rhs)
    }

    pub fn or(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Or, self, rhs)
    }

    pub fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }

    /// `!self || rhs`
    pub fn implies(self, rhs: Expr) -> Self {
        self.not().or(rhs)
    }

    /// Left-nested conjunction; `true` when empty
    pub fn all(exprs: impl IntoIterator<Item = Expr>) -> Self {
        exprs
            .into_iter()
            .reduce(|acc, e| acc.and(e))
            .unwrap_or(Expr::Bool(true))
    }

    /// Left-nested disjunction; `false` when empty
    pub fn any(exprs: impl IntoIterator<Item = Expr>) -> Self {
        exprs
            .into_iter()
            .reduce(|acc, e| acc.or(e))
            .unwrap_or(Expr::Bool(false))
    }

    /// Static type of the expression
    pub fn ty(&self) -> Type {
        match self {
            Expr::Bool(_) | Expr::Not(_) => Type::Bool,
            Expr::Constant { ty, .. } | Expr::Field { ty, .. } => *ty,
            Expr::Symbol(var) => var.ty(),
            Expr::Binary { op, lhs, .. } => {
                if op.is_predicate() {
                    Type::Bool
                } else {
                    lhs.ty()
                }
            }
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Expr::Bool(true))
    }

    /// Collect every symbolic variable referenced by this expression
    pub fn collect_symbols(&self) -> SymbolSet {
        let mut symbols = SymbolSet::new();
        self.collect_symbols_into(&mut symbols);
        symbols
    }

    pub(crate) fn collect_symbols_into(&self, symbols: &mut SymbolSet) {
        match self {
            Expr::Symbol(var) => {
                symbols.insert(var.clone());
            }
            Expr::Not(inner) => inner.collect_symbols_into(symbols),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_symbols_into(symbols);
                rhs.collect_symbols_into(symbols);
            }
            Expr::Bool(_) | Expr::Constant { .. } | Expr::Field { .. } => {}
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Bool(b) => write!(f, "{}", b),
            Expr::Constant { ty, value } => match ty {
                Type::Bool => write!(f, "{}", value),
                Type::Bits { width } => write!(f, "{}w{}", width, value),
            },
            Expr::Symbol(var) => write!(f, "{}", var),
            Expr::Field { path, .. } => write!(f, "{}", path),
            Expr::Not(inner) => write!(f, "!({})", inner),
            Expr::Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let key = Expr::field("hdr.eth.type", Type::bits(16));
        let pred = key.eq(Expr::constant(Type::bits(16), 0x0800u32));
        assert_eq!(pred.to_string(), "(hdr.eth.type == 16w2048)");

        let sym = SymbolicVariable::new("t.active", Type::Bool);
        assert_eq!(Expr::symbol(sym).not().to_string(), "!(|t.active|)");
    }

    #[test]
    fn test_all_and_any_empty() {
        assert_eq!(Expr::all(Vec::new()), Expr::Bool(true));
        assert_eq!(Expr::any(Vec::new()), Expr::Bool(false));
    }

    #[test]
    fn test_all_single_is_unwrapped() {
        let e = Expr::field("x", Type::Bool);
        assert_eq!(Expr::all(vec![e.clone()]), e);
    }

    #[test]
    fn test_types() {
        let a = Expr::field("a", Type::bits(8));
        let b = Expr::constant(Type::bits(8), 3u32);
        assert_eq!(a.clone().bit_and(b.clone()).ty(), Type::bits(8));
        assert_eq!(a.le(b).ty(), Type::Bool);
    }

    #[test]
    fn test_symbol_identity_is_name_and_type() {
        let a = SymbolicVariable::new("t.key.f", Type::bits(8));
        let b = SymbolicVariable::new(String::from("t.key.f"), Type::bits(8));
        let c = SymbolicVariable::new("t.key.f", Type::bits(16));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_collect_symbols() {
        let a = SymbolicVariable::new("a", Type::bits(8));
        let b = SymbolicVariable::new("b", Type::Bool);
        let e = Expr::symbol(a.clone())
            .eq(Expr::field("f", Type::bits(8)))
            .and(Expr::symbol(b.clone()))
            .and(Expr::symbol(a.clone()).le(Expr::constant(Type::bits(8), 1u32)));

        let symbols: Vec<_> = e.collect_symbols().into_iter().collect();
        assert_eq!(symbols, vec![a, b]);
    }
}
