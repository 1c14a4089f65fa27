//! Concrete evaluation of expressions
//!
//! Evaluates an [`Expr`] under a full assignment of fields and symbolic
//! variables. This is how a single concrete control-plane configuration is
//! checked against generated constraints without a solver.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use std::collections::HashMap;
use thiserror::Error;

use super::expression::{BinaryOp, Expr, SymbolicVariable};
use super::types::Type;

/// Concrete value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Bits(BigUint),
}

impl Value {
    pub fn bits(value: impl Into<BigUint>) -> Self {
        Value::Bits(value.into())
    }
}

/// Evaluation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("no value bound for field '{0}'")]
    UnboundField(String),

    #[error("no value bound for symbolic variable '{0}'")]
    UnboundSymbol(String),

    #[error("operator '{op}' expects {expected} operands")]
    TypeMismatch { op: &'static str, expected: &'static str },
}

/// Assignment of values to fields and symbolic variables
#[derive(Debug, Clone, Default)]
pub struct Valuation {
    fields: HashMap<String, Value>,
    symbols: HashMap<SymbolicVariable, Value>,
}

impl Valuation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, path: impl Into<String>, value: Value) -> Self {
        self.set_field(path, value);
        self
    }

    pub fn with_symbol(mut self, var: SymbolicVariable, value: Value) -> Self {
        self.set_symbol(var, value);
        self
    }

    pub fn set_field(&mut self, path: impl Into<String>, value: Value) {
        self.fields.insert(path.into(), value);
    }

    pub fn set_symbol(&mut self, var: SymbolicVariable, value: Value) {
        self.symbols.insert(var, value);
    }
}

impl Expr {
    /// Evaluate under `env`.
    ///
    /// Bit-vector results are reduced modulo `2^width` of the left operand's
    /// type. `&&` and `||` short-circuit, so unbound names on the untaken side
    /// are not reported.
    pub fn evaluate(&self, env: &Valuation) -> Result<Value, EvalError> {
        match self {
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Constant { value, .. } => Ok(Value::Bits(value.clone())),
            Expr::Field { path, .. } => env
                .fields
                .get(path)
                .cloned()
                .ok_or_else(|| EvalError::UnboundField(path.clone())),
            Expr::Symbol(var) => env
                .symbols
                .get(var)
                .cloned()
                .ok_or_else(|| EvalError::UnboundSymbol(var.name().to_string())),
            Expr::Not(inner) => Ok(Value::Bool(!inner.evaluate_bool(env)?)),
            Expr::Binary { op, lhs, rhs } => match op {
                BinaryOp::And => Ok(Value::Bool(
                    lhs.evaluate_bool(env)? && rhs.evaluate_bool(env)?,
                )),
                BinaryOp::Or => Ok(Value::Bool(
                    lhs.evaluate_bool(env)? || rhs.evaluate_bool(env)?,
                )),
                BinaryOp::Eq | BinaryOp::Neq => {
                    let equal = lhs.evaluate(env)? == rhs.evaluate(env)?;
                    Ok(Value::Bool(equal == (*op == BinaryOp::Eq)))
                }
                BinaryOp::Lt | BinaryOp::Le => {
                    let (a, b) = bits_operands(*op, lhs, rhs, env)?;
                    Ok(Value::Bool(if *op == BinaryOp::Lt { a < b } else { a <= b }))
                }
                BinaryOp::BitAnd => {
                    let (a, b) = bits_operands(*op, lhs, rhs, env)?;
                    Ok(Value::Bits(a & b))
                }
                BinaryOp::Shl => {
                    let (a, b) = bits_operands(*op, lhs, rhs, env)?;
                    Ok(Value::Bits(shift_left(a, b, lhs.ty())))
                }
                BinaryOp::Sub => {
                    let (a, b) = bits_operands(*op, lhs, rhs, env)?;
                    Ok(Value::Bits(wrapping_sub(a, b, lhs.ty())))
                }
            },
        }
    }

    /// Evaluate a boolean expression
    pub fn evaluate_bool(&self, env: &Valuation) -> Result<bool, EvalError> {
        match self.evaluate(env)? {
            Value::Bool(b) => Ok(b),
            Value::Bits(_) => Err(EvalError::TypeMismatch {
                op: "bool",
                expected: "boolean",
            }),
        }
    }
}

fn bits_operands(
    op: BinaryOp,
    lhs: &Expr,
    rhs: &Expr,
    env: &Valuation,
) -> Result<(BigUint, BigUint), EvalError> {
    match (lhs.evaluate(env)?, rhs.evaluate(env)?) {
        (Value::Bits(a), Value::Bits(b)) => Ok((a, b)),
        _ => Err(EvalError::TypeMismatch {
            op: op.symbol(),
            expected: "bit-vector",
        }),
    }
}

/// Bits shifted past the width are dropped
fn shift_left(a: BigUint, shift: BigUint, ty: Type) -> BigUint {
    match shift.to_usize() {
        Some(shift) if shift < ty.width() as usize => (a << shift) & ty.max_value(),
        _ => BigUint::zero(),
    }
}

fn wrapping_sub(a: BigUint, b: BigUint, ty: Type) -> BigUint {
    let modulus = ty.max_value() + 1u32;
    let a = a % &modulus;
    let b = b % &modulus;
    (a + &modulus - b) % modulus
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c8(v: u32) -> Expr {
        Expr::constant(Type::bits(8), v)
    }

    #[test]
    fn test_field_and_constant() {
        let env = Valuation::new().with_field("f", Value::bits(15u32));
        let e = c8(10).le(Expr::field("f", Type::bits(8)));
        assert_eq!(e.evaluate_bool(&env), Ok(true));
    }

    #[test]
    fn test_unbound_field() {
        let e = Expr::field("missing", Type::bits(8)).eq(c8(1));
        assert_eq!(
            e.evaluate(&Valuation::new()),
            Err(EvalError::UnboundField("missing".to_string()))
        );
    }

    #[test]
    fn test_short_circuit() {
        let e = Expr::bool(false).and(Expr::field("missing", Type::Bool));
        assert_eq!(e.evaluate_bool(&Valuation::new()), Ok(false));
    }

    #[test]
    fn test_shl_drops_overflow() {
        let e = c8(0xFF).shl(c8(4));
        assert_eq!(e.evaluate(&Valuation::new()), Ok(Value::bits(0xF0u32)));

        let e = c8(0xFF).shl(c8(8));
        assert_eq!(e.evaluate(&Valuation::new()), Ok(Value::bits(0u32)));
    }

    #[test]
    fn test_sub_wraps() {
        let e = c8(3).sub(c8(5));
        assert_eq!(e.evaluate(&Valuation::new()), Ok(Value::bits(254u32)));
    }

    #[test]
    fn test_type_mismatch() {
        let e = Expr::bool(true).le(c8(1));
        assert!(matches!(
            e.evaluate(&Valuation::new()),
            Err(EvalError::TypeMismatch { .. })
        ));
    }
}
