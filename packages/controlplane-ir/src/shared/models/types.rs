//! Semantic types of program fields and symbolic variables

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of a key field, action parameter or symbolic variable.
///
/// Only the types control-plane values can take are modeled: booleans and
/// unsigned bit vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    Bool,
    Bits { width: u32 },
}

impl Type {
    /// Unsigned bit vector of `width` bits
    pub fn bits(width: u32) -> Self {
        Type::Bits { width }
    }

    /// Bit width (booleans count as one bit)
    pub fn width(&self) -> u32 {
        match self {
            Type::Bool => 1,
            Type::Bits { width } => *width,
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Bool)
    }

    /// Largest value representable in this type (`2^width - 1`)
    pub fn max_value(&self) -> BigUint {
        let width = self.width();
        if width == 0 {
            return BigUint::zero();
        }
        (BigUint::one() << width as usize) - BigUint::one()
    }

    /// Check whether `value` is representable without truncation
    pub fn fits(&self, value: &BigUint) -> bool {
        value.bits() <= u64::from(self.width())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => write!(f, "bool"),
            Type::Bits { width } => write!(f, "bit<{}>", width),
        }
    }
}
