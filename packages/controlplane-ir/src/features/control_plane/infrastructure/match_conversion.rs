//! Load-time match conversion
//!
//! Turns a configured match value into a predicate over the key's runtime
//! expression. The static-entry initializer builds its predicates with the
//! same helpers so both producers emit structurally identical constraints.
//!
//! | kind | predicate |
//! |---|---|
//! | exact | `key == v` |
//! | ternary | `(key & m) == (v & m)` |
//! | lpm | `(key & prefix_mask) == (v & prefix_mask)` (right side folded) |
//! | range | `lo <= key && key <= hi` |
//! | optional | as exact when set, wildcard otherwise |

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::errors::EntryError;
use crate::features::control_plane::domain::MatchValue;
use crate::shared::models::{Expr, KeyElement, Type};

pub const MATCH_KIND_EXACT: &str = "exact";
pub const MATCH_KIND_TERNARY: &str = "ternary";
pub const MATCH_KIND_LPM: &str = "lpm";
pub const MATCH_KIND_RANGE: &str = "range";
pub const MATCH_KIND_OPTIONAL: &str = "optional";

/// Interpret `bytes` as a big-endian unsigned integer; empty input is zero.
pub fn decode_value(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Mask selecting the top `prefix_len` bits of a `width`-bit value.
///
/// `prefix_len` is clamped to `width`.
pub fn prefix_mask(width: u32, prefix_len: u32) -> BigUint {
    let prefix_len = prefix_len.min(width);
    if prefix_len == 0 {
        return BigUint::zero();
    }
    ((BigUint::one() << prefix_len as usize) - BigUint::one()) << (width - prefix_len) as usize
}

/// Prefix length of `mask` if it is a contiguous prefix mask
pub fn mask_prefix_len(width: u32, mask: &BigUint) -> Option<u32> {
    (0..=width).find(|len| prefix_mask(width, *len) == *mask)
}

pub(crate) fn exact_match(key: &Expr, ty: Type, value: BigUint) -> Expr {
    key.clone().eq(Expr::literal(ty, value))
}

pub(crate) fn ternary_match(key: &Expr, ty: Type, value: BigUint, mask: BigUint) -> Expr {
    let mask = Expr::constant(ty, mask);
    key.clone()
        .bit_and(mask.clone())
        .eq(Expr::constant(ty, value).bit_and(mask))
}

pub(crate) fn lpm_match(key: &Expr, ty: Type, value: BigUint, prefix_len: u32) -> Expr {
    let mask = prefix_mask(ty.width(), prefix_len);
    let prefix = value & &mask;
    key.clone()
        .bit_and(Expr::constant(ty, mask))
        .eq(Expr::constant(ty, prefix))
}

pub(crate) fn range_match(key: &Expr, ty: Type, low: BigUint, high: BigUint) -> Expr {
    Expr::constant(ty, low)
        .le(key.clone())
        .and(key.clone().le(Expr::constant(ty, high)))
}

/// Decode `bytes` and check the value is representable in `ty`
pub(crate) fn decode_checked(name: &str, ty: Type, bytes: &[u8]) -> Result<BigUint, EntryError> {
    let value = decode_value(bytes);
    if ty.fits(&value) {
        Ok(value)
    } else {
        Err(EntryError::ValueOutOfRange {
            name: name.to_string(),
            value,
            ty,
        })
    }
}

/// Convert one configured match on `key`.
///
/// `Ok(None)` means the field contributes no constraint (an unset optional
/// match). Errors drop the whole entry.
pub fn convert_field_match(key: &KeyElement, value: &MatchValue) -> Result<Option<Expr>, EntryError> {
    let field = key.field_name();
    let ty = key.ty();

    if let MatchValue::Unsupported { kind } = value {
        return Err(EntryError::UnsupportedMatchKind(kind.clone()));
    }
    if key.match_kind != value.kind_name() {
        return Err(EntryError::MatchKindMismatch {
            field,
            declared: key.match_kind.clone(),
            configured: value.kind_name().to_string(),
        });
    }
    if ty.is_bool() && !matches!(value, MatchValue::Exact { .. } | MatchValue::Optional { .. }) {
        return Err(EntryError::UnsupportedKeyType {
            field,
            match_kind: value.kind_name().to_string(),
            ty,
        });
    }

    let predicate = match value {
        MatchValue::Exact { value } => exact_match(&key.expr, ty, decode_checked(&field, ty, value)?),
        MatchValue::Ternary { value, mask } => ternary_match(
            &key.expr,
            ty,
            decode_checked(&field, ty, value)?,
            decode_checked(&field, ty, mask)?,
        ),
        MatchValue::Lpm { value, prefix_len } => {
            if *prefix_len > ty.width() {
                return Err(EntryError::InvalidPrefixLength {
                    field,
                    prefix_len: *prefix_len,
                    width: ty.width(),
                });
            }
            lpm_match(&key.expr, ty, decode_checked(&field, ty, value)?, *prefix_len)
        }
        MatchValue::Range { low, high } => range_match(
            &key.expr,
            ty,
            decode_checked(&field, ty, low)?,
            decode_checked(&field, ty, high)?,
        ),
        MatchValue::Optional { value: Some(value) } => {
            exact_match(&key.expr, ty, decode_checked(&field, ty, value)?)
        }
        MatchValue::Optional { value: None } => return Ok(None),
        MatchValue::Unsupported { kind } => {
            return Err(EntryError::UnsupportedMatchKind(kind.clone()))
        }
    };
    Ok(Some(predicate))
}
