//! QuickCheck tests for wire value decoding
//!
//! - Decoding: big-endian bytes decode to the integer they encode
//! - Padding: leading zero bytes never change a value
//! - Masks: every prefix mask maps back to its length

use controlplane_ir::config::ControlPlaneConfig;
use controlplane_ir::features::control_plane::infrastructure::{
    decode_value, mask_prefix_len, prefix_mask,
};
use controlplane_ir::features::control_plane::TargetId;
use num_bigint::BigUint;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

#[quickcheck]
fn qc_decode_matches_u64(value: u64) -> bool {
    decode_value(&value.to_be_bytes()) == BigUint::from(value)
}

#[quickcheck]
fn qc_leading_zeros_ignored(bytes: Vec<u8>, padding: u8) -> bool {
    let mut padded = vec![0u8; (padding % 16) as usize];
    padded.extend_from_slice(&bytes);
    decode_value(&padded) == decode_value(&bytes)
}

#[quickcheck]
fn qc_prefix_mask_roundtrip(width: u8, prefix_len: u8) -> TestResult {
    let width = u32::from(width);
    let prefix_len = u32::from(prefix_len);
    if width == 0 || prefix_len > width {
        return TestResult::discard();
    }
    let mask = prefix_mask(width, prefix_len);
    TestResult::from_bool(mask_prefix_len(width, &mask) == Some(prefix_len))
}

#[quickcheck]
fn qc_prefix_mask_fits_width(width: u8, prefix_len: u8) -> bool {
    let width = u32::from(width);
    prefix_mask(width, u32::from(prefix_len)).bits() <= u64::from(width)
}

#[quickcheck]
fn qc_target_name_case_insensitive(upper: bool, v1model: bool) -> bool {
    let target = if v1model {
        TargetId::V1Model
    } else {
        TargetId::Core
    };
    let name = if upper {
        target.name().to_ascii_uppercase()
    } else {
        target.name().to_string()
    };
    name.parse::<TargetId>().ok() == Some(target)
}

#[quickcheck]
fn qc_config_yaml_roundtrip(v1model: bool, seed: bool) -> bool {
    let target = if v1model {
        TargetId::V1Model
    } else {
        TargetId::Core
    };
    let config = ControlPlaneConfig::default()
        .with_target(target)
        .with_static_entries(seed);
    config
        .to_yaml()
        .and_then(|yaml| ControlPlaneConfig::from_yaml_str(&yaml))
        .map(|parsed| parsed == config)
        .unwrap_or(false)
}
