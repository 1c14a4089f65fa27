//! Control-plane infrastructure
//!
//! - [`deserializer`]: configuration record → constraints
//! - [`match_conversion`]: configured match values → key predicates
//! - [`initializer`]: program-embedded entries → constraints
//! - [`resolver`]: execution-time key predicates over control-plane symbols

pub mod deserializer;
pub mod initializer;
pub mod match_conversion;
pub mod resolver;

pub use deserializer::{convert_record, load_record, parse_entity, parse_record, ConfigDeserializer};
pub use initializer::{compute_core_static_match, generate_initial_constraints, resolve_action_call};
pub use match_conversion::{convert_field_match, decode_value, mask_prefix_len, prefix_mask};
pub use resolver::{compute_core_match, CoreMatchKind, TableMatchResolver};
