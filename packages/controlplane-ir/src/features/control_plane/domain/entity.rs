//! Configuration record entities
//!
//! The record layout follows the P4Runtime JSON mapping: each entity is an
//! object with exactly one key naming its kind, and byte strings are written
//! as hex text (`"0a000001"` or `"0x0a000001"`).
//!
//! ```json
//! { "entities": [
//!   { "table_entry": {
//!       "table_id": 1,
//!       "match": [ { "field_id": 1, "lpm": { "value": "0a000000", "prefix_len": 8 } } ],
//!       "action": { "action": { "action_id": 2,
//!                   "params": [ { "param_id": 1, "value": "01" } ] } } } }
//! ] }
//! ```
//!
//! Unknown entity kinds and unknown match kinds deserialize into explicit
//! catch-all variants instead of failing.

use serde::de::{self, IgnoredAny};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Parsed configuration record
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigRecord {
    #[serde(default)]
    pub entities: Vec<Entity>,
}

/// One configuration entity
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawEntity")]
pub enum Entity {
    TableEntry(TableEntry),
    ActionProfileMember(ActionProfileMember),
    ActionProfileGroup(ActionProfileGroup),
    /// Entity kind this crate does not model
    Other { kind: String },
}

impl Entity {
    /// Record key naming the entity kind
    pub fn kind(&self) -> &str {
        match self {
            Entity::TableEntry(_) => "table_entry",
            Entity::ActionProfileMember(_) => "action_profile_member",
            Entity::ActionProfileGroup(_) => "action_profile_group",
            Entity::Other { kind } => kind,
        }
    }
}

#[derive(Deserialize)]
struct RawEntity {
    #[serde(default)]
    table_entry: Option<TableEntry>,
    #[serde(default)]
    action_profile_member: Option<ActionProfileMember>,
    #[serde(default)]
    action_profile_group: Option<ActionProfileGroup>,
    #[serde(flatten)]
    rest: BTreeMap<String, IgnoredAny>,
}

impl From<RawEntity> for Entity {
    fn from(raw: RawEntity) -> Self {
        if let Some(entry) = raw.table_entry {
            Entity::TableEntry(entry)
        } else if let Some(member) = raw.action_profile_member {
            Entity::ActionProfileMember(member)
        } else if let Some(group) = raw.action_profile_group {
            Entity::ActionProfileGroup(group)
        } else {
            let kind = raw
                .rest
                .into_keys()
                .next()
                .unwrap_or_else(|| "empty".to_string());
            Entity::Other { kind }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableEntry {
    pub table_id: u32,

    #[serde(default, rename = "match")]
    pub matches: Vec<FieldMatch>,

    #[serde(default)]
    pub action: Option<TableAction>,

    #[serde(default)]
    pub priority: Option<i32>,

    /// The entry sets the table's default action and carries no matches
    #[serde(default)]
    pub is_default_action: bool,
}

/// Match on one key field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawFieldMatch")]
pub struct FieldMatch {
    pub field_id: u32,
    pub kind: MatchValue,
}

/// Per-match-kind payload; byte strings are big-endian unsigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchValue {
    Exact { value: Vec<u8> },
    Ternary { value: Vec<u8>, mask: Vec<u8> },
    Lpm { value: Vec<u8>, prefix_len: u32 },
    Range { low: Vec<u8>, high: Vec<u8> },
    /// `value` is `None` when the optional match is not set
    Optional { value: Option<Vec<u8>> },
    /// Match kind this crate cannot convert
    Unsupported { kind: String },
}

impl MatchValue {
    /// Match-kind name as declared in programs
    pub fn kind_name(&self) -> &str {
        match self {
            MatchValue::Exact { .. } => "exact",
            MatchValue::Ternary { .. } => "ternary",
            MatchValue::Lpm { .. } => "lpm",
            MatchValue::Range { .. } => "range",
            MatchValue::Optional { .. } => "optional",
            MatchValue::Unsupported { kind } => kind,
        }
    }
}

#[derive(Deserialize)]
struct ExactMatch {
    value: HexBytes,
}

#[derive(Deserialize)]
struct TernaryMatch {
    value: HexBytes,
    mask: HexBytes,
}

#[derive(Deserialize)]
struct LpmMatch {
    value: HexBytes,
    prefix_len: u32,
}

#[derive(Deserialize)]
struct RangeMatch {
    low: HexBytes,
    high: HexBytes,
}

#[derive(Deserialize)]
struct OptionalMatch {
    #[serde(default)]
    value: Option<HexBytes>,
}

#[derive(Deserialize)]
struct RawFieldMatch {
    field_id: u32,
    #[serde(default)]
    exact: Option<ExactMatch>,
    #[serde(default)]
    ternary: Option<TernaryMatch>,
    #[serde(default)]
    lpm: Option<LpmMatch>,
    #[serde(default)]
    range: Option<RangeMatch>,
    #[serde(default)]
    optional: Option<OptionalMatch>,
    #[serde(flatten)]
    rest: BTreeMap<String, IgnoredAny>,
}

impl From<RawFieldMatch> for FieldMatch {
    fn from(raw: RawFieldMatch) -> Self {
        let kind = if let Some(m) = raw.exact {
            MatchValue::Exact { value: m.value.0 }
        } else if let Some(m) = raw.ternary {
            MatchValue::Ternary {
                value: m.value.0,
                mask: m.mask.0,
            }
        } else if let Some(m) = raw.lpm {
            MatchValue::Lpm {
                value: m.value.0,
                prefix_len: m.prefix_len,
            }
        } else if let Some(m) = raw.range {
            MatchValue::Range {
                low: m.low.0,
                high: m.high.0,
            }
        } else if let Some(m) = raw.optional {
            MatchValue::Optional {
                value: m.value.map(|v| v.0),
            }
        } else {
            MatchValue::Unsupported {
                kind: raw
                    .rest
                    .into_keys()
                    .next()
                    .unwrap_or_else(|| "unset".to_string()),
            }
        };
        FieldMatch {
            field_id: raw.field_id,
            kind,
        }
    }
}

/// Action part of a table entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawTableAction")]
pub enum TableAction {
    Action(Action),
    ActionProfileMemberId(u32),
    ActionProfileGroupId(u32),
}

/// Exactly one of the fields is set
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTableAction {
    #[serde(default)]
    action: Option<Action>,
    #[serde(default)]
    action_profile_member_id: Option<u32>,
    #[serde(default)]
    action_profile_group_id: Option<u32>,
}

impl TryFrom<RawTableAction> for TableAction {
    type Error = String;

    fn try_from(raw: RawTableAction) -> Result<Self, Self::Error> {
        match (raw.action, raw.action_profile_member_id, raw.action_profile_group_id) {
            (Some(action), None, None) => Ok(TableAction::Action(action)),
            (None, Some(id), None) => Ok(TableAction::ActionProfileMemberId(id)),
            (None, None, Some(id)) => Ok(TableAction::ActionProfileGroupId(id)),
            (None, None, None) => Err("table action names no action".to_string()),
            _ => Err("table action names more than one action".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Action {
    pub action_id: u32,
    #[serde(default)]
    pub params: Vec<ActionParamValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActionParamValue {
    pub param_id: u32,
    #[serde(deserialize_with = "hex_bytes")]
    pub value: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActionProfileMember {
    pub action_profile_id: u32,
    pub member_id: u32,
    #[serde(default)]
    pub action: Option<Action>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActionProfileGroup {
    pub action_profile_id: u32,
    pub group_id: u32,
    #[serde(default)]
    pub members: Vec<GroupMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GroupMember {
    pub member_id: u32,
    #[serde(default)]
    pub weight: i32,
}

/// Hex-encoded byte string
#[derive(Debug, Clone, PartialEq, Eq)]
struct HexBytes(Vec<u8>);

impl<'de> Deserialize<'de> for HexBytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        hex_bytes(deserializer).map(HexBytes)
    }
}

fn hex_bytes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let text = String::deserialize(deserializer)?;
    decode_hex(&text).map_err(de::Error::custom)
}

/// Decode hex text; a `0x` prefix is optional and odd-length input is
/// left-padded with a zero nibble.
pub fn decode_hex(text: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.len() % 2 == 1 {
        hex::decode(format!("0{}", digits))
    } else {
        hex::decode(digits)
    }
}
