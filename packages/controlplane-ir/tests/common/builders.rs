//! Configuration record builders
//!
//! Builds records as JSON values so tests exercise the real wire parser.

use serde_json::{json, Value};

/// Hex text of `value` as a big-endian byte string of `bytes` bytes
pub fn hex_of(value: u64, bytes: usize) -> String {
    let full = format!("{:016x}", value);
    full[full.len() - bytes * 2..].to_string()
}

/// Builder for one `table_entry` entity
#[derive(Debug, Clone)]
pub struct TableEntryBuilder {
    table_id: u32,
    matches: Vec<Value>,
    action: Option<Value>,
    priority: Option<i32>,
    is_default_action: bool,
}

impl TableEntryBuilder {
    pub fn new(table_id: u32) -> Self {
        Self {
            table_id,
            matches: Vec::new(),
            action: None,
            priority: None,
            is_default_action: false,
        }
    }

    pub fn exact(mut self, field_id: u32, value: &str) -> Self {
        self.matches
            .push(json!({ "field_id": field_id, "exact": { "value": value } }));
        self
    }

    pub fn ternary(mut self, field_id: u32, value: &str, mask: &str) -> Self {
        self.matches.push(
            json!({ "field_id": field_id, "ternary": { "value": value, "mask": mask } }),
        );
        self
    }

    pub fn lpm(mut self, field_id: u32, value: &str, prefix_len: u32) -> Self {
        self.matches.push(
            json!({ "field_id": field_id, "lpm": { "value": value, "prefix_len": prefix_len } }),
        );
        self
    }

    pub fn range(mut self, field_id: u32, low: &str, high: &str) -> Self {
        self.matches
            .push(json!({ "field_id": field_id, "range": { "low": low, "high": high } }));
        self
    }

    pub fn optional(mut self, field_id: u32, value: Option<&str>) -> Self {
        let body = match value {
            Some(v) => json!({ "value": v }),
            None => json!({}),
        };
        self.matches
            .push(json!({ "field_id": field_id, "optional": body }));
        self
    }

    pub fn action(mut self, action_id: u32, params: &[(u32, &str)]) -> Self {
        let params: Vec<Value> = params
            .iter()
            .map(|(id, v)| json!({ "param_id": id, "value": v }))
            .collect();
        self.action = Some(json!({ "action": { "action_id": action_id, "params": params } }));
        self
    }

    pub fn group(mut self, group_id: u32) -> Self {
        self.action = Some(json!({ "action_profile_group_id": group_id }));
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn default_action(mut self) -> Self {
        self.is_default_action = true;
        self
    }

    pub fn build(self) -> Value {
        let mut entry = json!({
            "table_id": self.table_id,
            "match": self.matches,
            "is_default_action": self.is_default_action,
        });
        if let Some(action) = self.action {
            entry["action"] = action;
        }
        if let Some(priority) = self.priority {
            entry["priority"] = json!(priority);
        }
        json!({ "table_entry": entry })
    }
}

/// Record of the given entities, serialized as JSON bytes
pub fn record(entities: Vec<Value>) -> Vec<u8> {
    serde_json::to_vec(&json!({ "entities": entities })).unwrap()
}
