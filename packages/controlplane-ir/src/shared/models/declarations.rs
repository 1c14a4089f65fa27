//! Program declarations consumed by the control-plane layer
//!
//! The host analysis resolves names and types; these are the resolved
//! declarations (tables, key fields, actions, embedded entries) that
//! control-plane constraints are synthesized against.

use num_bigint::BigUint;

use super::expression::Expr;
use super::types::Type;

/// One key field of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyElement {
    /// Runtime expression matched by this key
    pub expr: Expr,

    /// Match-kind name (`exact`, `ternary`, `lpm`, or a target-defined kind)
    pub match_kind: String,

    /// Control-plane name from the `@name` annotation. Some compiler-generated
    /// tables carry no annotation.
    pub name: Option<String>,
}

impl KeyElement {
    pub fn new(expr: Expr, match_kind: impl Into<String>) -> Self {
        Self {
            expr,
            match_kind: match_kind.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Control-plane field name; falls back to the rendered key expression
    /// when the annotation is missing.
    pub fn field_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.expr.to_string(),
        }
    }

    pub fn ty(&self) -> Type {
        self.expr.ty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionParam {
    pub name: String,
    pub ty: Type,
}

impl ActionParam {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Action declaration with its control-plane-supplied parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDecl {
    pub name: String,
    pub params: Vec<ActionParam>,
}

impl ActionDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.params.push(ActionParam::new(name, ty));
        self
    }
}

/// Action invocation with constant arguments, as written in the program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCall {
    pub action: String,
    pub args: Vec<BigUint>,
}

impl ActionCall {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, value: impl Into<BigUint>) -> Self {
        self.args.push(value.into());
        self
    }
}

/// One key of a program-embedded entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKey {
    /// `v`
    Value(BigUint),
    /// `v &&& m`
    Mask { value: BigUint, mask: BigUint },
    /// `lo .. hi`
    Range { low: BigUint, high: BigUint },
    /// `_`
    DontCare,
}

impl EntryKey {
    pub fn value(value: impl Into<BigUint>) -> Self {
        EntryKey::Value(value.into())
    }

    pub fn mask(value: impl Into<BigUint>, mask: impl Into<BigUint>) -> Self {
        EntryKey::Mask {
            value: value.into(),
            mask: mask.into(),
        }
    }

    pub fn range(low: impl Into<BigUint>, high: impl Into<BigUint>) -> Self {
        EntryKey::Range {
            low: low.into(),
            high: high.into(),
        }
    }
}

/// Entry from a table's `const entries` / `entries` list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticEntry {
    /// Positional keys, one per declared key field
    pub keys: Vec<EntryKey>,
    pub action: ActionCall,
}

impl StaticEntry {
    pub fn new(keys: Vec<EntryKey>, action: ActionCall) -> Self {
        Self { keys, action }
    }
}

/// Match-action table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDecl {
    /// Control-plane name
    pub name: String,
    pub keys: Vec<KeyElement>,
    /// Names of the actions the table may invoke, in declaration order
    pub actions: Vec<String>,
    pub default_action: Option<ActionCall>,
    /// Program-embedded entries, if the table declares any
    pub entries: Option<Vec<StaticEntry>>,
}

impl TableDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: Vec::new(),
            actions: Vec::new(),
            default_action: None,
            entries: None,
        }
    }

    pub fn with_key(mut self, key: KeyElement) -> Self {
        self.keys.push(key);
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    pub fn with_default_action(mut self, call: ActionCall) -> Self {
        self.default_action = Some(call);
        self
    }

    pub fn with_entry(mut self, entry: StaticEntry) -> Self {
        self.entries.get_or_insert_with(Vec::new).push(entry);
        self
    }

    /// Position of `action` in the table's action list.
    ///
    /// This is the value the action-choice variable takes when the action
    /// is selected.
    pub fn action_ordinal(&self, action: &str) -> Option<u32> {
        self.actions
            .iter()
            .position(|a| a == action)
            .map(|idx| idx as u32)
    }
}

/// Resolved program: all tables and actions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub tables: Vec<TableDecl>,
    pub actions: Vec<ActionDecl>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: TableDecl) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_action(mut self, action: ActionDecl) -> Self {
        self.actions.push(action);
        self
    }

    pub fn table(&self, name: &str) -> Option<&TableDecl> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn action(&self, name: &str) -> Option<&ActionDecl> {
        self.actions.iter().find(|a| a.name == name)
    }
}
