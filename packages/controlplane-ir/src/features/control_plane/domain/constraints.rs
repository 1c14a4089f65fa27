//! Control-plane constraint model
//!
//! One [`TableConfiguration`] per table: the configured entries in priority
//! order (first match wins), an optional default action, and whether static
//! initialization gave up on the table. [`ControlPlaneConstraints`] maps table
//! names to their configuration and is built up incrementally from static
//! defaults and configuration records. Merging appends, it never replaces.

use num_bigint::BigUint;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::diagnostics::Diagnostics;
use super::symbols;
use crate::shared::models::{Expr, SymbolSet, Type};

/// Field name → match constraint for one entry. A field that is absent is a
/// wildcard.
pub type TableKeySet = BTreeMap<String, Expr>;

/// Bound value of one action parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionArgument {
    pub param: String,
    pub ty: Type,
    pub value: BigUint,
}

impl ActionArgument {
    pub fn new(param: impl Into<String>, ty: Type, value: impl Into<BigUint>) -> Self {
        Self {
            param: param.into(),
            ty,
            value: value.into(),
        }
    }
}

/// Indirect action through an action profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProfileRef {
    Member(u32),
    Group(u32),
}

impl fmt::Display for ProfileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileRef::Member(id) => write!(f, "member {}", id),
            ProfileRef::Group(id) => write!(f, "group {}", id),
        }
    }
}

/// Action an entry invokes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ActionBinding {
    Direct {
        action: String,
        /// Position of the action in the table's action list
        ordinal: u32,
        arguments: Vec<ActionArgument>,
    },
    /// Only the action choice is modeled; the profile's contents are not
    /// resolved.
    ProfileReference(ProfileRef),
}

impl ActionBinding {
    pub fn direct(action: impl Into<String>, ordinal: u32, arguments: Vec<ActionArgument>) -> Self {
        ActionBinding::Direct {
            action: action.into(),
            ordinal,
            arguments,
        }
    }

    /// Equalities binding the table's action-choice and argument variables
    pub fn constraints(&self, table: &str) -> Vec<Expr> {
        let choice = Expr::symbol(symbols::table_action_choice(table));
        match self {
            ActionBinding::Direct {
                action,
                ordinal,
                arguments,
            } => {
                let mut out = Vec::with_capacity(arguments.len() + 1);
                out.push(choice.eq(Expr::constant(symbols::action_choice_type(), *ordinal)));
                for arg in arguments {
                    let var = symbols::table_action_arg(table, action, &arg.param, arg.ty);
                    out.push(Expr::symbol(var).eq(Expr::literal(arg.ty, arg.value.clone())));
                }
                out
            }
            ActionBinding::ProfileReference(_) => vec![choice.eq(Expr::constant(
                symbols::action_choice_type(),
                symbols::ACTION_PROFILE_MARKER,
            ))],
        }
    }
}

/// One configured entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableMatchEntry {
    pub key_set: TableKeySet,
    pub action: ActionBinding,
    /// Priority as supplied by the controller; list order decides matching
    pub priority: Option<i32>,
}

impl TableMatchEntry {
    pub fn new(key_set: TableKeySet, action: ActionBinding) -> Self {
        Self {
            key_set,
            action,
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Conjunction of the key-set constraints
    pub fn match_condition(&self) -> Expr {
        Expr::all(self.key_set.values().cloned())
    }

    /// Key-set constraints and action bindings together
    pub fn to_constraint(&self, table: &str) -> Expr {
        Expr::all(
            self.key_set
                .values()
                .cloned()
                .chain(self.action.constraints(table)),
        )
    }
}

/// Configured behavior of one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableConfiguration {
    table: String,
    entries: Vec<TableMatchEntry>,
    default_action: Option<ActionBinding>,
    disabled: bool,
}

impl TableConfiguration {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            entries: Vec::new(),
            default_action: None,
            disabled: false,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Entries in match priority order
    pub fn entries(&self) -> &[TableMatchEntry] {
        &self.entries
    }

    pub fn default_action(&self) -> Option<&ActionBinding> {
        self.default_action.as_ref()
    }

    /// Whether static initialization found no usable entries for this table
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_active(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn push(&mut self, entry: TableMatchEntry) {
        self.entries.push(entry);
    }

    pub fn set_default_action(&mut self, action: ActionBinding) {
        self.default_action = Some(action);
    }

    pub fn disable(&mut self) {
        self.disabled = true;
    }

    /// Append `other`'s entries after ours; a default action set by `other`
    /// replaces ours.
    pub fn append(&mut self, other: TableConfiguration) {
        self.entries.extend(other.entries);
        if other.default_action.is_some() {
            self.default_action = other.default_action;
        }
        self.disabled |= other.disabled;
    }

    /// `<table>.active == (entries non-empty)`
    pub fn table_active_constraint(&self) -> Expr {
        Expr::symbol(symbols::table_active(&self.table)).eq(Expr::bool(self.is_active()))
    }

    /// Full constraint for this table.
    ///
    /// Entry *i* fires when its keys match and no earlier entry matches; a
    /// firing entry implies its action bindings. When nothing matches, the
    /// default action (if any) is implied.
    pub fn to_constraint(&self) -> Expr {
        let mut parts = vec![self.table_active_constraint()];
        let mut earlier: Vec<Expr> = Vec::with_capacity(self.entries.len());

        for entry in &self.entries {
            let condition = entry.match_condition();
            let fires = Expr::all(
                earlier
                    .iter()
                    .cloned()
                    .map(Expr::not)
                    .chain(std::iter::once(condition.clone())),
            );
            parts.push(fires.implies(Expr::all(entry.action.constraints(&self.table))));
            earlier.push(condition);
        }

        if let Some(default) = &self.default_action {
            let miss = Expr::all(earlier.into_iter().map(Expr::not));
            parts.push(miss.implies(Expr::all(default.constraints(&self.table))));
        }

        Expr::all(parts)
    }

    fn collect_symbols_into(&self, symbols: &mut SymbolSet) {
        self.to_constraint().collect_symbols_into(symbols);
    }
}

/// Table name → configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ControlPlaneConstraints {
    tables: BTreeMap<String, TableConfiguration>,
}

impl ControlPlaneConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn table(&self, name: &str) -> Option<&TableConfiguration> {
        self.tables.get(name)
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableConfiguration> {
        self.tables.values()
    }

    fn table_mut(&mut self, name: &str) -> &mut TableConfiguration {
        self.tables
            .entry(name.to_string())
            .or_insert_with(|| TableConfiguration::new(name))
    }

    /// Append an entry to `table`
    pub fn add_entry(&mut self, table: &str, key_set: TableKeySet, action: ActionBinding) {
        self.add_match_entry(table, TableMatchEntry::new(key_set, action));
    }

    pub fn add_match_entry(&mut self, table: &str, entry: TableMatchEntry) {
        self.table_mut(table).push(entry);
    }

    pub fn set_default_action(&mut self, table: &str, action: ActionBinding) {
        self.table_mut(table).set_default_action(action);
    }

    /// Record `table` as having no usable entries
    pub fn disable_table(&mut self, table: &str) {
        self.table_mut(table).disable();
    }

    /// Merge `other` into `self`, table by table; our entries stay first.
    pub fn merge_from(&mut self, other: ControlPlaneConstraints) {
        for (name, config) in other.tables {
            match self.tables.get_mut(&name) {
                Some(existing) => existing.append(config),
                None => {
                    self.tables.insert(name, config);
                }
            }
        }
    }

    /// Table-wise append of `b` after `a`
    pub fn merge(mut a: ControlPlaneConstraints, b: ControlPlaneConstraints) -> Self {
        a.merge_from(b);
        a
    }

    /// One constraint per table
    pub fn to_constraints(&self) -> BTreeMap<String, Expr> {
        self.tables
            .iter()
            .map(|(name, config)| (name.clone(), config.to_constraint()))
            .collect()
    }

    /// Every symbolic variable the constraints reference
    pub fn symbols(&self) -> SymbolSet {
        let mut symbols = SymbolSet::new();
        for config in self.tables.values() {
            config.collect_symbols_into(&mut symbols);
        }
        symbols
    }
}

/// Constraints plus the diagnostics recorded while producing them
#[derive(Debug, Clone, Default)]
pub struct ConversionOutcome {
    pub constraints: ControlPlaneConstraints,
    pub diagnostics: Diagnostics,
}

impl ConversionOutcome {
    pub fn new(constraints: ControlPlaneConstraints, diagnostics: Diagnostics) -> Self {
        Self {
            constraints,
            diagnostics,
        }
    }

    /// Merge a later outcome after this one
    pub fn merge_from(&mut self, other: ConversionOutcome) {
        self.constraints.merge_from(other.constraints);
        self.diagnostics.extend(other.diagnostics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{Valuation, Value};
    use pretty_assertions::assert_eq;

    const T: &str = "ingress.port_map";

    fn key() -> Expr {
        Expr::field("meta.port", Type::bits(9))
    }

    fn exact(v: u32) -> TableKeySet {
        let mut ks = TableKeySet::new();
        ks.insert("port".to_string(), key().eq(Expr::constant(Type::bits(9), v)));
        ks
    }

    fn set_port(out: u32) -> ActionBinding {
        ActionBinding::direct(
            "set_port",
            0,
            vec![ActionArgument::new("out", Type::bits(9), out)],
        )
    }

    #[test]
    fn test_add_entry_preserves_order() {
        let mut cpc = ControlPlaneConstraints::new();
        cpc.add_entry(T, exact(1), set_port(10));
        cpc.add_entry(T, exact(2), set_port(20));

        let entries = cpc.table(T).unwrap().entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key_set, exact(1));
        assert_eq!(entries[1].key_set, exact(2));
    }

    #[test]
    fn test_merge_appends() {
        let mut a = ControlPlaneConstraints::new();
        a.add_entry(T, exact(1), set_port(10));
        let mut b = ControlPlaneConstraints::new();
        b.add_entry(T, exact(2), set_port(20));
        b.add_entry("other", TableKeySet::new(), set_port(0));

        let merged = ControlPlaneConstraints::merge(a, b);
        let entries = merged.table(T).unwrap().entries();
        assert_eq!(entries[0].key_set, exact(1));
        assert_eq!(entries[1].key_set, exact(2));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_default_action_later_wins() {
        let mut a = ControlPlaneConstraints::new();
        a.set_default_action(T, set_port(1));
        let mut b = ControlPlaneConstraints::new();
        b.set_default_action(T, set_port(2));
        let mut c = ControlPlaneConstraints::new();
        c.add_entry(T, exact(3), set_port(3));

        let merged = ControlPlaneConstraints::merge(ControlPlaneConstraints::merge(a, b), c);
        assert_eq!(merged.table(T).unwrap().default_action(), Some(&set_port(2)));
    }

    #[test]
    fn test_action_constraints() {
        let constraints = set_port(7).constraints(T);
        assert_eq!(
            constraints,
            vec![
                Expr::symbol(symbols::table_action_choice(T))
                    .eq(Expr::constant(Type::bits(32), 0u32)),
                Expr::symbol(symbols::table_action_arg(T, "set_port", "out", Type::bits(9)))
                    .eq(Expr::constant(Type::bits(9), 7u32)),
            ]
        );
    }

    #[test]
    fn test_profile_reference_binds_marker() {
        let constraints = ActionBinding::ProfileReference(ProfileRef::Group(4)).constraints(T);
        assert_eq!(
            constraints,
            vec![Expr::symbol(symbols::table_action_choice(T)).eq(Expr::constant(
                Type::bits(32),
                symbols::ACTION_PROFILE_MARKER
            ))]
        );
    }

    #[test]
    fn test_table_active_constraint() {
        let mut config = TableConfiguration::new(T);
        let active = Expr::symbol(symbols::table_active(T));
        assert_eq!(config.table_active_constraint(), active.clone().eq(Expr::bool(false)));

        config.push(TableMatchEntry::new(exact(1), set_port(1)));
        assert_eq!(config.table_active_constraint(), active.eq(Expr::bool(true)));
    }

    /// Overlapping entries: the first listed entry decides the action.
    #[test]
    fn test_to_constraint_first_match_wins() {
        let mut config = TableConfiguration::new(T);
        let mut wildcard = TableKeySet::new();
        wildcard.insert(
            "port".to_string(),
            key().le(Expr::constant(Type::bits(9), 100u32)),
        );
        config.push(TableMatchEntry::new(exact(5), set_port(50)));
        config.push(TableMatchEntry::new(wildcard, set_port(99)));
        config.set_default_action(ActionBinding::direct("drop", 1, vec![]));

        let constraint = config.to_constraint();
        let out = symbols::table_action_arg(T, "set_port", "out", Type::bits(9));
        let env = |port: u32, choice: u32, out_val: u32| {
            Valuation::new()
                .with_field("meta.port", Value::bits(port))
                .with_symbol(symbols::table_active(T), Value::Bool(true))
                .with_symbol(symbols::table_action_choice(T), Value::bits(choice))
                .with_symbol(out.clone(), Value::bits(out_val))
        };

        // port 5 hits the first entry only
        assert_eq!(constraint.evaluate_bool(&env(5, 0, 50)), Ok(true));
        assert_eq!(constraint.evaluate_bool(&env(5, 0, 99)), Ok(false));
        // port 7 falls through to the second entry
        assert_eq!(constraint.evaluate_bool(&env(7, 0, 99)), Ok(true));
        // port 200 misses and takes the default action
        assert_eq!(constraint.evaluate_bool(&env(200, 1, 0)), Ok(true));
        assert_eq!(constraint.evaluate_bool(&env(200, 0, 0)), Ok(false));
    }

    #[test]
    fn test_symbols() {
        let mut cpc = ControlPlaneConstraints::new();
        cpc.add_entry(T, exact(1), set_port(10));

        let names: Vec<_> = cpc.symbols().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(
            names,
            vec![
                format!("{}.action.set_port.out", T),
                format!("{}.action_choice", T),
                format!("{}.active", T),
            ]
        );
    }
}
