//! Numeric control-plane identifiers → program declarations
//!
//! Configuration records address tables and actions by the numeric ids the
//! compiler assigned. Key fields and action parameters are addressed by their
//! 1-based position, following the P4Runtime convention.

use std::collections::HashMap;

use super::declarations::{ActionDecl, ActionParam, KeyElement, Program, TableDecl};

/// Read-only lookup from numeric ids to declarations
#[derive(Debug, Clone, Default)]
pub struct IdToDeclMap<'p> {
    tables: HashMap<u32, &'p TableDecl>,
    actions: HashMap<u32, &'p ActionDecl>,
}

impl<'p> IdToDeclMap<'p> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_table(&mut self, id: u32, table: &'p TableDecl) {
        self.tables.insert(id, table);
    }

    pub fn register_action(&mut self, id: u32, action: &'p ActionDecl) {
        self.actions.insert(id, action);
    }

    /// Register every table and action of `program` under the given ids.
    ///
    /// Names without an id are left unregistered.
    pub fn from_program(
        program: &'p Program,
        table_ids: &[(u32, &str)],
        action_ids: &[(u32, &str)],
    ) -> Self {
        let mut map = Self::new();
        for (id, name) in table_ids {
            if let Some(table) = program.table(name) {
                map.register_table(*id, table);
            }
        }
        for (id, name) in action_ids {
            if let Some(action) = program.action(name) {
                map.register_action(*id, action);
            }
        }
        map
    }

    pub fn table(&self, id: u32) -> Option<&'p TableDecl> {
        self.tables.get(&id).copied()
    }

    pub fn action(&self, id: u32) -> Option<&'p ActionDecl> {
        self.actions.get(&id).copied()
    }

    /// Key field `field_id` (1-based) of `table`
    pub fn key_field<'t>(&self, table: &'t TableDecl, field_id: u32) -> Option<&'t KeyElement> {
        position(field_id).and_then(|idx| table.keys.get(idx))
    }

    /// Parameter `param_id` (1-based) of `action`
    pub fn action_param<'a>(&self, action: &'a ActionDecl, param_id: u32) -> Option<&'a ActionParam> {
        position(param_id).and_then(|idx| action.params.get(idx))
    }
}

fn position(id: u32) -> Option<usize> {
    (id as usize).checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{Expr, Type};

    fn program() -> Program {
        Program::new()
            .with_table(
                TableDecl::new("ingress.acl")
                    .with_key(KeyElement::new(Expr::field("hdr.eth.type", Type::bits(16)), "exact"))
                    .with_action("deny"),
            )
            .with_action(ActionDecl::new("deny").with_param("reason", Type::bits(8)))
    }

    #[test]
    fn test_lookup() {
        let program = program();
        let map = IdToDeclMap::from_program(&program, &[(7, "ingress.acl")], &[(3, "deny")]);

        let table = map.table(7).unwrap();
        assert_eq!(table.name, "ingress.acl");
        assert!(map.table(8).is_none());

        assert!(map.key_field(table, 1).is_some());
        assert!(map.key_field(table, 0).is_none());
        assert!(map.key_field(table, 2).is_none());

        let action = map.action(3).unwrap();
        assert_eq!(map.action_param(action, 1).unwrap().name, "reason");
        assert!(map.action_param(action, 2).is_none());
    }

    #[test]
    fn test_unknown_names_are_skipped() {
        let program = program();
        let map = IdToDeclMap::from_program(&program, &[(1, "egress.missing")], &[]);
        assert!(map.table(1).is_none());
    }
}
