//! Program fixtures
//!
//! A small v1model-style router: an LPM route table, an ACL with ternary,
//! range and optional keys, and a classifier with embedded entries.

use controlplane_ir::shared::models::{
    ActionCall, ActionDecl, EntryKey, Expr, IdToDeclMap, KeyElement, Program, StaticEntry,
    TableDecl, Type,
};

pub const ROUTE: &str = "ingress.ipv4_lpm";
pub const ACL: &str = "ingress.acl";
pub const CLASSIFY: &str = "ingress.classify";

pub const ROUTE_ID: u32 = 1;
pub const ACL_ID: u32 = 2;
pub const CLASSIFY_ID: u32 = 3;

pub const SET_NHOP_ID: u32 = 10;
pub const DROP_ID: u32 = 11;
pub const MARK_ID: u32 = 12;
pub const NO_ACTION_ID: u32 = 13;

pub fn dst_addr() -> Expr {
    Expr::field("hdr.ipv4.dst_addr", Type::bits(32))
}

pub fn ether_type() -> Expr {
    Expr::field("hdr.ethernet.ether_type", Type::bits(16))
}

pub fn l4_port() -> Expr {
    Expr::field("meta.l4_dst_port", Type::bits(16))
}

pub fn protocol() -> Expr {
    Expr::field("hdr.ipv4.protocol", Type::bits(8))
}

pub fn route_table() -> TableDecl {
    TableDecl::new(ROUTE)
        .with_key(KeyElement::new(dst_addr(), "lpm").with_name("dst_addr"))
        .with_action("set_nhop")
        .with_action("drop")
        .with_default_action(ActionCall::new("drop"))
}

pub fn acl_table() -> TableDecl {
    TableDecl::new(ACL)
        .with_key(KeyElement::new(ether_type(), "ternary").with_name("ether_type"))
        .with_key(KeyElement::new(l4_port(), "range").with_name("l4_dst_port"))
        .with_key(KeyElement::new(protocol(), "optional").with_name("protocol"))
        .with_action("drop")
        .with_action("NoAction")
}

pub fn classify_table(entries: Vec<StaticEntry>) -> TableDecl {
    let mut table = TableDecl::new(CLASSIFY)
        .with_key(KeyElement::new(ether_type(), "exact").with_name("ether_type"))
        .with_key(KeyElement::new(protocol(), "ternary").with_name("protocol"))
        .with_action("mark")
        .with_action("NoAction");
    for entry in entries {
        table = table.with_entry(entry);
    }
    table
}

pub fn classify_entries() -> Vec<StaticEntry> {
    vec![
        StaticEntry::new(
            vec![EntryKey::value(0x0800u32), EntryKey::mask(6u32, 0xffu32)],
            ActionCall::new("mark").with_arg(1u32),
        ),
        StaticEntry::new(
            vec![EntryKey::value(0x0800u32), EntryKey::DontCare],
            ActionCall::new("mark").with_arg(2u32),
        ),
    ]
}

pub fn router_program() -> Program {
    router_program_with(classify_entries())
}

pub fn router_program_with(classify: Vec<StaticEntry>) -> Program {
    Program::new()
        .with_table(route_table())
        .with_table(acl_table())
        .with_table(classify_table(classify))
        .with_action(
            ActionDecl::new("set_nhop")
                .with_param("port", Type::bits(9))
                .with_param("dmac", Type::bits(48)),
        )
        .with_action(ActionDecl::new("drop"))
        .with_action(ActionDecl::new("mark").with_param("class", Type::bits(4)))
        .with_action(ActionDecl::new("NoAction"))
}

pub fn router_id_map(program: &Program) -> IdToDeclMap<'_> {
    IdToDeclMap::from_program(
        program,
        &[(ROUTE_ID, ROUTE), (ACL_ID, ACL), (CLASSIFY_ID, CLASSIFY)],
        &[
            (SET_NHOP_ID, "set_nhop"),
            (DROP_ID, "drop"),
            (MARK_ID, "mark"),
            (NO_ACTION_ID, "NoAction"),
        ],
    )
}
