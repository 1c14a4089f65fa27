//! Shared models
//!
//! Host-analyzer collaborators the control-plane layer consumes: types,
//! expressions and program declarations.

pub mod declarations;
pub mod evaluation;
pub mod expression;
pub mod id_map;
pub mod types;

pub use declarations::{
    ActionCall, ActionDecl, ActionParam, EntryKey, KeyElement, Program, StaticEntry, TableDecl,
};
pub use evaluation::{EvalError, Valuation, Value};
pub use expression::{BinaryOp, Expr, SymbolSet, SymbolicVariable};
pub use id_map::IdToDeclMap;
pub use types::Type;
