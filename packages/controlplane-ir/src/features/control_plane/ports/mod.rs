//! Target extension seams

pub mod initializer;
pub mod match_kind;

pub use initializer::ControlPlaneInitializer;
pub use match_kind::{MatchContext, TargetMatchHandler};
