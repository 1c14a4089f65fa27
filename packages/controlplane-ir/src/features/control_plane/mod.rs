//! Control-plane constraints
//!
//! Turns control-plane configuration (a controller's record or the entries
//! embedded in the program) into constraints over canonically named
//! symbolic variables, and builds the matching predicates tables apply at
//! execution time.
//!
//! Hexagonal layout:
//! - domain/: symbol registry, constraint model, record entities
//! - ports/: target extension seams
//! - infrastructure/: deserializer, static-entry initializer, resolver
//! - targets/: `core` and `v1model`
//! - application/: one full conversion run
//!
//! # Example
//!
//! ```rust,ignore
//! use controlplane_ir::features::control_plane::*;
//!
//! let id_map = IdToDeclMap::from_program(&program, &[(1, "ingress.fwd")], &[(2, "set_port")]);
//! let usecase = ControlPlaneUseCaseImpl::new(ControlPlaneConfig::default());
//! let outcome = usecase.build_constraints(&program, &id_map, Some(record))?;
//! for (table, constraint) in outcome.constraints.to_constraints() {
//!     println!("{}: {}", table, constraint);
//! }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod targets;

pub use application::{ControlPlaneUseCase, ControlPlaneUseCaseImpl};
pub use domain::*;
pub use infrastructure::{
    compute_core_match, convert_field_match, convert_record, decode_value,
    generate_initial_constraints, load_record, parse_entity, parse_record, ConfigDeserializer,
    CoreMatchKind, TableMatchResolver,
};
pub use ports::{ControlPlaneInitializer, MatchContext, TargetMatchHandler};
pub use targets::{create_initializer, create_resolver, TargetId};
