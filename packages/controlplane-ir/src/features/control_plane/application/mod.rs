//! Control-plane application layer

pub mod usecase;

pub use usecase::{ControlPlaneUseCase, ControlPlaneUseCaseImpl};
