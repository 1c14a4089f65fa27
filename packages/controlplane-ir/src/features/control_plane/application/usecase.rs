//! Control-plane UseCase
//!
//! One full conversion run: seed constraints from program-embedded entries
//! with the configured target's initializer, convert the configuration
//! record, and merge the record after the static entries.

use std::path::Path;

use tracing::info;

use crate::config::ControlPlaneConfig;
use crate::errors::Result;
use crate::features::control_plane::domain::{ConfigRecord, ConversionOutcome};
use crate::features::control_plane::infrastructure::{
    convert_record, generate_initial_constraints, load_record, parse_record, TableMatchResolver,
};
use crate::features::control_plane::targets::{create_initializer, create_resolver};
use crate::shared::models::{IdToDeclMap, Program};

/// Control-plane UseCase Trait
pub trait ControlPlaneUseCase: Send + Sync {
    /// Build constraints for `program`. `record` is an encoded configuration
    /// record in the configured format; `None` seeds static entries only.
    fn build_constraints(
        &self,
        program: &Program,
        id_map: &IdToDeclMap<'_>,
        record: Option<&[u8]>,
    ) -> Result<ConversionOutcome>;

    /// Same as [`build_constraints`](Self::build_constraints) with the record
    /// read from `path`
    fn build_constraints_from_file(
        &self,
        program: &Program,
        id_map: &IdToDeclMap<'_>,
        path: &Path,
    ) -> Result<ConversionOutcome>;

    /// Execution-time resolver for the configured target
    fn resolver(&self) -> TableMatchResolver;
}

/// Control-plane UseCase Implementation
#[derive(Debug, Clone, Default)]
pub struct ControlPlaneUseCaseImpl {
    config: ControlPlaneConfig,
}

impl ControlPlaneUseCaseImpl {
    pub fn new(config: ControlPlaneConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ControlPlaneConfig {
        &self.config
    }

    /// Static entries first, then the record
    fn convert(
        &self,
        program: &Program,
        id_map: &IdToDeclMap<'_>,
        record: Option<&ConfigRecord>,
    ) -> ConversionOutcome {
        let mut outcome = self.seed(program);
        if let Some(record) = record {
            outcome.merge_from(convert_record(record, id_map));
        }

        info!(
            arch = %self.config.target,
            tables = outcome.constraints.len(),
            diagnostics = outcome.diagnostics.len(),
            "built control-plane constraints"
        );
        outcome
    }

    fn seed(&self, program: &Program) -> ConversionOutcome {
        if !self.config.seed_static_entries {
            return ConversionOutcome::default();
        }
        let initializer = create_initializer(self.config.target);
        generate_initial_constraints(initializer.as_ref(), program)
    }
}

impl ControlPlaneUseCase for ControlPlaneUseCaseImpl {
    fn build_constraints(
        &self,
        program: &Program,
        id_map: &IdToDeclMap<'_>,
        record: Option<&[u8]>,
    ) -> Result<ConversionOutcome> {
        // a corrupt record aborts before seeding
        let record = record
            .map(|bytes| parse_record(bytes, self.config.record_format))
            .transpose()?;
        Ok(self.convert(program, id_map, record.as_ref()))
    }

    fn build_constraints_from_file(
        &self,
        program: &Program,
        id_map: &IdToDeclMap<'_>,
        path: &Path,
    ) -> Result<ConversionOutcome> {
        let record = load_record(path, self.config.record_format)?;
        Ok(self.convert(program, id_map, Some(&record)))
    }

    fn resolver(&self) -> TableMatchResolver {
        create_resolver(self.config.target)
    }
}
