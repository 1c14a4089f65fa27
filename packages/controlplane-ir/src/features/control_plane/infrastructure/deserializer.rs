//! Configuration deserializer
//!
//! Parses a configuration record and converts its entities into
//! [`ControlPlaneConstraints`]. A record that does not parse is fatal. Past
//! that point every failure is local: the entry, field or entity is skipped
//! and a [`Diagnostic`] is recorded.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, info, warn};

use super::match_conversion::{convert_field_match, decode_checked};
use crate::config::RecordFormat;
use crate::errors::{EntryError, Result};
use crate::features::control_plane::domain::{
    ActionArgument, ActionBinding, ConfigRecord, ControlPlaneConstraints, ConversionOutcome,
    Diagnostic, DiagnosticKind, Diagnostics, Entity, FieldMatch, ProfileRef, TableAction,
    TableEntry, TableKeySet, TableMatchEntry,
};
use crate::shared::models::{IdToDeclMap, TableDecl};

/// Parse a whole configuration record.
///
/// Malformed syntax aborts: a corrupt record cannot be partially trusted.
pub fn parse_record(bytes: &[u8], format: RecordFormat) -> Result<ConfigRecord> {
    let record: ConfigRecord = match format {
        RecordFormat::Json => serde_json::from_slice(bytes)?,
        RecordFormat::Yaml => serde_yaml::from_slice(bytes)?,
    };
    debug!(entities = record.entities.len(), ?format, "parsed configuration record");
    Ok(record)
}

/// Parse a single JSON entity; `None` if the text is malformed
pub fn parse_entity(text: &str) -> Option<Entity> {
    match serde_json::from_str(text) {
        Ok(entity) => Some(entity),
        Err(err) => {
            warn!(error = %err, "skipping malformed entity");
            None
        }
    }
}

/// Read and parse a configuration record from `path`
pub fn load_record(path: impl AsRef<Path>, format: RecordFormat) -> Result<ConfigRecord> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading configuration record");
    let bytes = std::fs::read(path)?;
    parse_record(&bytes, format)
}

/// Convert `record` against `id_map` in one call
pub fn convert_record(record: &ConfigRecord, id_map: &IdToDeclMap<'_>) -> ConversionOutcome {
    let mut deserializer = ConfigDeserializer::new(id_map);
    let constraints = deserializer.convert_config(record);
    ConversionOutcome::new(constraints, deserializer.into_diagnostics())
}

/// Converts entities into constraints, collecting diagnostics along the way
pub struct ConfigDeserializer<'m> {
    id_map: &'m IdToDeclMap<'m>,
    diagnostics: Diagnostics,
}

impl<'m> ConfigDeserializer<'m> {
    pub fn new(id_map: &'m IdToDeclMap<'m>) -> Self {
        Self {
            id_map,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Convert every entity in order and merge the results
    pub fn convert_config(&mut self, record: &ConfigRecord) -> ControlPlaneConstraints {
        let mut constraints = ControlPlaneConstraints::new();
        for entity in &record.entities {
            constraints.merge_from(self.convert_entity(entity));
        }
        info!(
            entities = record.entities.len(),
            tables = constraints.len(),
            diagnostics = self.diagnostics.len(),
            "converted configuration record"
        );
        constraints
    }

    /// Convert one entity. Entity kinds that carry no table configuration
    /// contribute nothing.
    pub fn convert_entity(&mut self, entity: &Entity) -> ControlPlaneConstraints {
        let mut constraints = ControlPlaneConstraints::new();
        match entity {
            Entity::TableEntry(entry) => self.convert_table_entry(entry, &mut constraints),
            Entity::ActionProfileMember(_) | Entity::ActionProfileGroup(_) => {
                debug!(kind = entity.kind(), "action profile contents are not modeled");
            }
            Entity::Other { kind } => {
                debug!(kind = %kind, "ignoring unsupported entity");
            }
        }
        constraints
    }

    /// Parse and convert a single JSON entity; malformed text is skipped
    /// with a diagnostic.
    pub fn convert_entity_text(&mut self, text: &str) -> ControlPlaneConstraints {
        match parse_entity(text) {
            Some(entity) => self.convert_entity(&entity),
            None => {
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::MalformedEntity,
                    None,
                    "malformed entity skipped",
                ));
                ControlPlaneConstraints::new()
            }
        }
    }

    /// Convert `entry` and append it to `constraints`.
    ///
    /// Entries for tables this build does not know are skipped. A key field
    /// that cannot be resolved is left as a wildcard.
    pub fn convert_table_entry(
        &mut self,
        entry: &TableEntry,
        constraints: &mut ControlPlaneConstraints,
    ) {
        let Some(table) = self.id_map.table(entry.table_id) else {
            self.report(None, &EntryError::UnknownTable(entry.table_id));
            return;
        };

        if entry.is_default_action {
            if !entry.matches.is_empty() {
                self.report(Some(table), &EntryError::DefaultActionWithMatches);
                return;
            }
            match self.convert_action(table, entry.action.as_ref()) {
                Ok(action) => constraints.set_default_action(&table.name, action),
                Err(err) => self.report(Some(table), &err),
            }
            return;
        }

        let result = self.convert_key_set(table, &entry.matches).and_then(|key_set| {
            let action = self.convert_action(table, entry.action.as_ref())?;
            Ok(TableMatchEntry {
                key_set,
                action,
                priority: entry.priority,
            })
        });

        match result {
            Ok(converted) => constraints.add_match_entry(&table.name, converted),
            Err(err) => self.report(Some(table), &err),
        }
    }

    fn convert_key_set(
        &mut self,
        table: &TableDecl,
        matches: &[FieldMatch],
    ) -> std::result::Result<TableKeySet, EntryError> {
        let mut key_set = TableKeySet::new();
        let mut seen = BTreeSet::new();
        for field_match in matches {
            if !seen.insert(field_match.field_id) {
                return Err(EntryError::DuplicateField {
                    table: table.name.clone(),
                    field_id: field_match.field_id,
                });
            }
            let Some(key) = self.id_map.key_field(table, field_match.field_id) else {
                self.report(
                    Some(table),
                    &EntryError::UnknownField {
                        table: table.name.clone(),
                        field_id: field_match.field_id,
                    },
                );
                continue;
            };
            if let Some(predicate) = convert_field_match(key, &field_match.kind)? {
                key_set.insert(key.field_name(), predicate);
            }
        }
        Ok(key_set)
    }

    fn convert_action(
        &mut self,
        table: &TableDecl,
        action: Option<&TableAction>,
    ) -> std::result::Result<ActionBinding, EntryError> {
        let profile = match action.ok_or(EntryError::MissingAction)? {
            TableAction::Action(call) => {
                let decl = self
                    .id_map
                    .action(call.action_id)
                    .ok_or(EntryError::UnknownActionId(call.action_id))?;
                let ordinal = table
                    .action_ordinal(&decl.name)
                    .ok_or_else(|| EntryError::ActionNotInTable {
                        table: table.name.clone(),
                        action: decl.name.clone(),
                    })?;
                if call.params.len() != decl.params.len() {
                    return Err(EntryError::ArgumentCount {
                        action: decl.name.clone(),
                        expected: decl.params.len(),
                        found: call.params.len(),
                    });
                }

                let mut arguments = Vec::with_capacity(call.params.len());
                for value in &call.params {
                    let param = self.id_map.action_param(decl, value.param_id).ok_or_else(|| {
                        EntryError::UnknownParam {
                            action: decl.name.clone(),
                            param_id: value.param_id,
                        }
                    })?;
                    let decoded = decode_checked(&param.name, param.ty, &value.value)?;
                    arguments.push(ActionArgument::new(param.name.clone(), param.ty, decoded));
                }
                return Ok(ActionBinding::direct(decl.name.clone(), ordinal, arguments));
            }
            TableAction::ActionProfileMemberId(id) => ProfileRef::Member(*id),
            TableAction::ActionProfileGroupId(id) => ProfileRef::Group(*id),
        };

        self.diagnostics.push(Diagnostic::new(
            DiagnosticKind::UnsupportedActionProfile,
            Some(&table.name),
            format!("action profile {} is recorded as an action choice only", profile),
        ));
        Ok(ActionBinding::ProfileReference(profile))
    }

    fn report(&mut self, table: Option<&TableDecl>, err: &EntryError) {
        let table = table.map(|t| t.name.as_str());
        self.diagnostics.push(Diagnostic::from_entry_error(table, err));
    }
}
