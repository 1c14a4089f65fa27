//! Diagnostics for input the conversion could not use
//!
//! Skipped entries, fields and tables are reported here rather than failing
//! the conversion. Every recorded diagnostic is also emitted as a `tracing`
//! warning.

use serde::Serialize;

use crate::errors::EntryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    MalformedEntity,
    UnknownTable,
    UnknownField,
    DuplicateField,
    UnknownAction,
    UnsupportedMatchKind,
    MatchKindMismatch,
    InvalidMatchValue,
    UnsupportedActionProfile,
    StaticEntryMismatch,
}

impl DiagnosticKind {
    /// Classify a per-entry error
    pub fn of(error: &EntryError) -> Self {
        match error {
            EntryError::UnknownTable(_) => DiagnosticKind::UnknownTable,
            EntryError::UnknownField { .. } => DiagnosticKind::UnknownField,
            EntryError::DuplicateField { .. } => DiagnosticKind::DuplicateField,
            EntryError::UnknownActionId(_)
            | EntryError::UnknownAction(_)
            | EntryError::ActionNotInTable { .. }
            | EntryError::UnknownParam { .. }
            | EntryError::ArgumentCount { .. }
            | EntryError::MissingAction => DiagnosticKind::UnknownAction,
            EntryError::UnsupportedMatchKind(_) => DiagnosticKind::UnsupportedMatchKind,
            EntryError::MatchKindMismatch { .. } | EntryError::UnsupportedKeyType { .. } => {
                DiagnosticKind::MatchKindMismatch
            }
            EntryError::InvalidPrefixLength { .. }
            | EntryError::ValueOutOfRange { .. }
            | EntryError::DefaultActionWithMatches => DiagnosticKind::InvalidMatchValue,
            EntryError::KeyCountMismatch { .. } | EntryError::StaticKeyMismatch { .. } => {
                DiagnosticKind::StaticEntryMismatch
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Table the diagnostic concerns, when known
    pub table: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, table: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            kind,
            table: table.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn from_entry_error(table: Option<&str>, error: &EntryError) -> Self {
        Self::new(DiagnosticKind::of(error), table, error.to_string())
    }
}

/// Ordered diagnostics of one conversion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(
            kind = ?diagnostic.kind,
            table = diagnostic.table.as_deref().unwrap_or("-"),
            "{}",
            diagnostic.message
        );
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of diagnostics of `kind`
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.items.iter().filter(|d| d.kind == kind).count()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
