//! Custom assertions for test verification

use controlplane_ir::features::control_plane::{ConversionOutcome, DiagnosticKind};
use controlplane_ir::shared::models::{Expr, Valuation, Value};

/// Assert that the conversion recorded no diagnostics
pub fn assert_no_diagnostics(outcome: &ConversionOutcome) {
    assert!(
        outcome.diagnostics.is_empty(),
        "Expected no diagnostics, got: {:?}",
        outcome.diagnostics.iter().collect::<Vec<_>>()
    );
}

/// Assert the number of diagnostics of `kind`
pub fn assert_diagnostic_count(outcome: &ConversionOutcome, kind: DiagnosticKind, expected: usize) {
    let found = outcome.diagnostics.count(kind);
    assert_eq!(
        found,
        expected,
        "Expected {expected} {kind:?} diagnostics, got {found}: {:?}",
        outcome.diagnostics.iter().collect::<Vec<_>>()
    );
}

/// Evaluate a predicate over a single field binding
pub fn holds_for(pred: &Expr, field: &str, value: u64) -> bool {
    let env = Valuation::new().with_field(field, Value::bits(value));
    pred.evaluate_bool(&env)
        .unwrap_or_else(|e| panic!("evaluating {pred}: {e}"))
}
