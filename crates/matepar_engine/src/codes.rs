//! Diagnostic codes and helper functions for placement diagnostics.
//!
//! Error codes `E101`--`E104` mirror the [`PlacementError`] variants. `W201`
//! reports an optimizer that ran out of temperature, and `P301`/`P302` are
//! progress notes.

use crate::error::PlacementError;
use matepar_diagnostics::{Category, Diagnostic, DiagnosticCode};

/// Netlist label beyond the device's label range.
pub const E101: DiagnosticCode = DiagnosticCode::new(Category::Infeasible, 101);

/// Design too big for the device.
pub const E102: DiagnosticCode = DiagnosticCode::new(Category::Infeasible, 102);

/// Initial placement strategy failed.
pub const E103: DiagnosticCode = DiagnosticCode::new(Category::Infeasible, 103);

/// Unroutable netlist edges after optimization.
pub const E104: DiagnosticCode = DiagnosticCode::new(Category::Infeasible, 104);

/// Temperature exhausted with a non-zero cost.
pub const W201: DiagnosticCode = DiagnosticCode::new(Category::Convergence, 201);

/// Per-iteration score.
pub const P301: DiagnosticCode = DiagnosticCode::new(Category::Progress, 301);

/// Start-of-run summary.
pub const P302: DiagnosticCode = DiagnosticCode::new(Category::Progress, 302);

/// Returns the code reported for a placement error.
pub fn code_for(err: &PlacementError) -> DiagnosticCode {
    match err {
        PlacementError::LabelOutOfRange { .. } => E101,
        PlacementError::DesignTooBig { .. } => E102,
        PlacementError::InitialPlacementFailed => E103,
        PlacementError::Unroutable { .. } => E104,
    }
}

/// Creates the error diagnostic for a placement failure.
///
/// Unroutable edges are described by the engine and attached as notes by the caller.
pub fn error_placement(err: &PlacementError) -> Diagnostic {
    let diag = Diagnostic::error(code_for(err), err.to_string());
    match err {
        PlacementError::LabelOutOfRange { .. } => {
            diag.with_help("netlist and device must be built with the same label allocation")
        }
        PlacementError::DesignTooBig { .. } => {
            diag.with_help("reduce the design or target a larger device")
        }
        PlacementError::InitialPlacementFailed => {
            diag.with_note("placement constraints may leave no legal site for some node")
        }
        PlacementError::Unroutable { .. } => diag.with_help("try another seed"),
    }
}

/// Creates the warning for an optimizer that gave up with a non-zero cost.
pub fn warning_gave_up(iterations: u32, cost: u32) -> Diagnostic {
    Diagnostic::warning(
        W201,
        format!("placement did not converge after {iterations} iterations (cost {cost})"),
    )
}

/// Creates the per-iteration score note.
pub fn note_score(
    iteration: u32,
    unroutable: u32,
    congestion: u32,
    timing: u32,
    total: u32,
) -> Diagnostic {
    Diagnostic::note(
        P301,
        format!(
            "iteration {iteration}: unroutability cost {unroutable}, congestion cost {congestion}, timing cost {timing} (total {total})"
        ),
    )
}

/// Creates the start-of-run summary note.
pub fn note_start(instances: usize, sites: usize, nets: usize, channels: usize) -> Diagnostic {
    Diagnostic::note(
        P302,
        format!("global placement of {instances} instances into {sites} sites"),
    )
    .with_note(format!("{nets} nets, {channels} routing channels available"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use matepar_diagnostics::Severity;

    #[test]
    fn codes_display() {
        assert_eq!(E102.to_string(), "E102");
        assert_eq!(W201.to_string(), "W201");
        assert_eq!(P301.to_string(), "P301");
    }

    #[test]
    fn error_uses_variant_code() {
        let diag = error_placement(&PlacementError::InitialPlacementFailed);
        assert_eq!(diag.code, E103);
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "initial placement failed");
    }

    #[test]
    fn score_note_text() {
        let diag = note_score(3, 1, 0, 0, 10);
        assert_eq!(diag.severity, Severity::Note);
        assert_eq!(
            diag.message,
            "iteration 3: unroutability cost 1, congestion cost 0, timing cost 0 (total 10)"
        );
    }
}
