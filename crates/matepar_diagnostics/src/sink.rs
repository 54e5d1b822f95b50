//! Per-run diagnostic collection.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::cell::RefCell;

/// Collects the diagnostics of a single placement run.
///
/// The engine borrows the sink immutably for the whole of `place_and_route`
/// and pushes progress notes, warnings and the final error through
/// [`emit`](Self::emit). Once the run returns, the caller drains everything
/// with [`take_all`](Self::take_all) and renders it. A drained sink can be
/// reused for the next run.
#[derive(Default)]
pub struct DiagnosticSink {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl DiagnosticSink {
    /// Creates a new empty diagnostic sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic in emission order.
    pub fn emit(&self, diag: Diagnostic) {
        self.diagnostics.borrow_mut().push(diag);
    }

    /// Returns `true` if an error is waiting to be drained.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|diag| diag.severity == Severity::Error)
    }

    /// Takes all recorded diagnostics, leaving the sink empty.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }
}
