//! Diagnostic severity levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How seriously a caller should take a diagnostic.
///
/// Ordered from least to most severe.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// Optimizer progress, only emitted in verbose runs.
    Note,
    /// The run produced a placement, but not one the optimizer is happy with.
    Warning,
    /// The design cannot be placed and routed as given.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(text)
    }
}
