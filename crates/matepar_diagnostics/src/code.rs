//! Diagnostic codes identifying what a placement run has to report.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of finding a diagnostic code belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// The design cannot be placed or routed on the device (`E1xx`).
    Infeasible,
    /// The optimizer stopped before reaching a zero-cost placement (`W2xx`).
    Convergence,
    /// Per-iteration optimizer scores (`P3xx`).
    Progress,
}

impl Category {
    /// Returns the letter that prefixes codes in this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Infeasible => 'E',
            Category::Convergence => 'W',
            Category::Progress => 'P',
        }
    }
}

/// A category prefix plus a number, displayed as e.g. `E102` or `P301`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}
