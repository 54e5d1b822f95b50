//! Diagnostic rendering backends.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// error[E102]: design is too big for the device
///    = note: netlist has 2 nodes with label 3 (LUT3), device only has 1
///    = help: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn severity_prefix(&self, severity: Severity) -> String {
        if !self.color {
            return severity.to_string();
        }
        let ansi = match severity {
            Severity::Error => "\x1b[1;31m",
            Severity::Warning => "\x1b[1;33m",
            Severity::Note => "\x1b[1;36m",
        };
        format!("{ansi}{severity}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = format!(
            "{}[{}]: {}\n",
            self.severity_prefix(diag.severity),
            diag.code,
            diag.message
        );

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};

    #[test]
    fn render_error_with_notes() {
        let code = DiagnosticCode::new(Category::Infeasible, 104);
        let diag = Diagnostic::error(code, "1 net could not be routed")
            .with_note("a.O -> b.I")
            .with_help("increase the device size");

        let output = TerminalRenderer::new(false).render(&diag);

        assert_eq!(
            output,
            "error[E104]: 1 net could not be routed\n   = note: a.O -> b.I\n   = help: increase the device size\n"
        );
    }

    #[test]
    fn render_plain_note() {
        let code = DiagnosticCode::new(Category::Progress, 301);
        let diag = Diagnostic::note(code, "iteration 7");
        let output = TerminalRenderer::new(false).render(&diag);
        assert_eq!(output, "note[P301]: iteration 7\n");
    }

    #[test]
    fn render_with_color() {
        let code = DiagnosticCode::new(Category::Convergence, 201);
        let diag = Diagnostic::warning(code, "gave up");
        let output = TerminalRenderer::new(true).render(&diag);
        assert!(output.starts_with("\x1b[1;33mwarning\x1b[0m[W201]"));
    }
}
