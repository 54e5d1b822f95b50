//! Common result and error types for the matepar toolchain.

/// The standard result type for fallible tooling operations.
///
/// `Err` indicates an unrecoverable internal error (a bug in matepar or in the
/// code driving it), not an infeasible design. Infeasible designs are reported
/// through [`DiagnosticSink`](matepar_diagnostics) and the engine's own error type.
pub type ParResult<T> = Result<T, InternalError>;

/// An internal error indicating a bug, not a user input problem.
#[derive(Debug, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
