//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the linkdupes binary.
///
/// The build phase is lenient: unreadable subtrees and unhashable files are
/// warned about and the run still exits 0. Only mutation-phase failures
/// (delete, hardlink, prune) are fatal and terminate with a non-zero code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Completed normally, including runs with recoverable scan warnings.
    Success = 0,
    /// A fatal error aborted the run.
    GeneralError = 1,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "LD000",
            Self::GeneralError => "LD001",
        }
    }
}

/// Structured error information for JSON output (`--json-errors`).
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "LD001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
        }
    }
}
