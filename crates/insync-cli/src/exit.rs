//! Process exit codes
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Success, including a sheet without mapped leave records |
//! | 1 | Failure: unreadable input, missing marker, write error |

use std::process;

// ============================================================================
// Exit Code
// ============================================================================

/// Exit codes for CLI operations.
///
/// These are stable API for scripts wrapping the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// The command completed; warnings allowed
    Success = 0,
    /// The run was aborted with an error
    Failure = 1,
}

impl ExitCode {
    /// Map a command result onto an exit code
    pub fn from_result<T, E>(result: &Result<T, E>) -> Self {
        if result.is_ok() {
            ExitCode::Success
        } else {
            ExitCode::Failure
        }
    }

    /// Get the numeric value
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code as u8)
    }
}
