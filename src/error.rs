//! Process-level error type.
//!
//! Exit code conventions:
//! - 2: bad input or configuration (unreadable file, invalid flag values)
//! - 3: degenerate data (empty after sanitization, zero-width x-range)
//! - 4: numerical failure (all fitting strategies exhausted, non-finite output)
//!
//! Recoverable per-strategy fit failures are *not* represented here; they are
//! handled inside the fit engine and only surface as an exit-code-4 error once
//! every strategy has been exhausted.

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Bad input or configuration (exit code 2).
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Degenerate dataset (exit code 3).
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// Numerical / fatal fit failure (exit code 4).
    pub fn numeric(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
