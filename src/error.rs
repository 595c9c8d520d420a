//! Process-level errors: every failure the binary reports, with its exit code.

use crate::ipu::IpuError;

/// Application-level error carrying the process exit code.
///
/// Exit codes: 2 = input/output, 3 = invalid data or options, 4 = fitting failure.
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

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<IpuError> for AppError {
    fn from(err: IpuError) -> Self {
        let exit_code = if err.is_numerical() { 4 } else { 3 };
        Self::new(exit_code, format!("IPU failed: {err}"))
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
