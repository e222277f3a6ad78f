//! Error types for the capture crate

use thiserror::Error;

/// Errors that can occur while managing capture sessions
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Active session cap reached
    #[error("session limit reached ({max})")]
    SessionLimitReached { max: usize },
}

/// Result type for capture operations
pub type Result<T> = std::result::Result<T, CaptureError>;
