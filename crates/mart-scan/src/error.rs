//! # Scan Error Types

use thiserror::Error;

/// Errors from the capture loop.
///
/// Camera and permission failures are resource-access errors: the UI layer
/// shows the message and offers a manual close, nothing is fatal.
#[derive(Debug, Clone, Error)]
pub enum ScanError {
    /// Camera could not be opened (missing device, permission denied).
    #[error("Camera access failed: {0}")]
    CameraAccess(String),

    /// A frame could not be captured from an open source.
    #[error("Frame capture failed: {0}")]
    Capture(String),
}

/// Result type for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;
