//! Camera error types

use thiserror::Error;

/// Errors from acquiring or encoding camera frames
#[derive(Error, Debug)]
pub enum CameraError {
    /// The stream could not be acquired
    #[error("Camera access denied for {device}: {reason}")]
    AccessDenied { device: String, reason: String },

    /// JPEG encoding failed
    #[error("Encoding error: {0}")]
    Encode(#[from] image::ImageError),
}

/// Result type alias for camera operations
pub type CameraResult<T> = Result<T, CameraError>;
