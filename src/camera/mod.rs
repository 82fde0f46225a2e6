//! Camera Controller
//!
//! Acquires a user-facing stream at roughly 640x480 and extracts single
//! frames as base64 JPEG.

mod controller;
mod error;
mod source;

pub use controller::Camera;
pub use error::{CameraError, CameraResult};
pub use source::{Constraints, Facing, FileSource, Frame, FrameSource, StaticSource};
