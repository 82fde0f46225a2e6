//! Frame sources
//!
//! A source yields decoded RGB frames. The kiosk never talks to a device
//! driver itself: a capture daemon keeps the newest frame in an image file
//! and [`FileSource`] reads it.

use image::RgbImage;
use std::path::{Path, PathBuf};

use super::error::{CameraError, CameraResult};

/// Which way the camera faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    User,
    Environment,
}

/// Requested stream properties
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraints {
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub facing: Facing,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            ideal_width: 640,
            ideal_height: 480,
            facing: Facing::User,
        }
    }
}

/// A decoded frame at the stream's native resolution
pub type Frame = RgbImage;

/// Anything that can hand the kiosk the current video frame
pub trait FrameSource: Send + Sync {
    /// Acquire the stream. Failure means access was denied.
    fn open(&mut self, constraints: &Constraints) -> CameraResult<()>;

    /// The current frame, or `None` until one with real dimensions exists
    fn frame(&self) -> Option<Frame>;

    fn describe(&self) -> String;
}

/// Reads the newest frame from an image file
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for FileSource {
    fn open(&mut self, constraints: &Constraints) -> CameraResult<()> {
        let meta = std::fs::metadata(&self.path).map_err(|e| CameraError::AccessDenied {
            device: self.path.display().to_string(),
            reason: e.to_string(),
        })?;

        if !meta.is_file() {
            return Err(CameraError::AccessDenied {
                device: self.path.display().to_string(),
                reason: "not a file".to_string(),
            });
        }

        if let Ok((w, h)) = image::image_dimensions(&self.path) {
            if (w, h) != (constraints.ideal_width, constraints.ideal_height) {
                tracing::debug!(
                    width = w,
                    height = h,
                    ideal_width = constraints.ideal_width,
                    ideal_height = constraints.ideal_height,
                    "Camera delivers a non-ideal resolution"
                );
            }
        }

        Ok(())
    }

    fn frame(&self) -> Option<Frame> {
        match image::open(&self.path) {
            Ok(img) => {
                let rgb = img.to_rgb8();
                (rgb.width() > 0 && rgb.height() > 0).then_some(rgb)
            }
            Err(e) => {
                // The daemon may be mid-write; treat as no decoded frame yet
                tracing::debug!(path = ?self.path, error = %e, "No frame available");
                None
            }
        }
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// An in-memory frame; used for demos and tests
#[derive(Default)]
pub struct StaticSource {
    frame: Option<Frame>,
    deny: bool,
}

impl StaticSource {
    pub fn new(frame: Frame) -> Self {
        Self {
            frame: Some(frame),
            deny: false,
        }
    }

    /// A stream that has not decoded anything yet
    pub fn warming_up() -> Self {
        Self::default()
    }

    /// A stream the user refused
    pub fn denied() -> Self {
        Self {
            frame: None,
            deny: true,
        }
    }
}

impl FrameSource for StaticSource {
    fn open(&mut self, _constraints: &Constraints) -> CameraResult<()> {
        if self.deny {
            return Err(CameraError::AccessDenied {
                device: "static".to_string(),
                reason: "permission refused".to_string(),
            });
        }
        Ok(())
    }

    fn frame(&self) -> Option<Frame> {
        self.frame
            .clone()
            .filter(|f| f.width() > 0 && f.height() > 0)
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}
