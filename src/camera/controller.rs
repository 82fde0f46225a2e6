//! Camera controller
//!
//! Owns an acquired frame source and turns its current frame into the
//! base64 JPEG payload the recognition API expects.

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::ColorType;

use super::error::CameraResult;
use super::source::{Constraints, FrameSource};
use crate::settings::CameraQuality;

/// An acquired camera stream
pub struct Camera {
    source: Box<dyn FrameSource>,
    constraints: Constraints,
}

impl Camera {
    /// Acquire the stream behind `source`
    pub fn acquire(
        mut source: Box<dyn FrameSource>,
        constraints: Constraints,
    ) -> CameraResult<Self> {
        source.open(&constraints)?;
        tracing::info!(source = %source.describe(), "Camera ready");
        Ok(Self {
            source,
            constraints,
        })
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Encode the current frame as base64 JPEG at its native resolution.
    ///
    /// Returns `None` while the stream has no decoded dimensions.
    pub fn image_data(&self, quality: CameraQuality) -> CameraResult<Option<String>> {
        let Some(frame) = self.source.frame() else {
            return Ok(None);
        };

        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, quality.jpeg_quality()).encode(
            frame.as_raw(),
            frame.width(),
            frame.height(),
            ColorType::Rgb8,
        )?;

        tracing::debug!(
            width = frame.width(),
            height = frame.height(),
            bytes = jpeg.len(),
            "Captured frame"
        );
        Ok(Some(B64.encode(jpeg)))
    }
}
