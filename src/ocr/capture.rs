//! Grabbing a screen region and preparing it for OCR

use image::{GrayImage, RgbaImage};
use thiserror::Error;

use super::job::Region;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("screen capture is not available in this build (enable the `screen-capture` feature)")]
    Unsupported,

    #[error("no monitor contains the region origin ({x}, {y})")]
    NoMonitor { x: i32, y: i32 },

    #[error("screen capture failed: {0}")]
    Backend(String),
}

/// Produces one raster frame of a region on demand.
pub trait FrameSource: Send + Sync {
    fn capture(&self, region: &Region) -> Result<RgbaImage, CaptureError>;
}

/// Threshold a frame to pure black and white.
pub fn binarize(frame: &RgbaImage, threshold: u8) -> GrayImage {
    let mut gray = image::imageops::grayscale(frame);
    for pixel in gray.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > threshold { 255 } else { 0 };
    }
    gray
}

/// Real screen capture via `xcap`.
///
/// Picks the monitor containing the region's top-left corner, captures it and
/// crops. Parts of the region beyond that monitor are clipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScreenCapture;

#[cfg(feature = "screen-capture")]
impl FrameSource for ScreenCapture {
    fn capture(&self, region: &Region) -> Result<RgbaImage, CaptureError> {
        use xcap::Monitor;

        let backend = |e: xcap::XCapError| CaptureError::Backend(e.to_string());

        for monitor in Monitor::all().map_err(backend)? {
            let (mx, my) = (monitor.x().map_err(backend)?, monitor.y().map_err(backend)?);
            let (mw, mh) = (
                monitor.width().map_err(backend)?,
                monitor.height().map_err(backend)?,
            );

            let inside_x = region.left >= mx && (region.left as i64) < mx as i64 + mw as i64;
            let inside_y = region.top >= my && (region.top as i64) < my as i64 + mh as i64;
            if !(inside_x && inside_y) {
                continue;
            }

            let screenshot = monitor.capture_image().map_err(backend)?;
            let rel_x = (region.left - mx) as u32;
            let rel_y = (region.top - my) as u32;
            let cropped =
                image::imageops::crop_imm(&screenshot, rel_x, rel_y, region.width, region.height)
                    .to_image();
            return Ok(cropped);
        }

        Err(CaptureError::NoMonitor {
            x: region.left,
            y: region.top,
        })
    }
}

#[cfg(not(feature = "screen-capture"))]
impl FrameSource for ScreenCapture {
    fn capture(&self, _region: &Region) -> Result<RgbaImage, CaptureError> {
        Err(CaptureError::Unsupported)
    }
}
