use crate::vector::floor;
use crate::{Error, Result, Vector2D};

/// Device-pixel dimensions of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    /// Effective device-pixel ratio, already capped.
    pub dpr: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32, dpr: f32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        Ok(Self { width, height, dpr })
    }

    /// Builds a viewport from the logical (CSS pixel) window size.
    ///
    /// The ratio is capped at `max_dpr`; a missing or nonsensical ratio
    /// counts as 1.
    pub fn from_logical(
        logical_width: f32,
        logical_height: f32,
        device_pixel_ratio: f32,
        max_dpr: f32,
    ) -> Result<Self> {
        let ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        let dpr = if max_dpr > 0.0 { ratio.min(max_dpr) } else { ratio };

        let width = floor(logical_width.max(0.0) * dpr) as u32;
        let height = floor(logical_height.max(0.0) * dpr) as u32;
        Self::new(width, height, dpr)
    }

    pub fn center(&self) -> Vector2D {
        Vector2D::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    pub fn min_side(&self) -> f32 {
        self.width.min(self.height) as f32
    }

    /// CSS size that maps back onto the device-pixel surface.
    pub fn logical_size(&self) -> (u32, u32) {
        (
            floor(self.width as f32 / self.dpr) as u32,
            floor(self.height as f32 / self.dpr) as u32,
        )
    }
}
