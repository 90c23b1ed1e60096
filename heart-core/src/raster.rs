//! Off-screen opacity buffers and the drawing seam used to fill them.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics::{
    mono_font::{ascii::FONT_9X18_BOLD, MonoFont, MonoTextStyle},
    pixelcolor::{Gray8, GrayColor},
    prelude::*,
    primitives::{Polyline, PrimitiveStyle},
    text::{Baseline, Text},
};

use crate::vector::round;
use crate::{Error, Result, Vector2D, Viewport};

/// Single-channel opacity image, row-major, one byte per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaBuffer {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl AlphaBuffer {
    /// A fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; width as usize * height as usize],
        }
    }

    pub fn from_alpha(width: u32, height: u32, alpha: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if alpha.len() != expected {
            return Err(Error::InvalidBuffer {
                expected,
                actual: alpha.len(),
            });
        }
        Ok(Self {
            width,
            height,
            alpha,
        })
    }

    /// Keeps the alpha channel of tightly packed RGBA pixels.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(Error::InvalidBuffer {
                expected,
                actual: rgba.len(),
            });
        }
        let alpha = rgba.chunks_exact(4).map(|pixel| pixel[3]).collect();
        Ok(Self {
            width,
            height,
            alpha,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Opacity at `(x, y)`; anything outside the buffer is transparent.
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.alpha[y as usize * self.width as usize + x as usize]
    }

    /// Raises the opacity at `(x, y)` to at least `alpha`.
    pub fn cover(&mut self, x: i32, y: i32, alpha: u8) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.alpha[index] = self.alpha[index].max(alpha);
    }

    pub fn count_above(&self, threshold: u8) -> usize {
        self.alpha.iter().filter(|&&a| a > threshold).count()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.alpha
    }
}

impl DrawTarget for AlphaBuffer {
    type Color = Gray8;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.cover(point.x, point.y, color.luma());
        }
        Ok(())
    }
}

impl OriginDimensions for AlphaBuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// An off-screen surface the heart and its label are drawn onto.
///
/// Implementations paint opaque ink on a transparent background and hand
/// back the resulting opacity channel.
pub trait ShapeCanvas {
    /// Strokes an open polyline through `points`.
    fn stroke_path(&mut self, points: &[Vector2D], line_width: f32) -> Result<()>;

    /// Width of `text` set in the bold label font at `font_px`.
    fn measure_text(&mut self, text: &str, font_px: u32) -> Result<f32>;

    /// Fills `text` centered horizontally and vertically on `center`.
    fn fill_text(&mut self, text: &str, font_px: u32, center: Vector2D) -> Result<()>;

    fn finish(self) -> Result<AlphaBuffer>
    where
        Self: Sized;
}

const LABEL_FONT: MonoFont<'static> = FONT_9X18_BOLD;

/// CPU canvas backed by embedded-graphics.
///
/// Text uses a bold bitmap font scaled nearest-neighbour to the requested
/// size; characters outside ASCII show the font's replacement glyph.
#[derive(Debug, Clone)]
pub struct SoftwareCanvas {
    buffer: AlphaBuffer,
}

impl SoftwareCanvas {
    pub fn new(viewport: &Viewport) -> Self {
        Self {
            buffer: AlphaBuffer::new(viewport.width, viewport.height),
        }
    }

    fn glyph_scale(font_px: u32) -> f32 {
        font_px as f32 / LABEL_FONT.character_size.height as f32
    }

    fn advance() -> u32 {
        LABEL_FONT.character_size.width + LABEL_FONT.character_spacing
    }
}

impl ShapeCanvas for SoftwareCanvas {
    fn stroke_path(&mut self, points: &[Vector2D], line_width: f32) -> Result<()> {
        let points: Vec<Point> = points
            .iter()
            .map(|p| Point::new(round(p.x) as i32, round(p.y) as i32))
            .collect();
        let width = round(line_width).max(1.0) as u32;

        infallible(
            Polyline::new(&points)
                .into_styled(PrimitiveStyle::with_stroke(Gray8::WHITE, width))
                .draw(&mut self.buffer),
        );
        Ok(())
    }

    fn measure_text(&mut self, text: &str, font_px: u32) -> Result<f32> {
        let columns = text.chars().count() as u32 * Self::advance();
        Ok(columns as f32 * Self::glyph_scale(font_px))
    }

    fn fill_text(&mut self, text: &str, font_px: u32, center: Vector2D) -> Result<()> {
        let chars = text.chars().count() as u32;
        if chars == 0 || font_px == 0 {
            return Ok(());
        }

        let mut glyphs = AlphaBuffer::new(chars * Self::advance(), LABEL_FONT.character_size.height);
        let style = MonoTextStyle::new(&LABEL_FONT, Gray8::WHITE);
        infallible(Text::with_baseline(text, Point::zero(), style, Baseline::Top).draw(&mut glyphs));

        let scale = Self::glyph_scale(font_px);
        let dest_width = round(glyphs.width() as f32 * scale).max(1.0) as i32;
        let dest_height = round(glyphs.height() as f32 * scale).max(1.0) as i32;
        let left = round(center.x - dest_width as f32 / 2.0) as i32;
        let top = round(center.y - dest_height as f32 / 2.0) as i32;

        for dy in 0..dest_height {
            let sy = ((dy as f32 / scale) as u32).min(glyphs.height() - 1);
            for dx in 0..dest_width {
                let sx = ((dx as f32 / scale) as u32).min(glyphs.width() - 1);
                let alpha = glyphs.alpha(sx, sy);
                if alpha > 0 {
                    self.buffer.cover(left + dx, top + dy, alpha);
                }
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<AlphaBuffer> {
        Ok(self.buffer)
    }
}

fn infallible<T>(result: core::result::Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
