//! The target silhouette: a parametric heart outline with a label inside.

use alloc::vec::Vec;
use core::f32::consts::TAU;

use crate::raster::{AlphaBuffer, ShapeCanvas};
use crate::vector::{cos, floor, sin};
use crate::{ParticleConfig, Result, Vector2D, Viewport};

/// Half-extent of the raw heart curve, used to normalise it to `scale`.
pub const HEART_EXTENT: f32 = 20.0;
pub const MIN_HEART_STEPS: u32 = 700;
pub const MIN_FONT_PX: u32 = 2;

const FONT_STEP_PX: u32 = 2;
const LINE_WIDTH_RATIO: f32 = 0.01;
const MIN_LINE_WIDTH: f32 = 2.0;
const FONT_RATIO: f32 = 0.35;
const LABEL_WIDTH_RATIO: f32 = 1.7;

/// The classic heart curve at parameter `t`, Y up.
pub fn heart_point(t: f32) -> Vector2D {
    let s = sin(t);
    Vector2D::new(
        16.0 * s * s * s,
        13.0 * cos(t) - 5.0 * cos(2.0 * t) - 2.0 * cos(3.0 * t) - cos(4.0 * t),
    )
}

/// Where and how large the heart sits in a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartLayout {
    pub center: Vector2D,
    pub scale: f32,
}

impl HeartLayout {
    pub fn new(viewport: &Viewport, config: &ParticleConfig) -> Self {
        Self {
            center: viewport.center(),
            scale: viewport.min_side() * config.heart_scale,
        }
    }

    /// Maps a curve point to screen space (Y grows downward).
    pub fn project(&self, point: Vector2D) -> Vector2D {
        Vector2D::new(
            self.center.x + point.x * self.scale / HEART_EXTENT,
            self.center.y - point.y * self.scale / HEART_EXTENT,
        )
    }

    /// `steps + 1` points from `t = 0` to `t = 2π` inclusive.
    pub fn outline(&self, steps: u32) -> Vec<Vector2D> {
        let steps = steps.max(MIN_HEART_STEPS);
        (0..=steps)
            .map(|i| self.project(heart_point(i as f32 / steps as f32 * TAU)))
            .collect()
    }

    pub fn line_width(&self) -> f32 {
        (self.scale * LINE_WIDTH_RATIO).max(MIN_LINE_WIDTH)
    }

    pub fn initial_font_px(&self) -> u32 {
        floor(self.scale * FONT_RATIO).max(0.0) as u32
    }

    pub fn max_label_width(&self) -> f32 {
        self.scale * LABEL_WIDTH_RATIO
    }
}

/// Shrinks the label font in 2px steps until it fits inside the heart.
pub fn fit_label<C: ShapeCanvas>(canvas: &mut C, label: &str, layout: &HeartLayout) -> Result<u32> {
    let mut font_px = layout.initial_font_px();
    let max_width = layout.max_label_width();

    while font_px > MIN_FONT_PX && canvas.measure_text(label, font_px)? > max_width {
        font_px = font_px.saturating_sub(FONT_STEP_PX).max(MIN_FONT_PX);
    }

    log::debug!("label {:?} fitted at {}px (max width {:.1})", label, font_px, max_width);
    Ok(font_px)
}

/// Draws the heart outline and label onto `canvas` and returns its opacity.
pub fn rasterize_shape<C: ShapeCanvas>(
    mut canvas: C,
    viewport: &Viewport,
    config: &ParticleConfig,
) -> Result<AlphaBuffer> {
    let layout = HeartLayout::new(viewport, config);

    canvas.stroke_path(&layout.outline(config.heart_steps), layout.line_width())?;

    if !config.label.is_empty() && layout.initial_font_px() > 0 {
        let font_px = fit_label(&mut canvas, &config.label, &layout)?;
        canvas.fill_text(&config.label, font_px, layout.center)?;
    }

    canvas.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::SoftwareCanvas;
    use alloc::string::String;

    /// Canvas that records calls and measures text at a fixed width per pixel.
    struct MeasuringCanvas {
        width_per_px: f32,
        measured: Vec<u32>,
        filled: Option<(String, u32, Vector2D)>,
        strokes: usize,
    }

    impl MeasuringCanvas {
        fn new(width_per_px: f32) -> Self {
            Self {
                width_per_px,
                measured: Vec::new(),
                filled: None,
                strokes: 0,
            }
        }
    }

    impl ShapeCanvas for MeasuringCanvas {
        fn stroke_path(&mut self, points: &[Vector2D], _line_width: f32) -> Result<()> {
            assert!(points.len() > MIN_HEART_STEPS as usize);
            self.strokes += 1;
            Ok(())
        }

        fn measure_text(&mut self, _text: &str, font_px: u32) -> Result<f32> {
            self.measured.push(font_px);
            Ok(font_px as f32 * self.width_per_px)
        }

        fn fill_text(&mut self, text: &str, font_px: u32, center: Vector2D) -> Result<()> {
            self.filled = Some((String::from(text), font_px, center));
            Ok(())
        }

        fn finish(self) -> Result<AlphaBuffer> {
            Ok(AlphaBuffer::new(1, 1))
        }
    }

    #[test]
    fn test_heart_curve_landmarks() {
        // t = 0 is the top notch, t = π the bottom tip
        let top = heart_point(0.0);
        assert!(top.x.abs() < 1e-5);
        assert!((top.y - 5.0).abs() < 1e-4);

        let bottom = heart_point(core::f32::consts::PI);
        assert!(bottom.x.abs() < 1e-4);
        assert!((bottom.y + 17.0).abs() < 1e-4);
    }

    #[test]
    fn test_outline_is_closed_and_flipped() {
        let viewport = Viewport::new(400, 400, 1.0).unwrap();
        let layout = HeartLayout::new(&viewport, &ParticleConfig::default());
        let outline = layout.outline(700);

        assert_eq!(outline.len(), 701);
        let first = outline[0];
        let last = outline[700];
        assert!(first.distance(&last) < 1e-3);

        // curve Y is negated: the bottom tip lies below the center
        let tip = outline[350];
        assert!(tip.y > layout.center.y);
        assert!((layout.scale - 112.0).abs() < 1e-4);
    }

    #[test]
    fn test_outline_enforces_minimum_steps() {
        let viewport = Viewport::new(100, 100, 1.0).unwrap();
        let layout = HeartLayout::new(&viewport, &ParticleConfig::default());
        assert_eq!(layout.outline(10).len(), MIN_HEART_STEPS as usize + 1);
    }

    #[test]
    fn test_line_width_floor() {
        let viewport = Viewport::new(100, 100, 1.0).unwrap();
        let layout = HeartLayout::new(&viewport, &ParticleConfig::default());
        assert_eq!(layout.line_width(), 2.0);
    }

    #[test]
    fn test_fit_label_shrinks_in_two_pixel_steps() {
        let viewport = Viewport::new(400, 400, 1.0).unwrap();
        let layout = HeartLayout::new(&viewport, &ParticleConfig::default());
        // scale 112: start at 39px, limit 190.4 wide
        let mut canvas = MeasuringCanvas::new(6.0);

        let font_px = fit_label(&mut canvas, "I ♥ You", &layout).unwrap();

        assert_eq!(font_px, 31);
        assert_eq!(canvas.measured, vec![39, 37, 35, 33, 31]);
    }

    #[test]
    fn test_fit_label_terminates_at_floor() {
        let viewport = Viewport::new(400, 400, 1.0).unwrap();
        let layout = HeartLayout::new(&viewport, &ParticleConfig::default());
        let mut canvas = MeasuringCanvas::new(f32::INFINITY);

        assert_eq!(fit_label(&mut canvas, "wide", &layout).unwrap(), MIN_FONT_PX);
    }

    #[test]
    fn test_label_is_fitted_and_centered() {
        let viewport = Viewport::new(400, 300, 1.0).unwrap();
        let config = ParticleConfig::default();
        let layout = HeartLayout::new(&viewport, &config);
        let mut canvas = MeasuringCanvas::new(1.0);

        canvas.stroke_path(&layout.outline(config.heart_steps), layout.line_width()).unwrap();
        let font_px = fit_label(&mut canvas, &config.label, &layout).unwrap();
        canvas.fill_text(&config.label, font_px, layout.center).unwrap();

        let (text, font_px, center) = canvas.filled.unwrap();
        assert_eq!(canvas.strokes, 1);
        assert_eq!(text, config.label);
        // scale 84: floor(29.4) already fits under 142.8
        assert_eq!(font_px, 29);
        assert_eq!(center, Vector2D::new(200.0, 150.0));
    }

    #[test]
    fn test_empty_label_skips_text() {
        let viewport = Viewport::new(200, 200, 1.0).unwrap();
        let config = ParticleConfig {
            label: String::new(),
            ..ParticleConfig::default()
        };
        let buffer = rasterize_shape(SoftwareCanvas::new(&viewport), &viewport, &config).unwrap();

        // only the outline is inked; the center stays clear
        assert!(buffer.count_above(60) > 0);
        assert_eq!(buffer.alpha(100, 100), 0);
    }

    #[test]
    fn test_software_rasterization_inks_outline_and_label() {
        let viewport = Viewport::new(400, 400, 1.0).unwrap();
        let config = ParticleConfig {
            label: String::from("HI"),
            ..ParticleConfig::default()
        };
        let layout = HeartLayout::new(&viewport, &config);
        let buffer = rasterize_shape(SoftwareCanvas::new(&viewport), &viewport, &config).unwrap();

        let tip = layout.project(heart_point(core::f32::consts::PI));
        let (tx, ty) = (tip.x as u32, tip.y as u32);
        let inked_near_tip = (tx - 2..=tx + 2)
            .flat_map(|x| (ty - 2..=ty + 2).map(move |y| (x, y)))
            .any(|(x, y)| buffer.alpha(x, y) > 60);
        assert!(inked_near_tip);
        assert!(buffer.count_above(60) > 100);
        assert_eq!(buffer.alpha(0, 0), 0);
    }
}
