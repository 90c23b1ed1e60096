use core::f64::consts::TAU;

use heart_core::{
    AlphaBuffer, Error, ParticleRenderer, Result, ShapeCanvas, SurfaceProvider, Vector2D, Viewport,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, OffscreenCanvas, OffscreenCanvasRenderingContext2d,
};

const INK: &str = "#fff";

pub(crate) fn surface_error(err: JsValue) -> Error {
    Error::surface(format!("{:?}", err))
}

/// CSS font shorthand for the bold label face.
pub fn label_font(font_px: u32, family: &str) -> String {
    format!("700 {}px {}", font_px, family)
}

/// The on-screen canvas the particles are painted on.
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> std::result::Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Self { canvas, context })
    }
}

impl ParticleRenderer for CanvasRenderer {
    fn resize(&mut self, viewport: &Viewport) -> Result<()> {
        self.canvas.set_width(viewport.width);
        self.canvas.set_height(viewport.height);

        let (css_width, css_height) = viewport.logical_size();
        let style = self.canvas.style();
        style
            .set_property("width", &format!("{}px", css_width))
            .map_err(surface_error)?;
        style
            .set_property("height", &format!("{}px", css_height))
            .map_err(surface_error)?;
        Ok(())
    }

    fn clear(&mut self, background: &str) -> Result<()> {
        self.context.set_fill_style_str(background);
        self.context.fill_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
        Ok(())
    }

    fn fill_disc(&mut self, center: Vector2D, radius: f32, color: &str) -> Result<()> {
        self.context.begin_path();
        self.context.set_fill_style_str(color);
        self.context
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
            .map_err(surface_error)?;
        self.context.fill();
        Ok(())
    }
}

/// Hands out `OffscreenCanvas` surfaces for shape rasterization.
pub struct OffscreenSurface {
    font_family: String,
}

impl OffscreenSurface {
    pub fn new(font_family: impl Into<String>) -> Self {
        Self {
            font_family: font_family.into(),
        }
    }
}

impl SurfaceProvider for OffscreenSurface {
    type Canvas = OffscreenShapeCanvas;

    fn shape_canvas(&mut self, viewport: &Viewport) -> Result<OffscreenShapeCanvas> {
        OffscreenShapeCanvas::new(viewport, &self.font_family).map_err(surface_error)
    }
}

/// Browser-rasterized heart: real font shaping, so the ♥ glyph renders.
pub struct OffscreenShapeCanvas {
    context: OffscreenCanvasRenderingContext2d,
    width: u32,
    height: u32,
    font_family: String,
}

impl OffscreenShapeCanvas {
    pub fn new(viewport: &Viewport, font_family: &str) -> std::result::Result<Self, JsValue> {
        let canvas = OffscreenCanvas::new(viewport.width, viewport.height)?;
        let context = canvas
            .get_context("2d")?
            .ok_or("no offscreen 2d context")?
            .dyn_into::<OffscreenCanvasRenderingContext2d>()?;

        context.clear_rect(0.0, 0.0, viewport.width as f64, viewport.height as f64);
        Ok(Self {
            context,
            width: viewport.width,
            height: viewport.height,
            font_family: font_family.to_string(),
        })
    }

    fn set_font(&self, font_px: u32) {
        self.context.set_font(&label_font(font_px, &self.font_family));
    }
}

impl ShapeCanvas for OffscreenShapeCanvas {
    fn stroke_path(&mut self, points: &[Vector2D], line_width: f32) -> Result<()> {
        let Some((first, rest)) = points.split_first() else {
            return Ok(());
        };

        self.context.set_stroke_style_str(INK);
        self.context.set_line_width(line_width as f64);
        self.context.begin_path();
        self.context.move_to(first.x as f64, first.y as f64);
        for point in rest {
            self.context.line_to(point.x as f64, point.y as f64);
        }
        self.context.stroke();
        Ok(())
    }

    fn measure_text(&mut self, text: &str, font_px: u32) -> Result<f32> {
        self.set_font(font_px);
        let metrics = self.context.measure_text(text).map_err(surface_error)?;
        Ok(metrics.width() as f32)
    }

    fn fill_text(&mut self, text: &str, font_px: u32, center: Vector2D) -> Result<()> {
        self.set_font(font_px);
        self.context.set_fill_style_str(INK);
        self.context.set_text_align("center");
        self.context.set_text_baseline("middle");
        self.context
            .fill_text(text, center.x as f64, center.y as f64)
            .map_err(surface_error)
    }

    fn finish(self) -> Result<AlphaBuffer> {
        let image = self
            .context
            .get_image_data(0.0, 0.0, self.width as f64, self.height as f64)
            .map_err(surface_error)?;
        AlphaBuffer::from_rgba(self.width, self.height, &image.data().0)
    }
}
