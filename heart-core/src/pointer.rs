use crate::Vector2D;

/// Where the pointer rests when it is away: far enough that no particle
/// can ever fall inside the repulsion radius.
pub const POINTER_SENTINEL: f32 = f32::INFINITY;

/// Latest known pointer position in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerTracker {
    position: Vector2D,
    scale: f32,
}

impl PointerTracker {
    /// A tracker with the pointer away; `scale` is the device-pixel ratio.
    pub fn new(scale: f32) -> Self {
        Self {
            position: Vector2D::new(POINTER_SENTINEL, POINTER_SENTINEL),
            scale,
        }
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    /// Stores a pointer position given in logical pixels.
    pub fn update(&mut self, x: f32, y: f32) {
        self.position = Vector2D::new(x * self.scale, y * self.scale);
    }

    /// Like [`update`](Self::update), but an absent coordinate is parked at
    /// the sentinel rather than read as zero.
    pub fn update_partial(&mut self, x: Option<f32>, y: Option<f32>) {
        self.position = Vector2D::new(
            x.map_or(POINTER_SENTINEL, |x| x * self.scale),
            y.map_or(POINTER_SENTINEL, |y| y * self.scale),
        );
    }

    /// Follows the first contact of a multi-touch list; no contacts means
    /// the pointer is away.
    pub fn update_from_contacts<I>(&mut self, contacts: I)
    where
        I: IntoIterator<Item = (f32, f32)>,
    {
        match contacts.into_iter().next() {
            Some((x, y)) => self.update(x, y),
            None => self.reset(),
        }
    }

    pub fn reset(&mut self) {
        self.position = Vector2D::new(POINTER_SENTINEL, POINTER_SENTINEL);
    }

    pub fn position(&self) -> Vector2D {
        self.position
    }

    pub fn is_present(&self) -> bool {
        self.position.is_finite()
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(1.0)
    }
}
