use crate::{Result, Vector2D, Viewport};

/// The visible surface particles are painted on each frame.
///
/// Colors are CSS color strings taken straight from the configuration.
pub trait ParticleRenderer {
    /// Called after a rebuild so the surface can match the new viewport.
    fn resize(&mut self, _viewport: &Viewport) -> Result<()> {
        Ok(())
    }

    /// Fills the whole surface with `background`.
    fn clear(&mut self, background: &str) -> Result<()>;

    fn fill_disc(&mut self, center: Vector2D, radius: f32, color: &str) -> Result<()>;
}
