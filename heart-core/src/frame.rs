//! Frame-driven scheduling: debounced rebuilds and the per-frame tick.

use crate::raster::{ShapeCanvas, SoftwareCanvas};
use crate::render::ParticleRenderer;
use crate::{ParticleConfig, Random, Result, Simulation, Viewport};

/// Cancellable deadline that coalesces bursts of notifications.
///
/// Each [`notify`](Self::notify) re-arms the timer; [`fire`](Self::fire)
/// reports `true` exactly once, after `quiet_ms` pass without another
/// notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Debounce {
    quiet_ms: f64,
    deadline: Option<f64>,
}

impl Debounce {
    pub fn new(quiet_ms: f64) -> Self {
        Self {
            quiet_ms: quiet_ms.max(0.0),
            deadline: None,
        }
    }

    pub fn notify(&mut self, now_ms: f64) {
        self.deadline = Some(now_ms + self.quiet_ms);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn fire(&mut self, now_ms: f64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Creates off-screen canvases for rebuilds.
pub trait SurfaceProvider {
    type Canvas: ShapeCanvas;

    fn shape_canvas(&mut self, viewport: &Viewport) -> Result<Self::Canvas>;
}

/// Always-available CPU canvases.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareSurface;

impl SurfaceProvider for SoftwareSurface {
    type Canvas = SoftwareCanvas;

    fn shape_canvas(&mut self, viewport: &Viewport) -> Result<SoftwareCanvas> {
        Ok(SoftwareCanvas::new(viewport))
    }
}

/// Drives a [`Simulation`] once per display frame.
///
/// Resize notifications only arm the debounce; the rebuild itself runs at
/// the start of the next due tick, so a step never sees targets and
/// particles out of step with each other.
pub struct FrameLoop<R, S> {
    simulation: Simulation<R>,
    surfaces: S,
    debounce: Debounce,
    pending: Option<Viewport>,
    frames: u64,
}

impl<R: Random, S: SurfaceProvider> FrameLoop<R, S> {
    pub fn new(viewport: Viewport, config: ParticleConfig, rng: R, surfaces: S) -> Self {
        let debounce = Debounce::new(config.resize_debounce_ms);
        Self {
            simulation: Simulation::new(viewport, config, rng),
            surfaces,
            debounce,
            pending: None,
            frames: 0,
        }
    }

    /// Records the latest viewport and (re)arms the rebuild timer.
    pub fn notify_resize(&mut self, viewport: Viewport, now_ms: f64) {
        self.pending = Some(viewport);
        self.debounce.notify(now_ms);
    }

    /// Rebuilds for `viewport` right away, bypassing the debounce.
    ///
    /// A failure is logged and leaves the previous targets in place.
    pub fn rebuild_now<D: ParticleRenderer>(
        &mut self,
        viewport: Viewport,
        renderer: &mut D,
    ) -> Result<()> {
        let rebuilt = self
            .surfaces
            .shape_canvas(&viewport)
            .and_then(|canvas| self.simulation.rebuild(viewport, canvas));

        match rebuilt {
            Ok(_) => renderer.resize(&viewport),
            Err(err) => {
                log::warn!("skipping rebuild for {}x{}: {}", viewport.width, viewport.height, err);
                Ok(())
            }
        }
    }

    /// One display frame: pending rebuild, physics step, redraw.
    pub fn tick<D: ParticleRenderer>(&mut self, now_ms: f64, renderer: &mut D) -> Result<()> {
        if self.debounce.fire(now_ms) {
            if let Some(viewport) = self.pending.take() {
                self.rebuild_now(viewport, renderer)?;
            }
        }

        self.simulation.step();
        self.frames += 1;
        self.simulation.render(renderer)
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_rebuild_pending(&self) -> bool {
        self.debounce.is_armed()
    }

    pub fn simulation(&self) -> &Simulation<R> {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation<R> {
        &mut self.simulation
    }
}
