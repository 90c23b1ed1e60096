//! The per-frame particle update and the state it works on.

use alloc::vec::Vec;

use crate::pool::{Particle, ParticlePool, Reconciled};
use crate::raster::ShapeCanvas;
use crate::render::ParticleRenderer;
use crate::sampler::{sample_targets, sampling_stride, Target};
use crate::shape::rasterize_shape;
use crate::vector::sqrt;
use crate::{ParticleConfig, PointerTracker, Random, Result, Vector2D, Viewport};

/// Share of `ease` applied to the target offset each frame.
pub const EASE_SCALE: f32 = 0.1;
/// Floor on the pointer distance so a particle sitting on the pointer
/// never divides by zero.
pub const REPEL_EPSILON: f32 = 0.001;
/// Converts the repulsion force into a velocity change.
pub const REPEL_IMPULSE: f32 = 10.0;

/// Linear pointer falloff: strongest at the pointer, zero at the radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Repulsion {
    radius: f32,
    strength: f32,
}

impl Repulsion {
    /// `radius` is in logical pixels and scaled by `dpr`.
    pub fn new(radius: f32, strength: f32, dpr: f32) -> Self {
        Self {
            radius: radius * dpr,
            strength,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Force for a particle `distance_squared` away from the pointer.
    pub fn magnitude(&self, distance_squared: f32) -> f32 {
        if distance_squared.is_nan() || distance_squared >= self.radius * self.radius {
            return 0.0;
        }
        let distance = sqrt(distance_squared).max(REPEL_EPSILON);
        (1.0 - distance / self.radius) * self.strength
    }

    /// Velocity change for a particle at `offset` from the pointer.
    pub fn impulse(&self, offset: Vector2D) -> Vector2D {
        let distance_squared = offset.magnitude_squared();
        let force = self.magnitude(distance_squared);
        if force == 0.0 {
            return Vector2D::zero();
        }
        let distance = sqrt(distance_squared).max(REPEL_EPSILON);
        offset / distance * force * REPEL_IMPULSE
    }
}

/// Everything one running effect owns: tuning, surface size, targets,
/// particles, pointer and randomness.
///
/// Targets and particles are index-aligned; every mutation that touches one
/// list fixes up the other before returning.
#[derive(Debug, Clone)]
pub struct Simulation<R> {
    config: ParticleConfig,
    viewport: Viewport,
    targets: Vec<Target>,
    pool: ParticlePool,
    pointer: PointerTracker,
    rng: R,
}

impl<R: Random> Simulation<R> {
    /// An empty simulation; call [`rebuild`](Self::rebuild) to populate it.
    pub fn new(viewport: Viewport, config: ParticleConfig, rng: R) -> Self {
        Self {
            config,
            viewport,
            targets: Vec::new(),
            pool: ParticlePool::new(),
            pointer: PointerTracker::new(viewport.dpr),
            rng,
        }
    }

    /// Rasterizes the shape for `viewport`, samples it and swaps in the new
    /// targets. On failure nothing changes.
    pub fn rebuild<C: ShapeCanvas>(&mut self, viewport: Viewport, canvas: C) -> Result<usize> {
        let buffer = rasterize_shape(canvas, &viewport, &self.config)?;
        let stride = sampling_stride(self.config.gap, viewport.dpr);
        let targets = sample_targets(&buffer, stride, self.config.alpha_threshold);

        self.replace_targets(viewport, targets);
        log::info!(
            "rebuilt {}x{} @{}x: {} targets (stride {})",
            viewport.width,
            viewport.height,
            viewport.dpr,
            self.targets.len(),
            stride
        );
        Ok(self.targets.len())
    }

    /// Installs a new target list and reconciles the pool in one step.
    pub fn replace_targets(&mut self, viewport: Viewport, targets: Vec<Target>) -> Reconciled {
        self.viewport = viewport;
        self.pointer.set_scale(viewport.dpr);
        self.targets = targets;
        self.pool.reconcile(&self.targets, &self.viewport, &mut self.rng)
    }

    /// Advances every particle by one frame.
    pub fn step(&mut self) {
        debug_assert_eq!(self.pool.len(), self.targets.len());

        let ease = self.config.ease * EASE_SCALE;
        let friction = self.config.friction;
        let repulsion = self.repulsion();
        let pointer = self.pointer.position();

        for (particle, target) in self.pool.iter_mut().zip(self.targets.iter()) {
            Self::advance(particle, *target, pointer, ease, friction, &repulsion);
        }
    }

    fn advance(
        particle: &mut Particle,
        target: Target,
        pointer: Vector2D,
        ease: f32,
        friction: f32,
        repulsion: &Repulsion,
    ) {
        particle.velocity += (target - particle.position) * ease;
        particle.velocity += repulsion.impulse(particle.position - pointer);
        particle.velocity *= friction;
        particle.position += particle.velocity;
    }

    /// Clears the surface and draws every particle.
    pub fn render<D: ParticleRenderer>(&self, renderer: &mut D) -> Result<()> {
        renderer.clear(&self.config.background)?;

        let radius = self.config.particle_size * self.viewport.dpr;
        for particle in self.pool.iter() {
            renderer.fill_disc(particle.position, radius, &self.config.color)?;
        }
        Ok(())
    }

    /// Kicks every particle in an independent random direction.
    pub fn burst(&mut self) {
        let (min_speed, max_speed) = (self.config.burst_min_speed, self.config.burst_max_speed);
        for particle in self.pool.iter_mut() {
            particle.apply_impulse(self.rng.impulse(min_speed, max_speed));
        }
        log::debug!("burst across {} particles", self.pool.len());
    }

    pub fn repulsion(&self) -> Repulsion {
        Repulsion::new(
            self.config.repel_radius,
            self.config.repel_strength,
            self.viewport.dpr,
        )
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn particles(&self) -> &[Particle] {
        self.pool.as_slice()
    }

    /// Direct particle access, e.g. to place particles in tests or demos.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        self.pool.as_mut_slice()
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    pub fn pointer_mut(&mut self) -> &mut PointerTracker {
        &mut self.pointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SoftwareCanvas;
    use alloc::string::String;
    use alloc::vec;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Default)]
    struct Recorder {
        cleared: Vec<String>,
        discs: Vec<(Vector2D, f32, String)>,
    }

    impl ParticleRenderer for Recorder {
        fn clear(&mut self, background: &str) -> Result<()> {
            self.cleared.push(String::from(background));
            Ok(())
        }

        fn fill_disc(&mut self, center: Vector2D, radius: f32, color: &str) -> Result<()> {
            self.discs.push((center, radius, String::from(color)));
            Ok(())
        }
    }

    fn simulation(dpr: f32) -> Simulation<StdRng> {
        let viewport = Viewport::new(400, 400, dpr).unwrap();
        Simulation::new(viewport, ParticleConfig::default(), StdRng::seed_from_u64(1))
    }

    fn single(sim: &mut Simulation<StdRng>, target: Vector2D, position: Vector2D) {
        let viewport = *sim.viewport();
        sim.replace_targets(viewport, vec![target]);
        sim.particles_mut()[0] = Particle::at_rest(position);
    }

    #[test]
    fn test_repulsion_zero_at_radius() {
        let repulsion = Repulsion::new(80.0, 0.15, 1.0);
        assert_eq!(repulsion.magnitude(80.0 * 80.0), 0.0);
        assert_eq!(repulsion.impulse(Vector2D::new(80.0, 0.0)), Vector2D::zero());
        assert_eq!(repulsion.magnitude(f32::INFINITY), 0.0);
    }

    #[test]
    fn test_repulsion_peaks_at_pointer() {
        let repulsion = Repulsion::new(80.0, 0.15, 1.0);
        let peak = repulsion.magnitude(0.0);
        assert!((peak - (1.0 - REPEL_EPSILON / 80.0) * 0.15).abs() < 1e-7);
        assert!(peak > repulsion.magnitude(1.0));
        assert!(repulsion.magnitude(1.0) > repulsion.magnitude(40.0 * 40.0));
    }

    #[test]
    fn test_repulsion_radius_scales_with_dpr() {
        let repulsion = Repulsion::new(80.0, 0.15, 2.0);
        assert_eq!(repulsion.radius(), 160.0);
        assert!(repulsion.magnitude(100.0 * 100.0) > 0.0);
    }

    #[test]
    fn test_repulsion_pushes_away_from_pointer() {
        let repulsion = Repulsion::new(80.0, 0.15, 1.0);
        let push = repulsion.impulse(Vector2D::new(0.0, -20.0));
        assert_eq!(push.x, 0.0);
        assert!(push.y < 0.0);
        // (1 - 20/80) * 0.15 * 10
        assert!((push.magnitude() - 1.125).abs() < 1e-5);
    }

    #[test]
    fn test_step_eases_damps_and_integrates() {
        let mut sim = simulation(1.0);
        single(&mut sim, Vector2D::new(100.0, 100.0), Vector2D::new(0.0, 100.0));

        sim.step();

        // v = 100 * 0.008 * 0.85 = 0.68
        let particle = sim.particles()[0];
        assert!((particle.velocity.x - 0.68).abs() < 1e-5);
        assert_eq!(particle.velocity.y, 0.0);
        assert!((particle.position.x - 0.68).abs() < 1e-5);
    }

    #[test]
    fn test_particles_settle_on_targets() {
        let mut sim = simulation(1.0);
        single(&mut sim, Vector2D::new(200.0, 120.0), Vector2D::new(10.0, 390.0));

        for _ in 0..2000 {
            sim.step();
        }

        let particle = sim.particles()[0];
        assert!(particle.position.distance(&Vector2D::new(200.0, 120.0)) < 0.01);
        assert!(particle.speed() < 0.01);
    }

    #[test]
    fn test_pointer_on_target_speeds_particle_up() {
        let target = Vector2D::new(200.0, 200.0);
        let start = Vector2D::new(210.0, 200.0);

        let mut away = simulation(1.0);
        single(&mut away, target, start);
        away.step();

        let mut near = simulation(1.0);
        single(&mut near, target, start);
        near.pointer_mut().update(target.x, target.y);
        near.step();

        assert!(near.particles()[0].speed() > away.particles()[0].speed());
        assert!(near.particles()[0].velocity.x > 0.0);
    }

    #[test]
    fn test_burst_gives_every_particle_speed() {
        let mut sim = simulation(1.0);
        let viewport = *sim.viewport();
        let targets = (0..50).map(|i| Vector2D::new(i as f32, 0.0)).collect();
        sim.replace_targets(viewport, targets);

        sim.burst();

        assert_eq!(sim.particles().len(), 50);
        for particle in sim.particles() {
            let speed = particle.speed();
            assert!(speed >= 4.0 - 1e-4 && speed < 10.0 + 1e-4, "speed {speed}");
        }
    }

    #[test]
    fn test_render_clears_then_draws_scaled_discs() {
        let mut sim = simulation(2.0);
        let viewport = *sim.viewport();
        sim.replace_targets(viewport, vec![Vector2D::zero(); 3]);
        let mut recorder = Recorder::default();

        sim.render(&mut recorder).unwrap();

        assert_eq!(recorder.cleared, vec![String::from("#000")]);
        assert_eq!(recorder.discs.len(), 3);
        for (center, radius, color) in &recorder.discs {
            assert!(center.is_finite());
            assert!((radius - 3.6).abs() < 1e-6);
            assert_eq!(color, "#ff57c7");
        }
    }

    #[test]
    fn test_rebuild_keeps_lists_aligned() {
        let mut sim = simulation(1.0);
        let viewport = Viewport::new(400, 400, 1.0).unwrap();

        let count = sim.rebuild(viewport, SoftwareCanvas::new(&viewport)).unwrap();
        assert!(count > 0);
        assert_eq!(sim.particles().len(), sim.targets().len());

        let smaller = Viewport::new(200, 200, 1.0).unwrap();
        let count = sim.rebuild(smaller, SoftwareCanvas::new(&smaller)).unwrap();
        assert_eq!(sim.particles().len(), count);
        assert_eq!(sim.viewport(), &smaller);
    }
}
