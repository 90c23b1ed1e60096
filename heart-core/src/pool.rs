use alloc::vec::Vec;

use crate::sampler::Target;
use crate::{Random, Vector2D, Viewport};

/// A single particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vector2D,
    pub velocity: Vector2D,
}

impl Particle {
    pub fn new(position: Vector2D, velocity: Vector2D) -> Self {
        Self { position, velocity }
    }

    pub fn at_rest(position: Vector2D) -> Self {
        Self::new(position, Vector2D::zero())
    }

    /// A resting particle somewhere in `[0, width) × [0, height)`.
    pub fn random<R: Random>(rng: &mut R, width: f32, height: f32) -> Self {
        let position = Vector2D::new(rng.range_f32(0.0, width), rng.range_f32(0.0, height));
        Self::at_rest(position)
    }

    pub fn apply_impulse(&mut self, impulse: Vector2D) {
        self.velocity += impulse;
    }

    pub fn speed(&self) -> f32 {
        self.velocity.magnitude()
    }
}

/// What a [`ParticlePool::reconcile`] call changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reconciled {
    pub added: usize,
    pub removed: usize,
}

impl Reconciled {
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// The particle collection, kept index-aligned with the target list.
///
/// Particle `i` chases target `i`. The pairing is positional only: after a
/// rebuild a surviving particle follows whatever target now sits at its
/// index.
#[derive(Debug, Clone, Default)]
pub struct ParticlePool {
    particles: Vec<Particle>,
}

impl ParticlePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grows or truncates the pool so it holds one particle per target.
    ///
    /// New particles start at rest at a random spot inside the viewport;
    /// surplus particles are dropped from the end.
    pub fn reconcile<R: Random>(
        &mut self,
        targets: &[Target],
        viewport: &Viewport,
        rng: &mut R,
    ) -> Reconciled {
        let wanted = targets.len();
        let current = self.particles.len();
        let mut change = Reconciled::default();

        if current < wanted {
            let (width, height) = (viewport.width as f32, viewport.height as f32);
            self.particles
                .extend((current..wanted).map(|_| Particle::random(rng, width, height)));
            change.added = wanted - current;
        } else if current > wanted {
            self.particles.truncate(wanted);
            change.removed = current - wanted;
        }

        if !change.is_noop() {
            log::debug!(
                "particle pool reconciled to {} (+{} / -{})",
                wanted,
                change.added,
                change.removed
            );
        }
        change
    }

    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.particles.iter_mut()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }
}
