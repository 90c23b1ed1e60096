//! Randomness sources for particle spawning and bursts.
//!
//! With the `std` feature any `rand` generator works. Without it,
//! [`SimpleRng`] gives a small deterministic fallback.

use core::f32::consts::TAU;

use crate::Vector2D;

/// Uniform floats for the simulation.
pub trait Random {
    /// A value in `[0.0, 1.0)`.
    fn next_f32(&mut self) -> f32;

    /// A value in `[min, max)`.
    fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// A uniformly random direction scaled by a speed in `[min_speed, max_speed)`.
    fn impulse(&mut self, min_speed: f32, max_speed: f32) -> Vector2D {
        let angle = self.next_f32() * TAU;
        let speed = self.range_f32(min_speed, max_speed);
        Vector2D::from_angle(angle) * speed
    }
}

#[cfg(feature = "std")]
impl<R: rand::RngCore> Random for R {
    fn next_f32(&mut self) -> f32 {
        rand::Rng::gen::<f32>(self)
    }
}

/// Linear congruential generator, adequate for decorative scatter.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        // Numerical Recipes parameters
        const A: u32 = 1664525;
        const C: u32 = 1013904223;

        self.state = self.state.wrapping_mul(A).wrapping_add(C);
        self.state
    }
}

impl Random for SimpleRng {
    fn next_f32(&mut self) -> f32 {
        // top 24 bits fit the f32 mantissa exactly, so 1.0 is unreachable
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }
}
