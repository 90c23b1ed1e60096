//! Particle heart effect.
//!
//! A heart outline and a label are rasterized off-screen, the opaque pixels
//! on a coarse grid become targets, and one particle per target eases
//! toward it while the pointer pushes particles away. Everything here is
//! independent of the host: drawing goes through [`ShapeCanvas`] and
//! [`ParticleRenderer`], scheduling through [`FrameLoop::tick`].

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod config;
mod error;
mod frame;
mod pointer;
mod pool;
mod random;
mod raster;
mod render;
mod sampler;
mod shape;
mod simulation;
mod vector;
mod viewport;

pub use config::ParticleConfig;
pub use error::{Error, Result};
pub use frame::{Debounce, FrameLoop, SoftwareSurface, SurfaceProvider};
pub use pointer::{PointerTracker, POINTER_SENTINEL};
pub use pool::{Particle, ParticlePool, Reconciled};
pub use random::{Random, SimpleRng};
pub use raster::{AlphaBuffer, ShapeCanvas, SoftwareCanvas};
pub use render::ParticleRenderer;
pub use sampler::{sample_targets, sampling_stride, Target};
pub use shape::{fit_label, heart_point, rasterize_shape, HeartLayout};
pub use simulation::{Repulsion, Simulation, EASE_SCALE, REPEL_EPSILON, REPEL_IMPULSE};
pub use vector::Vector2D;
pub use viewport::Viewport;
