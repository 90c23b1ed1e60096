use alloc::string::{String, ToString};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the particle heart.
///
/// Distances are in logical pixels and get multiplied by the device-pixel
/// ratio where they meet the device-pixel simulation space.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParticleConfig {
    /// Sampling grid spacing; lower means more particles.
    pub gap: f32,
    /// Particle disc radius.
    pub particle_size: f32,
    pub color: String,
    pub background: String,
    pub repel_radius: f32,
    pub repel_strength: f32,
    /// How fast particles approach their targets.
    pub ease: f32,
    /// Per-frame velocity damping.
    pub friction: f32,
    pub label: String,
    pub font_family: String,
    /// Heart size as a fraction of the smaller viewport side.
    pub heart_scale: f32,
    /// Polyline segments used for the heart outline.
    pub heart_steps: u32,
    /// Alpha values strictly above this become targets.
    pub alpha_threshold: u8,
    pub max_dpr: f32,
    pub burst_min_speed: f32,
    pub burst_max_speed: f32,
    pub resize_debounce_ms: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            gap: 5.0,
            particle_size: 1.8,
            color: "#ff57c7".to_string(),
            background: "#000".to_string(),
            repel_radius: 80.0,
            repel_strength: 0.15,
            ease: 0.08,
            friction: 0.85,
            label: "I \u{2665} You".to_string(),
            font_family: "Poppins, Arial, sans-serif".to_string(),
            heart_scale: 0.28,
            heart_steps: 700,
            alpha_threshold: 60,
            max_dpr: 2.0,
            burst_min_speed: 4.0,
            burst_max_speed: 10.0,
            resize_debounce_ms: 100.0,
        }
    }
}
