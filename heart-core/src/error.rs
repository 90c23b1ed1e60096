use alloc::string::String;

/// Failures at the edges of the simulation: bad viewport sizes, malformed
/// pixel buffers, and drawing surfaces that are missing or refuse to draw.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("invalid viewport dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    InvalidBuffer { expected: usize, actual: usize },

    #[error("drawing surface unavailable: {0}")]
    Surface(String),
}

impl Error {
    pub fn surface(message: impl Into<String>) -> Self {
        Self::Surface(message.into())
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
