//! Turns a rasterized shape into particle destinations.

use alloc::vec::Vec;

use crate::raster::AlphaBuffer;
use crate::vector::round;
use crate::Vector2D;

/// A destination point in device-pixel space.
pub type Target = Vector2D;

/// Grid spacing in device pixels for a logical `gap`, never below one pixel.
pub fn sampling_stride(gap: f32, dpr: f32) -> usize {
    let stride = round(gap * dpr);
    if stride.is_finite() && stride >= 1.0 {
        stride as usize
    } else {
        1
    }
}

/// Collects every grid pixel whose opacity exceeds `threshold`.
///
/// Rows are scanned top to bottom, pixels left to right, so the output
/// order is stable for a given buffer.
pub fn sample_targets(buffer: &AlphaBuffer, stride: usize, threshold: u8) -> Vec<Target> {
    let stride = stride.max(1);
    let mut targets = Vec::new();

    for y in (0..buffer.height()).step_by(stride) {
        for x in (0..buffer.width()).step_by(stride) {
            if buffer.alpha(x, y) > threshold {
                targets.push(Target::new(x as f32, y as f32));
            }
        }
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_stride_scales_with_dpr() {
        assert_eq!(sampling_stride(5.0, 1.0), 5);
        assert_eq!(sampling_stride(5.0, 2.0), 10);
        assert_eq!(sampling_stride(5.0, 1.5), 8);
        assert_eq!(sampling_stride(0.0, 2.0), 1);
        assert_eq!(sampling_stride(f32::NAN, 1.0), 1);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let buffer = AlphaBuffer::from_alpha(3, 1, vec![60, 61, 255]).unwrap();
        let targets = sample_targets(&buffer, 1, 60);
        assert_eq!(targets, vec![Target::new(1.0, 0.0), Target::new(2.0, 0.0)]);
    }

    #[test]
    fn test_only_grid_pixels_are_visited() {
        let mut buffer = AlphaBuffer::new(10, 10);
        buffer.cover(3, 3, 255);
        buffer.cover(5, 5, 255);
        buffer.cover(0, 5, 255);

        let targets = sample_targets(&buffer, 5, 60);
        assert_eq!(targets, vec![Target::new(0.0, 5.0), Target::new(5.0, 5.0)]);
    }

    #[test]
    fn test_row_major_order() {
        let buffer = AlphaBuffer::from_alpha(2, 2, vec![255; 4]).unwrap();
        let targets = sample_targets(&buffer, 1, 60);
        assert_eq!(
            targets,
            vec![
                Target::new(0.0, 0.0),
                Target::new(1.0, 0.0),
                Target::new(0.0, 1.0),
                Target::new(1.0, 1.0),
            ]
        );
    }

    #[test]
    fn test_transparent_buffer_yields_nothing() {
        let buffer = AlphaBuffer::new(400, 400);
        assert!(sample_targets(&buffer, 5, 60).is_empty());
    }

    #[test]
    fn test_sampling_is_deterministic() {
        let mut buffer = AlphaBuffer::new(64, 64);
        for i in 0..64 {
            buffer.cover(i, 63 - i, 200);
            buffer.cover(i, i / 2, 90);
        }
        assert_eq!(sample_targets(&buffer, 3, 60), sample_targets(&buffer, 3, 60));
    }
}
