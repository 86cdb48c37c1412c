//! Millimeter/pixel scaling and 2D rotation primitives.

use crate::error::ShowError;
use crate::types::WorldPoint;
use nalgebra::{Point2, Rotation2, Vector2};
use slamshow_env::PixelPoint;

/// Map resolution in millimeters per pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapScale {
    mm_per_pixel: f64,
}

impl MapScale {
    /// Creates a scale, rejecting zero, negative and non-finite values.
    pub fn new(mm_per_pixel: f64) -> Result<Self, ShowError> {
        if !mm_per_pixel.is_finite() || mm_per_pixel <= 0.0 {
            return Err(ShowError::InvalidScale(mm_per_pixel));
        }
        Ok(Self { mm_per_pixel })
    }

    pub fn mm_per_pixel(&self) -> f64 {
        self.mm_per_pixel
    }

    /// Converts millimeters to pixels, truncating toward zero.
    ///
    /// `-5 mm` at `10 mm/pixel` is pixel `0`, not `-1`.
    pub fn mm_to_pixel(&self, mm: f64) -> i32 {
        (mm / self.mm_per_pixel) as i32
    }

    /// Converts a world point to its pixel.
    pub fn to_pixel(&self, point: WorldPoint) -> PixelPoint {
        PixelPoint::new(self.mm_to_pixel(point.x_mm), self.mm_to_pixel(point.y_mm))
    }

    /// Width of a square map of `size_pixels` in millimeters.
    pub fn extent_mm(&self, size_pixels: usize) -> f64 {
        self.mm_per_pixel * size_pixels as f64
    }
}

/// Rotates `point` about the origin by `degrees` (counter-clockwise) and
/// truncates the result to pixels.
pub fn rotate(point: Point2<f64>, degrees: f64) -> PixelPoint {
    let rotated = rotate_vector(point.coords, degrees);
    PixelPoint::new(rotated.x as i32, rotated.y as i32)
}

/// Continuous counter-clockwise rotation.
pub fn rotate_vector(vector: Vector2<f64>, degrees: f64) -> Vector2<f64> {
    Rotation2::new(degrees.to_radians()) * vector
}

/// Vector of the given length pointing along a heading.
pub fn heading_offset(length: f64, degrees: f64) -> Vector2<f64> {
    rotate_vector(Vector2::new(length, 0.0), degrees)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_mm_to_pixel_exact() {
        let scale = MapScale::new(10.0).unwrap();
        assert_eq!(scale.mm_to_pixel(1000.0), 100);
        assert_eq!(scale.mm_to_pixel(0.0), 0);
    }

    #[test]
    fn test_mm_to_pixel_truncates_toward_zero() {
        let scale = MapScale::new(10.0).unwrap();
        // Truncation, not floor: floor(-0.5) would be -1
        assert_eq!(scale.mm_to_pixel(-5.0), 0);
        assert_eq!(scale.mm_to_pixel(-15.0), -1);
        assert_eq!(scale.mm_to_pixel(19.9), 1);
    }

    #[test]
    fn test_invalid_scales_rejected() {
        assert!(matches!(MapScale::new(0.0), Err(ShowError::InvalidScale(_))));
        assert!(MapScale::new(-1.0).is_err());
        assert!(MapScale::new(f64::NAN).is_err());
        assert!(MapScale::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_to_pixel_and_extent() {
        let scale = MapScale::new(40.0).unwrap();
        assert_eq!(scale.to_pixel(WorldPoint::new(16000.0, 399.0)), PixelPoint::new(400, 9));
        assert_relative_eq!(scale.extent_mm(800), 32000.0);
    }

    #[test]
    fn test_rotate_quarter_and_half_turn() {
        assert_eq!(rotate(Point2::new(10.0, 0.0), 90.0), PixelPoint::new(0, 10));
        assert_eq!(rotate(Point2::new(10.0, 0.0), 180.0), PixelPoint::new(-10, 0));
        assert_eq!(rotate(Point2::new(0.0, 10.0), 90.0), PixelPoint::new(-10, 0));
    }

    #[test]
    fn test_rotate_vector_is_continuous() {
        let v = rotate_vector(Vector2::new(1.0, 0.0), 45.0);
        assert_relative_eq!(v.x, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(v.y, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn test_heading_offset() {
        let d = heading_offset(0.1, 90.0);
        assert_relative_eq!(d.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(d.y, 0.1, epsilon = 1e-12);
    }

    proptest! {
        #[test]
        fn prop_mm_to_pixel_truncates(mm in -1.0e6f64..1.0e6, mm_per_pixel in 0.1f64..500.0) {
            let scale = MapScale::new(mm_per_pixel).unwrap();
            prop_assert_eq!(scale.mm_to_pixel(mm), (mm / mm_per_pixel).trunc() as i32);
        }

        #[test]
        fn prop_rotate_zero_is_identity(x in -10_000i32..10_000, y in -10_000i32..10_000) {
            let p = rotate(Point2::new(x as f64, y as f64), 0.0);
            prop_assert_eq!(p, PixelPoint::new(x, y));
        }

        #[test]
        fn prop_rotation_preserves_length(x in -1.0e3f64..1.0e3, y in -1.0e3f64..1.0e3, deg in -720.0f64..720.0) {
            let v = Vector2::new(x, y);
            let r = rotate_vector(v, deg);
            prop_assert!((r.norm() - v.norm()).abs() < 1e-9);
        }
    }
}
