//! DPI normalization
//!
//! One screen is reported by the OS in its own pixel density. Any raw X
//! outside the native range belongs to a screen whose pixels have to be
//! scaled to line up with the logical layout.

use super::{round_coord, LayoutError, LayoutResult, Point};

/// Converts between raw device coordinates and logical coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleTransform {
    factor: f64,
    native_min: i32,
    native_max: i32,
}

impl ScaleTransform {
    /// Create a transform that scales by `factor` whenever X falls outside
    /// `[native_min, native_max]`
    pub fn new(factor: f64, native_min: i32, native_max: i32) -> LayoutResult<Self> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(LayoutError::InvalidScale(format!(
                "factor must be a positive number, got {}",
                factor
            )));
        }
        if native_min > native_max {
            return Err(LayoutError::InvalidScale(format!(
                "native range {}..={} is inverted",
                native_min, native_max
            )));
        }

        // Scaled X outside the native range must stay outside it, or
        // unscale cannot tell logical positions from native ones. Scaling is
        // monotonic, so checking the first X past each edge is enough.
        let below = (f64::from(native_min) - 1.0) * factor;
        let above = (f64::from(native_max) + 1.0) * factor;
        if below.round() >= f64::from(native_min) || above.round() <= f64::from(native_max) {
            return Err(LayoutError::InvalidScale(format!(
                "factor {} maps raw X outside {}..={} back into it",
                factor, native_min, native_max
            )));
        }

        Ok(Self {
            factor,
            native_min,
            native_max,
        })
    }

    /// A transform that never changes anything
    pub fn identity() -> Self {
        Self {
            factor: 1.0,
            native_min: i32::MIN,
            native_max: i32::MAX,
        }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn native_range(&self) -> (i32, i32) {
        (self.native_min, self.native_max)
    }

    fn is_native(&self, x: i32) -> bool {
        (self.native_min..=self.native_max).contains(&x)
    }

    /// Raw device coordinates to logical coordinates
    pub fn scale(&self, p: Point) -> Point {
        if self.is_native(p.x) {
            return p;
        }
        Point::new(
            round_coord(p.x as f64 * self.factor),
            round_coord(p.y as f64 * self.factor),
        )
    }

    /// Logical coordinates back to raw device coordinates
    pub fn unscale(&self, p: Point) -> Point {
        if self.is_native(p.x) {
            return p;
        }
        Point::new(
            round_coord(p.x as f64 / self.factor),
            round_coord(p.y as f64 / self.factor),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> ScaleTransform {
        ScaleTransform::new(1.5, 0, 3839).unwrap()
    }

    #[test]
    fn test_native_range_is_identity() {
        let scale = reference();
        for x in [0, 1, 1920, 3838, 3839] {
            let p = Point::new(x, 1234);
            assert_eq!(scale.scale(p), p);
            assert_eq!(scale.unscale(p), p);
        }
    }

    #[test]
    fn test_scales_outside_native_range() {
        let scale = reference();
        assert_eq!(scale.scale(Point::new(-100, 200)), Point::new(-150, 300));
        assert_eq!(scale.scale(Point::new(4000, 1000)), Point::new(6000, 1500));
        // ties round away from zero
        assert_eq!(scale.scale(Point::new(-5, 3)), Point::new(-8, 5));
    }

    #[test]
    fn test_round_trip_within_one_unit() {
        let scale = reference();
        for x in [-3840, -1001, -5, -1, 3840, 3841, 4001, 5760, 7679] {
            for y in [-7, 0, 1, 333, 2000, 2159] {
                let p = Point::new(x, y);
                let back = scale.unscale(scale.scale(p));
                assert!((back.x - p.x).abs() <= 1, "{} -> {}", p, back);
                assert!((back.y - p.y).abs() <= 1, "{} -> {}", p, back);
            }
        }
    }

    #[test]
    fn test_rejects_bad_factor() {
        assert!(ScaleTransform::new(0.0, 0, 10).is_err());
        assert!(ScaleTransform::new(-1.5, 0, 10).is_err());
        assert!(ScaleTransform::new(f64::NAN, 0, 10).is_err());
        assert!(ScaleTransform::new(1.5, 10, 0).is_err());
    }

    #[test]
    fn test_rejects_scale_that_folds_into_native_range() {
        // 4000 * 0.5 = 2000 would read back as a native position
        assert!(matches!(
            ScaleTransform::new(0.5, 0, 3839),
            Err(LayoutError::InvalidScale(_))
        ));
        // 99 * 1.5 lands inside 100..=3839
        assert!(matches!(
            ScaleTransform::new(1.5, 100, 3839),
            Err(LayoutError::InvalidScale(_))
        ));
        assert!(ScaleTransform::new(1.0, 0, 3839).is_ok());
    }

    #[test]
    fn test_accepted_transforms_invert_outside_native_range() {
        for (factor, min, max) in [(1.5, 0, 3839), (2.0, -100, 100), (0.5, 0, 0)] {
            let scale = ScaleTransform::new(factor, min, max).unwrap();
            for x in [min - 500, min - 1, max + 1, max + 500] {
                let p = Point::new(x, 1000);
                let logical = scale.scale(p);
                assert!(!(min..=max).contains(&logical.x), "{} -> {}", p, logical);
                let back = scale.unscale(logical);
                let tolerance = (1.0 / factor).ceil() as i32;
                assert!((back.x - p.x).abs() <= tolerance, "{} -> {}", p, back);
            }
        }
    }

    #[test]
    fn test_identity() {
        let scale = ScaleTransform::identity();
        let p = Point::new(-12345, 678);
        assert_eq!(scale.scale(p), p);
        assert_eq!(scale.unscale(p), p);
    }
}
