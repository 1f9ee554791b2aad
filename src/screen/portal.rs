//! Portals between adjacent screens
//!
//! A portal pairs a Y-range on the left screen's edge with a Y-range on the
//! right screen's edge and maps linearly between them.

use super::{LayoutError, LayoutResult};

/// Linear mapping between two corresponding edge ranges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Portal {
    left_min: f64,
    left_max: f64,
    right_min: f64,
    right_max: f64,
}

impl Portal {
    /// Create a portal. Both ranges must be finite, ordered and non-empty.
    pub fn new(left_min: f64, left_max: f64, right_min: f64, right_max: f64) -> LayoutResult<Self> {
        check_range("left", left_min, left_max)?;
        check_range("right", right_min, right_max)?;

        Ok(Self {
            left_min,
            left_max,
            right_min,
            right_max,
        })
    }

    pub fn left_range(&self) -> (f64, f64) {
        (self.left_min, self.left_max)
    }

    pub fn right_range(&self) -> (f64, f64) {
        (self.right_min, self.right_max)
    }

    pub fn in_left_range(&self, y: f64) -> bool {
        self.left_min <= y && y <= self.left_max
    }

    pub fn in_right_range(&self, y: f64) -> bool {
        self.right_min <= y && y <= self.right_max
    }

    /// Map a left-side Y onto the right side. Extrapolates outside the range;
    /// gate with [`Portal::in_left_range`] first.
    pub fn left_to_right(&self, y: f64) -> f64 {
        let percentage = (y - self.left_min) / (self.left_max - self.left_min);
        percentage * (self.right_max - self.right_min) + self.right_min
    }

    /// Map a right-side Y onto the left side. Extrapolates outside the range;
    /// gate with [`Portal::in_right_range`] first.
    pub fn right_to_left(&self, y: f64) -> f64 {
        let percentage = (y - self.right_min) / (self.right_max - self.right_min);
        percentage * (self.left_max - self.left_min) + self.left_min
    }
}

fn check_range(which: &'static str, min: f64, max: f64) -> LayoutResult<()> {
    if !min.is_finite() || !max.is_finite() {
        return Err(LayoutError::NonFinite);
    }
    if min > max {
        return Err(LayoutError::InvertedRange { which, min, max });
    }
    if min == max {
        return Err(LayoutError::ZeroWidthRange { which, min, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portal1() -> Portal {
        Portal::new(1629.0, 3140.0, 685.0, 2160.0).unwrap()
    }

    #[test]
    fn test_range_predicates_are_inclusive() {
        let portal = portal1();
        assert!(portal.in_left_range(1629.0));
        assert!(portal.in_left_range(3140.0));
        assert!(!portal.in_left_range(1628.9));
        assert!(portal.in_right_range(685.0));
        assert!(portal.in_right_range(2160.0));
        assert!(!portal.in_right_range(2160.5));
    }

    #[test]
    fn test_endpoints_map_to_endpoints() {
        let portal = portal1();
        assert_eq!(portal.left_to_right(1629.0), 685.0);
        assert_eq!(portal.left_to_right(3140.0), 2160.0);
        assert_eq!(portal.right_to_left(685.0), 1629.0);
        assert_eq!(portal.right_to_left(2160.0), 3140.0);
    }

    #[test]
    fn test_inverse() {
        let portal = portal1();
        let there = portal.left_to_right(2000.0);
        assert!((there - 1047.16).abs() < 0.01, "got {}", there);
        assert!((portal.right_to_left(there) - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_extrapolates_outside_range() {
        let portal = portal1();
        assert!(portal.left_to_right(100.0) < 685.0);
        assert!(portal.right_to_left(3000.0) > 3140.0);
    }

    #[test]
    fn test_rejects_degenerate_ranges() {
        assert!(matches!(
            Portal::new(10.0, 10.0, 0.0, 5.0),
            Err(LayoutError::ZeroWidthRange { which: "left", .. })
        ));
        assert!(matches!(
            Portal::new(0.0, 5.0, 9.0, 3.0),
            Err(LayoutError::InvertedRange { which: "right", .. })
        ));
        assert_eq!(
            Portal::new(f64::INFINITY, 5.0, 0.0, 1.0),
            Err(LayoutError::NonFinite)
        );
    }
}
