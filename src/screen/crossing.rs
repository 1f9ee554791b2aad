//! Boundary crossing detection
//!
//! Decides, from a pair of logical positions, which screen boundary the
//! cursor just crossed and what the portal on that boundary makes of it.

use super::{round_coord, Point, Portal};

/// Direction of travel across a boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// From the left screen of the boundary into the right one
    Rightward,
    /// From the right screen of the boundary into the left one
    Leftward,
}

/// A detected crossing of one boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    /// Index of the boundary, `0` is between the first and second screen
    pub boundary: usize,
    pub direction: Direction,
}

/// Outcome of pushing a crossing through its portal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Old Y was inside the portal band; the cursor lands at the mapped point
    Mapped(Point),
    /// Old Y was outside the band; the cursor stays where it was
    Blocked(Point),
}

impl Resolution {
    /// The logical position the cursor should end up at
    pub fn position(&self) -> Point {
        match *self {
            Resolution::Mapped(p) | Resolution::Blocked(p) => p,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Resolution::Blocked(_))
    }
}

/// Test one boundary for a crossing. `left_max` is the last X of the left
/// screen and `right_min` the first X of the right screen.
pub(crate) fn detect(left_max: i32, right_min: i32, old_x: i32, new_x: i32) -> Option<Direction> {
    if old_x <= left_max && new_x >= right_min {
        Some(Direction::Rightward)
    } else if old_x >= right_min && new_x <= left_max {
        Some(Direction::Leftward)
    } else {
        None
    }
}

/// Resolve a crossing through `portal`, using the old Y to pick the row
pub(crate) fn resolve(portal: &Portal, direction: Direction, old: Point, new: Point) -> Resolution {
    let y = old.y as f64;
    match direction {
        Direction::Rightward if portal.in_left_range(y) => {
            Resolution::Mapped(Point::new(new.x, round_coord(portal.left_to_right(y))))
        }
        Direction::Leftward if portal.in_right_range(y) => {
            Resolution::Mapped(Point::new(new.x, round_coord(portal.right_to_left(y))))
        }
        _ => Resolution::Blocked(old),
    }
}
