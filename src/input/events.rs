//! Input event types
//!
//! Platform-independent representation of hook events and decisions.

use serde::{Deserialize, Serialize};

use crate::screen::Point;

/// What the hook should do with the event it just reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Let the event continue down the hook chain
    PassThrough,
    /// The cursor was moved here; swallow the original event
    Consume(Point),
}

/// A raw mouse movement as recorded for replay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseMoveEvent {
    /// Absolute X position in raw device coordinates
    pub x: i32,
    /// Absolute Y position in raw device coordinates
    pub y: i32,
}

impl MouseMoveEvent {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
