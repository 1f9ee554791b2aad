//! Screen geometry module
//!
//! Handles:
//! - DPI normalization between raw device and logical coordinates
//! - Portals that remap Y across a screen boundary
//! - Screen layout and boundary crossing detection

mod crossing;
mod layout;
mod portal;
mod scale;

pub use crossing::{Crossing, Direction, Resolution};
pub use layout::{LayoutBuilder, Screen, ScreenLayout};
pub use portal::Portal;
pub use scale::ScaleTransform;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while constructing layout geometry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("{which} range of portal has zero width ({min} == {max})")]
    ZeroWidthRange {
        which: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{which} range of portal is inverted ({min} > {max})")]
    InvertedRange {
        which: &'static str,
        min: f64,
        max: f64,
    },

    #[error("portal bound is not a finite number")]
    NonFinite,

    #[error("invalid scale: {0}")]
    InvalidScale(String),

    #[error("layout needs at least two screens, got {0}")]
    TooFewScreens(usize),

    #[error("screen '{screen}' spans an inverted range {x_min}..={x_max}")]
    InvertedScreen {
        screen: String,
        x_min: i32,
        x_max: i32,
    },

    #[error("screens '{left}' and '{right}' are not in ascending X order")]
    UnorderedScreens { left: String, right: String },

    #[error("screen '{screen}' is missing its {edge} bound")]
    MissingBound { screen: String, edge: &'static str },

    #[error("expected {expected} portals for {screens} screens, got {actual}")]
    PortalCountMismatch {
        screens: usize,
        expected: usize,
        actual: usize,
    },
}

pub type LayoutResult<T> = Result<T, LayoutError>;

/// A cursor position, either in raw device or logical coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Round a computed coordinate to the nearest pixel, ties away from zero
pub(crate) fn round_coord(value: f64) -> i32 {
    value.round() as i32
}
