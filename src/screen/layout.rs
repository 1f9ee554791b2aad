//! Screen layout management
//!
//! Holds the ordered screens of the desktop in logical coordinates, the
//! portal on each boundary between neighbours and the DPI transform.

use super::crossing::{self, Crossing, Resolution};
use super::{LayoutError, LayoutResult, Point, Portal, ScaleTransform};

/// A screen in the layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    /// Human-readable name
    pub name: String,
    /// First logical X, `None` if the screen is unbounded to the left
    pub x_min: Option<i32>,
    /// Last logical X, `None` if the screen is unbounded to the right
    pub x_max: Option<i32>,
}

impl Screen {
    pub fn new(name: impl Into<String>, x_min: Option<i32>, x_max: Option<i32>) -> Self {
        Self {
            name: name.into(),
            x_min,
            x_max,
        }
    }

    pub fn contains_x(&self, x: i32) -> bool {
        self.x_min.map_or(true, |min| x >= min) && self.x_max.map_or(true, |max| x <= max)
    }
}

/// The edge between two adjacent screens
#[derive(Debug, Clone, Copy)]
struct Boundary {
    left_max: i32,
    right_min: i32,
    portal: Portal,
}

/// Validated, immutable arrangement of screens and portals
#[derive(Debug, Clone)]
pub struct ScreenLayout {
    screens: Vec<Screen>,
    boundaries: Vec<Boundary>,
    scale: ScaleTransform,
}

impl ScreenLayout {
    /// Build a layout from screens in ascending X order and one portal per
    /// adjacent pair
    pub fn new(
        screens: Vec<Screen>,
        portals: Vec<Portal>,
        scale: ScaleTransform,
    ) -> LayoutResult<Self> {
        if screens.len() < 2 {
            return Err(LayoutError::TooFewScreens(screens.len()));
        }
        let expected = screens.len() - 1;
        if portals.len() != expected {
            return Err(LayoutError::PortalCountMismatch {
                screens: screens.len(),
                expected,
                actual: portals.len(),
            });
        }

        for screen in &screens {
            if let (Some(min), Some(max)) = (screen.x_min, screen.x_max) {
                if min > max {
                    return Err(LayoutError::InvertedScreen {
                        screen: screen.name.clone(),
                        x_min: min,
                        x_max: max,
                    });
                }
            }
        }

        let mut boundaries = Vec::with_capacity(expected);
        for (pair, portal) in screens.windows(2).zip(portals) {
            let (left, right) = (&pair[0], &pair[1]);
            let left_max = left.x_max.ok_or_else(|| LayoutError::MissingBound {
                screen: left.name.clone(),
                edge: "right",
            })?;
            let right_min = right.x_min.ok_or_else(|| LayoutError::MissingBound {
                screen: right.name.clone(),
                edge: "left",
            })?;
            if left_max >= right_min {
                return Err(LayoutError::UnorderedScreens {
                    left: left.name.clone(),
                    right: right.name.clone(),
                });
            }
            boundaries.push(Boundary {
                left_max,
                right_min,
                portal,
            });
        }

        Ok(Self {
            screens,
            boundaries,
            scale,
        })
    }

    /// The three-screen desk this tool was built for
    pub fn reference() -> LayoutResult<Self> {
        LayoutBuilder::new()
            .scale(1.5, 0, 3839)
            .screen("left", None, Some(-1))
            .portal(1629.0, 3140.0, 685.0, 2160.0)
            .screen("center", Some(0), Some(3839))
            .portal(475.0, 2160.0, 1629.0, 3100.0)
            .screen("right", Some(5760), None)
            .build()
    }

    pub fn scale(&self) -> &ScaleTransform {
        &self.scale
    }

    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    pub fn boundary_count(&self) -> usize {
        self.boundaries.len()
    }

    /// Portal on boundary `index`
    pub fn portal(&self, index: usize) -> Option<&Portal> {
        self.boundaries.get(index).map(|b| &b.portal)
    }

    /// X values `(left_max, right_min)` of boundary `index`
    pub fn boundary_edges(&self, index: usize) -> Option<(i32, i32)> {
        self.boundaries.get(index).map(|b| (b.left_max, b.right_min))
    }

    /// Screen containing logical X, if any
    pub fn screen_at(&self, x: i32) -> Option<&Screen> {
        self.screens.iter().find(|s| s.contains_x(x))
    }

    /// Find the boundary crossed between two logical positions. Boundaries
    /// are tested left to right, rightward before leftward; first match wins.
    pub fn detect_crossing(&self, old: Point, new: Point) -> Option<Crossing> {
        for (boundary, b) in self.boundaries.iter().enumerate() {
            if let Some(direction) = crossing::detect(b.left_max, b.right_min, old.x, new.x) {
                return Some(Crossing {
                    boundary,
                    direction,
                });
            }
        }
        None
    }

    /// Push a detected crossing through the portal on its boundary. `None`
    /// if the crossing names a boundary this layout does not have.
    pub(crate) fn resolve(&self, crossing: Crossing, old: Point, new: Point) -> Option<Resolution> {
        let boundary = self.boundaries.get(crossing.boundary)?;
        Some(crossing::resolve(&boundary.portal, crossing.direction, old, new))
    }
}

/// Builder for creating screen layouts
///
/// Screens and portals are added left to right, a portal between each pair
/// of screens. Validation happens in [`LayoutBuilder::build`].
pub struct LayoutBuilder {
    screens: Vec<Screen>,
    portals: Vec<(f64, f64, f64, f64)>,
    scale: Option<(f64, i32, i32)>,
}

impl LayoutBuilder {
    pub fn new() -> Self {
        Self {
            screens: Vec::new(),
            portals: Vec::new(),
            scale: None,
        }
    }

    pub fn screen(mut self, name: &str, x_min: Option<i32>, x_max: Option<i32>) -> Self {
        self.screens.push(Screen::new(name, x_min, x_max));
        self
    }

    pub fn portal(mut self, left_min: f64, left_max: f64, right_min: f64, right_max: f64) -> Self {
        self.portals.push((left_min, left_max, right_min, right_max));
        self
    }

    pub fn scale(mut self, factor: f64, native_min: i32, native_max: i32) -> Self {
        self.scale = Some((factor, native_min, native_max));
        self
    }

    pub fn build(self) -> LayoutResult<ScreenLayout> {
        let scale = match self.scale {
            Some((factor, min, max)) => ScaleTransform::new(factor, min, max)?,
            None => ScaleTransform::identity(),
        };
        let portals = self
            .portals
            .into_iter()
            .map(|(a, b, c, d)| Portal::new(a, b, c, d))
            .collect::<LayoutResult<Vec<_>>>()?;

        ScreenLayout::new(self.screens, portals, scale)
    }
}

impl Default for LayoutBuilder {
    fn default() -> Self {
        Self::new()
    }
}
