//! Pointer redirection
//!
//! The decision function consulted by the mouse hook on every raw movement.
//! It owns the last observed position behind a lock and decides whether the
//! cursor crossed a portal and where it should land instead.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::input::{CursorControl, InputResult, Verdict};
use crate::screen::{Point, Resolution, ScreenLayout};

/// Mutable tracking state, only touched while holding the redirector lock
#[derive(Debug, Clone)]
pub struct PointerState {
    /// Last raw position seen or forced, `None` until the first event
    pub last: Option<Point>,
    /// Cleared once the hook is being torn down
    pub active: bool,
    /// Movement events evaluated
    pub events: u64,
    /// Crossings remapped through a portal
    pub redirects: u64,
    /// Crossings refused because the old Y was outside the portal band
    pub vetoes: u64,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            last: None,
            active: true,
            events: 0,
            redirects: 0,
            vetoes: 0,
        }
    }
}

/// Decides where the cursor goes after each raw movement
#[derive(Debug)]
pub struct PointerRedirector {
    layout: ScreenLayout,
    state: Mutex<PointerState>,
    /// Log a status line every this many events, 0 to disable
    status_interval: u64,
}

impl PointerRedirector {
    pub fn new(layout: ScreenLayout) -> Self {
        Self {
            layout,
            state: Mutex::new(PointerState::default()),
            status_interval: 0,
        }
    }

    pub fn with_status_interval(mut self, every: u64) -> Self {
        self.status_interval = every;
        self
    }

    pub fn layout(&self) -> &ScreenLayout {
        &self.layout
    }

    /// Copy of the current tracking state
    pub fn snapshot(&self) -> PointerState {
        self.lock().clone()
    }

    /// Evaluate one movement from `old` to `new`, both in raw device
    /// coordinates. Returns the raw position the cursor should be moved to,
    /// or `None` to let the movement through.
    pub fn evaluate(&self, old: Point, new: Point) -> Option<Point> {
        self.decide(old, new).map(|(target, _)| target)
    }

    fn decide(&self, old: Point, new: Point) -> Option<(Point, Resolution)> {
        let scale = self.layout.scale();
        let scaled_old = scale.scale(old);
        let scaled_new = scale.scale(new);

        let crossing = self.layout.detect_crossing(scaled_old, scaled_new)?;
        let resolution = self.layout.resolve(crossing, scaled_old, scaled_new)?;
        let target = scale.unscale(resolution.position());

        let screen_name = |p: Point| match self.layout.screen_at(p.x) {
            Some(screen) => screen.name.as_str(),
            None => "gap",
        };
        tracing::trace!(
            "boundary {} {:?} ({} -> {}): {} -> {} resolved to {:?}",
            crossing.boundary,
            crossing.direction,
            screen_name(scaled_old),
            screen_name(scaled_new),
            scaled_old,
            scaled_new,
            resolution
        );

        Some((target, resolution))
    }

    /// Handle a raw movement reported by the hook.
    ///
    /// On a redirect the remembered position is updated to the replacement
    /// before the cursor is moved, so the echo event generated by the
    /// relocation compares equal and is ignored. The lock is held until the
    /// relocation has completed.
    pub fn handle_move(&self, new: Point, cursor: &dyn CursorControl) -> InputResult<Verdict> {
        let mut state = self.lock();

        if !state.active || state.last == Some(new) {
            return Ok(Verdict::PassThrough);
        }

        let Some(old) = state.last else {
            state.last = Some(new);
            return Ok(Verdict::PassThrough);
        };

        state.events += 1;
        let verdict = match self.decide(old, new) {
            Some((target, resolution)) => {
                state.last = Some(target);
                if let Err(e) = cursor.set_position(target) {
                    tracing::warn!("Failed to move cursor to {}: {}", target, e);
                    state.last = Some(new);
                    return Err(e);
                }

                if resolution.is_blocked() {
                    state.vetoes += 1;
                    tracing::debug!(
                        "Crossing {} -> {} blocked outside portal, held at {}",
                        old,
                        new,
                        target
                    );
                } else {
                    state.redirects += 1;
                    tracing::debug!("Redirected {} -> {} to {}", old, new, target);
                }
                Verdict::Consume(target)
            }
            None => {
                state.last = Some(new);
                Verdict::PassThrough
            }
        };

        if self.status_interval > 0 && state.events % self.status_interval == 0 {
            tracing::info!(
                "Pointer at {} after {} events ({} redirected, {} blocked)",
                new,
                state.events,
                state.redirects,
                state.vetoes
            );
        }

        Ok(verdict)
    }

    /// Stop redirecting. Blocks until an in-flight evaluation has finished;
    /// events arriving afterwards pass through untouched.
    pub fn deactivate(&self) {
        let mut state = self.lock();
        state.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.lock().active
    }

    fn lock(&self) -> MutexGuard<'_, PointerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::mock::RecordingCursor;
    use crate::screen::LayoutBuilder;

    fn reference() -> PointerRedirector {
        PointerRedirector::new(ScreenLayout::reference().unwrap())
    }

    /// Reference topology without DPI scaling
    fn unscaled() -> PointerRedirector {
        let layout = LayoutBuilder::new()
            .screen("left", None, Some(-1))
            .portal(1629.0, 3140.0, 685.0, 2160.0)
            .screen("center", Some(0), Some(3839))
            .portal(475.0, 2160.0, 1629.0, 3100.0)
            .screen("right", Some(5760), None)
            .build()
            .unwrap();
        PointerRedirector::new(layout)
    }

    fn evaluate(redirector: &PointerRedirector, old: (i32, i32), new: (i32, i32)) -> Option<Point> {
        let (old, new) = (Point::new(old.0, old.1), Point::new(new.0, new.1));
        redirector.evaluate(old, new)
    }

    fn feed(redirector: &PointerRedirector, cursor: &RecordingCursor, x: i32, y: i32) -> Verdict {
        redirector.handle_move(Point::new(x, y), cursor).unwrap()
    }

    #[test]
    fn test_no_crossing_passes_through() {
        let redirector = reference();
        assert_eq!(evaluate(&redirector, (10, 10), (20, 30)), None);
        assert_eq!(evaluate(&redirector, (-40, 10), (-20, 30)), None);
    }

    #[test]
    fn test_portal_gating() {
        let redirector = unscaled();

        let mapped = evaluate(&redirector, (-1, 2000), (0, 2000));
        assert_eq!(mapped, Some(Point::new(0, 1047)));

        // outside the band the crossing is refused and the cursor held back
        let blocked = evaluate(&redirector, (-1, 100), (0, 100));
        assert_eq!(blocked, Some(Point::new(-1, 100)));
    }

    #[test]
    fn test_scaled_crossing_from_left_screen() {
        let redirector = reference();
        // (-5, 2000) is (-8, 3000) in logical space; 3000 maps to ~2023
        let target = evaluate(&redirector, (-5, 2000), (10, 2000));
        assert_eq!(target, Some(Point::new(10, 2023)));
    }

    #[test]
    fn test_scaled_block_returns_raw_old_position() {
        let redirector = reference();
        let target = evaluate(&redirector, (-5, 100), (10, 100));
        assert_eq!(target, Some(Point::new(-5, 100)));
    }

    #[test]
    fn test_second_portal_leftward() {
        let redirector = reference();
        // right screen at raw x 4000 -> logical 6000, y 2000 -> 3000 (in 1629..=3100)
        let target = evaluate(&redirector, (4000, 2000), (3800, 2000)).unwrap();
        let portal = redirector.layout().portal(1).unwrap();
        let expected = portal.right_to_left(3000.0).round() as i32;
        assert_eq!(target, Point::new(3800, expected));
    }

    #[test]
    fn test_end_to_end_scenario() {
        let redirector = unscaled();
        let cursor = RecordingCursor::new();

        // first event only seeds the unknown state
        assert_eq!(feed(&redirector, &cursor, -5, 2000), Verdict::PassThrough);

        let verdict = feed(&redirector, &cursor, 10, 2000);
        let portal = redirector.layout().portal(0).unwrap();
        let expected = Point::new(10, portal.left_to_right(2000.0).round() as i32);
        assert_eq!(verdict, Verdict::Consume(expected));
        assert_eq!(cursor.moves(), vec![expected]);
        assert_eq!(redirector.snapshot().last, Some(expected));
    }

    #[test]
    fn test_echo_of_forced_move_is_ignored() {
        let redirector = reference();
        let cursor = RecordingCursor::new();

        feed(&redirector, &cursor, -5, 2000);
        let Verdict::Consume(target) = feed(&redirector, &cursor, 10, 2000) else {
            panic!("expected a redirect");
        };

        let before = redirector.snapshot();
        let echo = feed(&redirector, &cursor, target.x, target.y);
        assert_eq!(echo, Verdict::PassThrough);
        let after = redirector.snapshot();
        assert_eq!(after.last, before.last);
        assert_eq!(after.events, before.events);
        assert_eq!(cursor.moves().len(), 1);
    }

    #[test]
    fn test_duplicate_events_are_noops() {
        let redirector = reference();
        let cursor = RecordingCursor::new();

        feed(&redirector, &cursor, 100, 100);
        feed(&redirector, &cursor, 110, 100);
        let before = redirector.snapshot();
        assert_eq!(feed(&redirector, &cursor, 110, 100), Verdict::PassThrough);
        assert_eq!(redirector.snapshot().events, before.events);
        assert!(cursor.moves().is_empty());
    }

    #[test]
    fn test_failed_relocation_keeps_raw_position() {
        let redirector = unscaled();
        let cursor = RecordingCursor::failing();

        feed(&redirector, &cursor, -1, 2000);
        let result = redirector.handle_move(Point::new(0, 2000), &cursor);
        assert!(result.is_err());
        assert_eq!(redirector.snapshot().last, Some(Point::new(0, 2000)));
    }

    #[test]
    fn test_counts_redirects_and_vetoes() {
        let redirector = unscaled();
        let cursor = RecordingCursor::new();

        feed(&redirector, &cursor, -1, 2000);
        feed(&redirector, &cursor, 0, 2000);
        // back across at a row outside the right-hand band
        feed(&redirector, &cursor, 0, 100);
        feed(&redirector, &cursor, -1, 100);
        feed(&redirector, &cursor, 0, 100);

        let state = redirector.snapshot();
        assert_eq!(state.redirects, 1);
        assert_eq!(state.vetoes, 1);
        assert_eq!(state.last, Some(Point::new(0, 100)));
    }

    #[test]
    fn test_deactivated_redirector_passes_everything() {
        let redirector = unscaled();
        let cursor = RecordingCursor::new();

        feed(&redirector, &cursor, -1, 2000);
        redirector.deactivate();
        redirector.deactivate();
        assert!(!redirector.is_active());
        assert_eq!(feed(&redirector, &cursor, 0, 2000), Verdict::PassThrough);
        assert!(cursor.moves().is_empty());
    }
}
