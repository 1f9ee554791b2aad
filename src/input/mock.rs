//! In-process hook and cursor backends
//!
//! Used for replaying recorded movements offline and for tests. The hook
//! lets callers inject synthetic movements; the cursor records every move.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::events::Verdict;
use super::traits::{CursorControl, InputError, InputResult, MouseHook, MoveHandler};
use crate::screen::Point;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A mouse hook driven by [`MockMouseHook::inject`]
#[derive(Clone, Default)]
pub struct MockMouseHook {
    handler: Arc<Mutex<Option<MoveHandler>>>,
    uninstall_calls: Arc<Mutex<u32>>,
}

impl MockMouseHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a movement as if captured from hardware. Returns `None` when
    /// the hook is not installed.
    pub fn inject(&self, pos: Point) -> Option<Verdict> {
        let handler = lock(&self.handler).clone();
        handler.map(|h| h(pos))
    }

    /// Number of times `uninstall` was called, installed or not
    pub fn uninstall_calls(&self) -> u32 {
        *lock(&self.uninstall_calls)
    }
}

impl MouseHook for MockMouseHook {
    fn install(&mut self, handler: MoveHandler) -> InputResult<()> {
        let mut slot = lock(&self.handler);
        if slot.is_some() {
            return Err(InputError::AlreadyInstalled);
        }
        *slot = Some(handler);
        Ok(())
    }

    fn uninstall(&mut self) -> InputResult<()> {
        *lock(&self.uninstall_calls) += 1;
        *lock(&self.handler) = None;
        Ok(())
    }

    fn is_installed(&self) -> bool {
        lock(&self.handler).is_some()
    }
}

/// A cursor that records where it was sent
#[derive(Clone, Default)]
pub struct RecordingCursor {
    moves: Arc<Mutex<Vec<Point>>>,
    fail: bool,
}

impl RecordingCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cursor whose every move fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn moves(&self) -> Vec<Point> {
        lock(&self.moves).clone()
    }

    pub fn last(&self) -> Option<Point> {
        lock(&self.moves).last().copied()
    }
}

impl CursorControl for RecordingCursor {
    fn set_position(&self, pos: Point) -> InputResult<()> {
        if self.fail {
            return Err(InputError::CursorMove(pos, "cursor is read-only".to_string()));
        }
        lock(&self.moves).push(pos);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_before_install_is_dropped() {
        let hook = MockMouseHook::new();
        assert_eq!(hook.inject(Point::new(1, 1)), None);
    }

    #[test]
    fn test_install_and_inject() {
        let mut hook = MockMouseHook::new();
        let shift: MoveHandler = Arc::new(|p: Point| Verdict::Consume(Point::new(p.x + 1, p.y)));
        hook.install(shift).unwrap();

        assert!(hook.is_installed());
        assert_eq!(
            hook.inject(Point::new(1, 2)),
            Some(Verdict::Consume(Point::new(2, 2)))
        );
        assert!(matches!(
            hook.install(Arc::new(|_: Point| Verdict::PassThrough)),
            Err(InputError::AlreadyInstalled)
        ));
    }

    #[test]
    fn test_uninstall_twice() {
        let mut hook = MockMouseHook::new();
        let handler: MoveHandler = Arc::new(|_: Point| Verdict::PassThrough);
        hook.install(handler).unwrap();
        hook.uninstall().unwrap();
        hook.uninstall().unwrap();
        assert!(!hook.is_installed());
        assert_eq!(hook.uninstall_calls(), 2);
    }

    #[test]
    fn test_recording_cursor() {
        let cursor = RecordingCursor::new();
        cursor.set_position(Point::new(3, 4)).unwrap();
        assert_eq!(cursor.last(), Some(Point::new(3, 4)));
        let failing = RecordingCursor::failing();
        assert!(failing.set_position(Point::new(0, 0)).is_err());
    }
}
