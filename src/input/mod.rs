//! Input module - Platform mouse hook and cursor control
//!
//! This module provides abstractions for:
//! - Receiving raw mouse movements from a low-level hook
//! - Consuming or passing through each movement
//! - Relocating the cursor
//! - Running a redirection session on top of a hook

mod events;
pub mod mock;
mod session;
mod traits;

#[cfg(target_os = "windows")]
mod windows;

use std::sync::Arc;

// Re-export common types
pub use events::*;
pub use session::HookSession;
pub use traits::*;

#[cfg(target_os = "windows")]
pub use windows::{WindowsCursor, WindowsMouseHook};

use crate::screen::Point;

/// Hook for platforms without a low-level mouse hook implementation
#[derive(Debug, Default)]
pub struct UnsupportedHook;

impl MouseHook for UnsupportedHook {
    fn install(&mut self, _handler: MoveHandler) -> InputResult<()> {
        Err(InputError::NotSupported)
    }

    fn uninstall(&mut self) -> InputResult<()> {
        Ok(())
    }

    fn is_installed(&self) -> bool {
        false
    }
}

/// Cursor for platforms without cursor relocation support
#[derive(Debug, Default)]
pub struct UnsupportedCursor;

impl CursorControl for UnsupportedCursor {
    fn set_position(&self, _pos: Point) -> InputResult<()> {
        Err(InputError::NotSupported)
    }
}

/// The mouse hook for the current platform
pub fn platform_hook() -> Box<dyn MouseHook> {
    #[cfg(target_os = "windows")]
    return Box::new(WindowsMouseHook::new());

    #[cfg(not(target_os = "windows"))]
    return Box::new(UnsupportedHook);
}

/// The cursor control for the current platform
pub fn platform_cursor() -> Arc<dyn CursorControl> {
    #[cfg(target_os = "windows")]
    return Arc::new(WindowsCursor);

    #[cfg(not(target_os = "windows"))]
    return Arc::new(UnsupportedCursor);
}

/// Get the current platform name
pub fn platform_name() -> &'static str {
    #[cfg(target_os = "macos")]
    return "macOS";

    #[cfg(target_os = "linux")]
    return "Linux";

    #[cfg(target_os = "windows")]
    return "Windows";

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    return "Unknown";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_backends() {
        let mut hook = UnsupportedHook;
        assert!(matches!(
            hook.install(Arc::new(|_: Point| Verdict::PassThrough)),
            Err(InputError::NotSupported)
        ));
        assert!(!hook.is_installed());
        hook.uninstall().unwrap();
        hook.uninstall().unwrap();

        assert!(UnsupportedCursor.set_position(Point::new(0, 0)).is_err());
    }
}
