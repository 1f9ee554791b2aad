//! Input trait definitions
//!
//! Defines the minimal capabilities the redirector needs from the platform:
//! a mouse hook that can be installed and removed, and a way to move the
//! cursor.

use std::sync::Arc;
use thiserror::Error;

use super::events::Verdict;
use crate::screen::Point;

/// Errors that can occur during input operations
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to install mouse hook: {0}")]
    HookInstall(String),

    #[error("Failed to remove mouse hook: {0}")]
    HookUninstall(String),

    #[error("Failed to move cursor to {0}: {1}")]
    CursorMove(Point, String),

    #[error("Not supported on this platform")]
    NotSupported,

    #[error("Mouse hook already installed")]
    AlreadyInstalled,
}

pub type InputResult<T> = Result<T, InputError>;

/// Callback invoked by a hook with the raw position of every movement
pub type MoveHandler = Arc<dyn Fn(Point) -> Verdict + Send + Sync>;

/// A low-level mouse hook
pub trait MouseHook: Send {
    /// Start delivering movement events to `handler`
    fn install(&mut self, handler: MoveHandler) -> InputResult<()>;

    /// Stop delivering events. Calling this on a hook that is not installed
    /// succeeds and does nothing.
    fn uninstall(&mut self) -> InputResult<()>;

    /// Check if the hook is currently installed
    fn is_installed(&self) -> bool;
}

/// Absolute cursor relocation
pub trait CursorControl: Send + Sync {
    /// Move the system cursor to `pos` in raw device coordinates. Returns
    /// once the move has been applied.
    fn set_position(&self, pos: Point) -> InputResult<()>;
}
