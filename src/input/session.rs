//! Hook session
//!
//! Connects a platform mouse hook and cursor to a [`PointerRedirector`] and
//! owns the teardown order: redirection is switched off under the
//! redirector's lock before the hook is removed.

use std::sync::Arc;

use super::events::Verdict;
use super::traits::{CursorControl, InputResult, MouseHook, MoveHandler};
use crate::redirect::PointerRedirector;
use crate::screen::Point;

/// A running redirection: hook installed and feeding the redirector
pub struct HookSession {
    hook: Box<dyn MouseHook>,
    redirector: Arc<PointerRedirector>,
}

impl HookSession {
    /// Install `hook` and route its movements through `redirector`
    pub fn start(
        mut hook: Box<dyn MouseHook>,
        cursor: Arc<dyn CursorControl>,
        redirector: Arc<PointerRedirector>,
    ) -> InputResult<Self> {
        let handler: MoveHandler = {
            let redirector = redirector.clone();
            Arc::new(move |pos: Point| match redirector.handle_move(pos, cursor.as_ref()) {
                Ok(verdict) => verdict,
                Err(e) => {
                    tracing::warn!("Letting event at {} through: {}", pos, e);
                    Verdict::PassThrough
                }
            })
        };

        hook.install(handler)?;
        tracing::info!("Mouse hook installed");

        Ok(Self { hook, redirector })
    }

    pub fn redirector(&self) -> &Arc<PointerRedirector> {
        &self.redirector
    }

    pub fn is_hooked(&self) -> bool {
        self.hook.is_installed()
    }

    /// Tear the session down. Waits for an in-flight evaluation to finish,
    /// then removes the hook. Safe to call more than once.
    pub fn stop(&mut self) -> InputResult<()> {
        self.redirector.deactivate();

        if !self.hook.is_installed() {
            return Ok(());
        }
        self.hook.uninstall()?;
        tracing::info!("Mouse hook removed");
        Ok(())
    }
}

impl Drop for HookSession {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            tracing::error!("Failed to remove mouse hook: {}", e);
        }
    }
}
