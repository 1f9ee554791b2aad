//! Windows low-level mouse hook
//!
//! Installs a `WH_MOUSE_LL` hook on a dedicated thread that runs its own
//! message loop, and moves the cursor with `SetCursorPos`.
//!
//! Requirements:
//! - The hook thread must keep pumping messages or Windows drops the hook

#![cfg(target_os = "windows")]

use std::cell::RefCell;
use std::sync::mpsc as std_mpsc;
use std::thread::JoinHandle;

use windows::Win32::Foundation::{HINSTANCE, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PeekMessageW, PostThreadMessageW, SetCursorPos,
    SetWindowsHookExW, TranslateMessage, UnhookWindowsHookEx, HC_ACTION, MSG, MSLLHOOKSTRUCT,
    PM_NOREMOVE, WH_MOUSE_LL, WM_MOUSEMOVE, WM_QUIT, WM_USER,
};

use super::events::Verdict;
use super::traits::{CursorControl, InputError, InputResult, MouseHook, MoveHandler};
use crate::screen::Point;

// Handler for the hook procedure, set on the hook thread only
thread_local! {
    static HOOK_HANDLER: RefCell<Option<MoveHandler>> = RefCell::new(None);
}

struct HookThread {
    thread_id: u32,
    handle: JoinHandle<()>,
}

/// Windows mouse hook using `SetWindowsHookExW(WH_MOUSE_LL)`
pub struct WindowsMouseHook {
    thread: Option<HookThread>,
}

impl WindowsMouseHook {
    pub fn new() -> Self {
        Self { thread: None }
    }
}

impl Default for WindowsMouseHook {
    fn default() -> Self {
        Self::new()
    }
}

impl MouseHook for WindowsMouseHook {
    fn install(&mut self, handler: MoveHandler) -> InputResult<()> {
        if self.thread.is_some() {
            return Err(InputError::AlreadyInstalled);
        }

        let (ready_tx, ready_rx) = std_mpsc::channel::<Result<u32, String>>();
        let handle = std::thread::Builder::new()
            .name("portalmouse-hook".to_string())
            .spawn(move || run_hook_thread(handler, ready_tx))
            .map_err(|e| InputError::HookInstall(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(thread_id)) => {
                self.thread = Some(HookThread { thread_id, handle });
                Ok(())
            }
            Ok(Err(reason)) => {
                let _ = handle.join();
                Err(InputError::HookInstall(reason))
            }
            Err(_) => {
                let _ = handle.join();
                Err(InputError::HookInstall("hook thread exited during startup".to_string()))
            }
        }
    }

    fn uninstall(&mut self) -> InputResult<()> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };

        // SAFETY: posting to a thread id we own; fails only if the thread is gone.
        let posted = unsafe { PostThreadMessageW(thread.thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) };
        if let Err(e) = posted {
            if !thread.handle.is_finished() {
                self.thread = Some(thread);
                return Err(InputError::HookUninstall(e.to_string()));
            }
        }

        thread
            .handle
            .join()
            .map_err(|_| InputError::HookUninstall("hook thread panicked".to_string()))
    }

    fn is_installed(&self) -> bool {
        self.thread.is_some()
    }
}

impl Drop for WindowsMouseHook {
    fn drop(&mut self) {
        if let Err(e) = self.uninstall() {
            tracing::error!("Failed to remove mouse hook: {}", e);
        }
    }
}

/// Body of the hook thread: install, pump messages until `WM_QUIT`, remove.
fn run_hook_thread(handler: MoveHandler, ready: std_mpsc::Sender<Result<u32, String>>) {
    HOOK_HANDLER.with(|slot| *slot.borrow_mut() = Some(handler));

    // SAFETY: plain Win32 calls on this thread; the hook is removed below
    // before the thread exits.
    unsafe {
        // Make sure the thread has a message queue before anyone posts to it
        let mut msg = MSG::default();
        let _ = PeekMessageW(&mut msg, None, WM_USER, WM_USER, PM_NOREMOVE);

        let module = match GetModuleHandleW(None) {
            Ok(module) => module,
            Err(e) => {
                let _ = ready.send(Err(e.to_string()));
                return;
            }
        };

        let hook = match SetWindowsHookExW(
            WH_MOUSE_LL,
            Some(mouse_hook_proc),
            HINSTANCE::from(module),
            0,
        ) {
            Ok(hook) => hook,
            Err(e) => {
                let _ = ready.send(Err(e.to_string()));
                return;
            }
        };

        let _ = ready.send(Ok(GetCurrentThreadId()));
        tracing::debug!("WH_MOUSE_LL hook thread running");

        // GetMessageW returns -1 on error, 0 on WM_QUIT
        while GetMessageW(&mut msg, None, 0, 0).0 > 0 {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }

        if let Err(e) = UnhookWindowsHookEx(hook) {
            tracing::warn!("UnhookWindowsHookEx failed: {}", e);
        }
    }

    HOOK_HANDLER.with(|slot| slot.borrow_mut().take());
    tracing::debug!("WH_MOUSE_LL hook thread stopped");
}

/// Low-level mouse hook callback.
///
/// # Safety
///
/// Called by Windows on the hook thread; must return quickly.
unsafe extern "system" fn mouse_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code != HC_ACTION as i32 || l_param.0 == 0 || w_param.0 as u32 != WM_MOUSEMOVE {
        return CallNextHookEx(None, n_code, w_param, l_param);
    }

    // SAFETY: l_param points to a MSLLHOOKSTRUCT when n_code == HC_ACTION.
    let info = &*(l_param.0 as *const MSLLHOOKSTRUCT);
    let pos = Point::new(info.pt.x, info.pt.y);

    let handler = HOOK_HANDLER.with(|slot| slot.borrow().clone());
    match handler.map(|h| h(pos)) {
        Some(Verdict::Consume(_)) => LRESULT(1),
        _ => CallNextHookEx(None, n_code, w_param, l_param),
    }
}

/// Cursor relocation through `SetCursorPos`
#[derive(Debug, Default)]
pub struct WindowsCursor;

impl CursorControl for WindowsCursor {
    fn set_position(&self, pos: Point) -> InputResult<()> {
        // SAFETY: SetCursorPos has no preconditions.
        unsafe { SetCursorPos(pos.x, pos.y) }
            .map_err(|e| InputError::CursorMove(pos, e.to_string()))
    }
}
