//! Moving and measuring the program's own window
//!
//! `Win32Surface` is the controller's view of the HWND: move without
//! resizing, without touching z-order or focus, and invalidate for repaint.

use tracing::warn;
use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::Graphics::Gdi::InvalidateRect;
use windows::Win32::UI::WindowsAndMessaging::{
    GetWindowRect, IsWindow, SWP_NOACTIVATE, SWP_NOSIZE, SWP_NOZORDER, SetWindowPos,
};

use crate::app::WindowSurface;
use crate::domain::core::{Point, Rect};
use crate::platform::windows::win32_rect_to_rect;

/// Error types for window operations
#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("Failed to register window class")]
    ClassRegistrationFailed,
    #[error("Failed to create main window")]
    CreationFailed,
    #[error("Failed to get info for window {0:?}")]
    InfoFailed(HWND),
    #[error("Failed to position window {0:?}")]
    PositionFailed(HWND),
    #[error("Invalid window handle {0:?}")]
    InvalidHandle(HWND),
}

/// Gets the outer rectangle of a window in screen coordinates
///
/// # Arguments
/// * `hwnd` - Window handle
///
/// # Returns
/// Window rectangle including the frame
pub fn window_rect(hwnd: HWND) -> Result<Rect, WindowError> {
    unsafe {
        if !IsWindow(hwnd).as_bool() {
            return Err(WindowError::InvalidHandle(hwnd));
        }

        let mut rect = RECT::default();
        if GetWindowRect(hwnd, &mut rect).is_err() {
            return Err(WindowError::InfoFailed(hwnd));
        }

        Ok(win32_rect_to_rect(&rect))
    }
}

/// Moves a window's top-left corner, keeping its size, z-order and focus
///
/// # Arguments
/// * `hwnd` - Window handle
/// * `position` - New top-left corner in screen coordinates; may be off screen
pub fn move_window(hwnd: HWND, position: Point) -> Result<(), WindowError> {
    unsafe {
        if !IsWindow(hwnd).as_bool() {
            return Err(WindowError::InvalidHandle(hwnd));
        }

        // SWP_NOSIZE: width/height ignored
        // SWP_NOZORDER: insert-after HWND ignored
        SetWindowPos(
            hwnd,
            HWND(0),
            position.x,
            position.y,
            0,
            0,
            SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE,
        )
        .map_err(|_| WindowError::PositionFailed(hwnd))
    }
}

/// The main window as seen by the motion controller
#[derive(Debug, Clone, Copy)]
pub struct Win32Surface {
    hwnd: HWND,
}

impl Win32Surface {
    pub fn new(hwnd: HWND) -> Self {
        Self { hwnd }
    }
}

impl WindowSurface for Win32Surface {
    fn move_to(&mut self, position: Point) {
        if let Err(err) = move_window(self.hwnd, position) {
            warn!(%err, x = position.x, y = position.y, "window move failed");
        }
    }

    fn request_redraw(&mut self) {
        // Invalidate only: a synchronous paint here would re-enter the
        // window procedure while the controller is borrowed.
        unsafe {
            InvalidateRect(self.hwnd, None, false);
        }
    }
}
