//! Screen metrics and DPI awareness
//!
//! Coordinates are real pixels: the process opts into per-monitor DPI
//! awareness before any window exists, so GetSystemMetrics and the window
//! rectangles agree with each other.

use crate::domain::core::Size;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::HiDpi::{
    DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, GetDpiForWindow, SetProcessDpiAwarenessContext,
};
use windows::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN};

/// Error types for screen queries
#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    #[error("Failed to enable per-monitor DPI awareness: {0}")]
    DpiAwarenessFailed(windows::core::Error),
    #[error("Primary screen metrics unavailable")]
    MetricsUnavailable,
}

/// Opts the process into per-monitor DPI awareness (v2)
///
/// Must run before the first window is created.
///
/// # Returns
/// `ScreenError::DpiAwarenessFailed` if Windows refused, e.g. because a
/// manifest already set the awareness
pub fn enable_dpi_awareness() -> Result<(), ScreenError> {
    unsafe {
        SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2)
            .map_err(ScreenError::DpiAwarenessFailed)
    }
}

/// Size of the primary screen in pixels
///
/// # Returns
/// Screen size, or `ScreenError::MetricsUnavailable` when no display is attached
pub fn primary_screen_size() -> Result<Size, ScreenError> {
    let size = unsafe { Size::new(GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };

    if size.is_positive() {
        Ok(size)
    } else {
        Err(ScreenError::MetricsUnavailable)
    }
}

/// DPI scale factor of the monitor a window is on (1.0 = 96 DPI)
///
/// # Arguments
/// * `hwnd` - Window to query
///
/// # Returns
/// Scale factor, 1.0 when the handle is invalid
pub fn window_dpi_scale(hwnd: HWND) -> f32 {
    let dpi = unsafe { GetDpiForWindow(hwnd) };
    if dpi == 0 { 1.0 } else { dpi as f32 / 96.0 }
}
