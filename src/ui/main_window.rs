//! The roaming main window
//!
//! Owns the Win32 side of the program: window class, window procedure,
//! the tick and boundary timers, painting and the message loop. All state
//! lives in a `WindowContext` stored in GWLP_USERDATA and freed on
//! WM_NCDESTROY. Handlers only touch the controller through `RefCell`
//! borrows, so messages re-entered synchronously by SetWindowPos are
//! dropped instead of aliasing it.

use std::cell::RefCell;
use std::ffi::c_void;
use std::time::Instant;

use tiny_skia::{Color, Pixmap};
use tracing::{debug, error, info, warn};
use windows::Win32::Foundation::{COLORREF, GetLastError, HWND, LPARAM, LRESULT, RECT, WIN32_ERROR, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BI_RGB, BITMAPINFO, BITMAPINFOHEADER, BeginPaint, DIB_RGB_COLORS, EndPaint, HDC,
    PAINTSTRUCT, SetBkMode, SetDIBitsToDevice, SetTextColor, TRANSPARENT, TextOutW,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GWLP_USERDATA, GetClientRect,
    GetMessageW, GetWindowLongPtrW, IDC_ARROW, KillTimer, LoadCursorW, MSG, PostQuitMessage,
    RegisterClassW, SW_SHOW, SetTimer, SetWindowLongPtrW, ShowWindow, TranslateMessage, UpdateWindow,
    WINDOW_EX_STYLE, WM_DESTROY, WM_DISPLAYCHANGE, WM_ERASEBKGND, WM_KEYDOWN, WM_KEYUP, WM_KILLFOCUS,
    WM_NCDESTROY, WM_PAINT, WM_SIZE, WM_TIMER, WNDCLASSW, WS_MAXIMIZEBOX, WS_OVERLAPPEDWINDOW,
    WS_THICKFRAME,
};
use windows::core::{PCWSTR, w};

use crate::app::MotionController;
use crate::app::state::KeyResponse;
use crate::config::{MotionConfig, Variant};
use crate::domain::core::Size;
use crate::input::LogicalKey;
use crate::platform::screen::window_dpi_scale;
use crate::platform::window::{Win32Surface, WindowError, window_rect};
use crate::platform::windows::{size_from_lparam, to_utf16, win32_rect_to_rect};
use crate::ui::renderer::{StatusLayout, StatusRenderer, pixmap_to_bgra};

const CLASS_NAME: PCWSTR = w!("RoamerWindow");
const TICK_TIMER_ID: usize = 1;
const BOUNDARY_TIMER_ID: usize = 2;
// Matches the Win32 ERROR_CLASS_ALREADY_EXISTS (1410) code.
const CLASS_ALREADY_EXISTS_ERR: WIN32_ERROR = WIN32_ERROR(1410);

/// Per-window state reachable from the window procedure
struct WindowContext {
    controller: RefCell<MotionController<Win32Surface>>,
    renderer: StatusRenderer,
}

impl WindowContext {
    fn with_controller<R>(
        &self,
        f: impl FnOnce(&mut MotionController<Win32Surface>) -> R,
    ) -> Option<R> {
        match self.controller.try_borrow_mut() {
            Ok(mut controller) => Some(f(&mut controller)),
            Err(_) => {
                debug!("controller busy, skipping re-entrant message");
                None
            }
        }
    }

    fn paint(&self, hwnd: HWND, hdc: HDC) {
        let Ok(controller) = self.controller.try_borrow() else {
            return;
        };
        let snapshot = controller.status(Instant::now());
        let canvas = client_size(hwnd).unwrap_or_else(|| controller.size());
        drop(controller);

        let layout = StatusLayout::from_snapshot(&snapshot, canvas, window_dpi_scale(hwnd));
        match self.renderer.render_layout(&layout) {
            Ok(pixmap) => blit(hdc, &pixmap),
            Err(err) => {
                warn!(%err, "status frame render failed");
                return;
            }
        }

        if !self.renderer.draws_text() {
            draw_text_gdi(hdc, &layout);
        }
    }
}

/// The application window
pub struct MainWindow {
    hwnd: HWND,
}

impl MainWindow {
    /// Registers the class, creates the window centered on `screen`, starts
    /// the timers and shows it
    pub fn create(config: MotionConfig, screen: Size) -> Result<Self, WindowError> {
        register_window_class()?;

        let hinstance =
            unsafe { GetModuleHandleW(None) }.map_err(|_| WindowError::CreationFailed)?;

        let mut controller = MotionController::new(config.clone(), screen, Instant::now());
        let position = controller.position();
        let size = controller.size();

        let title = match config.variant {
            Variant::Simple => w!("Roamer - WASD/arrows to move, idle 5s recenters, Esc exits"),
            Variant::Enhanced => w!("Roamer - WASD/arrows to move, leave the screen to recenter"),
        };

        let hwnd = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE(0),
                CLASS_NAME,
                title,
                // Fixed size: no sizing border, no maximize
                WS_OVERLAPPEDWINDOW & !WS_THICKFRAME & !WS_MAXIMIZEBOX,
                position.x,
                position.y,
                size.width,
                size.height,
                None,
                None,
                hinstance,
                None,
            )
        };

        if hwnd.0 == 0 {
            return Err(WindowError::CreationFailed);
        }

        controller.attach_surface(Win32Surface::new(hwnd));
        let context = Box::new(WindowContext {
            controller: RefCell::new(controller),
            renderer: StatusRenderer::with_system_font(),
        });

        unsafe {
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, Box::into_raw(context) as isize);
        }

        start_timer(hwnd, TICK_TIMER_ID, MotionConfig::timer_millis(config.tick_interval));
        if let Some(interval) = config.boundary_interval {
            start_timer(hwnd, BOUNDARY_TIMER_ID, MotionConfig::timer_millis(interval));
        }

        unsafe {
            let _ = ShowWindow(hwnd, SW_SHOW);
            let _ = UpdateWindow(hwnd);
        }

        info!(x = position.x, y = position.y, variant = ?config.variant, "main window created");
        Ok(Self { hwnd })
    }

    /// Pumps messages until WM_QUIT
    pub fn run(&self) {
        let mut msg = MSG::default();
        debug!(hwnd = ?self.hwnd, "entering message loop");

        loop {
            let result = unsafe { GetMessageW(&mut msg, None, 0, 0) };

            if result.0 == 0 {
                debug!("WM_QUIT received");
                break;
            }
            if result.0 == -1 {
                error!("GetMessageW failed, leaving message loop");
                break;
            }

            unsafe {
                TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
    }
}

fn register_window_class() -> Result<(), WindowError> {
    let hinstance =
        unsafe { GetModuleHandleW(None) }.map_err(|_| WindowError::ClassRegistrationFailed)?;
    let cursor = unsafe { LoadCursorW(None, IDC_ARROW) }.unwrap_or_default();

    let wc = WNDCLASSW {
        lpfnWndProc: Some(window_proc),
        hInstance: hinstance.into(),
        lpszClassName: CLASS_NAME,
        hCursor: cursor,
        ..Default::default()
    };

    unsafe {
        if RegisterClassW(&wc) == 0 {
            match GetLastError() {
                Err(err) if err.code() == CLASS_ALREADY_EXISTS_ERR.to_hresult() => {}
                _ => return Err(WindowError::ClassRegistrationFailed),
            }
        }
    }

    Ok(())
}

fn start_timer(hwnd: HWND, id: usize, millis: u32) {
    let result = unsafe { SetTimer(hwnd, id, millis, None) };
    if result == 0 {
        warn!(id, millis, "SetTimer failed");
    }
}

/// Context stored in the window, if creation has finished
///
/// # Safety
/// The pointer is only set by `MainWindow::create` and cleared before the
/// box is freed on WM_NCDESTROY.
unsafe fn context_for<'a>(hwnd: HWND) -> Option<&'a WindowContext> {
    let ptr = unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) } as *const WindowContext;
    unsafe { ptr.as_ref() }
}

unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let context = unsafe { context_for(hwnd) };

    match msg {
        WM_KEYDOWN => {
            if let (Some(context), Some(key)) = (context, LogicalKey::from_vk_code(wparam.0 as u32)) {
                context.with_controller(|c| c.on_key_down(key, Instant::now()));
            }
            LRESULT(0)
        }
        WM_KEYUP => {
            let response = match (context, LogicalKey::from_vk_code(wparam.0 as u32)) {
                (Some(context), Some(key)) => context
                    .with_controller(|c| c.on_key_up(key, Instant::now()))
                    .unwrap_or(KeyResponse::Continue),
                _ => KeyResponse::Continue,
            };

            // The context is freed during DestroyWindow; nothing may touch it after.
            if response == KeyResponse::Exit {
                unsafe {
                    let _ = DestroyWindow(hwnd);
                }
            }
            LRESULT(0)
        }
        WM_TIMER => {
            if let Some(context) = context {
                let now = Instant::now();
                match wparam.0 {
                    TICK_TIMER_ID => {
                        context.with_controller(|c| c.tick(now));
                    }
                    BOUNDARY_TIMER_ID => {
                        context.with_controller(|c| c.check_boundary(now));
                    }
                    _ => {}
                }
            }
            LRESULT(0)
        }
        WM_PAINT => {
            let mut ps = PAINTSTRUCT::default();
            unsafe {
                let hdc = BeginPaint(hwnd, &mut ps);
                if let Some(context) = context {
                    context.paint(hwnd, hdc);
                }
                EndPaint(hwnd, &ps);
            }
            LRESULT(0)
        }
        // Every frame covers the whole client area
        WM_ERASEBKGND => LRESULT(1),
        WM_SIZE => {
            if let Some(context) = context {
                match window_rect(hwnd) {
                    Ok(rect) => {
                        context.with_controller(|c| c.on_resized(rect.size()));
                    }
                    Err(err) => debug!(%err, "ignoring WM_SIZE"),
                }
            }
            LRESULT(0)
        }
        WM_DISPLAYCHANGE => {
            if let Some(context) = context {
                let screen = size_from_lparam(lparam);
                context.with_controller(|c| c.on_screen_changed(screen, Instant::now()));
            }
            LRESULT(0)
        }
        WM_KILLFOCUS => {
            if let Some(context) = context {
                context.with_controller(|c| c.on_focus_lost());
            }
            LRESULT(0)
        }
        WM_DESTROY => {
            unsafe {
                let _ = KillTimer(hwnd, TICK_TIMER_ID);
                let _ = KillTimer(hwnd, BOUNDARY_TIMER_ID);
                PostQuitMessage(0);
            }
            LRESULT(0)
        }
        WM_NCDESTROY => {
            unsafe {
                let ptr = SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0) as *mut WindowContext;
                if !ptr.is_null() {
                    drop(Box::from_raw(ptr));
                }
                DefWindowProcW(hwnd, msg, wparam, lparam)
            }
        }
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}

fn client_size(hwnd: HWND) -> Option<Size> {
    let mut rect = RECT::default();
    unsafe { GetClientRect(hwnd, &mut rect) }.ok()?;
    let size = win32_rect_to_rect(&rect).size();
    size.is_positive().then_some(size)
}

/// Copies a finished frame to the window in one call
fn blit(hdc: HDC, pixmap: &Pixmap) {
    let bgra = pixmap_to_bgra(pixmap);
    let (width, height) = (pixmap.width(), pixmap.height());

    let mut bitmap_info = BITMAPINFO::default();
    bitmap_info.bmiHeader = BITMAPINFOHEADER {
        biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
        biWidth: width as i32,
        biHeight: -(height as i32), // top-down rows, same as the pixmap
        biPlanes: 1,
        biBitCount: 32,
        biCompression: BI_RGB.0,
        ..Default::default()
    };

    let lines = unsafe {
        SetDIBitsToDevice(
            hdc,
            0,
            0,
            width,
            height,
            0,
            0,
            0,
            height,
            bgra.as_ptr() as *const c_void,
            &bitmap_info,
            DIB_RGB_COLORS,
        )
    };

    if lines == 0 {
        warn!(width, height, "SetDIBitsToDevice copied nothing");
    }
}

/// Text fallback when no TrueType font could be loaded for the renderer
fn draw_text_gdi(hdc: HDC, layout: &StatusLayout) {
    unsafe {
        SetBkMode(hdc, TRANSPARENT);
        for line in &layout.lines {
            SetTextColor(hdc, colorref(line.color));
            TextOutW(hdc, line.x as i32, line.top() as i32, &to_utf16(&line.text));
        }
    }
}

fn colorref(color: Color) -> COLORREF {
    let c = color.to_color_u8();
    COLORREF(c.red() as u32 | (c.green() as u32) << 8 | (c.blue() as u32) << 16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorref_is_bgr() {
        let red = Color::from_rgba8(255, 0, 0, 255);
        assert_eq!(colorref(red), COLORREF(0x0000ff));
        let blue = Color::from_rgba8(0, 0, 255, 255);
        assert_eq!(colorref(blue), COLORREF(0xff0000));
    }

    #[test]
    fn class_registration_is_repeatable() {
        // A second registration hits ERROR_CLASS_ALREADY_EXISTS, which is fine
        if register_window_class().is_ok() {
            assert!(register_window_class().is_ok());
        }
    }
}
