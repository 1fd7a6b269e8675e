//! User interface components
//!
//! `renderer` draws the status frame into a pixmap and is platform
//! independent; `main_window` hosts it in a Win32 window.

#[cfg(windows)]
pub mod main_window;
pub mod renderer;

#[cfg(windows)]
pub use main_window::MainWindow;
