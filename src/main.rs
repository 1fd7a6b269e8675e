//! roamer: a window you steer with WASD or the arrow keys
//!
//! The default build is the enhanced variant (window may leave the screen
//! and recenters after sitting off screen); `--features simple-variant`
//! builds the contained variant where Esc exits.
#![cfg_attr(not(windows), allow(dead_code, unused_imports))]

mod app;
mod config;
mod domain;
mod input;
#[cfg(windows)]
mod platform;
mod ui;

use tracing_subscriber::EnvFilter;

use crate::config::ConfigError;

/// Top-level startup failure
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid motion configuration: {0}")]
    Config(#[from] ConfigError),
    #[cfg(windows)]
    #[error("screen query failed: {0}")]
    Screen(#[from] platform::screen::ScreenError),
    #[cfg(windows)]
    #[error("window setup failed: {0}")]
    Window(#[from] platform::window::WindowError),
    #[cfg(not(windows))]
    #[error("this program needs Windows")]
    UnsupportedPlatform,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Startup failures are logged; the exit status stays 0 either way.
    if let Err(err) = run() {
        tracing::error!(%err, "roamer could not start");
    }
}

#[cfg(windows)]
fn run() -> Result<(), AppError> {
    use crate::config::MotionConfig;
    use crate::platform::screen::{enable_dpi_awareness, primary_screen_size};
    use crate::ui::MainWindow;

    let config = MotionConfig::default();
    config.validate()?;

    if let Err(err) = enable_dpi_awareness() {
        tracing::warn!(%err, "continuing without per-monitor DPI awareness");
    }

    let screen = primary_screen_size()?;
    tracing::info!(
        width = screen.width,
        height = screen.height,
        variant = ?config.variant,
        "starting"
    );

    let window = MainWindow::create(config, screen)?;
    window.run();

    tracing::info!("message loop finished");
    Ok(())
}

#[cfg(not(windows))]
fn run() -> Result<(), AppError> {
    Err(AppError::UnsupportedPlatform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MotionConfig;

    #[test]
    fn config_errors_convert() {
        let mut config = MotionConfig::default();
        config.step = 0;
        let err: AppError = config.validate().unwrap_err().into();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().starts_with("invalid motion configuration"));
    }
}
