use std::time::Duration;

use crate::domain::bounds::BoundsPolicy;
use crate::domain::core::Size;
use thiserror::Error;

/// Which reset behaviour the program runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Window stays on screen, recenters after any idle period, Esc exits
    Simple,
    /// Window may leave the screen, recenters only after sitting off-screen,
    /// Esc cancels a pending recenter
    Enhanced,
}

impl Variant {
    /// Variant selected at build time
    pub fn compiled() -> Self {
        if cfg!(feature = "simple-variant") {
            Variant::Simple
        } else {
            Variant::Enhanced
        }
    }
}

/// Tuning for motion and automatic recentering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionConfig {
    pub variant: Variant,
    /// Pixels moved per tick for each held direction
    pub step: i32,
    pub tick_interval: Duration,
    /// Off-screen check period; only the enhanced variant runs this timer
    pub boundary_interval: Option<Duration>,
    pub idle_threshold: Duration,
    pub warning_threshold: Duration,
    pub bounds: BoundsPolicy,
    pub window_size: Size,
    /// Follow WM_SIZE instead of keeping the creation size
    pub track_resize: bool,
    /// Clear a pending reset once the window overlaps the screen again
    pub disarm_on_reentry: bool,
}

impl MotionConfig {
    pub const TICK_MS: u64 = 50;
    pub const BOUNDARY_MS: u64 = 100;
    pub const IDLE_SECS: u64 = 5;
    pub const WARNING_SECS: u64 = 4;
    pub const ESCAPE_OVERSHOOT: i32 = 20;

    pub fn simple() -> Self {
        Self {
            variant: Variant::Simple,
            step: 20,
            tick_interval: Duration::from_millis(Self::TICK_MS),
            boundary_interval: None,
            idle_threshold: Duration::from_secs(Self::IDLE_SECS),
            warning_threshold: Duration::from_secs(Self::WARNING_SECS),
            bounds: BoundsPolicy::Contained,
            window_size: Size::new(400, 300),
            track_resize: false,
            disarm_on_reentry: false,
        }
    }

    pub fn enhanced() -> Self {
        Self {
            variant: Variant::Enhanced,
            step: 5,
            tick_interval: Duration::from_millis(Self::TICK_MS),
            boundary_interval: Some(Duration::from_millis(Self::BOUNDARY_MS)),
            idle_threshold: Duration::from_secs(Self::IDLE_SECS),
            warning_threshold: Duration::from_secs(Self::WARNING_SECS),
            bounds: BoundsPolicy::Escapable {
                overshoot: Self::ESCAPE_OVERSHOOT,
            },
            window_size: Size::new(600, 450),
            track_resize: true,
            disarm_on_reentry: false,
        }
    }

    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Simple => Self::simple(),
            Variant::Enhanced => Self::enhanced(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step <= 0 {
            return Err(ConfigError::InvalidStep(self.step));
        }

        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroInterval("tick"));
        }

        if self.boundary_interval.is_some_and(|interval| interval.is_zero()) {
            return Err(ConfigError::ZeroInterval("boundary"));
        }

        if self.warning_threshold >= self.idle_threshold {
            return Err(ConfigError::WarningAfterReset {
                warning: self.warning_threshold,
                idle: self.idle_threshold,
            });
        }

        if !self.window_size.is_positive() {
            return Err(ConfigError::InvalidWindowSize {
                width: self.window_size.width,
                height: self.window_size.height,
            });
        }

        // Off-screen arming needs both a boundary timer and room to leave the screen.
        if self.variant == Variant::Enhanced {
            if self.boundary_interval.is_none() {
                return Err(ConfigError::MissingBoundaryTimer);
            }
            if let BoundsPolicy::Escapable { overshoot } = self.bounds {
                if overshoot < 0 {
                    return Err(ConfigError::NegativeOvershoot(overshoot));
                }
            } else {
                return Err(ConfigError::UnreachableOffScreen);
            }
        }

        Ok(())
    }

    /// Converts an interval into the millisecond count SetTimer expects
    pub fn timer_millis(interval: Duration) -> u32 {
        u32::try_from(interval.as_millis()).unwrap_or(u32::MAX).max(1)
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self::for_variant(Variant::compiled())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Step must be a positive number of pixels, got {0}")]
    InvalidStep(i32),
    #[error("The {0} timer interval must be non-zero")]
    ZeroInterval(&'static str),
    #[error("Warning threshold {warning:?} must be shorter than the idle threshold {idle:?}")]
    WarningAfterReset { warning: Duration, idle: Duration },
    #[error("Window size must be positive, got {width}x{height}")]
    InvalidWindowSize { width: i32, height: i32 },
    #[error("Off-screen reset requires a boundary check timer")]
    MissingBoundaryTimer,
    #[error("Off-screen reset requires a bounds policy that lets the window leave the screen")]
    UnreachableOffScreen,
    #[error("Escape overshoot must not be negative, got {0}")]
    NegativeOvershoot(i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert!(MotionConfig::simple().validate().is_ok());
        assert!(MotionConfig::enhanced().validate().is_ok());
        assert!(MotionConfig::default().validate().is_ok());
    }

    #[test]
    fn presets_match_their_variant() {
        let simple = MotionConfig::for_variant(Variant::Simple);
        assert_eq!(simple.bounds, BoundsPolicy::Contained);
        assert!(simple.boundary_interval.is_none());
        assert_eq!(simple.step, 20);

        let enhanced = MotionConfig::for_variant(Variant::Enhanced);
        assert_eq!(enhanced.bounds, BoundsPolicy::Escapable { overshoot: 20 });
        assert_eq!(enhanced.boundary_interval, Some(Duration::from_millis(100)));
        assert_eq!(enhanced.step, 5);
        assert!(!enhanced.disarm_on_reentry);
    }

    #[test]
    fn rejects_non_positive_step() {
        let config = MotionConfig { step: 0, ..MotionConfig::simple() };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidStep(0))));
    }

    #[test]
    fn rejects_warning_after_reset() {
        let config = MotionConfig {
            warning_threshold: Duration::from_secs(6),
            ..MotionConfig::enhanced()
        };
        assert!(matches!(config.validate(), Err(ConfigError::WarningAfterReset { .. })));
    }

    #[test]
    fn enhanced_requires_escapable_bounds() {
        let config = MotionConfig {
            bounds: BoundsPolicy::Contained,
            ..MotionConfig::enhanced()
        };
        assert!(matches!(config.validate(), Err(ConfigError::UnreachableOffScreen)));

        let config = MotionConfig {
            boundary_interval: None,
            ..MotionConfig::enhanced()
        };
        assert!(matches!(config.validate(), Err(ConfigError::MissingBoundaryTimer)));
    }

    #[test]
    fn rejects_empty_window() {
        let config = MotionConfig {
            window_size: Size::new(0, 300),
            ..MotionConfig::simple()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidWindowSize { .. })));
    }

    #[test]
    fn timer_millis_never_zero() {
        assert_eq!(MotionConfig::timer_millis(Duration::from_millis(50)), 50);
        assert_eq!(MotionConfig::timer_millis(Duration::from_micros(10)), 1);
    }
}
