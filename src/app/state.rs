//! Controller state and the values it hands to the rest of the program
//!
//! The controller owns the mutable fields; these types are the read-only
//! views (state machine state, visual state, status snapshot) and the
//! outcomes of input and timer events.

use std::time::{Duration, Instant};

use crate::config::Variant;
use crate::domain::core::Point;

/// Reset state machine
///
/// Only the enhanced variant ever leaves `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Window on screen (or simple variant), nothing scheduled
    Idle,
    /// Window went fully off screen; recenter pending
    Armed { armed_at: Instant },
}

impl ControllerState {
    pub fn is_armed(&self) -> bool {
        matches!(self, ControllerState::Armed { .. })
    }
}

/// What the window should look like, derived from controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualState {
    Idle,
    /// A direction key is held
    Pressed,
    /// Off screen, countdown running
    Armed,
    /// Close to an automatic recenter
    Warning,
}

impl VisualState {
    pub fn label(&self) -> &'static str {
        match self {
            VisualState::Idle => "Idle",
            VisualState::Pressed => "Moving",
            VisualState::Armed => "Off screen",
            VisualState::Warning => "Recentering soon",
        }
    }
}

/// Result of a key release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResponse {
    Continue,
    /// Close the window and leave the message loop
    Exit,
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Moved,
    Recentered,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub variant: Variant,
    pub position: Point,
    pub visual: VisualState,
    /// Time left before an automatic recenter, if one is pending
    pub countdown: Option<Duration>,
    pub idle: Duration,
    /// Idle time after which a pending recenter fires
    pub reset_after: Duration,
}

impl StatusSnapshot {
    /// Countdown formatted with one decimal, e.g. "3.2s"
    pub fn countdown_text(&self) -> Option<String> {
        self.countdown
            .map(|remaining| format!("{:.1}s", remaining.as_secs_f32()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armed_state_reports_armed() {
        assert!(!ControllerState::Idle.is_armed());
        assert!(ControllerState::Armed { armed_at: Instant::now() }.is_armed());
    }

    #[test]
    fn visual_labels_are_distinct() {
        let labels = [
            VisualState::Idle.label(),
            VisualState::Pressed.label(),
            VisualState::Armed.label(),
            VisualState::Warning.label(),
        ];
        for (i, a) in labels.iter().enumerate() {
            for b in labels.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn countdown_text_formatting() {
        let snapshot = StatusSnapshot {
            variant: Variant::Enhanced,
            position: Point::new(0, 0),
            visual: VisualState::Armed,
            countdown: Some(Duration::from_millis(3200)),
            idle: Duration::from_millis(1750),
            reset_after: Duration::from_secs(5),
        };
        assert_eq!(snapshot.countdown_text().as_deref(), Some("3.2s"));

        let idle = StatusSnapshot { countdown: None, ..snapshot };
        assert!(idle.countdown_text().is_none());
    }
}
