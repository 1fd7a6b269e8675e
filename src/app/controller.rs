//! Motion and reset controller
//!
//! Owns the window position, the held keys and the reset policy. Every entry
//! point takes the current `Instant` so the whole state machine can be driven
//! deterministically from tests; the window procedure passes `Instant::now()`.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::app::state::{
    ControllerState, KeyResponse, StatusSnapshot, TickOutcome, VisualState,
};
use crate::config::{MotionConfig, Variant};
use crate::domain::bounds::{center_in, is_fully_off_screen};
use crate::domain::core::{Point, Size};
use crate::input::{KeySet, LogicalKey};

/// Where the controller pushes its decisions
///
/// Implemented over an HWND by the platform layer and by a recording fake in
/// tests. Platform failures are reported by the implementation, not here.
pub trait WindowSurface {
    /// Move the window without resizing it or changing its z-order
    fn move_to(&mut self, position: Point);
    /// Schedule a repaint of the status text
    fn request_redraw(&mut self);
}

/// Keyboard-driven window mover with automatic recentering
pub struct MotionController<S: WindowSurface> {
    config: MotionConfig,
    /// None until the window exists; every operation is a no-op before that
    surface: Option<S>,
    position: Point,
    size: Size,
    screen: Size,
    keys: KeySet,
    last_activity: Instant,
    armed_at: Option<Instant>,
    has_moved: bool,
    /// Visual state as of the last requested repaint
    shown_visual: VisualState,
}

impl<S: WindowSurface> MotionController<S> {
    /// Creates a controller with the window centered on `screen`
    pub fn new(config: MotionConfig, screen: Size, now: Instant) -> Self {
        let size = config.window_size;
        Self {
            position: center_in(screen, size),
            size,
            screen,
            config,
            surface: None,
            keys: KeySet::new(),
            last_activity: now,
            armed_at: None,
            has_moved: false,
            shown_visual: VisualState::Idle,
        }
    }

    pub fn attach_surface(&mut self, surface: S) {
        self.surface = Some(surface);
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn screen(&self) -> Size {
        self.screen
    }

    pub fn keys(&self) -> &KeySet {
        &self.keys
    }

    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    pub fn controller_state(&self) -> ControllerState {
        match self.armed_at {
            Some(armed_at) => ControllerState::Armed { armed_at },
            None => ControllerState::Idle,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    /// Handles a key-down (including auto-repeat)
    ///
    /// Any mapped key counts as activity. Reset recenters on a fresh press
    /// only, so holding Space does not keep snapping the window back.
    ///
    /// # Arguments
    /// * `key` - Mapped key
    /// * `now` - Time of the key message
    pub fn on_key_down(&mut self, key: LogicalKey, now: Instant) {
        if !self.is_attached() {
            return;
        }

        let fresh = self.keys.press(key);
        self.last_activity = now;

        if key == LogicalKey::Reset && fresh {
            debug!("reset key pressed");
            self.reset_to_center(now);
        }
        self.sync_visual(now);
    }

    /// Handles a key-up
    ///
    /// Releasing Cancel exits in the simple variant and cancels a pending
    /// reset in the enhanced one. A release with no matching press is ignored.
    pub fn on_key_up(&mut self, key: LogicalKey, now: Instant) -> KeyResponse {
        if !self.is_attached() {
            return KeyResponse::Continue;
        }

        if !self.keys.release(key) {
            return KeyResponse::Continue;
        }

        if key != LogicalKey::Cancel {
            // Releasing a direction key ends the Pressed state.
            self.sync_visual(now);
            return KeyResponse::Continue;
        }

        match self.config.variant {
            Variant::Simple => {
                info!("cancel released, exiting");
                KeyResponse::Exit
            }
            Variant::Enhanced => {
                self.cancel_pending_reset(now);
                KeyResponse::Continue
            }
        }
    }

    /// Forgets held keys; the window will not see their key-ups
    pub fn on_focus_lost(&mut self) {
        self.keys.clear();
    }

    /// Clears an armed reset without recentering. Returns true if one was pending.
    pub fn cancel_pending_reset(&mut self, now: Instant) -> bool {
        let Some(armed_at) = self.armed_at.take() else {
            return false;
        };

        info!(armed_for = ?now.saturating_duration_since(armed_at), "pending reset cancelled");
        self.redraw();
        true
    }

    /// Periodic motion update
    ///
    /// Moves one step in the held direction, or recenters when a reset is
    /// due. Also requests a repaint whenever the visual state changed since
    /// the last one or a countdown is running.
    ///
    /// # Arguments
    /// * `now` - Time of the timer message
    ///
    /// # Returns
    /// What the tick did to the window
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if !self.is_attached() {
            return TickOutcome::Idle;
        }

        let outcome = self.advance(now);
        self.sync_visual(now);
        outcome
    }

    fn advance(&mut self, now: Instant) -> TickOutcome {
        let (ux, uy) = self.keys.direction();
        if (ux, uy) != (0, 0) {
            self.move_by(ux * self.config.step, uy * self.config.step, now);
            return TickOutcome::Moved;
        }

        if self.reset_due(now) {
            debug!(idle = ?self.idle_elapsed(now), "idle threshold reached");
            self.reset_to_center(now);
            return TickOutcome::Recentered;
        }

        TickOutcome::Idle
    }

    /// Applies a delta, clamped to the configured bounds policy
    ///
    /// A move that the clamp turns into a no-op is dropped entirely: the
    /// surface is not touched and it does not count as activity.
    ///
    /// # Arguments
    /// * `dx` - Horizontal delta in pixels
    /// * `dy` - Vertical delta in pixels
    /// * `now` - Time of the move
    pub fn move_by(&mut self, dx: i32, dy: i32, now: Instant) {
        if !self.is_attached() || (dx, dy) == (0, 0) {
            return;
        }

        let target = self
            .config
            .bounds
            .clamp(self.position.offset(dx, dy), self.size, self.screen);

        // Pinned against the edge of the envelope
        if target == self.position {
            return;
        }

        self.position = target;
        self.has_moved = true;
        self.last_activity = now;

        if let Some(surface) = self.surface.as_mut() {
            surface.move_to(target);
            surface.request_redraw();
        }
    }

    /// Arms the reset once the window has fully left the screen
    ///
    /// Returns true when this call armed it. Runs only in the enhanced variant.
    pub fn check_boundary(&mut self, now: Instant) -> bool {
        if !self.is_attached() || self.config.variant != Variant::Enhanced {
            return false;
        }

        let off_screen = is_fully_off_screen(self.position, self.size, self.screen);

        if off_screen && self.armed_at.is_none() {
            info!(x = self.position.x, y = self.position.y, "window left the screen, reset armed");
            self.armed_at = Some(now);
            // Grace period restarts from the moment the window disappeared.
            self.last_activity = now;
            self.redraw();
            return true;
        }

        if !off_screen && self.armed_at.is_some() && self.config.disarm_on_reentry {
            info!("window back on screen, reset disarmed");
            self.armed_at = None;
            self.redraw();
        }

        self.sync_visual(now);
        false
    }

    /// Moves the window back to the middle of the screen
    pub fn reset_to_center(&mut self, now: Instant) {
        if !self.is_attached() {
            return;
        }

        let center = center_in(self.screen, self.size);
        debug!(x = center.x, y = center.y, "recentering window");

        self.position = center;
        self.has_moved = false;
        self.armed_at = None;
        self.last_activity = now;

        if let Some(surface) = self.surface.as_mut() {
            surface.move_to(center);
            surface.request_redraw();
        }
    }

    /// True once the idle threshold has elapsed since the last activity
    pub fn should_reset(&self, now: Instant) -> bool {
        self.idle_elapsed(now) >= self.config.idle_threshold
    }

    pub fn idle_elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_activity)
    }

    /// Records a new outer window size (enhanced variant only)
    pub fn on_resized(&mut self, size: Size) {
        if !self.config.track_resize || !size.is_positive() || size == self.size {
            return;
        }

        debug!(width = size.width, height = size.height, "window resized");
        self.size = size;
    }

    /// Adopts a new screen size and pulls the window back into bounds
    ///
    /// A window left off-center by the change is treated as moved, so the
    /// simple variant's idle reset still brings it back.
    ///
    /// # Arguments
    /// * `screen` - New primary screen size
    /// * `now` - Time of the display change
    pub fn on_screen_changed(&mut self, screen: Size, now: Instant) {
        if !self.is_attached() || screen == self.screen || !screen.is_positive() {
            return;
        }

        info!(width = screen.width, height = screen.height, "screen size changed");
        self.screen = screen;

        if !self.config.bounds.contains(self.position, self.size, self.screen) {
            let clamped = self.config.bounds.clamp(self.position, self.size, self.screen);
            self.position = clamped;
            self.last_activity = now;
            if let Some(surface) = self.surface.as_mut() {
                surface.move_to(clamped);
            }
        }

        // The old center is no longer the center; the idle reset must still fire.
        if self.position != center_in(self.screen, self.size) && !self.has_moved {
            self.has_moved = true;
            self.last_activity = now;
        }
        self.redraw();
    }

    pub fn visual_state(&self, now: Instant) -> VisualState {
        let idle = self.idle_elapsed(now);
        let pending = self.has_moved || self.armed_at.is_some();

        if pending && idle >= self.config.warning_threshold {
            VisualState::Warning
        } else if self.armed_at.is_some() {
            VisualState::Armed
        } else if self.keys.any_direction() {
            VisualState::Pressed
        } else {
            VisualState::Idle
        }
    }

    /// Time until the automatic recenter, if one is pending under the
    /// variant's policy
    pub fn countdown(&self, now: Instant) -> Option<Duration> {
        if !self.reset_pending() {
            return None;
        }

        Some(self.config.idle_threshold.saturating_sub(self.idle_elapsed(now)))
    }

    pub fn status(&self, now: Instant) -> StatusSnapshot {
        StatusSnapshot {
            variant: self.config.variant,
            position: self.position,
            visual: self.visual_state(now),
            countdown: self.countdown(now),
            idle: self.idle_elapsed(now),
            reset_after: self.config.idle_threshold,
        }
    }

    fn reset_pending(&self) -> bool {
        match self.config.variant {
            Variant::Simple => self.has_moved,
            Variant::Enhanced => self.armed_at.is_some(),
        }
    }

    fn reset_due(&self, now: Instant) -> bool {
        self.reset_pending() && self.should_reset(now)
    }

    fn sync_visual(&mut self, now: Instant) {
        let visual = self.visual_state(now);
        if visual != self.shown_visual || self.countdown(now).is_some() {
            self.shown_visual = visual;
            self.redraw();
        }
    }

    fn redraw(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.request_redraw();
        }
    }
}
