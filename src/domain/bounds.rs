//! Bounds policies for window motion
//!
//! A policy turns a proposed top-left position into a legal one for a window
//! of a given size on a screen of a given size. Both policies are per-axis
//! clamps, so clamping a legal position leaves it untouched.

use crate::domain::core::{Point, Rect, Size};

/// How far the window may travel relative to the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsPolicy {
    /// The window always stays fully on screen
    Contained,
    /// The window may leave the screen completely, but no further than
    /// `overshoot` pixels past its full exit on any side
    Escapable { overshoot: i32 },
}

impl BoundsPolicy {
    /// Constrains `position` for a window of `size` on a screen of `screen` size
    ///
    /// # Arguments
    /// * `position` - Proposed top-left corner
    /// * `size` - Outer window size
    /// * `screen` - Screen size, anchored at (0, 0)
    ///
    /// # Returns
    /// The nearest legal position, clamped per axis
    pub fn clamp(&self, position: Point, size: Size, screen: Size) -> Point {
        let (min_x, max_x) = self.axis_range(size.width, screen.width);
        let (min_y, max_y) = self.axis_range(size.height, screen.height);

        Point::new(clamp_axis(position.x, min_x, max_x), clamp_axis(position.y, min_y, max_y))
    }

    /// Returns true if `position` is already legal under this policy
    pub fn contains(&self, position: Point, size: Size, screen: Size) -> bool {
        self.clamp(position, size, screen) == position
    }

    fn axis_range(&self, extent: i32, screen_extent: i32) -> (i32, i32) {
        match *self {
            BoundsPolicy::Contained => (0, screen_extent - extent),
            BoundsPolicy::Escapable { overshoot } => {
                (-(extent + overshoot), screen_extent + overshoot)
            }
        }
    }
}

// Lower bound wins when the window is larger than the screen.
fn clamp_axis(value: i32, min: i32, max: i32) -> i32 {
    value.min(max).max(min)
}

/// Top-left position that centers a window of `size` on the screen
pub fn center_in(screen: Size, size: Size) -> Point {
    Rect::screen(screen).centered(size)
}

/// Returns true if the window has no pixel in common with the screen
pub fn is_fully_off_screen(position: Point, size: Size, screen: Size) -> bool {
    !Rect::screen(screen).overlaps(&Rect::from_origin(position, size))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Size = Size { width: 1920, height: 1080 };
    const WINDOW: Size = Size { width: 600, height: 450 };

    #[test]
    fn contained_keeps_window_on_screen() {
        let policy = BoundsPolicy::Contained;
        assert_eq!(policy.clamp(Point::new(-10, -10), WINDOW, SCREEN), Point::new(0, 0));
        assert_eq!(policy.clamp(Point::new(5000, 5000), WINDOW, SCREEN), Point::new(1320, 630));
        assert_eq!(policy.clamp(Point::new(700, 300), WINDOW, SCREEN), Point::new(700, 300));
    }

    #[test]
    fn contained_prefers_origin_for_oversized_window() {
        let policy = BoundsPolicy::Contained;
        let huge = Size::new(2500, 1500);
        assert_eq!(policy.clamp(Point::new(40, 40), huge, SCREEN), Point::new(0, 0));
    }

    #[test]
    fn escapable_allows_full_exit_plus_overshoot() {
        let policy = BoundsPolicy::Escapable { overshoot: 20 };
        assert_eq!(policy.clamp(Point::new(5000, 0), WINDOW, SCREEN), Point::new(1940, 0));
        assert_eq!(policy.clamp(Point::new(-5000, 0), WINDOW, SCREEN), Point::new(-620, 0));
        assert_eq!(policy.clamp(Point::new(0, 5000), WINDOW, SCREEN), Point::new(0, 1100));
        assert_eq!(policy.clamp(Point::new(0, -5000), WINDOW, SCREEN), Point::new(0, -470));
        assert!(is_fully_off_screen(Point::new(1940, 0), WINDOW, SCREEN));
    }

    #[test]
    fn clamping_is_idempotent() {
        let policies = [BoundsPolicy::Contained, BoundsPolicy::Escapable { overshoot: 20 }];
        let samples = [
            Point::new(-3000, 17),
            Point::new(660, 315),
            Point::new(1919, -449),
            Point::new(4000, 4000),
        ];

        for policy in policies {
            for sample in samples {
                let once = policy.clamp(sample, WINDOW, SCREEN);
                assert_eq!(policy.clamp(once, WINDOW, SCREEN), once);
                assert!(policy.contains(once, WINDOW, SCREEN));
            }
        }
    }

    #[test]
    fn off_screen_detection_is_strict() {
        assert!(!is_fully_off_screen(Point::new(1919, 0), WINDOW, SCREEN));
        assert!(is_fully_off_screen(Point::new(1920, 0), WINDOW, SCREEN));
        assert!(!is_fully_off_screen(Point::new(-599, 0), WINDOW, SCREEN));
        assert!(is_fully_off_screen(Point::new(-600, 0), WINDOW, SCREEN));
        assert!(is_fully_off_screen(Point::new(0, -450), WINDOW, SCREEN));
        assert!(is_fully_off_screen(Point::new(0, 1080), WINDOW, SCREEN));
    }

    #[test]
    fn center_matches_reference_screen() {
        assert_eq!(center_in(SCREEN, WINDOW), Point::new(660, 315));
    }
}
