//! Logical keys and held-key tracking
//!
//! Virtual-key codes arrive from WM_KEYDOWN/WM_KEYUP on the window thread.
//! They are mapped to a small set of logical keys here; everything else is
//! ignored without error.

/// Keys the program reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    Up,
    Down,
    Left,
    Right,
    /// Recenter immediately (edge-triggered)
    Reset,
    /// Exit or cancel a pending reset, depending on the variant
    Cancel,
}

impl LogicalKey {
    pub const ALL: [LogicalKey; 6] = [
        LogicalKey::Up,
        LogicalKey::Down,
        LogicalKey::Left,
        LogicalKey::Right,
        LogicalKey::Reset,
        LogicalKey::Cancel,
    ];

    /// Convert Windows virtual key code to a logical key
    pub fn from_vk_code(vk_code: u32) -> Option<Self> {
        match vk_code {
            0x26 | 0x57 => Some(LogicalKey::Up),    // VK_UP, W
            0x28 | 0x53 => Some(LogicalKey::Down),  // VK_DOWN, S
            0x25 | 0x41 => Some(LogicalKey::Left),  // VK_LEFT, A
            0x27 | 0x44 => Some(LogicalKey::Right), // VK_RIGHT, D
            0x20 => Some(LogicalKey::Reset),        // VK_SPACE
            0x1b => Some(LogicalKey::Cancel),       // VK_ESCAPE
            _ => None,
        }
    }

    /// Unit step contributed by this key, (0, 0) for control keys
    pub fn unit_vector(&self) -> (i32, i32) {
        match self {
            LogicalKey::Up => (0, -1),
            LogicalKey::Down => (0, 1),
            LogicalKey::Left => (-1, 0),
            LogicalKey::Right => (1, 0),
            LogicalKey::Reset | LogicalKey::Cancel => (0, 0),
        }
    }

    pub fn is_direction(&self) -> bool {
        self.unit_vector() != (0, 0)
    }

    fn bit(&self) -> u8 {
        1 << (*self as u8)
    }
}

/// Set of currently held logical keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeySet {
    bits: u8,
}

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as held
    ///
    /// Returns true only on the released -> pressed transition, so keyboard
    /// auto-repeat does not count as a new press.
    pub fn press(&mut self, key: LogicalKey) -> bool {
        let was_pressed = self.is_pressed(key);
        self.bits |= key.bit();
        !was_pressed
    }

    /// Marks `key` as released, returning true if it was held
    pub fn release(&mut self, key: LogicalKey) -> bool {
        let was_pressed = self.is_pressed(key);
        self.bits &= !key.bit();
        was_pressed
    }

    pub fn is_pressed(&self, key: LogicalKey) -> bool {
        self.bits & key.bit() != 0
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn any_direction(&self) -> bool {
        self.pressed().any(|key| key.is_direction())
    }

    /// Iterates over held keys in declaration order
    pub fn pressed(&self) -> impl Iterator<Item = LogicalKey> + '_ {
        LogicalKey::ALL.into_iter().filter(|key| self.is_pressed(*key))
    }

    /// Sum of the unit vectors of every held direction key
    ///
    /// Opposite keys cancel out and diagonals are not normalized.
    pub fn direction(&self) -> (i32, i32) {
        self.pressed()
            .map(|key| key.unit_vector())
            .fold((0, 0), |(x, y), (dx, dy)| (x + dx, y + dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_conversion() {
        assert_eq!(LogicalKey::from_vk_code(0x26), Some(LogicalKey::Up));
        assert_eq!(LogicalKey::from_vk_code(0x57), Some(LogicalKey::Up));
        assert_eq!(LogicalKey::from_vk_code(0x53), Some(LogicalKey::Down));
        assert_eq!(LogicalKey::from_vk_code(0x41), Some(LogicalKey::Left));
        assert_eq!(LogicalKey::from_vk_code(0x27), Some(LogicalKey::Right));
        assert_eq!(LogicalKey::from_vk_code(0x20), Some(LogicalKey::Reset));
        assert_eq!(LogicalKey::from_vk_code(0x1b), Some(LogicalKey::Cancel));

        // Unrecognized keys are ignored
        assert_eq!(LogicalKey::from_vk_code(0x51), None); // Q
        assert_eq!(LogicalKey::from_vk_code(0x01), None); // VK_LBUTTON
    }

    #[test]
    fn press_is_edge_triggered() {
        let mut keys = KeySet::new();
        assert!(keys.press(LogicalKey::Reset));
        assert!(!keys.press(LogicalKey::Reset)); // auto-repeat
        assert!(keys.release(LogicalKey::Reset));
        assert!(!keys.release(LogicalKey::Reset));
        assert!(keys.press(LogicalKey::Reset));
    }

    #[test]
    fn direction_sums_held_keys() {
        let mut keys = KeySet::new();
        assert_eq!(keys.direction(), (0, 0));

        keys.press(LogicalKey::Right);
        assert_eq!(keys.direction(), (1, 0));

        keys.press(LogicalKey::Down);
        assert_eq!(keys.direction(), (1, 1));

        keys.press(LogicalKey::Left);
        assert_eq!(keys.direction(), (0, 1));

        keys.press(LogicalKey::Reset);
        assert_eq!(keys.direction(), (0, 1));
    }

    #[test]
    fn control_keys_are_not_directions() {
        let mut keys = KeySet::new();
        keys.press(LogicalKey::Cancel);
        keys.press(LogicalKey::Reset);
        assert!(!keys.any_direction());
        assert!(!keys.is_empty());

        keys.press(LogicalKey::Up);
        assert!(keys.any_direction());

        keys.clear();
        assert!(keys.is_empty());
        assert_eq!(keys.pressed().count(), 0);
    }
}
