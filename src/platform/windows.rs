//! General Windows platform utilities
//!
//! Conversions between Win32 structures and domain types, and UTF-16
//! helpers for the wide-string APIs.

use crate::domain::core::{Rect, Size};
use windows::Win32::Foundation::{LPARAM, RECT};

/// Converts a Windows RECT to domain rectangle
///
/// # Arguments
/// * `rect` - Windows RECT structure (exclusive right/bottom edges)
///
/// # Returns
/// Domain rectangle
pub fn win32_rect_to_rect(rect: &RECT) -> Rect {
    Rect {
        x: rect.left,
        y: rect.top,
        w: rect.right - rect.left,
        h: rect.bottom - rect.top,
    }
}

/// Encodes a string as UTF-16 without a terminator, as TextOutW expects
///
/// # Arguments
/// * `text` - Text to encode
///
/// # Returns
/// UTF-16 code units
pub fn to_utf16(text: &str) -> Vec<u16> {
    text.encode_utf16().collect()
}

/// Width and height packed into WM_SIZE / WM_DISPLAYCHANGE lparam
///
/// # Arguments
/// * `lparam` - Message parameter, width in the low word, height in the high word
///
/// # Returns
/// Unpacked size in pixels
pub fn size_from_lparam(lparam: LPARAM) -> Size {
    let packed = lparam.0 as u32;
    Size::new((packed & 0xffff) as i32, ((packed >> 16) & 0xffff) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_conversion_handles_negative_origin() {
        let win32 = RECT { left: -620, top: 10, right: -20, bottom: 460 };
        assert_eq!(win32_rect_to_rect(&win32), Rect::new(-620, 10, 600, 450));
    }

    #[test]
    fn lparam_unpacking() {
        let lparam = LPARAM(((1080u32 << 16) | 1920u32) as isize);
        assert_eq!(size_from_lparam(lparam), Size::new(1920, 1080));
    }

    #[test]
    fn utf16_has_no_terminator() {
        assert_eq!(to_utf16("Esc"), vec![0x45, 0x73, 0x63]);
    }
}
