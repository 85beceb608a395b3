//! Key vocabulary shared by every component.
//!
//! [`KeyCode`] is the platform keycode in the translator's numbering (XKB
//! keycodes, i.e. kernel evdev codes shifted by [`XKB_KEYCODE_OFFSET`]).
//! [`KeyEvent`] is what an [`InputSource`](crate::traits::InputSource)
//! yields, and [`is_modifier`] is the closed set of symbol names that never
//! act as a chord trigger.

use std::fmt;
use std::time::SystemTime;

/// Distance between kernel (evdev) keycodes and XKB keycodes.
pub const XKB_KEYCODE_OFFSET: u32 = 8;

/// Symbol names that classify a key as a modifier.
///
/// Anything not listed here is a trigger.
pub const MODIFIER_SYMBOLS: &[&str] = &[
    "Alt_L",
    "Alt_R",
    "Caps_Lock",
    "Control_L",
    "Control_R",
    "Hyper_L",
    "Hyper_R",
    "Meta_L",
    "Meta_R",
    "Scroll_Lock",
    "Shift_L",
    "Shift_Lock",
    "Shift_R",
    "Super_L",
    "Super_R",
];

/// Returns `true` if `symbol` names a modifier key.
pub fn is_modifier(symbol: &str) -> bool {
    MODIFIER_SYMBOLS.contains(&symbol)
}

/// A keycode in XKB numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u32);

impl KeyCode {
    /// Convert a kernel evdev keycode into XKB numbering.
    pub fn from_evdev(code: u16) -> Self {
        KeyCode(u32::from(code) + XKB_KEYCODE_OFFSET)
    }

    /// The kernel evdev keycode, or `None` for codes below the offset.
    pub fn evdev(self) -> Option<u16> {
        self.0
            .checked_sub(XKB_KEYCODE_OFFSET)
            .and_then(|c| u16::try_from(c).ok())
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Physical key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Pressed,
    Released,
}

/// One raw key transition delivered by an input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub transition: Transition,
    pub timestamp: SystemTime,
}

impl KeyEvent {
    pub fn pressed(code: KeyCode) -> Self {
        Self {
            code,
            transition: Transition::Pressed,
            timestamp: SystemTime::now(),
        }
    }

    pub fn released(code: KeyCode) -> Self {
        Self {
            code,
            transition: Transition::Released,
            timestamp: SystemTime::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_are_recognised() {
        for name in ["Shift_L", "Control_R", "Alt_L", "Super_L", "Meta_R", "Hyper_L", "Caps_Lock"] {
            assert!(is_modifier(name), "{} should be a modifier", name);
        }
    }

    #[test]
    fn ordinary_keys_are_triggers() {
        for name in ["a", "w", "F5", "Return", "space", "ISO_Level3_Shift", "shift_l"] {
            assert!(!is_modifier(name), "{} should be a trigger", name);
        }
    }

    #[test]
    fn modifier_table_is_sorted_without_duplicates() {
        let mut sorted = MODIFIER_SYMBOLS.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted, MODIFIER_SYMBOLS);
    }

    #[test]
    fn evdev_offset_round_trips() {
        let code = KeyCode::from_evdev(30);
        assert_eq!(code, KeyCode(38));
        assert_eq!(code.evdev(), Some(30));
        assert_eq!(KeyCode(3).evdev(), None);
    }
}
