//! Built-in keycode → key symbol table for a US keyboard.
//!
//! Names match what XKB's default `us` keymap reports for the base shift
//! level, so chords read the same as with `XkbTranslator`.

use crate::keys::KeyCode;
use crate::traits::SymbolTranslator;

/// Translator over a fixed US layout.  Needs no system libraries.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsKeymap;

impl SymbolTranslator for UsKeymap {
    fn resolve(&self, code: KeyCode) -> Option<String> {
        code.evdev().and_then(us_symbol).map(str::to_string)
    }
}

/// Symbol for a kernel evdev keycode (see `linux/input-event-codes.h`).
fn us_symbol(code: u16) -> Option<&'static str> {
    let name = match code {
        1 => "Escape",
        2 => "1",
        3 => "2",
        4 => "3",
        5 => "4",
        6 => "5",
        7 => "6",
        8 => "7",
        9 => "8",
        10 => "9",
        11 => "0",
        12 => "minus",
        13 => "equal",
        14 => "BackSpace",
        15 => "Tab",
        16 => "q",
        17 => "w",
        18 => "e",
        19 => "r",
        20 => "t",
        21 => "y",
        22 => "u",
        23 => "i",
        24 => "o",
        25 => "p",
        26 => "bracketleft",
        27 => "bracketright",
        28 => "Return",
        29 => "Control_L",
        30 => "a",
        31 => "s",
        32 => "d",
        33 => "f",
        34 => "g",
        35 => "h",
        36 => "j",
        37 => "k",
        38 => "l",
        39 => "semicolon",
        40 => "apostrophe",
        41 => "grave",
        42 => "Shift_L",
        43 => "backslash",
        44 => "z",
        45 => "x",
        46 => "c",
        47 => "v",
        48 => "b",
        49 => "n",
        50 => "m",
        51 => "comma",
        52 => "period",
        53 => "slash",
        54 => "Shift_R",
        55 => "KP_Multiply",
        56 => "Alt_L",
        57 => "space",
        58 => "Caps_Lock",
        59 => "F1",
        60 => "F2",
        61 => "F3",
        62 => "F4",
        63 => "F5",
        64 => "F6",
        65 => "F7",
        66 => "F8",
        67 => "F9",
        68 => "F10",
        69 => "Num_Lock",
        70 => "Scroll_Lock",
        71 => "KP_Home",
        72 => "KP_Up",
        73 => "KP_Prior",
        74 => "KP_Subtract",
        75 => "KP_Left",
        76 => "KP_Begin",
        77 => "KP_Right",
        78 => "KP_Add",
        79 => "KP_End",
        80 => "KP_Down",
        81 => "KP_Next",
        82 => "KP_Insert",
        83 => "KP_Delete",
        86 => "less",
        87 => "F11",
        88 => "F12",
        96 => "KP_Enter",
        97 => "Control_R",
        98 => "KP_Divide",
        99 => "Print",
        100 => "Alt_R",
        102 => "Home",
        103 => "Up",
        104 => "Prior",
        105 => "Left",
        106 => "Right",
        107 => "End",
        108 => "Down",
        109 => "Next",
        110 => "Insert",
        111 => "Delete",
        113 => "XF86AudioMute",
        114 => "XF86AudioLowerVolume",
        115 => "XF86AudioRaiseVolume",
        119 => "Pause",
        125 => "Super_L",
        126 => "Super_R",
        127 => "Menu",
        163 => "XF86AudioNext",
        164 => "XF86AudioPlay",
        165 => "XF86AudioPrev",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::is_modifier;

    fn resolve(evdev: u16) -> Option<String> {
        UsKeymap.resolve(KeyCode::from_evdev(evdev))
    }

    #[test]
    fn letters_and_function_keys() {
        assert_eq!(resolve(17).as_deref(), Some("w"));
        assert_eq!(resolve(30).as_deref(), Some("a"));
        assert_eq!(resolve(61).as_deref(), Some("F3"));
        assert_eq!(resolve(63).as_deref(), Some("F5"));
        assert_eq!(resolve(67).as_deref(), Some("F9"));
    }

    #[test]
    fn modifiers_resolve_to_modifier_names() {
        for code in [29, 42, 54, 56, 58, 97, 100, 125, 126] {
            let name = resolve(code).unwrap();
            assert!(is_modifier(&name), "{} -> {} should be a modifier", code, name);
        }
    }

    #[test]
    fn xkb_numbering_is_offset_by_eight() {
        assert_eq!(UsKeymap.resolve(KeyCode(38)).as_deref(), Some("a"));
        assert_eq!(UsKeymap.resolve(KeyCode(5)), None);
    }

    #[test]
    fn unknown_codes_have_no_symbol() {
        assert_eq!(resolve(0), None);
        assert_eq!(resolve(240), None);
    }
}
