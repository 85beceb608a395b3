//! Keyboard input and keycode translation backends.
//!
//! * [`device::EvdevSource`] reads key transitions straight from the kernel
//!   input devices.
//! * [`keymap::UsKeymap`] translates keycodes with a built-in US layout.
//! * `xkb::XkbTranslator` (feature `xkb`) uses the system XKB keymap.

pub mod device;
pub mod keymap;
#[cfg(feature = "xkb")]
pub mod xkb;
