//! Traits that decouple the chord pipeline from the operating system.
//!
//! Every concrete backend (evdev devices, the XKB keymap, the FIFO, child
//! processes, a test harness, …) implements one of these traits.  The
//! [`Observer`](crate::observer::Observer) and the
//! [`ActionDispatcher`](crate::dispatch::ActionDispatcher) only depend on
//! these abstractions.

use crate::chord::Chord;
use crate::keys::{KeyCode, KeyEvent};
use std::time::Duration;

/// Maps a keycode to a stable key symbol name such as `"a"` or `"Shift_L"`.
///
/// Layout handling belongs entirely to the implementation.  A keycode with
/// no symbol returns `None` and takes no part in chord encoding.
pub trait SymbolTranslator {
    fn resolve(&self, code: KeyCode) -> Option<String>;
}

/// A source of raw key transitions.
///
/// # Contract
///
/// * [`poll_events`](InputSource::poll_events) waits **at most** `timeout`
///   for the source to become readable, then appends every event that is
///   available right now to `out` without blocking again.
/// * Returning with nothing appended is normal: the caller uses the timeout
///   to check for shutdown.
pub trait InputSource {
    /// The error type produced by this source.
    type Error: std::error::Error + 'static;

    fn poll_events(&mut self, timeout: Duration, out: &mut Vec<KeyEvent>) -> Result<(), Self::Error>;
}

/// Something that accepts an emitted chord: the FIFO writer, or the
/// dispatcher itself when running standalone.
pub trait ChordSink {
    type Error: std::error::Error + 'static;

    fn deliver(&mut self, chord: &Chord) -> Result<(), Self::Error>;
}

/// Starts external programs.
///
/// Implementations must not wait for the program to finish.
pub trait Launcher {
    /// Spawn `program` with `args` and return its process id.
    fn launch(&mut self, program: &str, args: &[String]) -> std::io::Result<u32>;
}
