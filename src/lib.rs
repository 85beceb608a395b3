//! **clef** — a keyboard-chord hotkey daemon.
//!
//! A *chord* is one or more held modifier keys plus exactly one trigger key,
//! written canonically as the sorted modifier names followed by the trigger
//! (`"Shift_L Super_L w"`).  Two processes cooperate:
//!
//! * `clefd`, the **observer**, reads raw key transitions, tracks which keys
//!   are down and writes one line per fired chord to a named pipe.
//! * `clef`, the **resolver**, reads those lines, looks each one up in the
//!   binding table built from its configuration and starts the bound
//!   command.
//!
//! # Architecture
//!
//! The crate is organised around the traits in [`traits`]:
//!
//! * [`traits::InputSource`] and [`traits::SymbolTranslator`] abstract the
//!   keyboard and its layout ([`input`] has the evdev and keymap backends).
//! * [`traits::ChordSink`] abstracts where fired chords go: the FIFO in
//!   [`ipc`], or the dispatcher directly when running standalone.
//! * [`traits::Launcher`] abstracts process creation so dispatch can be
//!   tested without spawning anything.

pub mod chord;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod input;
pub mod ipc;
pub mod keys;
pub mod observer;
pub mod resolver;
pub mod shutdown;
pub mod tracker;
pub mod traits;
