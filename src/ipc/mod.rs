//! Observer → resolver transport.
//!
//! A named pipe at a well-known path carries one canonical chord per line
//! from `clefd` to `clef`.  No framing beyond the line feed is needed: chord
//! strings never contain one.

pub mod fifo;
