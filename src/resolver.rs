//! The resolver: chord lines in, commands out.

use crate::dispatch::{ActionDispatcher, Dispatch};
use crate::traits::Launcher;
use log::{info, warn};
use std::io::BufRead;

/// Counters reported at end of stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStats {
    pub lines: u64,
    pub launched: u64,
    pub unbound: u64,
    pub failed: u64,
    pub skipped: u64,
}

/// Read chord lines from `reader` and dispatch each one, until end of
/// stream.
///
/// Blank and non-UTF-8 lines are skipped.  Only read errors are returned.
pub fn run<R, L>(mut reader: R, dispatcher: &mut ActionDispatcher<L>) -> std::io::Result<ResolverStats>
where
    R: BufRead,
    L: Launcher,
{
    let mut stats = ResolverStats::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        stats.lines += 1;

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim(),
            Err(e) => {
                warn!("skipping non-UTF-8 line: {}", e);
                stats.skipped += 1;
                continue;
            }
        };
        if line.is_empty() {
            stats.skipped += 1;
            continue;
        }

        match dispatcher.dispatch(line) {
            Dispatch::Launched { .. } => stats.launched += 1,
            Dispatch::Unbound => stats.unbound += 1,
            Dispatch::Failed => stats.failed += 1,
        }
    }

    info!(
        "end of stream after {} lines: {} launched, {} unbound, {} failed",
        stats.lines, stats.launched, stats.unbound, stats.failed
    );
    Ok(stats)
}
