//! The observer: key transitions in, chords out.
//!
//! A chord fires exactly once, on the press edge of a trigger key, using
//! whatever modifiers are held at that instant.  Releases and modifier
//! presses never fire.

use crate::chord::{Chord, ChordEncoder};
use crate::keys::{is_modifier, KeyEvent, Transition};
use crate::shutdown::ShutdownToken;
use crate::tracker::{KeyStateTracker, PressOutcome};
use crate::traits::{ChordSink, InputSource, SymbolTranslator};
use log::{debug, info, warn};
use std::time::Duration;

/// Longest time the loop stays suspended before re-checking for shutdown.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub events: u64,
    pub delivered: u64,
    pub dropped: u64,
}

/// Owns the pressed-key state and the encoder.
pub struct Observer<T> {
    tracker: KeyStateTracker,
    encoder: ChordEncoder<T>,
}

impl<T: SymbolTranslator> Observer<T> {
    /// Create an observer tracking at most `capacity` keys.
    pub fn new(translator: T, capacity: usize) -> Self {
        Self {
            tracker: KeyStateTracker::new(capacity),
            encoder: ChordEncoder::new(translator),
        }
    }

    pub fn tracker(&self) -> &KeyStateTracker {
        &self.tracker
    }

    /// Apply one transition; returns the chord it completes, if any.
    pub fn handle_event(&mut self, event: &KeyEvent) -> Option<Chord> {
        match event.transition {
            Transition::Released => {
                self.tracker.on_release(event.code);
                None
            }
            Transition::Pressed => {
                match self.tracker.on_press(event.code) {
                    Ok(PressOutcome::Inserted) => {}
                    Ok(PressOutcome::AlreadyHeld) => {
                        debug!("key {} already held", event.code);
                        return None;
                    }
                    Err(e) => {
                        warn!("{}", e);
                        return None;
                    }
                }

                let symbol = self.encoder.symbol(event.code)?;
                if is_modifier(&symbol) {
                    return None;
                }
                let chord = self.encoder.encode(&self.tracker);
                if chord.is_none() {
                    debug!("'{}' pressed while another trigger is held", symbol);
                }
                chord
            }
        }
    }

    /// Drive the observer until `shutdown` is triggered.
    ///
    /// Each wake-up drains everything the source has before suspending
    /// again.  Delivery failures are logged and the chord is dropped; only
    /// source errors end the loop early.
    pub fn run<S, K>(&mut self, source: &mut S, sink: &mut K, shutdown: &ShutdownToken) -> Result<RunStats, S::Error>
    where
        S: InputSource,
        K: ChordSink,
    {
        let mut stats = RunStats::default();
        let mut batch = Vec::new();

        info!("observer running");
        while !shutdown.is_triggered() {
            source.poll_events(POLL_INTERVAL, &mut batch)?;
            for event in batch.drain(..) {
                stats.events += 1;
                let Some(chord) = self.handle_event(&event) else {
                    continue;
                };
                info!("chord '{}'", chord);
                match sink.deliver(&chord) {
                    Ok(()) => stats.delivered += 1,
                    Err(e) => {
                        warn!("dropping chord '{}': {}", chord, e);
                        stats.dropped += 1;
                    }
                }
            }
        }
        info!(
            "observer stopped after {} events, {} chords delivered, {} dropped",
            stats.events, stats.delivered, stats.dropped
        );
        Ok(stats)
    }
}
