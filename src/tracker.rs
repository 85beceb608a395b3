//! The set of keys currently held down.

use crate::keys::KeyCode;

/// Capacity used when the configuration does not set one.
pub const DEFAULT_MAX_PRESSED_KEYS: usize = 16;

/// Result of a successful [`KeyStateTracker::on_press`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// The key was not held before and is now tracked.
    Inserted,
    /// The key was already held (autorepeat or a duplicated event).
    AlreadyHeld,
}

/// The tracker is full; the press was dropped and the state is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("pressed-key set is full ({capacity} keys), dropping key {code}")]
pub struct TrackerError {
    pub code: KeyCode,
    pub capacity: usize,
}

/// Bounded, duplicate-free set of held keycodes.
///
/// Storage keeps insertion order, but nothing downstream relies on it: the
/// chord encoder sorts explicitly.  A full tracker rejects new keys rather
/// than evicting old ones, so a stuck key can never push out a real one.
#[derive(Debug, Clone)]
pub struct KeyStateTracker {
    pressed: Vec<KeyCode>,
    capacity: usize,
}

impl KeyStateTracker {
    /// Create an empty tracker holding at most `capacity` keys (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            pressed: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a key press.
    pub fn on_press(&mut self, code: KeyCode) -> Result<PressOutcome, TrackerError> {
        if self.contains(code) {
            return Ok(PressOutcome::AlreadyHeld);
        }
        if self.pressed.len() >= self.capacity {
            return Err(TrackerError {
                code,
                capacity: self.capacity,
            });
        }
        self.pressed.push(code);
        Ok(PressOutcome::Inserted)
    }

    /// Record a key release.  Returns `false` if the key was not tracked,
    /// which happens when its press was dropped at capacity.
    pub fn on_release(&mut self, code: KeyCode) -> bool {
        match self.pressed.iter().position(|&c| c == code) {
            Some(idx) => {
                self.pressed.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, code: KeyCode) -> bool {
        self.pressed.contains(&code)
    }

    pub fn len(&self) -> usize {
        self.pressed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Held keys, in no guaranteed order.
    pub fn iter(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.pressed.iter().copied()
    }

    /// Forget every held key.
    pub fn clear(&mut self) {
        self.pressed.clear();
    }
}

impl Default for KeyStateTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PRESSED_KEYS)
    }
}
